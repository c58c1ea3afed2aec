//! Booking create/read/update/delete
//!
//! Bookings are stored as the client sends them. Nothing here checks that
//! the referenced room exists, is available, or that its status agrees with
//! the booking; room status is changed only by explicit room updates.

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::Claims;
use crate::store::BookingStore;
use crate::types::{Booking, BookingPatch, DeleteAck, InnspotError, InsertAck, Result, UpdateAck};

/// Operations over the `bookings` collection
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Insert the booking as-is; the store assigns the id
    pub async fn create(&self, mut booking: Booking) -> Result<InsertAck> {
        booking.id = None;
        let ack = self.store.insert(booking).await?;
        info!("Booking {} created", ack.inserted_id);
        Ok(ack)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Booking>> {
        self.store.find_by_id(id).await
    }

    /// Bookings owned by `email`, visible only to the caller holding that identity
    pub async fn list_by_owner(&self, email: &str, caller: &Claims) -> Result<Vec<Booking>> {
        if email != caller.email {
            warn!(
                "Caller {} tried to list bookings of another user",
                caller.email
            );
            return Err(InnspotError::Forbidden("Forbidden access".into()));
        }

        self.store.list_by_owner(email).await
    }

    /// A missing id yields `deletedCount: 0`, not an error
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteAck> {
        let ack = self.store.delete_by_id(id).await?;
        info!("Booking {} delete (deleted {})", id, ack.deleted_count);
        Ok(ack)
    }

    /// Overwrite whitelisted fields; a missing id yields `matchedCount: 0`
    pub async fn update_by_id(&self, id: &str, patch: &BookingPatch) -> Result<UpdateAck> {
        patch.ensure_not_empty()?;
        let ack = self.store.update_by_id(id, patch).await?;
        info!(
            "Booking {} update (matched {}, modified {})",
            id, ack.matched_count, ack.modified_count
        );
        Ok(ack)
    }
}
