//! Room listing and availability updates

use std::sync::Arc;
use tracing::{debug, info};

use crate::store::RoomStore;
use crate::types::{InnspotError, Result, Room, RoomStatus, SortDirection, UpdateAck};

/// Operations over the `rooms` collection
#[derive(Clone)]
pub struct RoomService {
    store: Arc<dyn RoomStore>,
}

impl RoomService {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Every room currently `Available`, ordered by price per night.
    ///
    /// Unbounded: the whole matching set is returned.
    pub async fn list_available(&self, sort: SortDirection) -> Result<Vec<Room>> {
        let rooms = self
            .store
            .list_by_status(RoomStatus::Available, sort)
            .await?;
        debug!("Listed {} available rooms ({:?})", rooms.len(), sort);
        Ok(rooms)
    }

    /// The room with this id, or `None` when nothing matches
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Room>> {
        self.store.find_by_id(id).await
    }

    /// Unconditionally overwrite a room's status (last writer wins)
    pub async fn set_availability_by_id(&self, id: &str, status: RoomStatus) -> Result<UpdateAck> {
        let ack = self.store.set_status_by_id(id, status).await?;
        info!(
            "Room {} set to {} (matched {}, modified {})",
            id, status, ack.matched_count, ack.modified_count
        );
        Ok(ack)
    }

    /// Same as [`set_availability_by_id`](Self::set_availability_by_id), keyed by room number.
    /// Used by the cancellation flow.
    pub async fn set_availability_by_room_number(
        &self,
        room_number: &str,
        status: RoomStatus,
    ) -> Result<UpdateAck> {
        let number: i64 = room_number.trim().parse().map_err(|_| {
            InnspotError::BadRequest(format!("room number must be an integer, got '{}'", room_number))
        })?;

        let ack = self.store.set_status_by_number(number, status).await?;
        info!(
            "Room #{} set to {} (matched {}, modified {})",
            number, status, ack.matched_count, ack.modified_count
        );
        Ok(ack)
    }
}
