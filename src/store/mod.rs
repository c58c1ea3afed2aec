//! Storage seams for rooms and bookings
//!
//! Services talk to these traits, never to MongoDB directly, so the same
//! logic runs against `MongoRoomStore`/`MongoBookingStore` in production and
//! `MemoryRoomStore`/`MemoryBookingStore` in dev mode and tests. Both
//! backends report the same acknowledgement counts for the same operations.
//!
//! Each call is a single-document (or single-query) operation; there are no
//! transactions and concurrent writes to one document are last-writer-wins.

pub mod memory;
pub mod mongo;

pub use memory::{MemoryBookingStore, MemoryRoomStore};
pub use mongo::{MongoBookingStore, MongoRoomStore};

use async_trait::async_trait;

use crate::types::{
    Booking, BookingPatch, DeleteAck, InsertAck, Result, Room, RoomStatus, SortDirection,
    UpdateAck,
};

/// Read/update access to the `rooms` collection
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// All rooms with the given status, ordered by price per night
    async fn list_by_status(&self, status: RoomStatus, sort: SortDirection) -> Result<Vec<Room>>;

    /// Room with the given id, if any
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>>;

    /// Overwrite the status of the room with the given id
    async fn set_status_by_id(&self, id: &str, status: RoomStatus) -> Result<UpdateAck>;

    /// Overwrite the status of the first room with the given number
    async fn set_status_by_number(&self, room_number: i64, status: RoomStatus)
        -> Result<UpdateAck>;

    /// Backend name for health output
    fn backend(&self) -> &'static str;
}

/// Create/read/update/delete access to the `bookings` collection
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Store the booking verbatim under a freshly assigned id
    async fn insert(&self, booking: Booking) -> Result<InsertAck>;

    /// Booking with the given id, if any
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;

    /// All bookings whose `userEmail` equals `email`
    async fn list_by_owner(&self, email: &str) -> Result<Vec<Booking>>;

    /// Remove the booking with the given id
    async fn delete_by_id(&self, id: &str) -> Result<DeleteAck>;

    /// Overwrite the whitelisted fields present in `patch`
    async fn update_by_id(&self, id: &str, patch: &BookingPatch) -> Result<UpdateAck>;
}
