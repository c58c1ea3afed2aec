//! Shared types: errors, domain models and write acknowledgements

pub mod ack;
pub mod booking;
pub mod error;
pub mod room;

pub use ack::{DeleteAck, InsertAck, UpdateAck};
pub use booking::{Booking, BookingPatch, PATCHABLE_FIELDS};
pub use error::{InnspotError, Result};
pub use room::{AvailabilityUpdate, Room, RoomListQuery, RoomStatus, SortDirection};
