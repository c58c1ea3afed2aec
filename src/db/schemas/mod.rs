//! Database schemas for InnSpot
//!
//! Defines MongoDB document structures for rooms and bookings.

mod booking;
mod room;

pub use booking::{booking_patch_update, BookingDoc, BOOKING_COLLECTION};
pub use room::{RoomDoc, ROOM_COLLECTION};
