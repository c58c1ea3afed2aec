//! Database layer for InnSpot
//!
//! Provides MongoDB storage for the `rooms` and `bookings` collections.

pub mod mongo;
pub mod schemas;

pub use mongo::{parse_object_id, MongoClient, MongoCollection};
pub use schemas::{BookingDoc, RoomDoc, BOOKING_COLLECTION, ROOM_COLLECTION};
