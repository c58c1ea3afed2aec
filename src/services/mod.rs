//! Room and booking services
//!
//! Each operation is one store round trip; services add the owner check,
//! input parsing and logging around it.

pub mod bookings;
pub mod rooms;

pub use bookings::BookingService;
pub use rooms::RoomService;
