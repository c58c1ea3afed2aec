//! InnSpot - booking backend for a hotel-room reservation app
//!
//! Serves room listings, room availability updates and booking
//! create/read/update/delete over HTTP, backed by MongoDB.
//!
//! ## Layout
//!
//! - **config**: CLI/env configuration (`Args`)
//! - **auth**: signed token in an `accessToken` cookie, checked by `AuthGate`
//! - **db**: MongoDB client, typed collections and document schemas
//! - **store**: `RoomStore`/`BookingStore` seams with MongoDB and in-memory backends
//! - **services**: room and booking operations
//! - **routes** / **server**: hyper handlers, dispatch and the accept loop

pub mod auth;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{dispatch, run, AppState};
pub use types::{InnspotError, Result};
