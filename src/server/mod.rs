//! HTTP server for InnSpot

pub mod http;

pub use http::{dispatch, run, AppState, UNAUTHENTICATED_WRITES};
