//! FinTrack HTTP server library.
//!
//! Exposes the router and state construction so integration tests can drive
//! the full API in-process.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod models;

pub use main_lib::{build_state, init_tracing, AppState};
