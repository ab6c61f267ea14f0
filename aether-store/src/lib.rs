//! Aether store library
//!
//! Local persistence and search for the Aether note and to-do client:
//! notes, todos and a restorable trash in SQLite, plus substring search
//! with recency grouping.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod services;

pub use app::{init_logging, AppState};
pub use error::{AppError, Result};
