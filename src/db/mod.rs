//! Database module
//!
//! SQLite persistence for the feedback log.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
