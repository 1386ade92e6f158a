//! Nutriscan Library
//!
//! Resolves free-text food labels from an object detector to per-100g
//! nutrition facts from Open Food Facts.

pub mod build_info;
pub mod config;
pub mod db;
pub mod external;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod resolve;
pub mod tools;
