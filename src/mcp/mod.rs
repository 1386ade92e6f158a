//! MCP server
//!
//! stdio JSON-RPC surface over the resolution engine.

pub mod server;

pub use server::NutriscanService;
