//! Nutriscan tools
//!
//! Tool implementations behind the MCP surface.

pub mod feedback;
pub mod lookup;
pub mod status;
