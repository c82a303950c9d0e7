//! MCP tool inputs for the Zendesk server.
//!
//! This module contains the input types and conversion helpers for
//! MCP tools that expose Zendesk ticket and help center operations.

mod inputs;

pub use inputs::*;
