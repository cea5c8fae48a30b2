//! MCP tool definitions
//!
//! Each tool wraps the encoding pipeline, exposing it as a structured MCP tool.

pub mod generate;
