//! MCP prompt handlers.

mod templates;

pub use templates::{get_prompt, list_prompts};
