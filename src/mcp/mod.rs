//! MCP (Model Context Protocol) server for QR code generation
//!
//! Exposes the encoding pipeline as an MCP tool, `qrcode://` resources and
//! content prompts. Start it with `mcp-server-qrcode server`.

pub mod prompts;
pub mod resources;
mod server;
pub mod tools;

pub use server::{run_server, QrCodeMcpServer, SERVER_NAME};
