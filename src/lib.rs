//! qrmcp - QR code generation over the Model Context Protocol
//!
//! This library provides:
//! - Content formatters for WiFi, vCard contacts, iCalendar events and text
//! - A resolver for `qrcode://` resource identifiers
//! - An encoding pipeline with an external `qrencode` backend and an
//!   in-process fallback
//! - The MCP server and the command-line interface built on top of them

pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod template;

pub use error::{QrError, Result};
