//! MCP resource handlers.
//!
//! Exposes the fixed sample codes via resources/list, one URI template per
//! content kind via resources/templates/list, and renders any `qrcode://`
//! identifier via resources/read.

mod static_resources;
mod templates;

pub use static_resources::list_static_resources;
pub use templates::{list_resource_templates, read_qrcode_resource};
