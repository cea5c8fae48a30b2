//! Static MCP resources: the fixed sample codes.

use rmcp::model::AnnotateAble;
use rmcp::model::*;

use crate::models::PNG_MIME_TYPE;
use crate::template::{HELLO_WORLD_URI, SAMPLE_URI};

/// Returns the list of all static MCP resources.
pub fn list_static_resources() -> Vec<Resource> {
    vec![
        RawResource {
            uri: SAMPLE_URI.into(),
            name: "sample".into(),
            title: Some("Sample QR Code".into()),
            description: Some("A sample QR code linking to the mcp-server-qrcode repository".into()),
            mime_type: Some(PNG_MIME_TYPE.into()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation(),
        RawResource {
            uri: HELLO_WORLD_URI.into(),
            name: "hello-world".into(),
            title: Some("Hello World QR Code".into()),
            description: Some("A QR code containing \"Hello, World!\"".into()),
            mime_type: Some(PNG_MIME_TYPE.into()),
            size: None,
            icons: None,
            meta: None,
        }
        .no_annotation(),
    ]
}
