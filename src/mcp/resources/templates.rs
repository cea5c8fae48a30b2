//! Templated MCP resources: `qrcode://<kind>?...` and `qrcode://<literal>`.
//!
//! Every readable resource, static or templated, goes through
//! [`read_qrcode_resource`]: resolve the identifier, run the pipeline for PNG
//! bytes, answer with a text description plus an image blob. Failures come
//! back as a single `Error: ...` text block.

use rmcp::model::AnnotateAble;
use rmcp::model::*;

use crate::encoder::EncodingPipeline;
use crate::error::Result;
use crate::models::{OutputFormat, PNG_MIME_TYPE};
use crate::template::resolve_uri;

// ── URI template constants ──────────────────────────────────────────

pub const URI_TEMPLATE_WIFI: &str =
    "qrcode://wifi?ssid={ssid}&password={password}&encryption={encryption}";
pub const URI_TEMPLATE_CONTACT: &str =
    "qrcode://contact?name={name}&phone={phone}&email={email}&organization={organization}";
pub const URI_TEMPLATE_URL: &str = "qrcode://url?url={url}&size={size}&level={level}";
pub const URI_TEMPLATE_TEXT: &str = "qrcode://text?content={content}&size={size}&level={level}";
pub const URI_TEMPLATE_CALENDAR: &str =
    "qrcode://calendar?title={title}&start={start}&end={end}&location={location}";
pub const URI_TEMPLATE_RAW: &str = "qrcode://{content}";

fn template(uri_template: &str, name: &str, title: &str, description: &str) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.into(),
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        mime_type: Some(PNG_MIME_TYPE.into()),
        icons: None,
    }
    .no_annotation()
}

/// Returns the list of resource templates for `resources/templates/list`.
pub fn list_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        template(
            URI_TEMPLATE_WIFI,
            "wifi",
            "WiFi Network QR Code",
            "Join a WiFi network. Encryption defaults to WPA. \
             Example: qrcode://wifi?ssid=MyWiFi&password=MyPassword&encryption=WPA",
        ),
        template(
            URI_TEMPLATE_CONTACT,
            "contact",
            "Contact Card QR Code",
            "vCard 3.0 contact. Also accepts title, url and address. \
             Example: qrcode://contact?name=John%20Doe&phone=%2B1234567890",
        ),
        template(
            URI_TEMPLATE_URL,
            "url",
            "URL QR Code",
            "Open a web address. Example: qrcode://url?url=https%3A%2F%2Fexample.com",
        ),
        template(
            URI_TEMPLATE_TEXT,
            "text",
            "Text QR Code",
            "Plain text, 250 pixels by default. Example: qrcode://text?content=Hello%20World",
        ),
        template(
            URI_TEMPLATE_CALENDAR,
            "calendar",
            "Calendar Event QR Code",
            "iCalendar event with ISO-8601 times. Also accepts description. \
             Example: qrcode://calendar?title=Meeting&start=2025-03-15T14:30:00Z",
        ),
        template(
            URI_TEMPLATE_RAW,
            "raw",
            "Raw Content QR Code",
            "Encode the percent-decoded path as-is. Example: qrcode://Hello%20World",
        ),
    ]
}

async fn encode_resource(pipeline: &EncodingPipeline, uri: &str) -> Result<Vec<ResourceContents>> {
    let resolved = resolve_uri(uri)?;
    let label = resolved.label.clone();
    let request = resolved.into_request(OutputFormat::EncodedImageBytes);

    tracing::debug!(uri, size = request.size, level = %request.level, "reading resource");
    let result = pipeline.encode(&request).await?;

    Ok(vec![
        text_contents(uri, label),
        ResourceContents::BlobResourceContents {
            uri: uri.into(),
            mime_type: Some(result.mime_type.unwrap_or_else(|| PNG_MIME_TYPE.to_string())),
            blob: result.payload,
            meta: None,
        },
    ])
}

fn text_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.into(),
        mime_type: Some("text/plain".into()),
        text,
        meta: None,
    }
}

/// Resolve `uri` and encode it, returning resource contents.
///
/// Resolution and encoding failures become an error content block rather
/// than a protocol error.
pub async fn read_qrcode_resource(pipeline: &EncodingPipeline, uri: &str) -> ReadResourceResult {
    let contents = match encode_resource(pipeline, uri).await {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(uri, error = %e, "resource read failed");
            vec![text_contents(uri, format!("Error: {}", e))]
        }
    };
    ReadResourceResult { contents }
}
