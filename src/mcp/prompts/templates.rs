//! Prompt template definitions for the QR code MCP server.
//!
//! The `create-*` prompts steer a model towards the matching `qrcode://`
//! resource URI. `qrcode-formatter` runs a formatter directly and returns the
//! canonical content it produces.

use std::collections::HashMap;

use rmcp::model::*;
use serde_json::{Map, Value};

use crate::error::{QrError, Result};
use crate::template::{build_uri, TemplateKind, TemplateRequest};

pub const PROMPT_WIFI: &str = "create-wifi-qr";
pub const PROMPT_CONTACT: &str = "create-contact-qr";
pub const PROMPT_TEXT: &str = "create-text-qr";
pub const PROMPT_CALENDAR: &str = "create-calendar-qr";
pub const PROMPT_FORMATTER: &str = "qrcode-formatter";

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.into(),
        title: None,
        description: Some(description.into()),
        required: Some(required),
    }
}

fn prompt(name: &str, title: &str, description: &str, arguments: Vec<PromptArgument>) -> Prompt {
    Prompt {
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        arguments: Some(arguments),
        icons: None,
        meta: None,
    }
}

/// Returns the list of all available MCP prompts.
pub fn list_prompts() -> Vec<Prompt> {
    vec![
        prompt(
            PROMPT_WIFI,
            "Create WiFi QR Code",
            "Create a QR code that joins a WiFi network",
            vec![
                argument("ssid", "Network name", true),
                argument("password", "Network password", false),
                argument("encryption", "WPA, WEP or nopass (default: WPA)", false),
            ],
        ),
        prompt(
            PROMPT_CONTACT,
            "Create Contact QR Code",
            "Create a QR code holding a vCard contact",
            vec![
                argument("name", "Full name", true),
                argument("phone", "Phone number", false),
                argument("email", "Email address", false),
                argument("organization", "Company or organization", false),
            ],
        ),
        prompt(
            PROMPT_TEXT,
            "Create Text QR Code",
            "Create a QR code from plain text",
            vec![argument("content", "Text to encode", true)],
        ),
        prompt(
            PROMPT_CALENDAR,
            "Create Calendar QR Code",
            "Create a QR code holding an iCalendar event",
            vec![
                argument("title", "Event title", true),
                argument("start", "Start time, ISO-8601 (e.g. 2025-03-15T14:30:00Z)", true),
                argument("end", "End time, ISO-8601", false),
                argument("location", "Event location", false),
            ],
        ),
        prompt(
            PROMPT_FORMATTER,
            "Format QR Code Content",
            "Return the canonical content a QR code of the given type would encode",
            vec![
                argument("type", "One of: wifi, contact, url, text, calendar", true),
                argument(
                    "parameters",
                    "Fields for the type, as an object or as top-level arguments",
                    false,
                ),
            ],
        ),
    ]
}

/// Prompt arguments flattened to strings.
///
/// A nested `parameters` object is merged in; top-level arguments win.
fn string_args(arguments: Option<&Map<String, Value>>) -> HashMap<String, String> {
    let mut args = HashMap::new();
    let Some(arguments) = arguments else {
        return args;
    };

    if let Some(Value::Object(nested)) = arguments.get("parameters") {
        for (key, value) in nested {
            if let Some(text) = value_to_string(value) {
                args.insert(key.clone(), text);
            }
        }
    }
    for (key, value) in arguments {
        if key == "parameters" {
            continue;
        }
        if let Some(text) = value_to_string(value) {
            args.insert(key.clone(), text);
        }
    }
    args
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Retrieves a prompt by name, substituting the provided arguments.
pub fn get_prompt(name: &str, arguments: Option<&Map<String, Value>>) -> Result<GetPromptResult> {
    let args = string_args(arguments);
    match name {
        PROMPT_WIFI => guide(TemplateKind::Wifi, &args, "a WiFi network"),
        PROMPT_CONTACT => guide(TemplateKind::Contact, &args, "a contact card"),
        PROMPT_TEXT => guide(TemplateKind::Text, &args, "a piece of text"),
        PROMPT_CALENDAR => guide(TemplateKind::Calendar, &args, "a calendar event"),
        PROMPT_FORMATTER => format_content(&args),
        other => Err(QrError::validation(format!("Unknown prompt: {}", other))),
    }
}

/// Point the model at the resource URI built from the supplied arguments.
fn guide(kind: TemplateKind, args: &HashMap<String, String>, subject: &str) -> Result<GetPromptResult> {
    for key in kind.required_params() {
        if args.get(*key).map_or(true, |v| v.trim().is_empty()) {
            return Err(QrError::missing(key));
        }
    }

    let params: Vec<(&str, &str)> = kind
        .required_params()
        .iter()
        .chain(kind.optional_params())
        .filter_map(|key| args.get(*key).map(|value| (*key, value.as_str())))
        .collect();
    let uri = build_uri(kind, &params);

    let text = format!(
        "Create a QR code for {subject}. Read the resource {uri} to get the PNG image, \
         then show it to the user. Add size (100-1000) or level (L, M, Q, H) query \
         parameters to change the output."
    );

    Ok(GetPromptResult {
        description: Some(format!("QR code for {}", subject)),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    })
}

fn format_content(args: &HashMap<String, String>) -> Result<GetPromptResult> {
    let kind_name = args.get("type").map(String::as_str).unwrap_or_default();
    let kind = TemplateKind::from_token(kind_name).ok_or_else(|| {
        QrError::validation(format!(
            "Unsupported type '{}'. Expected one of: wifi, contact, url, text, calendar",
            kind_name
        ))
    })?;

    let request = TemplateRequest { kind, raw_content: String::new(), params: args.clone() };
    let resolved = request.resolve()?;

    Ok(GetPromptResult {
        description: Some(resolved.label),
        messages: vec![PromptMessage::new_text(PromptMessageRole::Assistant, resolved.content)],
    })
}
