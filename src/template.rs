//! Templated resource identifiers: `qrcode://kind?key=value&...`.
//!
//! Resolution turns an identifier into canonical content plus output options:
//!
//! - `qrcode://sample`, `qrcode://hello-world` → fixed literal content
//! - `qrcode://wifi?ssid=...` (and `contact`, `url`, `text`, `calendar`) → formatter output
//! - `qrcode://<anything else>` → the percent-decoded path is the content
//!
//! `size` and `level` are parsed leniently: a value that does not parse is
//! ignored and the kind's default stays in place.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{QrError, Result};
use crate::formatters::{
    format_calendar, format_contact, format_text, format_wifi, CalendarEvent, ContactCard,
    WifiNetwork,
};
use crate::models::{ErrorCorrectionLevel, ResolvedContent};

/// Scheme every resource identifier must carry.
pub const SCHEME: &str = "qrcode://";

/// Default pixel size for templated identifiers.
pub const DEFAULT_TEMPLATE_SIZE: u32 = 300;
/// Default pixel size for the `text` template.
pub const DEFAULT_TEXT_SIZE: u32 = 250;

/// Built-in identifiers that resolve to fixed content.
pub const SAMPLE_URI: &str = "qrcode://sample";
pub const HELLO_WORLD_URI: &str = "qrcode://hello-world";
pub const SAMPLE_CONTENT: &str = "https://github.com/jwalsh/mcp-server-qrcode";
pub const HELLO_WORLD_CONTENT: &str = "Hello, World!";

/// Template category of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Wifi,
    Contact,
    Url,
    Text,
    Calendar,
    /// No kind token: the path itself is the content.
    Raw,
}

impl TemplateKind {
    /// Kinds addressed by a token after the scheme.
    pub const TOKENS: [TemplateKind; 5] =
        [Self::Wifi, Self::Contact, Self::Url, Self::Text, Self::Calendar];

    pub fn from_token(token: &str) -> Option<Self> {
        Self::TOKENS.into_iter().find(|kind| kind.token() == Some(token))
    }

    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::Wifi => Some("wifi"),
            Self::Contact => Some("contact"),
            Self::Url => Some("url"),
            Self::Text => Some("text"),
            Self::Calendar => Some("calendar"),
            Self::Raw => None,
        }
    }

    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Self::Wifi => &["ssid"],
            Self::Contact => &["name"],
            Self::Url => &["url"],
            Self::Text => &["content"],
            Self::Calendar => &["title", "start"],
            Self::Raw => &[],
        }
    }

    pub fn optional_params(self) -> &'static [&'static str] {
        match self {
            Self::Wifi => &["password", "encryption", "size", "level"],
            Self::Contact => {
                &["phone", "email", "organization", "title", "url", "address", "size", "level"]
            }
            Self::Url | Self::Text | Self::Raw => &["size", "level"],
            Self::Calendar => &["end", "location", "description", "size", "level"],
        }
    }

    pub fn default_size(self) -> u32 {
        match self {
            Self::Text => DEFAULT_TEXT_SIZE,
            _ => DEFAULT_TEMPLATE_SIZE,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token().unwrap_or("raw"))
    }
}

/// A parsed identifier: kind plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRequest {
    pub kind: TemplateKind,
    /// Percent-decoded path content (only meaningful for `Raw`).
    pub raw_content: String,
    pub params: HashMap<String, String>,
}

impl TemplateRequest {
    /// Parse an identifier without resolving it.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(SCHEME).ok_or_else(|| {
            QrError::validation(format!("Resource URI must start with {}", SCHEME))
        })?;

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };

        let params = parse_query(query);

        if let Some(kind) = TemplateKind::from_token(path) {
            return Ok(Self { kind, raw_content: String::new(), params });
        }

        let raw_content = urlencoding::decode(path)
            .map(|decoded| decoded.into_owned())
            .map_err(|_| QrError::validation("Invalid percent-encoding in resource URI"))?;

        Ok(Self { kind: TemplateKind::Raw, raw_content, params })
    }

    fn param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn required(&self, key: &str) -> Result<String> {
        match self.params.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.clone()),
            _ => Err(QrError::missing(key)),
        }
    }

    /// Run per-kind validation and the matching formatter.
    pub fn resolve(&self) -> Result<ResolvedContent> {
        for key in self.kind.required_params() {
            self.required(key)?;
        }

        let (content, label) = match self.kind {
            TemplateKind::Wifi => {
                let network = WifiNetwork {
                    ssid: self.required("ssid")?,
                    password: self.param("password"),
                    encryption: self.param("encryption"),
                };
                let label = format!("WiFi QR Code for network \"{}\"", network.ssid);
                (format_wifi(&network)?, label)
            }
            TemplateKind::Contact => {
                let card = ContactCard {
                    name: self.required("name")?,
                    phone: self.param("phone"),
                    email: self.param("email"),
                    organization: self.param("organization"),
                    title: self.param("title"),
                    url: self.param("url"),
                    address: self.param("address"),
                };
                let label = format!("Contact QR Code for \"{}\"", card.name);
                (format_contact(&card)?, label)
            }
            TemplateKind::Url => {
                let url = format_text(&self.required("url")?, "url")?;
                let label = format!("URL QR Code for \"{}\"", url);
                (url, label)
            }
            TemplateKind::Text => {
                let text = format_text(&self.required("content")?, "content")?;
                let label = format!("Text QR Code for \"{}\"", text);
                (text, label)
            }
            TemplateKind::Calendar => {
                let event = CalendarEvent {
                    title: self.required("title")?,
                    start: self.required("start")?,
                    end: self.param("end"),
                    location: self.param("location"),
                    description: self.param("description"),
                };
                let label = format!("Calendar QR Code for \"{}\"", event.title);
                (format_calendar(&event)?, label)
            }
            TemplateKind::Raw => {
                let text = format_text(&self.raw_content, "content")
                    .map_err(|_| QrError::validation("Content parameter is required"))?;
                let label = format!("QR Code for \"{}\"", text);
                (text, label)
            }
        };

        Ok(ResolvedContent { content, size: self.size(), level: self.level(), label })
    }

    /// Positive integer `size`, or the kind's default.
    pub fn size(&self) -> u32 {
        self.params
            .get("size")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&size| size > 0)
            .unwrap_or_else(|| self.kind.default_size())
    }

    /// Exact `L|M|Q|H`, or `M`.
    pub fn level(&self) -> ErrorCorrectionLevel {
        self.params
            .get("level")
            .and_then(|l| ErrorCorrectionLevel::from_str(l).ok())
            .unwrap_or_default()
    }
}

/// Standard query-string parsing; the last occurrence of a key wins.
fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Resolve an identifier to canonical content and output options.
pub fn resolve_uri(uri: &str) -> Result<ResolvedContent> {
    match uri {
        SAMPLE_URI => Ok(literal(SAMPLE_CONTENT, "Sample QR Code for MCP QR Code Server")),
        HELLO_WORLD_URI => Ok(literal(HELLO_WORLD_CONTENT, "Hello World QR Code")),
        _ => TemplateRequest::parse(uri)?.resolve(),
    }
}

fn literal(content: &str, label: &str) -> ResolvedContent {
    ResolvedContent {
        content: content.to_string(),
        size: DEFAULT_TEMPLATE_SIZE,
        level: ErrorCorrectionLevel::default(),
        label: label.to_string(),
    }
}

/// Build a templated identifier from a kind and parameters, percent-encoding values.
///
/// For [`TemplateKind::Raw`] the `content` pair becomes the path and the
/// remaining pairs form the query.
pub fn build_uri(kind: TemplateKind, params: &[(&str, &str)]) -> String {
    let in_query = |key: &str| kind != TemplateKind::Raw || key != "content";
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().filter(|(key, value)| !value.is_empty() && in_query(key)))
        .finish();
    let path = match kind.token() {
        Some(token) => token.to_string(),
        None => params
            .iter()
            .find(|(key, _)| *key == "content")
            .map(|(_, value)| urlencoding::encode(value).into_owned())
            .unwrap_or_default(),
    };
    if query.is_empty() {
        format!("{}{}", SCHEME, path)
    } else {
        format!("{}{}?{}", SCHEME, path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── scheme and literals ─────────────────────────────────────────

    #[test]
    fn test_rejects_wrong_scheme() {
        let err = resolve_uri("https://example.com").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("qrcode://"));
    }

    #[test]
    fn test_reserved_literals() {
        let sample = resolve_uri(SAMPLE_URI).unwrap();
        assert_eq!(sample.content, "https://github.com/jwalsh/mcp-server-qrcode");
        assert_eq!(sample.size, 300);
        assert_eq!(sample.level, ErrorCorrectionLevel::M);

        let hello = resolve_uri(HELLO_WORLD_URI).unwrap();
        assert_eq!(hello.content, "Hello, World!");
    }

    // ── templated kinds ─────────────────────────────────────────────

    #[test]
    fn test_wifi_template() {
        let resolved =
            resolve_uri("qrcode://wifi?ssid=MyWiFi&password=MyPassword&encryption=WPA").unwrap();
        assert_eq!(resolved.content, "WIFI:T:WPA;S:MyWiFi;P:MyPassword;;");
        assert_eq!(resolved.size, 300);
        assert!(resolved.label.contains("MyWiFi"));
    }

    #[test]
    fn test_wifi_missing_ssid_names_param() {
        let err = resolve_uri("qrcode://wifi?password=x").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: ssid");
    }

    #[test]
    fn test_kind_without_query_is_invalid() {
        for uri in ["qrcode://wifi", "qrcode://contact", "qrcode://url", "qrcode://calendar"] {
            let err = resolve_uri(uri).unwrap_err();
            assert!(err.is_validation(), "{} should fail validation", uri);
        }
    }

    #[test]
    fn test_contact_template_name_only() {
        let resolved = resolve_uri("qrcode://contact?name=John%20Doe").unwrap();
        let lines: Vec<&str> = resolved.content.lines().collect();
        assert_eq!(lines, vec!["BEGIN:VCARD", "VERSION:3.0", "FN:John Doe", "END:VCARD"]);
    }

    #[test]
    fn test_contact_plus_is_space() {
        let resolved = resolve_uri("qrcode://contact?name=Jane+Roe&org=ignored").unwrap();
        assert!(resolved.content.contains("FN:Jane Roe"));
        assert!(!resolved.content.contains("ORG:"));
    }

    #[test]
    fn test_url_template() {
        let resolved =
            resolve_uri("qrcode://url?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc&level=H").unwrap();
        assert_eq!(resolved.content, "https://example.com/a?b=c");
        assert_eq!(resolved.level, ErrorCorrectionLevel::H);
    }

    #[test]
    fn test_text_template_default_size() {
        let resolved = resolve_uri("qrcode://text?content=Hello%20there").unwrap();
        assert_eq!(resolved.content, "Hello there");
        assert_eq!(resolved.size, DEFAULT_TEXT_SIZE);
    }

    #[test]
    fn test_calendar_template() {
        let resolved = resolve_uri(
            "qrcode://calendar?title=Launch&start=2025-03-15T14:30:00Z&location=HQ",
        )
        .unwrap();
        assert!(resolved.content.starts_with("BEGIN:VCALENDAR"));
        assert!(resolved.content.contains("SUMMARY:Launch"));
        assert!(resolved.content.contains("DTSTART:20250315T143000Z"));
        assert!(resolved.content.contains("LOCATION:HQ"));
    }

    #[test]
    fn test_calendar_requires_start() {
        let err = resolve_uri("qrcode://calendar?title=Launch").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: start");
    }

    // ── raw content ─────────────────────────────────────────────────

    #[test]
    fn test_raw_content_with_options() {
        let resolved = resolve_uri("qrcode://https://example.com?size=500&level=Q").unwrap();
        assert_eq!(resolved.content, "https://example.com");
        assert_eq!(resolved.size, 500);
        assert_eq!(resolved.level, ErrorCorrectionLevel::Q);
        assert_eq!(resolved.label, "QR Code for \"https://example.com\"");
    }

    #[test]
    fn test_raw_content_percent_decoded() {
        let resolved = resolve_uri("qrcode://Hello%2C%20World%21").unwrap();
        assert_eq!(resolved.content, "Hello, World!");
    }

    #[test]
    fn test_raw_empty_content() {
        let err = resolve_uri("qrcode://").unwrap_err();
        assert!(err.is_validation());
        let err = resolve_uri("qrcode://?size=300").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_kind_token_must_match_whole_path() {
        let resolved = resolve_uri("qrcode://wifinetwork?ssid=x").unwrap();
        assert_eq!(resolved.content, "wifinetwork");
    }

    // ── lenient options ─────────────────────────────────────────────

    #[test]
    fn test_invalid_size_keeps_default() {
        for size in ["abc", "0", "-5", "", "12.5"] {
            let uri = format!("qrcode://url?url=https://example.com&size={}", size);
            assert_eq!(resolve_uri(&uri).unwrap().size, 300, "size={:?}", size);
        }
    }

    #[test]
    fn test_out_of_range_size_is_passed_through() {
        let resolved = resolve_uri("qrcode://url?url=https://example.com&size=50").unwrap();
        assert_eq!(resolved.size, 50);
    }

    #[test]
    fn test_invalid_level_keeps_default() {
        for level in ["X", "h", "", "MEDIUM"] {
            let uri = format!("qrcode://text?content=hi&level={}", level);
            assert_eq!(resolve_uri(&uri).unwrap().level, ErrorCorrectionLevel::M);
        }
    }

    #[test]
    fn test_last_repeated_key_wins() {
        let resolved = resolve_uri("qrcode://text?content=first&content=second").unwrap();
        assert_eq!(resolved.content, "second");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let resolved = resolve_uri("qrcode://text?content=hi&color=red&foo=bar").unwrap();
        assert_eq!(resolved.content, "hi");
    }

    // ── parsing and building ────────────────────────────────────────

    #[test]
    fn test_parse_kind_tokens() {
        for kind in TemplateKind::TOKENS {
            let token = kind.token().unwrap();
            let request = TemplateRequest::parse(&format!("qrcode://{}?a=b", token)).unwrap();
            assert_eq!(request.kind, kind);
            assert_eq!(request.params.get("a").map(String::as_str), Some("b"));
        }
    }

    #[test]
    fn test_build_uri_round_trips() {
        let uri = build_uri(
            TemplateKind::Wifi,
            &[("ssid", "My Net"), ("password", "p&ss"), ("encryption", "")],
        );
        assert_eq!(uri, "qrcode://wifi?ssid=My+Net&password=p%26ss");
        let resolved = resolve_uri(&uri).unwrap();
        assert_eq!(resolved.content, "WIFI:T:WPA;S:My Net;P:p&ss;;");
    }

    #[test]
    fn test_build_raw_uri() {
        let uri = build_uri(TemplateKind::Raw, &[("content", "Hello World")]);
        assert_eq!(uri, "qrcode://Hello%20World");
        assert_eq!(resolve_uri(&uri).unwrap().content, "Hello World");
    }

    #[test]
    fn test_build_raw_uri_keeps_options() {
        let uri = build_uri(
            TemplateKind::Raw,
            &[("content", "Hello World"), ("size", "400"), ("level", "H")],
        );
        assert_eq!(uri, "qrcode://Hello%20World?size=400&level=H");

        let resolved = resolve_uri(&uri).unwrap();
        assert_eq!(resolved.content, "Hello World");
        assert_eq!(resolved.size, 400);
        assert_eq!(resolved.level, ErrorCorrectionLevel::H);
    }

    #[test]
    fn test_raw_invalid_percent_encoding() {
        let err = resolve_uri("qrcode://%FF%FE").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid percent-encoding in resource URI");
    }
}
