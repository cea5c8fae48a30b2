//! Content formatters: structured fields to canonical QR payload strings.
//!
//! Each formatter targets one fixed external format:
//! - WiFi network configuration (`WIFI:T:...;S:...;P:...;;`)
//! - vCard 3.0 contact records
//! - iCalendar `VEVENT` records
//! - plain text / URLs (pass-through)
//!
//! Values are inserted verbatim. The separators these formats reserve
//! (`;`, `:`, `,`, `\`) are not escaped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::{QrError, Result};

/// Encryption used when a WiFi record does not name one.
pub const DEFAULT_WIFI_ENCRYPTION: &str = "WPA";

const ICAL_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";
const ICAL_PRODID: &str = "-//mcp-server-qrcode//QR Calendar Event//EN";

/// Fields of a WiFi network QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiNetwork {
    pub ssid: String,
    pub password: Option<String>,
    pub encryption: Option<String>,
}

/// Fields of a vCard contact QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactCard {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub address: Option<String>,
}

/// Fields of an iCalendar event QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    /// ISO-8601 start timestamp
    pub start: String,
    /// ISO-8601 end timestamp
    pub end: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Treat absent and empty values alike.
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn require<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(QrError::missing(name))
    } else {
        Ok(value)
    }
}

/// Format a WiFi configuration string.
///
/// ```
/// use qrmcp::formatters::{format_wifi, WifiNetwork};
///
/// let wifi = WifiNetwork {
///     ssid: "MyWiFi".into(),
///     password: Some("MyPassword".into()),
///     encryption: Some("wpa".into()),
/// };
/// assert_eq!(format_wifi(&wifi).unwrap(), "WIFI:T:WPA;S:MyWiFi;P:MyPassword;;");
/// ```
pub fn format_wifi(network: &WifiNetwork) -> Result<String> {
    let ssid = require(&network.ssid, "ssid")?;
    let encryption = supplied(&network.encryption)
        .unwrap_or(DEFAULT_WIFI_ENCRYPTION)
        .to_uppercase();
    let password = network.password.as_deref().unwrap_or("");

    Ok(format!("WIFI:T:{};S:{};P:{};;", encryption, ssid, password))
}

/// Format a vCard 3.0 record. Optional fields that were not supplied produce no line.
pub fn format_contact(card: &ContactCard) -> Result<String> {
    let name = require(&card.name, "name")?;

    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];
    lines.push(format!("FN:{}", name));

    let optional = [
        ("TEL", &card.phone),
        ("EMAIL", &card.email),
        ("ORG", &card.organization),
        ("TITLE", &card.title),
        ("URL", &card.url),
        ("ADR", &card.address),
    ];
    for (property, value) in optional {
        if let Some(value) = supplied(value) {
            lines.push(format!("{}:{}", property, value));
        }
    }

    lines.push("END:VCARD".to_string());
    Ok(lines.join("\n"))
}

/// Format an iCalendar event with a fresh UID and the current time as DTSTAMP.
pub fn format_calendar(event: &CalendarEvent) -> Result<String> {
    format_calendar_with(event, &Uuid::new_v4().to_string(), Utc::now())
}

/// Format an iCalendar event with an explicit UID and generation timestamp.
pub fn format_calendar_with(
    event: &CalendarEvent,
    uid: &str,
    stamp: DateTime<Utc>,
) -> Result<String> {
    let title = require(&event.title, "title")?;
    let start = require(&event.start, "start")?;
    let start = ical_timestamp(start, "start")?;
    let end = supplied(&event.end).map(|end| ical_timestamp(end, "end")).transpose()?;

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", ICAL_PRODID),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", uid),
        format!("DTSTAMP:{}", stamp.format(ICAL_TIMESTAMP)),
        format!("SUMMARY:{}", title),
        format!("DTSTART:{}", start),
    ];
    if let Some(end) = end {
        lines.push(format!("DTEND:{}", end));
    }
    if let Some(location) = supplied(&event.location) {
        lines.push(format!("LOCATION:{}", location));
    }
    if let Some(description) = supplied(&event.description) {
        lines.push(format!("DESCRIPTION:{}", description));
    }
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    Ok(lines.join("\n"))
}

/// Pass text or a URL through unchanged, rejecting empty values.
pub fn format_text(value: &str, field: &str) -> Result<String> {
    require(value, field).map(str::to_string)
}

/// Convert an ISO-8601 timestamp into the compact UTC form `YYYYMMDDTHHMMSSZ`.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC) or a
/// bare date (midnight UTC). Fractional seconds are dropped.
pub fn ical_timestamp(iso: &str, field: &str) -> Result<String> {
    let iso = iso.trim();
    let utc = if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        naive.and_utc()
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M") {
        naive.and_utc()
    } else if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        date.and_hms_opt(0, 0, 0).map(|d| d.and_utc()).ok_or_else(|| invalid_date(iso, field))?
    } else {
        return Err(invalid_date(iso, field));
    };

    Ok(utc.format(ICAL_TIMESTAMP).to_string())
}

fn invalid_date(iso: &str, field: &str) -> QrError {
    QrError::validation(format!(
        "Invalid {} date '{}': expected an ISO-8601 timestamp like 2025-03-15T14:30:00Z",
        field, iso
    ))
}
