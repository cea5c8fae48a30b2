//! Request and result types for QR code generation.
//!
//! Everything here is immutable once built and lives for a single request.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{QrError, Result};

/// Smallest accepted image size in pixels.
pub const MIN_PIXEL_SIZE: u32 = 100;
/// Largest accepted image size in pixels.
pub const MAX_PIXEL_SIZE: u32 = 1000;
/// Pixels per step of the 1-10 tool scale.
pub const PIXELS_PER_SCALE: u32 = 100;

/// MIME type of every raster image the pipeline produces.
pub const PNG_MIME_TYPE: &str = "image/png";

/// QR error-correction level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub enum ErrorCorrectionLevel {
    /// ~7% of codewords can be restored
    L,
    /// ~15% of codewords can be restored
    #[default]
    M,
    /// ~25% of codewords can be restored
    Q,
    /// ~30% of codewords can be restored
    H,
}

impl ErrorCorrectionLevel {
    pub const ALL: [ErrorCorrectionLevel; 4] = [Self::L, Self::M, Self::Q, Self::H];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = QrError;

    /// Exact, case-sensitive match on `L`, `M`, `Q` or `H`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(QrError::validation(format!(
                "Invalid error correction level '{}'. Expected one of: L, M, Q, H",
                other
            ))),
        }
    }
}

/// Output representation requested from the encoding pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `data:image/png;base64,...` string
    EmbeddedImage,
    /// Bare base64 PNG bytes with an explicit MIME type
    EncodedImageBytes,
    /// Unicode block art suitable for a terminal
    TerminalGlyphs,
}

impl OutputFormat {
    pub fn is_image(self) -> bool {
        !matches!(self, Self::TerminalGlyphs)
    }
}

/// A fully specified generation request, as consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub content: String,
    /// Image size in pixels.
    pub size: u32,
    pub level: ErrorCorrectionLevel,
    pub format: OutputFormat,
}

impl GenerationRequest {
    pub fn new(
        content: impl Into<String>,
        size: u32,
        level: ErrorCorrectionLevel,
        format: OutputFormat,
    ) -> Self {
        Self { content: content.into(), size, level, format }
    }

    /// Build a request from the 1-10 tool scale.
    pub fn from_scale(
        content: impl Into<String>,
        scale: u32,
        level: ErrorCorrectionLevel,
        format: OutputFormat,
    ) -> Self {
        Self::new(content, scale_to_pixels(scale), level, format)
    }

    /// Check content and size before any encoder runs.
    pub fn validate(&self) -> Result<()> {
        validate_content(&self.content)?;
        validate_pixel_size(self.size)
    }
}

/// Content must contain something other than whitespace.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(QrError::validation("Content is required for QR code generation"));
    }
    Ok(())
}

/// Size must lie within `MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE`.
pub fn validate_pixel_size(size: u32) -> Result<()> {
    if size < MIN_PIXEL_SIZE || size > MAX_PIXEL_SIZE {
        return Err(QrError::validation(format!(
            "QR code size must be between {} and {} pixels",
            MIN_PIXEL_SIZE, MAX_PIXEL_SIZE
        )));
    }
    Ok(())
}

pub fn scale_to_pixels(scale: u32) -> u32 {
    scale.saturating_mul(PIXELS_PER_SCALE)
}

/// Module scale for encoders that think in "pixels per module": `max(1, px / 100)`.
pub fn pixels_to_module_scale(pixels: u32) -> u32 {
    (pixels / PIXELS_PER_SCALE).max(1)
}

/// The output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResult {
    pub format: OutputFormat,
    /// `data:` URL, bare base64 or glyph text depending on `format`.
    pub payload: String,
    pub mime_type: Option<String>,
}

/// Canonical content plus the output options resolved alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub content: String,
    pub size: u32,
    pub level: ErrorCorrectionLevel,
    /// Human-readable description, e.g. `QR Code for "https://example.com"`.
    pub label: String,
}

impl ResolvedContent {
    pub fn into_request(self, format: OutputFormat) -> GenerationRequest {
        GenerationRequest::new(self.content, self.size, self.level, format)
    }
}
