//! MCP generate tool: encode arbitrary content as a QR code.

use rmcp::model::Content;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::encoder::EncodingPipeline;
use crate::error::{QrError, Result};
use crate::models::{ErrorCorrectionLevel, GenerationRequest, OutputFormat};

/// Tool name as advertised in `tools/list`.
pub const TOOL_NAME: &str = "generate-qrcode";

pub const MIN_SCALE: u32 = 1;
pub const MAX_SCALE: u32 = 10;
pub const DEFAULT_SCALE: u32 = 3;

/// Representation returned by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ToolFormat {
    /// Base64 PNG image block
    #[default]
    #[serde(alias = "png")]
    Image,
    /// Unicode glyphs in a text block
    #[serde(alias = "utf8")]
    Text,
}

/// Input parameters for the generate-qrcode tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrInput {
    #[schemars(description = "The content to encode in the QR code (URL, text, etc.)")]
    pub content: String,

    #[schemars(
        description = "Error correction level: L (~7%), M (~15%), Q (~25%) or H (~30%). Default: M"
    )]
    pub error_correction_level: Option<ErrorCorrectionLevel>,

    #[schemars(
        description = "Size of the QR code image from 1 to 10, in hundreds of pixels. Default: 3",
        range(min = 1, max = 10)
    )]
    pub size: Option<u32>,

    #[schemars(description = "Output format: image (PNG) or text (terminal glyphs). Default: image")]
    pub format: Option<ToolFormat>,
}

/// Execute the tool logic, returning the content blocks of a successful call.
pub async fn run_generate(
    pipeline: &EncodingPipeline,
    input: GenerateQrInput,
) -> Result<Vec<Content>> {
    let scale = input.size.unwrap_or(DEFAULT_SCALE);
    if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(QrError::validation(format!(
            "Size must be between {} and {}",
            MIN_SCALE, MAX_SCALE
        )));
    }

    let format = input.format.unwrap_or_default();
    let output = match format {
        ToolFormat::Image => OutputFormat::EncodedImageBytes,
        ToolFormat::Text => OutputFormat::TerminalGlyphs,
    };
    let level = input.error_correction_level.unwrap_or_default();
    let request = GenerationRequest::from_scale(input.content, scale, level, output);

    let result = pipeline.encode(&request).await?;
    let label = format!("QR Code for \"{}\":", request.content);

    Ok(match format {
        ToolFormat::Image => vec![
            Content::text(label),
            Content::image(
                result.payload,
                result.mime_type.unwrap_or_else(|| crate::models::PNG_MIME_TYPE.to_string()),
            ),
        ],
        ToolFormat::Text => vec![Content::text(format!("{}\n\n{}", label, result.payload))],
    })
}
