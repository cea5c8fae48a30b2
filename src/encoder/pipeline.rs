//! The encoding pipeline: validation, encoder fallback, scratch files, base64.

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use tracing::debug;

use super::{BuiltinEncoder, EncodeJob, EncoderError, QrEncoder, QrencodeEncoder};
use crate::error::{QrError, Result};
use crate::models::{EncodingResult, GenerationRequest, OutputFormat, PNG_MIME_TYPE};

/// Turns canonical content into an [`EncodingResult`].
///
/// Backends are tried in order; the first success wins. The pipeline holds no
/// mutable state and can be shared across concurrent requests.
#[derive(Clone)]
pub struct EncodingPipeline {
    encoders: Vec<Arc<dyn QrEncoder>>,
    scratch_dir: PathBuf,
}

impl std::fmt::Debug for EncodingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.encoders.iter().map(|e| e.name()).collect();
        f.debug_struct("EncodingPipeline")
            .field("encoders", &names)
            .field("scratch_dir", &self.scratch_dir)
            .finish()
    }
}

impl Default for EncodingPipeline {
    /// `qrencode` first, then the in-process encoder.
    fn default() -> Self {
        Self::new(vec![Arc::new(QrencodeEncoder::default()), Arc::new(BuiltinEncoder)])
    }
}

impl EncodingPipeline {
    pub fn new(encoders: Vec<Arc<dyn QrEncoder>>) -> Self {
        Self { encoders, scratch_dir: std::env::temp_dir() }
    }

    /// In-process encoder only.
    pub fn builtin_only() -> Self {
        Self::new(vec![Arc::new(BuiltinEncoder)])
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn encoder_names(&self) -> Vec<&str> {
        self.encoders.iter().map(|e| e.name()).collect()
    }

    /// Validate the request, then produce the requested representation.
    pub async fn encode(&self, request: &GenerationRequest) -> Result<EncodingResult> {
        request.validate()?;

        let job = EncodeJob {
            content: request.content.clone(),
            level: request.level,
            pixel_size: request.size,
        };

        match request.format {
            OutputFormat::TerminalGlyphs => {
                let glyphs = self.render_glyphs(job).await?;
                Ok(EncodingResult {
                    format: OutputFormat::TerminalGlyphs,
                    payload: glyphs,
                    mime_type: None,
                })
            }
            OutputFormat::EmbeddedImage => {
                let encoded = self.render_png_base64(job).await?;
                Ok(EncodingResult {
                    format: OutputFormat::EmbeddedImage,
                    payload: format!("data:{};base64,{}", PNG_MIME_TYPE, encoded),
                    mime_type: Some(PNG_MIME_TYPE.to_string()),
                })
            }
            OutputFormat::EncodedImageBytes => {
                let encoded = self.render_png_base64(job).await?;
                Ok(EncodingResult {
                    format: OutputFormat::EncodedImageBytes,
                    payload: strip_data_url_prefix(&encoded).to_string(),
                    mime_type: Some(PNG_MIME_TYPE.to_string()),
                })
            }
        }
    }

    async fn render_glyphs(&self, job: EncodeJob) -> Result<String> {
        let encoders = self.encoders.clone();
        tokio::task::spawn_blocking(move || {
            first_success(&encoders, |encoder| encoder.render_glyphs(&job))
        })
        .await
        .map_err(|e| QrError::Encoding(format!("encoder task failed: {}", e)))?
    }

    async fn render_png_base64(&self, job: EncodeJob) -> Result<String> {
        // Deleted when `scratch` drops, whichever way this function exits.
        let scratch = tempfile::Builder::new()
            .prefix("qrcode-")
            .suffix(".png")
            .tempfile_in(&self.scratch_dir)?;
        let path = scratch.path().to_path_buf();

        let encoders = self.encoders.clone();
        let out = path.clone();
        tokio::task::spawn_blocking(move || {
            first_success(&encoders, |encoder| encoder.render_png(&job, &out))
        })
        .await
        .map_err(|e| QrError::Encoding(format!("encoder task failed: {}", e)))??;

        let bytes = tokio::fs::read(&path).await?;
        drop(scratch);

        Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
    }
}

/// Run `attempt` against each encoder in order, returning the first success.
fn first_success<T>(
    encoders: &[Arc<dyn QrEncoder>],
    mut attempt: impl FnMut(&dyn QrEncoder) -> std::result::Result<T, EncoderError>,
) -> Result<T> {
    let mut last_error: Option<EncoderError> = None;

    for encoder in encoders {
        match attempt(encoder.as_ref()) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(encoder = encoder.name(), error = %e, "encoder failed, trying next");
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => QrError::Encoding(e.to_string()),
        None => QrError::Encoding("no encoders configured".into()),
    })
}

/// Remove a leading `data:<mime>;base64,` wrapper if there is one.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some((_, data)) = payload.split_once(";base64,") {
            return data;
        }
    }
    payload
}
