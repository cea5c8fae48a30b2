//! QR encoder backends and the two-tier encoding pipeline.
//!
//! A backend knows how to turn one [`EncodeJob`] into either terminal glyphs
//! or a PNG file. The [`EncodingPipeline`] owns an ordered chain of backends
//! and tries them in turn until one succeeds.

mod builtin;
mod external;
mod pipeline;

pub use builtin::{BuiltinEncoder, ModuleGrid};
pub use external::QrencodeEncoder;
pub use pipeline::{strip_data_url_prefix, EncodingPipeline};

use std::path::Path;

use thiserror::Error;

use crate::models::ErrorCorrectionLevel;

/// Everything a backend needs to render one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    pub content: String,
    pub level: ErrorCorrectionLevel,
    /// Requested image size in pixels.
    pub pixel_size: u32,
}

/// Failure of a single backend attempt.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The backend could not be started (e.g. binary not on PATH).
    #[error("{program} is not available: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The backend ran and reported failure.
    #[error("{program} exited with {status}: {stderr}")]
    Failed { program: String, status: String, stderr: String },
    /// The backend reported success but produced unusable output.
    #[error("malformed output: {0}")]
    Malformed(String),
    /// The content does not fit in any QR version at this level.
    #[error("data too long for a QR code at level {level}: {detail}")]
    DataTooLong { level: ErrorCorrectionLevel, detail: String },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A QR encoder capability.
///
/// Implementations are blocking; the pipeline runs them on tokio's blocking pool.
pub trait QrEncoder: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Render the symbol as text glyphs.
    fn render_glyphs(&self, job: &EncodeJob) -> Result<String, EncoderError>;

    /// Render the symbol as a PNG written to `out`.
    fn render_png(&self, job: &EncodeJob, out: &Path) -> Result<(), EncoderError>;
}
