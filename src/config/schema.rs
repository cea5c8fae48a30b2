//! Configuration schema types for `qrcode.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::encoder::{BuiltinEncoder, EncodingPipeline, QrencodeEncoder};
use crate::models::{ErrorCorrectionLevel, MAX_PIXEL_SIZE, MIN_PIXEL_SIZE};

/// Defaults applied by the CLI when a flag is omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Pixel size for `generate` and piped input
    #[serde(default = "default_size")]
    pub size: u32,
    /// Error-correction level for `generate` and piped input
    #[serde(default)]
    pub error_correction: ErrorCorrectionLevel,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { size: default_size(), error_correction: ErrorCorrectionLevel::default() }
    }
}

fn default_size() -> u32 {
    200
}

/// Encoder chain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Primary encoder binary, resolved through PATH
    #[serde(default = "default_program")]
    pub program: String,
    /// Try the external program before the in-process encoder
    #[serde(default = "default_external")]
    pub external: bool,
    /// Directory for scratch PNGs (system temp when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { program: default_program(), external: default_external(), scratch_dir: None }
    }
}

fn default_program() -> String {
    "qrencode".to_string()
}

fn default_external() -> bool {
    true
}

/// Root configuration structure for `qrcode.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "defaults.size")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "qrcode.toml: '{}' {}", self.field, self.message)
    }
}

impl QrConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.defaults.size < MIN_PIXEL_SIZE || self.defaults.size > MAX_PIXEL_SIZE {
            errors.push(ConfigValidationError {
                field: "defaults.size".to_string(),
                message: format!("must be between {} and {}", MIN_PIXEL_SIZE, MAX_PIXEL_SIZE),
            });
        }

        if self.encoder.program.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "encoder.program".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Build the encoder chain this configuration describes.
    pub fn pipeline(&self) -> EncodingPipeline {
        let pipeline = if self.encoder.external {
            EncodingPipeline::new(vec![
                std::sync::Arc::new(QrencodeEncoder::new(&self.encoder.program)),
                std::sync::Arc::new(BuiltinEncoder),
            ])
        } else {
            EncodingPipeline::builtin_only()
        };

        match &self.encoder.scratch_dir {
            Some(dir) => pipeline.with_scratch_dir(dir),
            None => pipeline,
        }
    }
}
