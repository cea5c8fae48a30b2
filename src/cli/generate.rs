//! CLI dispatch for `generate`, the legacy `-g` flag and piped stdin.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use base64::Engine;

use super::{CliFormat, EXIT_ERROR, EXIT_SUCCESS};
use crate::encoder::EncodingPipeline;
use crate::error::{QrError, Result};
use crate::models::{ErrorCorrectionLevel, GenerationRequest, OutputFormat};

/// Resolved options of the generate command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub content: Option<String>,
    pub size: u32,
    pub level: ErrorCorrectionLevel,
    pub output: Option<PathBuf>,
    pub format: CliFormat,
}

/// What a successful generate run prints to stdout.
#[derive(Debug, PartialEq, Eq)]
enum Printed {
    /// Glyphs or base64 PNG, printed as-is
    Payload(String),
    /// Confirmation after writing `--output`
    Saved(String),
}

fn no_content() -> QrError {
    QrError::validation("No content provided for QR code generation")
}

async fn generate(pipeline: &EncodingPipeline, options: GenerateOptions) -> Result<Printed> {
    let content = options.content.ok_or_else(no_content)?;
    let format = match options.format {
        CliFormat::Text => OutputFormat::TerminalGlyphs,
        CliFormat::Image => OutputFormat::EncodedImageBytes,
    };
    let request = GenerationRequest::new(content, options.size, options.level, format);
    let result = pipeline.encode(&request).await?;

    let Some(path) = options.output else {
        return Ok(Printed::Payload(result.payload));
    };

    match options.format {
        CliFormat::Text => {
            tokio::fs::write(&path, result.payload.as_bytes()).await?;
            Ok(Printed::Saved(format!("QR code text saved to {}", path.display())))
        }
        CliFormat::Image => {
            write_png(&path, &result.payload).await?;
            Ok(Printed::Saved(format!("QR code image saved to {}", path.display())))
        }
    }
}

/// Decode base64 PNG bytes and write them to `path`.
pub(super) async fn write_png(path: &Path, encoded: &str) -> Result<()> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| QrError::Encoding(format!("invalid base64 image data: {}", e)))?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Execute the generate command.
pub async fn run_generate(pipeline: &EncodingPipeline, options: GenerateOptions) -> ExitCode {
    match generate(pipeline, options).await {
        Ok(Printed::Payload(text)) | Ok(Printed::Saved(text)) => {
            println!("{}", text);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print glyphs for `content`: the legacy `-g` flag and piped stdin.
pub async fn run_glyphs(
    pipeline: &EncodingPipeline,
    content: String,
    size: u32,
    level: ErrorCorrectionLevel,
) -> ExitCode {
    let options = GenerateOptions {
        content: Some(content).filter(|c| !c.trim().is_empty()),
        size,
        level,
        output: None,
        format: CliFormat::Text,
    };
    run_generate(pipeline, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(content: Option<&str>, format: CliFormat, output: Option<PathBuf>) -> GenerateOptions {
        GenerateOptions {
            content: content.map(String::from),
            size: 200,
            level: ErrorCorrectionLevel::M,
            output,
            format,
        }
    }

    #[tokio::test]
    async fn test_text_to_stdout() {
        let pipeline = EncodingPipeline::builtin_only();
        let printed = generate(&pipeline, options(Some("hello"), CliFormat::Text, None))
            .await
            .unwrap();
        match printed {
            Printed::Payload(text) => assert!(text.contains('█')),
            other => panic!("expected payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_to_stdout_is_base64() {
        let pipeline = EncodingPipeline::builtin_only();
        let printed = generate(&pipeline, options(Some("hello"), CliFormat::Image, None))
            .await
            .unwrap();
        match printed {
            Printed::Payload(text) => {
                let png = base64::engine::general_purpose::STANDARD.decode(text).unwrap();
                assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
            }
            other => panic!("expected payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("qr.png");
        let pipeline = EncodingPipeline::builtin_only();

        let printed =
            generate(&pipeline, options(Some("hello"), CliFormat::Image, Some(path.clone())))
                .await
                .unwrap();
        assert_eq!(printed, Printed::Saved(format!("QR code image saved to {}", path.display())));

        let img = image::open(&path).unwrap();
        assert!(img.width() <= 200);
    }

    #[tokio::test]
    async fn test_text_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("qr.txt");
        let pipeline = EncodingPipeline::builtin_only();

        generate(&pipeline, options(Some("hello"), CliFormat::Text, Some(path.clone())))
            .await
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains('█'));
    }

    #[tokio::test]
    async fn test_missing_content() {
        let pipeline = EncodingPipeline::builtin_only();
        let err = generate(&pipeline, options(None, CliFormat::Text, None)).await.unwrap_err();
        assert_eq!(err.to_string(), "No content provided for QR code generation");
    }

    #[tokio::test]
    async fn test_size_out_of_range() {
        let pipeline = EncodingPipeline::builtin_only();
        let mut opts = options(Some("hello"), CliFormat::Text, None);
        opts.size = 50;
        let err = generate(&pipeline, opts).await.unwrap_err();
        assert!(err.to_string().contains("between 100 and 1000"));
    }
}
