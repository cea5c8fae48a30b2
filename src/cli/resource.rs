//! CLI dispatch for the `resource` command.

use std::io;
use std::path::Path;
use std::process::{Command, ExitCode};

use super::generate::write_png;
use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::encoder::EncodingPipeline;
use crate::error::Result;
use crate::models::OutputFormat;
use crate::template::{resolve_uri, SCHEME};

const URI_EXAMPLES: &[&str] = &[
    "qrcode://sample",
    "qrcode://hello-world",
    "qrcode://wifi?ssid=MyWiFi&password=MyPassword",
    "qrcode://https%3A%2F%2Fexample.com?size=300&level=H",
];

/// Resolve and encode `uri`, writing the PNG to `output` when given.
async fn render_resource(
    pipeline: &EncodingPipeline,
    uri: &str,
    output: Option<&Path>,
) -> Result<()> {
    let resolved = resolve_uri(uri)?;
    let request = resolved.into_request(OutputFormat::EncodedImageBytes);
    let result = pipeline.encode(&request).await?;

    if let Some(path) = output {
        write_png(path, &result.payload).await?;
    }
    Ok(())
}

/// Platform command that opens a file with its default viewer.
fn opener(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

fn open_in_viewer(path: &Path) -> io::Result<()> {
    let absolute = std::path::absolute(path)?;
    let status = opener(&absolute).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("viewer exited with {}", status)))
    }
}

/// Execute the resource command.
pub async fn run_resource(
    pipeline: &EncodingPipeline,
    uri: &str,
    output: Option<&Path>,
    view: bool,
) -> ExitCode {
    if !uri.starts_with(SCHEME) {
        eprintln!("Error: Resource URI must start with {}", SCHEME);
        eprintln!("Examples:");
        for example in URI_EXAMPLES {
            eprintln!("  {}", example);
        }
        return ExitCode::from(EXIT_ERROR);
    }

    if let Err(e) = render_resource(pipeline, uri, output).await {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    match output {
        Some(path) => {
            println!("QR code image saved to {}", path.display());
            if view {
                if let Err(e) = open_in_viewer(path) {
                    eprintln!("Failed to open image: {}", e);
                }
            }
        }
        None => {
            println!("QR Code generated successfully.");
            println!("Resource URI: {}", uri);
            println!("Use --output flag to save the QR code as an image file.");
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_render_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wifi.png");
        let pipeline = EncodingPipeline::builtin_only();

        render_resource(&pipeline, "qrcode://wifi?ssid=Home&size=400", Some(&path))
            .await
            .unwrap();

        let img = image::open(&path).unwrap();
        assert!(img.width() > 200 && img.width() <= 400);
    }

    #[tokio::test]
    async fn test_render_without_output_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let pipeline = EncodingPipeline::builtin_only().with_scratch_dir(temp.path());

        render_resource(&pipeline, "qrcode://hello-world", None).await.unwrap();
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_render_validation_error() {
        let pipeline = EncodingPipeline::builtin_only();
        let err = render_resource(&pipeline, "qrcode://calendar?title=x", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: start");
    }

    #[test]
    fn test_opener_passes_path_last() {
        let cmd = opener(Path::new("/tmp/qr.png"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().map(|a| a.to_os_string()), Some("/tmp/qr.png".into()));
    }
}
