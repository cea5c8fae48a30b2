//! Primary backend: the external `qrencode` program.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{EncodeJob, EncoderError, QrEncoder};
use crate::models::pixels_to_module_scale;

/// Default program name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "qrencode";

/// Runs `qrencode` as a subprocess.
///
/// Content is passed as a single argument, never through a shell.
#[derive(Debug, Clone)]
pub struct QrencodeEncoder {
    program: PathBuf,
}

impl Default for QrencodeEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl QrencodeEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn base_command(&self, job: &EncodeJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-l")
            .arg(job.level.as_str())
            .arg("-s")
            .arg(pixels_to_module_scale(job.pixel_size).to_string());
        cmd
    }

    fn run(&self, mut cmd: Command) -> Result<Output, EncoderError> {
        let program = self.program.display().to_string();
        let output = cmd
            .output()
            .map_err(|source| EncoderError::Unavailable { program: program.clone(), source })?;

        if !output.status.success() {
            return Err(EncoderError::Failed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl QrEncoder for QrencodeEncoder {
    fn name(&self) -> &str {
        "qrencode"
    }

    fn render_glyphs(&self, job: &EncodeJob) -> Result<String, EncoderError> {
        let mut cmd = self.base_command(job);
        cmd.arg("-o").arg("-").arg("-t").arg("UTF8").arg("--").arg(&job.content);

        let output = self.run(cmd)?;
        let text = String::from_utf8(output.stdout)
            .map_err(|e| EncoderError::Malformed(format!("non UTF-8 glyph output: {}", e)))?;
        if text.trim().is_empty() {
            return Err(EncoderError::Malformed("empty glyph output".into()));
        }
        Ok(text)
    }

    fn render_png(&self, job: &EncodeJob, out: &Path) -> Result<(), EncoderError> {
        let mut cmd = self.base_command(job);
        cmd.arg("-o").arg(out).arg("-t").arg("PNG").arg("--").arg(&job.content);

        self.run(cmd)?;
        let written = std::fs::metadata(out)?.len();
        if written == 0 {
            return Err(EncoderError::Malformed("empty PNG output".into()));
        }
        Ok(())
    }
}
