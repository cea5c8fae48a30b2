//! Secondary backend: in-process encoding with `qirust`.
//!
//! Always available, deterministic, and used whenever `qrencode` is missing
//! or fails.

use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma};
use qirust::qrcode::{QrCode, QrCodeEcc, Version};

use super::{EncodeJob, EncoderError, QrEncoder};
use crate::models::ErrorCorrectionLevel;

/// Light modules around the symbol on every side.
pub const QUIET_ZONE: u32 = 4;

/// The dark/light modules of an encoded symbol, without quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    size: u32,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Encode `content` at exactly the requested error-correction level.
    pub fn encode(content: &str, level: ErrorCorrectionLevel) -> Result<Self, EncoderError> {
        let mut outbuffer = vec![0u8; Version::MAX.buffer_len()];
        let mut tempbuffer = vec![0u8; Version::MAX.buffer_len()];

        let qr = QrCode::encode_text(
            content,
            &mut tempbuffer,
            &mut outbuffer,
            to_ecc(level),
            Version::MIN,
            Version::MAX,
            None,
            false,
        )
        .map_err(|e| EncoderError::DataTooLong { level, detail: e.to_string() })?;

        let size = qr.size();
        let mut modules = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                modules.push(qr.get_module(x, y));
            }
        }

        Ok(Self { size: size as u32, modules })
    }

    /// Width and height in modules.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether the module at (x, y) is dark. Coordinates outside the symbol are light.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let size = self.size as i64;
        if x < 0 || y < 0 || x >= size || y >= size {
            return false;
        }
        self.modules[(y * size + x) as usize]
    }

    /// Render with half-block characters: each text row covers two module rows.
    pub fn to_glyphs(&self) -> String {
        let border = QUIET_ZONE as i64;
        let size = self.size as i64;
        let mut out = String::new();

        let mut y = -border;
        while y < size + border {
            for x in -border..size + border {
                let top = self.is_dark(x, y);
                let bottom = self.is_dark(x, y + 1);
                out.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
            y += 2;
        }
        out
    }

    /// Render a grayscale image close to `pixel_size` wide, at least one pixel per module.
    pub fn to_image(&self, pixel_size: u32) -> ImageBuffer<Luma<u8>, Vec<u8>> {
        let dimension = self.size + 2 * QUIET_ZONE;
        let scale = (pixel_size / dimension).max(1);
        let side = dimension * scale;
        let border = QUIET_ZONE as i64;

        ImageBuffer::from_fn(side, side, |px, py| {
            let x = (px / scale) as i64 - border;
            let y = (py / scale) as i64 - border;
            if self.is_dark(x, y) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }
}

fn to_ecc(level: ErrorCorrectionLevel) -> QrCodeEcc {
    match level {
        ErrorCorrectionLevel::L => QrCodeEcc::Low,
        ErrorCorrectionLevel::M => QrCodeEcc::Medium,
        ErrorCorrectionLevel::Q => QrCodeEcc::Quartile,
        ErrorCorrectionLevel::H => QrCodeEcc::High,
    }
}

/// The in-process encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEncoder;

impl QrEncoder for BuiltinEncoder {
    fn name(&self) -> &str {
        "builtin"
    }

    fn render_glyphs(&self, job: &EncodeJob) -> Result<String, EncoderError> {
        Ok(ModuleGrid::encode(&job.content, job.level)?.to_glyphs())
    }

    fn render_png(&self, job: &EncodeJob, out: &Path) -> Result<(), EncoderError> {
        let grid = ModuleGrid::encode(&job.content, job.level)?;
        grid.to_image(job.pixel_size).save_with_format(out, ImageFormat::Png)?;
        Ok(())
    }
}
