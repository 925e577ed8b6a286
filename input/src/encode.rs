//! QR code generation to PNG.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Largest side, in pixels, of a rendered QR image.
pub const MAX_IMAGE_SIDE: u32 = 8192;

/// Size parameters for a generated QR image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Target image width in pixels. The output is the largest whole
    /// multiple of the module count that fits, and never smaller than one
    /// pixel per module.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            width: 300,
            margin: 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The text does not fit in a QR symbol.
    #[error("QR encoding error: {0}")]
    Qr(String),
    #[error("Image processing error: {0}")]
    Image(String),
}

/// Produces an encoded image for a piece of text.
pub trait QrEncoder {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError>;
}

/// Renders with the `qrcode` crate and writes PNG bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngQrEncoder;

impl QrEncoder for PngQrEncoder {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let image = render_qr_image(text, options)?;

        let mut cursor = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| EncodeError::Image(format!("Failed to encode PNG: {e}")))?;

        Ok(cursor.into_inner())
    }
}

/// Renders `text` as a grayscale QR image.
pub fn render_qr_image(text: &str, options: &EncodeOptions) -> Result<GrayImage, EncodeError> {
    let code =
        qrcode::QrCode::new(text.as_bytes()).map_err(|e| EncodeError::Qr(e.to_string()))?;
    let qr_width = u32::try_from(code.width())
        .map_err(|_| EncodeError::Qr("symbol too large".to_owned()))?;

    let too_large = || EncodeError::Image("QR image too large".to_owned());
    let modules = options
        .margin
        .checked_mul(2)
        .and_then(|m| m.checked_add(qr_width))
        .ok_or_else(too_large)?;
    let scale = (options.width / modules).max(1);
    let size = modules
        .checked_mul(scale)
        .filter(|&size| size <= MAX_IMAGE_SIDE)
        .ok_or_else(too_large)?;

    let mut image = GrayImage::from_pixel(size, size, LIGHT);

    for (index, color) in code.to_colors().into_iter().enumerate() {
        if color != qrcode::Color::Dark {
            continue;
        }
        // `index < qr_width^2`, which fits in u32 because qr_width does.
        let index = index as u32;
        let x0 = (index % qr_width + options.margin) * scale;
        let y0 = (index / qr_width + options.margin) * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                image.put_pixel(x0 + dx, y0 + dy, DARK);
            }
        }
    }

    log::debug!(
        target: "qrstamp_input::encode",
        "rendered_qr version_width={qr_width} scale={scale} size={size}",
    );

    Ok(image)
}
