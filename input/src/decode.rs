//! QR code decoding from images.
//!
//! Detection and decoding are delegated to the `rqrr` crate; this module only
//! loads images and adapts the result to `Option<String>`.

use std::path::{Path, PathBuf};

use image::DynamicImage;

/// Errors while turning an image file into QR text.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The file could not be read or is not a supported image.
    #[error("Failed to open image {}: {message}", path.display())]
    Open { path: PathBuf, message: String },
    /// A QR symbol was located but its content could not be recovered.
    #[error("QR code found but unreadable: {0}")]
    Unreadable(String),
}

/// Extracts QR text from an already-loaded image.
///
/// # Returns
/// - `Ok(Some(text))` for the first symbol that decodes
/// - `Ok(None)` if the image holds no QR symbol
/// - `Err(...)` if symbols were found but none decoded
pub trait QrDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError>;
}

/// Decoder backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError> {
        let luma = image.to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();

        log::trace!(
            target: "qrstamp_input::decode",
            "detected_grids count={}",
            grids.len(),
        );

        if grids.is_empty() {
            return Ok(None);
        }

        let mut last_error = None;
        for grid in &grids {
            match grid.decode() {
                Ok((_meta, content)) => return Ok(Some(content)),
                Err(e) => last_error = Some(e.to_string()),
            }
        }

        Err(DecodeError::Unreadable(last_error.unwrap_or_default()))
    }
}

/// Loads an image file (PNG, JPEG, GIF, BMP, WebP).
pub fn load_image(path: &Path) -> Result<DynamicImage, DecodeError> {
    image::open(path).map_err(|e| DecodeError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads `path` and decodes its QR symbol.
pub fn decode_file<D: QrDecoder + ?Sized>(
    decoder: &D,
    path: &Path,
) -> Result<Option<String>, DecodeError> {
    let image = load_image(path)?;
    decoder.decode(&image)
}
