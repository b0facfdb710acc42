//! Validation and normalization of fetched image bytes

use crate::error::FetchError;
use ::image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Image bytes ready to embed, with their intrinsic pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// PNG-encoded picture
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Check that `bytes` is a decodable image and transcode it to PNG if needed.
pub fn prepare_image(bytes: Vec<u8>) -> Result<PreparedImage, FetchError> {
    let format = ::image::guess_format(&bytes)
        .map_err(|e| FetchError::UndecodableImage(e.to_string()))?;

    if format == ImageFormat::Png {
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| FetchError::UndecodableImage(e.to_string()))?;
        return Ok(PreparedImage {
            bytes,
            width,
            height,
        });
    }

    let decoded = ::image::load_from_memory_with_format(&bytes, format)
        .map_err(|e| FetchError::UndecodableImage(e.to_string()))?;
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| FetchError::UndecodableImage(format!("PNG conversion failed: {e}")))?;

    Ok(PreparedImage {
        bytes: png,
        width: decoded.width(),
        height: decoded.height(),
    })
}
