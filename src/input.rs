//! The image boundary: raw uploaded bytes plus a MIME-like category.

use image::RgbaImage;

use crate::error::{Error, Result};

/// Message shown to the user when a non-image file is uploaded.
pub const NOT_AN_IMAGE: &str = "Only image files are allowed";

/// An uploaded file as it arrives from the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    /// MIME type reported by the source, e.g. `image/png`.
    pub mime: String,
}

impl ImageInput {
    pub fn new(bytes: impl Into<Vec<u8>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// Reads a file, guessing the MIME type from its extension.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            Error::resource_unavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let mime = image::ImageFormat::from_path(path)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        Ok(Self { bytes, mime })
    }

    /// Returns true if the declared category is an image.
    pub fn is_image(&self) -> bool {
        self.mime.trim().to_ascii_lowercase().starts_with("image/")
    }

    /// Decodes the payload to RGBA.
    ///
    /// Non-image categories are rejected with [`Error::InvalidInput`] before
    /// any decoding; a payload that claims to be an image but cannot be
    /// decoded is [`Error::ResourceUnavailable`].
    pub fn decode(&self) -> Result<RgbaImage> {
        if !self.is_image() {
            tracing::warn!(mime = %self.mime, "rejected non-image upload");
            return Err(Error::invalid_input(NOT_AN_IMAGE));
        }
        let decoded = image::load_from_memory(&self.bytes)?;
        Ok(decoded.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let input = ImageInput::new(png_bytes(&img), "image/png");
        assert_eq!(input.decode().unwrap(), img);
    }

    #[test]
    fn rejects_non_image_category() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let input = ImageInput::new(png_bytes(&img), "application/pdf");
        match input.decode() {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, NOT_AN_IMAGE),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_unavailable() {
        let input = ImageInput::new(vec![0u8, 1, 2, 3], "image/jpeg");
        assert!(matches!(input.decode(), Err(Error::ResourceUnavailable(_))));
    }

    #[test]
    fn mime_check_is_case_insensitive() {
        assert!(ImageInput::new(Vec::new(), "Image/PNG").is_image());
        assert!(!ImageInput::new(Vec::new(), "text/plain").is_image());
    }
}
