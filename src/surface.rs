//! The fixed-size raster buffer shared by every layer and the composite.
//!
//! Garment UV maps in this app are laid out as a 1024x256 strip (front on
//! the left half, back on the right half), so every layer is drawn into a
//! buffer of exactly that size.

use image::{Rgba, RgbaImage};

/// Width of every layer surface in pixels.
pub const SURFACE_WIDTH: u32 = 1024;

/// Height of every layer surface in pixels.
pub const SURFACE_HEIGHT: u32 = 256;

/// A rectangular RGBA pixel buffer of fixed dimensions.
///
/// Surfaces are the unit of exchange between layers, the compositor, the
/// per-garment state, and the renderer. A new surface starts fully
/// transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    data: RgbaImage,
}

impl Default for Surface {
    fn default() -> Self {
        Self::blank()
    }
}

impl Surface {
    /// Creates a fully transparent surface.
    pub fn blank() -> Self {
        Self {
            data: RgbaImage::new(SURFACE_WIDTH, SURFACE_HEIGHT),
        }
    }

    /// Creates a surface filled with a single color.
    pub fn filled(color: Rgba<u8>) -> Self {
        Self {
            data: RgbaImage::from_pixel(SURFACE_WIDTH, SURFACE_HEIGHT, color),
        }
    }

    /// Wraps an image, stretching it to the surface dimensions when needed.
    ///
    /// Matches the way a canvas `drawImage(img, 0, 0, w, h)` call scales the
    /// source to fill the destination.
    pub fn from_image(image: RgbaImage) -> Self {
        if image.dimensions() == (SURFACE_WIDTH, SURFACE_HEIGHT) {
            return Self { data: image };
        }
        let data = image::imageops::resize(
            &image,
            SURFACE_WIDTH,
            SURFACE_HEIGHT,
            image::imageops::FilterType::Triangle,
        );
        Self { data }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Returns the pixel at `(x, y)`. Panics when out of bounds, like [`RgbaImage::get_pixel`].
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.data.get_pixel(x, y)
    }

    /// Read access to the underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.data
    }

    /// Write access to the underlying image.
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.data
    }

    /// Resets every pixel to fully transparent.
    pub fn clear(&mut self) {
        for pixel in self.data.pixels_mut() {
            pixel.0 = [0, 0, 0, 0];
        }
    }

    /// Returns true if no pixel has any coverage.
    pub fn is_transparent(&self) -> bool {
        self.data.pixels().all(|p| p[3] == 0)
    }

    /// Raw RGBA bytes in row-major order, as handed to the renderer.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_raw()
    }

    /// Consumes the surface and returns the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}
