//! The fabric base layer.

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::input::ImageInput;
use crate::raster::multiply_over;
use crate::surface::Surface;

/// The bottom layer of every composite.
///
/// Built once from a fabric photo: the photo is stretched to the surface,
/// then multiplied with itself to deepen the weave shading. The result is
/// cached and reused for every compositing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FabricBase {
    surface: Surface,
}

impl Default for FabricBase {
    fn default() -> Self {
        Self::plain()
    }
}

impl FabricBase {
    /// A plain white base, for garments with no fabric photo.
    pub fn plain() -> Self {
        Self {
            surface: Surface::filled(Rgba([255, 255, 255, 255])),
        }
    }

    /// Builds the base from a decoded fabric image.
    pub fn from_image(image: &RgbaImage) -> Self {
        let mut surface = Surface::from_image(image.clone());
        let copy = surface.image().clone();
        multiply_over(surface.image_mut(), &copy);
        Self { surface }
    }

    /// Decodes and builds the base from uploaded bytes.
    pub fn from_input(input: &ImageInput) -> Result<Self> {
        Ok(Self::from_image(&input.decode()?))
    }

    /// True when the base is uniform opaque white, photo or not.
    pub fn is_plain(&self) -> bool {
        self.surface.image().pixels().all(|p| p.0 == [255; 4])
    }

    /// The cached base surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}
