//! Uploaded logo layer.

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::{LayerConfig, LayerEffect, RenderContext};
use crate::raster::{apply_opacity, composite_over, scaled_onto_canvas};
use crate::surface::{Surface, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Logo size used when none is given.
pub const DEFAULT_LOGO_SIZE: (f32, f32) = (120.0, 120.0);

// ============================================================================
// LogoPlacement
// ============================================================================

/// Which side of the garment carries the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogoPlacement {
    #[default]
    Front,
    Back,
}

impl LogoPlacement {
    /// Top-left corner of the logo before user offsets are applied.
    pub fn anchor(self) -> (f32, f32) {
        match self {
            Self::Front => (276.0, 148.3125),
            Self::Back => (723.0, 142.6875),
        }
    }
}

impl std::str::FromStr for LogoPlacement {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            other => Err(crate::Error::invalid_input(format!(
                "unknown logo placement {other:?}"
            ))),
        }
    }
}

// ============================================================================
// LogoSpec
// ============================================================================

/// Configuration for the logo layer.
///
/// The decoded image is shared, so cloning a spec (e.g. when exporting
/// settings) does not copy pixels.
#[derive(Debug, Clone)]
pub struct LogoSpec {
    pub image: Arc<RgbaImage>,
    pub placement: LogoPlacement,
    /// Drawn width in surface pixels.
    pub width: f32,
    /// Drawn height in surface pixels.
    pub height: f32,
    /// Opacity in 0-1.
    pub opacity: f32,
    /// User offset from the placement anchor.
    pub offset: (f32, f32),
    /// Whether the height follows the image's aspect ratio.
    pub lock_aspect: bool,
}

impl LogoSpec {
    /// Creates a logo spec at the default size, fully opaque, with no offset.
    pub fn new(image: impl Into<Arc<RgbaImage>>, placement: LogoPlacement) -> Self {
        Self {
            image: image.into(),
            placement,
            width: DEFAULT_LOGO_SIZE.0,
            height: DEFAULT_LOGO_SIZE.1,
            opacity: 1.0,
            offset: (0.0, 0.0),
            lock_aspect: false,
        }
    }

    /// Sets both dimensions and unlocks the aspect ratio.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.lock_aspect = false;
        self
    }

    /// Sets the width and derives the height from the image's aspect ratio.
    pub fn with_locked_aspect(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self.lock_aspect = true;
        self.height = match self.aspect_ratio() {
            Some(aspect) => self.width / aspect,
            None => self.width,
        };
        self
    }

    /// The opacity is clamped to 0.0-1.0.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = (x, y);
        self
    }

    /// Width over height of the source image, if it has any pixels.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let (w, h) = self.image.dimensions();
        (w > 0 && h > 0).then(|| w as f32 / h as f32)
    }

    /// Top-left corner of the drawn logo in surface pixels.
    pub fn origin(&self) -> (f32, f32) {
        let (x, y) = self.placement.anchor();
        (x + self.offset.0, y + self.offset.1)
    }
}

impl LayerConfig for LogoSpec {
    fn differs_from(&self, other: &Self) -> bool {
        (!Arc::ptr_eq(&self.image, &other.image) && self.image != other.image)
            || self.placement != other.placement
            || (self.width - other.width).abs() > 0.0001
            || (self.height - other.height).abs() > 0.0001
            || (self.opacity - other.opacity).abs() > 0.0001
            || self.offset != other.offset
            || self.lock_aspect != other.lock_aspect
    }
}

impl LayerEffect for LogoSpec {
    fn paint(&self, surface: &mut Surface, _ctx: &mut RenderContext<'_>) {
        if self.width.round() < 1.0 || self.height.round() < 1.0 || self.opacity <= 0.0 {
            return;
        }

        // Rasterized at surface size; whatever falls outside is never allocated.
        let (x, y) = self.origin();
        let Some(mut placed) = scaled_onto_canvas(
            (SURFACE_WIDTH, SURFACE_HEIGHT),
            self.image.as_ref(),
            x.round(),
            y.round(),
            self.width.round(),
            self.height.round(),
        ) else {
            return;
        };
        apply_opacity(&mut placed, self.opacity);
        composite_over(surface.image_mut(), &placed, 0, 0);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paint(spec: &LogoSpec) -> Surface {
        let mut surface = Surface::blank();
        let mut rng = StdRng::seed_from_u64(0);
        spec.paint(&mut surface, &mut RenderContext::new(&mut rng));
        surface
    }

    fn red_logo(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn front_logo_lands_at_anchor() {
        let spec = LogoSpec::new(red_logo(10, 10), LogoPlacement::Front).with_size(20.0, 20.0);
        let surface = paint(&spec);

        // Anchor (276, 148.3125) rounds to (276, 148)
        assert_eq!(surface.pixel(276, 148).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(295, 167).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(275, 148)[3], 0);
        assert_eq!(surface.pixel(296, 148)[3], 0);
    }

    #[test]
    fn back_logo_respects_offset() {
        let spec = LogoSpec::new(red_logo(4, 4), LogoPlacement::Back)
            .with_size(8.0, 8.0)
            .with_offset(-23.0, 7.3125);
        let surface = paint(&spec);

        // (723 - 23, 142.6875 + 7.3125) = (700, 150)
        assert_eq!(surface.pixel(700, 150).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(699, 150)[3], 0);
    }

    #[test]
    fn opacity_scales_alpha() {
        let spec = LogoSpec::new(red_logo(4, 4), LogoPlacement::Front)
            .with_size(4.0, 4.0)
            .with_opacity(0.5);
        let surface = paint(&spec);
        assert_eq!(surface.pixel(277, 149).0, [255, 0, 0, 128]);
    }

    #[test]
    fn zero_size_or_opacity_paints_nothing() {
        let base = LogoSpec::new(red_logo(4, 4), LogoPlacement::Front);
        assert!(paint(&base.clone().with_size(0.0, 10.0)).is_transparent());
        assert!(paint(&base.with_opacity(0.0)).is_transparent());
    }

    #[test]
    fn oversized_logo_is_clipped_to_the_surface() {
        let spec = LogoSpec::new(red_logo(2, 2), LogoPlacement::Front).with_size(5000.0, 5000.0);
        let surface = paint(&spec);

        assert_eq!(surface.pixel(1023, 255).0, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(275, 255)[3], 0);
        assert_eq!(surface.pixel(500, 147)[3], 0);
    }

    #[test]
    fn absurd_logo_size_does_not_abort() {
        let spec = LogoSpec::new(red_logo(2, 2), LogoPlacement::Front).with_size(1e12, 1e12);
        let surface = paint(&spec);
        assert_eq!(surface.width(), SURFACE_WIDTH);
    }

    #[test]
    fn locked_aspect_derives_height() {
        let spec = LogoSpec::new(red_logo(200, 100), LogoPlacement::Front).with_locked_aspect(120.0);
        assert_eq!(spec.width, 120.0);
        assert_eq!(spec.height, 60.0);
        assert!(spec.lock_aspect);
        assert!(!spec.with_size(50.0, 50.0).lock_aspect);
    }

    #[test]
    fn opacity_is_clamped() {
        let spec = LogoSpec::new(red_logo(1, 1), LogoPlacement::Front).with_opacity(3.0);
        assert_eq!(spec.opacity, 1.0);
    }

    #[test]
    fn shared_image_is_not_a_change() {
        let spec = LogoSpec::new(red_logo(2, 2), LogoPlacement::Front);
        assert!(!spec.differs_from(&spec.clone()));
        assert!(spec.differs_from(&spec.clone().with_offset(1.0, 0.0)));
        assert!(spec.differs_from(&LogoSpec::new(red_logo(3, 3), LogoPlacement::Front)));
    }
}
