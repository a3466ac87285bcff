//! Garment texture customization engine.

use std::sync::Arc;

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use resvg::usvg::fontdb;

use crate::error::Result;
use crate::layer::{
    FabricBase, LayerStack, LogoSpec, PatternKind, PatternSpec, RenderContext, TextPlacement,
    TextSpec,
};
use crate::profile::{CustomizationProfile, LogoSettings, PatternSettings, TextSettings};
use crate::quantize::{extract_palette_with_mode, parse_hex, Color, Palette, QuantizeMode};
use crate::surface::Surface;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`CustomizationProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    ///
    /// The profile is validated as a whole first; on error nothing changes.
    fn apply_profile(&mut self, profile: &CustomizationProfile) -> Result<()>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> CustomizationProfile;
}

// ============================================================================
// GarmentCustomizer
// ============================================================================

/// Builds garment textures from a cached fabric base and a stack of layers.
///
/// Access layers directly through the [`layers`](Self::layers) field to
/// configure them, or use the `set_*` helpers that build specs from raw
/// parameters.
///
/// # Layer Stack
///
/// 1. **Pattern** (`layers.pattern`) - procedural fill from a palette
/// 2. **Text** (`layers.text`) - printed text
/// 3. **Logo** (`layers.logo`) - uploaded image
///
/// # Example
///
/// ```
/// use tryon_renderer::{Color, FabricBase, GarmentCustomizer, Palette, PatternKind, PatternSpec};
///
/// let mut customizer = GarmentCustomizer::with_seed(FabricBase::plain(), 7);
///
/// customizer.layers.pattern.set_config(Some(PatternSpec::new(
///     PatternKind::Gradient,
///     Palette::new(vec![Color::new(255, 0, 0), Color::new(0, 0, 255)]),
/// )));
///
/// // Toggle layers without losing config
/// customizer.layers.pattern.set_enabled(false);
///
/// let composite = customizer.composite();
/// assert_eq!(&composite, customizer.fabric().surface());
/// ```
#[derive(Debug, Clone)]
pub struct GarmentCustomizer {
    fabric: FabricBase,

    /// The optional layers. Access them directly to configure.
    pub layers: LayerStack,

    rng: StdRng,

    /// Fonts for the text layer; system fonts when unset.
    fonts: Option<Arc<fontdb::Database>>,
}

impl Default for GarmentCustomizer {
    fn default() -> Self {
        Self::new(FabricBase::plain(), StdRng::from_entropy())
    }
}

impl GarmentCustomizer {
    /// Creates a customizer drawing randomness from `rng`.
    pub fn new(fabric: FabricBase, rng: StdRng) -> Self {
        Self {
            fabric,
            layers: LayerStack::default(),
            rng,
            fonts: None,
        }
    }

    /// Draws text with `fonts` instead of the system fonts.
    pub fn with_fonts(mut self, fonts: Arc<fontdb::Database>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Creates a customizer with a seeded generator, for reproducible output.
    pub fn with_seed(fabric: FabricBase, seed: u64) -> Self {
        Self::new(fabric, StdRng::seed_from_u64(seed))
    }

    pub fn fabric(&self) -> &FabricBase {
        &self.fabric
    }

    /// Replaces the cached fabric base.
    pub fn set_fabric(&mut self, fabric: FabricBase) {
        self.fabric = fabric;
    }

    /// True when a composite would be nothing but plain white fabric.
    pub fn is_bare(&self) -> bool {
        self.fabric.is_plain() && self.layers.is_empty()
    }

    /// Extracts a palette from `source` and uses it for the pattern layer.
    ///
    /// Returns the extracted palette.
    pub fn set_pattern_from_image(
        &mut self,
        source: &RgbaImage,
        kind: PatternKind,
        palette_size: usize,
        mode: QuantizeMode,
    ) -> Result<Palette> {
        let palette = extract_palette_with_mode(source, palette_size, mode, &mut self.rng)?;
        tracing::debug!(?kind, colors = ?palette.to_hex(), "pattern palette extracted");
        self.layers
            .pattern
            .set_config(Some(PatternSpec::new(kind, palette.clone())));
        Ok(palette)
    }

    /// Sets the text layer, resolving positions now.
    ///
    /// Returns true if the text layer changed.
    pub fn set_text(
        &mut self,
        content: &str,
        color: Color,
        placement: TextPlacement,
        font_size: f32,
        offset: (f32, f32),
    ) -> bool {
        let spec = TextSpec::new(content, color, placement, font_size, offset, &mut self.rng);
        self.layers.text.set_config(Some(spec))
    }

    /// Sets the logo layer. Returns true if it changed.
    pub fn set_logo(&mut self, logo: LogoSpec) -> bool {
        self.layers.logo.set_config(Some(logo))
    }

    /// Redraws every active layer over the fabric base.
    #[tracing::instrument(skip(self), fields(
        pattern = self.layers.pattern.is_active(),
        text = self.layers.text.is_active(),
        logo = self.layers.logo.is_active(),
    ))]
    pub fn composite(&mut self) -> Surface {
        let mut ctx = RenderContext::new(&mut self.rng).with_fonts(self.fonts.clone());
        self.layers.render(self.fabric.surface(), &mut ctx)
    }
}

impl Configurable for GarmentCustomizer {
    /// Applies a profile's layer settings.
    ///
    /// Logo settings only adjust an already uploaded logo; a profile cannot
    /// carry the image itself. The base color is per garment and is applied
    /// by [`TryOnStudio`](crate::TryOnStudio).
    ///
    /// # Example
    ///
    /// ```
    /// use tryon_renderer::{Configurable, CustomizationProfile, GarmentCustomizer, TextSettings};
    ///
    /// let mut customizer = GarmentCustomizer::default();
    /// let profile = CustomizationProfile::new().with_text(TextSettings {
    ///     content: "HELLO".into(),
    ///     ..Default::default()
    /// });
    ///
    /// customizer.apply_profile(&profile).unwrap();
    /// assert!(customizer.layers.text.is_active());
    /// ```
    fn apply_profile(&mut self, profile: &CustomizationProfile) -> Result<()> {
        let pattern = profile
            .pattern
            .as_ref()
            .map(|s| Palette::from_hex(&s.palette).map(|p| (PatternSpec::new(s.kind, p), s.enabled)))
            .transpose()?;
        let text_color = profile
            .text
            .as_ref()
            .map(|s| parse_hex(&s.color))
            .transpose()?;

        match pattern {
            Some((spec, enabled)) => {
                self.layers.pattern.set_config(Some(spec));
                self.layers.pattern.set_enabled(enabled);
            }
            None => {
                self.layers.pattern.clear();
            }
        }

        match (&profile.text, text_color) {
            (Some(settings), Some(color)) => {
                self.set_text(
                    &settings.content,
                    color,
                    settings.placement,
                    settings.font_size,
                    (settings.offset_x, settings.offset_y),
                );
                self.layers.text.set_enabled(settings.enabled);
            }
            _ => {
                self.layers.text.clear();
            }
        }

        match (&profile.logo, self.layers.logo.config().cloned()) {
            (Some(settings), Some(current)) => {
                let sized = if settings.lock_aspect {
                    current.with_locked_aspect(settings.width)
                } else {
                    current.with_size(settings.width, settings.height)
                };
                let mut logo = sized
                    .with_opacity(settings.opacity)
                    .with_offset(settings.offset_x, settings.offset_y);
                logo.placement = settings.placement;
                self.layers.logo.set_config(Some(logo));
                self.layers.logo.set_enabled(settings.enabled);
            }
            (Some(_), None) => {
                tracing::debug!("logo settings ignored: no logo uploaded");
            }
            (None, _) => {
                self.layers.logo.clear();
            }
        }

        Ok(())
    }

    /// Exports the current layer settings as a profile.
    ///
    /// # Example
    ///
    /// ```
    /// use tryon_renderer::{Configurable, GarmentCustomizer, Color, TextPlacement};
    ///
    /// let mut customizer = GarmentCustomizer::default();
    /// customizer.set_text("TEAM", Color::new(0, 0, 0), TextPlacement::Back, 30.0, (0.0, 0.0));
    ///
    /// let profile = customizer.export_profile();
    /// let json = profile.to_json().unwrap();
    /// assert!(json.contains("TEAM"));
    /// ```
    fn export_profile(&self) -> CustomizationProfile {
        let pattern = self.layers.pattern.config().map(|c| PatternSettings {
            kind: c.kind,
            palette: c.palette.to_hex(),
            enabled: self.layers.pattern.is_enabled(),
        });

        let text = self.layers.text.config().map(|c| TextSettings {
            content: c.content.clone(),
            color: crate::quantize::format_hex(c.color),
            placement: c.placement,
            font_size: c.font_size,
            offset_x: c.offset.0,
            offset_y: c.offset.1,
            enabled: self.layers.text.is_enabled(),
        });

        let logo = self.layers.logo.config().map(|c| LogoSettings {
            placement: c.placement,
            width: c.width,
            height: c.height,
            lock_aspect: c.lock_aspect,
            opacity: c.opacity,
            offset_x: c.offset.0,
            offset_y: c.offset.1,
            enabled: self.layers.logo.is_enabled(),
        });

        CustomizationProfile {
            base_color: None,
            pattern,
            text,
            logo,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
