//! Layer infrastructure for garment texture compositing.
//!
//! A garment's visible map is built from four rasters painted in a fixed
//! order: the fabric base, a procedural pattern, printed text, and a logo.
//! Each optional layer is a [`Layer<C>`] holding a configuration and an
//! enabled flag; on every compositing pass the active layers are redrawn
//! into fresh surfaces and merged by [`compose`].
//!
//! # Architecture
//!
//! Each layer config implements [`LayerEffect`], which defines how it paints
//! itself onto a blank [`Surface`]. Randomness and fonts flow in through
//! [`RenderContext`] so callers can inject a seeded generator or a fixed
//! font set.

pub mod fabric;
pub mod logo;
pub mod pattern;
pub mod text;

pub use fabric::FabricBase;
pub use logo::{LogoPlacement, LogoSpec};
pub use pattern::{PatternKind, PatternSpec};
pub use text::{TextPlacement, TextSpec};

use std::sync::Arc;

use rand::RngCore;
use resvg::usvg::fontdb;

use crate::raster::{composite_over, system_fonts};
use crate::surface::Surface;

// ============================================================================
// Render Context
// ============================================================================

/// Context that flows through a compositing pass.
///
/// Carries the randomness source used by the non-deterministic layers
/// (grid and splatter patterns, scattered text) and the fonts text is
/// drawn with. Without explicit fonts, the system fonts are used.
pub struct RenderContext<'a> {
    rng: &'a mut dyn RngCore,
    fonts: Option<Arc<fontdb::Database>>,
}

impl<'a> RenderContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self { rng, fonts: None }
    }

    pub fn with_fonts(mut self, fonts: Option<Arc<fontdb::Database>>) -> Self {
        self.fonts = fonts;
        self
    }

    /// The randomness source for this pass.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }

    /// The font database for text layers.
    pub fn fonts(&self) -> Arc<fontdb::Database> {
        self.fonts.clone().unwrap_or_else(system_fonts)
    }
}

// ============================================================================
// Layer Traits
// ============================================================================

/// Trait for layer configuration types.
///
/// Implementations must detect when a configuration meaningfully differs
/// from another, which decides whether an edit triggers a recomposite.
pub trait LayerConfig: Clone {
    /// Returns true if this config differs from another in a way that
    /// would produce different rendering output.
    fn differs_from(&self, other: &Self) -> bool;
}

/// Trait for layer configurations that know how to paint themselves.
pub trait LayerEffect: LayerConfig {
    /// Paints this layer onto `surface`.
    ///
    /// The surface is always blank when this is called. Implementations
    /// that cannot render (missing font, degenerate size) leave it blank.
    fn paint(&self, surface: &mut Surface, ctx: &mut RenderContext<'_>);
}

// ============================================================================
// Generic Layer
// ============================================================================

/// A generic layer with an optional configuration and an enabled flag.
///
/// Disabling a layer keeps its configuration so it can be re-enabled later.
#[derive(Debug, Clone)]
pub struct Layer<C: LayerConfig> {
    config: Option<C>,
    enabled: bool,
}

impl<C: LayerConfig> Default for Layer<C> {
    fn default() -> Self {
        Self {
            config: None,
            enabled: true,
        }
    }
}

impl<C: LayerConfig> Layer<C> {
    /// Returns the current configuration, if any.
    pub fn config(&self) -> Option<&C> {
        self.config.as_ref()
    }

    /// Returns true if this layer is active (has config AND is enabled).
    pub fn is_active(&self) -> bool {
        self.enabled && self.config.is_some()
    }

    /// Returns true if the layer has a configuration set.
    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// Returns whether the layer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets whether the layer is enabled.
    ///
    /// Returns true if the enabled state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Sets the configuration. Returns true if it changed.
    pub fn set_config(&mut self, config: Option<C>) -> bool {
        let differs = match (&self.config, &config) {
            (None, None) => false,
            (Some(_), None) | (None, Some(_)) => true,
            (Some(old), Some(new)) => old.differs_from(new),
        };

        if differs {
            self.config = config;
        }
        differs
    }

    /// Removes the configuration. Returns true if there was one.
    pub fn clear(&mut self) -> bool {
        self.set_config(None)
    }
}

impl<C: LayerEffect> Layer<C> {
    /// Redraws this layer from scratch.
    ///
    /// Returns `None` when the layer is inactive, so the compositor skips it.
    pub fn render(&self, ctx: &mut RenderContext<'_>) -> Option<Surface> {
        let config = self.config.as_ref().filter(|_| self.enabled)?;
        let mut surface = Surface::blank();
        config.paint(&mut surface, ctx);
        Some(surface)
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Merges the base with the optional layers in fixed paint order.
///
/// Order: base, pattern, text, logo. Each layer is painted source-over, so
/// transparent pixels let the layers beneath show through. With no optional
/// layers the result equals `base` exactly.
pub fn compose(
    base: &Surface,
    pattern: Option<&Surface>,
    text: Option<&Surface>,
    logo: Option<&Surface>,
) -> Surface {
    let mut composite = base.clone();
    for layer in [pattern, text, logo].into_iter().flatten() {
        composite_over(composite.image_mut(), layer.image(), 0, 0);
    }
    composite
}

// ============================================================================
// Layer Stack
// ============================================================================

/// The optional layers painted over a garment's fabric base.
///
/// ```text
/// Fabric base (cached)
///     │
///     ▼
/// ┌─────────┐
/// │ Pattern │ ◄── palette-driven fill
/// └────┬────┘
///      ▼
/// ┌─────────┐
/// │  Text   │
/// └────┬────┘
///      ▼
/// ┌─────────┐
/// │  Logo   │
/// └────┬────┘
///      ▼
///  Composite
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    /// Procedural pattern layer.
    pub pattern: Layer<PatternSpec>,

    /// Printed text layer.
    pub text: Layer<TextSpec>,

    /// Logo layer.
    pub logo: Layer<LogoSpec>,
}

impl LayerStack {
    /// Redraws every active layer and composites them over `base`.
    pub fn render(&self, base: &Surface, ctx: &mut RenderContext<'_>) -> Surface {
        let pattern = self.pattern.render(ctx);
        let text = self.text.render(ctx);
        let logo = self.logo.render(ctx);
        compose(base, pattern.as_ref(), text.as_ref(), logo.as_ref())
    }

    /// True when no layer would draw anything.
    pub fn is_empty(&self) -> bool {
        !(self.pattern.is_active() || self.text.is_active() || self.logo.is_active())
    }
}

// ============================================================================
// Tests
// ============================================================================
