//! tryon-renderer: garment customization and AR try-on engine
//!
//! This crate turns independent customization inputs (base color, a
//! procedural pattern, printed text, an uploaded logo) into one texture per
//! garment, and maps a stream of body-pose estimates onto a smoothed
//! transform for a try-on overlay. The 3D scene itself stays outside: it is
//! driven through the [`Renderer`] trait.
//!
//! # Example
//!
//! ```
//! use tryon_renderer::{Color, FabricBase, GarmentCustomizer, Palette, PatternKind, PatternSpec, TextPlacement};
//!
//! let mut customizer = GarmentCustomizer::with_seed(FabricBase::plain(), 42);
//!
//! // Configure layers directly through the stack
//! customizer.layers.pattern.set_config(Some(PatternSpec::new(
//!     PatternKind::Grid,
//!     Palette::new(vec![Color::new(200, 40, 40), Color::new(40, 40, 200)]),
//! )));
//! customizer.set_text("CREW", Color::new(0, 0, 0), TextPlacement::Both, 30.0, (0.0, 0.0));
//!
//! // Toggle layers without losing config
//! customizer.layers.text.set_enabled(false);
//!
//! let composite = customizer.composite();
//! assert_eq!((composite.width(), composite.height()), (1024, 256));
//! ```
//!
//! # Try-on
//!
//! [`TryOnStudio`] owns the garments and the pose mapper. Feed it pose
//! frames as they arrive and call [`TryOnStudio::tick`] once per rendered
//! frame:
//!
//! ```
//! use tryon_renderer::{BodyLandmark, Landmark, LandmarkFrame, PoseTransformMapper, TickOutcome};
//!
//! let mut mapper = PoseTransformMapper::default();
//! let at = |x: f32, y: f32| Landmark::new(x, y, 0.0);
//! let frame = LandmarkFrame::new()
//!     .with(BodyLandmark::LeftShoulder, at(0.6, 0.35))
//!     .with(BodyLandmark::RightShoulder, at(0.4, 0.35))
//!     .with(BodyLandmark::LeftElbow, at(0.65, 0.5))
//!     .with(BodyLandmark::RightElbow, at(0.35, 0.5))
//!     .with(BodyLandmark::LeftHip, at(0.58, 0.65))
//!     .with(BodyLandmark::RightHip, at(0.42, 0.65));
//!
//! assert!(matches!(mapper.tick(Some(&frame)), TickOutcome::Updated { acquired: true, .. }));
//! ```
//!
//! # Serializable Profiles
//!
//! For frontend communication, use [`CustomizationProfile`] with the
//! [`Configurable`] trait:
//!
//! ```
//! use tryon_renderer::{Configurable, CustomizationProfile, GarmentCustomizer, TextSettings};
//!
//! let mut customizer = GarmentCustomizer::default();
//!
//! // Apply a profile
//! let profile = CustomizationProfile::new().with_text(TextSettings {
//!     content: "HELLO".into(),
//!     ..Default::default()
//! });
//! customizer.apply_profile(&profile).unwrap();
//!
//! // Export current settings
//! let exported = customizer.export_profile();
//! let json = exported.to_json().unwrap();
//! ```

mod config;
mod customizer;
mod error;
mod input;
mod layer;
mod pose;
mod profile;
mod quantize;
mod raster;
mod renderer;
mod state;
mod studio;
mod surface;

pub use config::{StudioConfig, TrackingConfig};
pub use customizer::{Configurable, GarmentCustomizer};
pub use error::{Error, Result};
pub use input::{ImageInput, NOT_AN_IMAGE};
pub use layer::{
    compose, FabricBase, Layer, LayerConfig, LayerEffect, LayerStack, LogoPlacement, LogoSpec,
    PatternKind, PatternSpec, RenderContext, TextPlacement, TextSpec,
};
pub use layer::pattern::render_pattern;
pub use layer::text::compute_positions;
pub use pose::{
    compute_target, BodyLandmark, Landmark, LandmarkFrame, PoseSlot, PoseTransformMapper,
    SmoothedTransform, TickOutcome, TrackingPhase, TrackingState,
};
pub use profile::{CustomizationProfile, LogoSettings, PatternSettings, TextSettings};
pub use quantize::{
    extract_palette, extract_palette_with_mode, format_hex, parse_hex, Color, Palette,
    QuantizeMode,
};
pub use renderer::{Renderer, TrackingNotice};
pub use state::{CustomizationState, GarmentId, GarmentRecord, DEFAULT_BASE_COLOR};
pub use studio::{StudioMode, TryOnStudio};
pub use surface::{Surface, SURFACE_HEIGHT, SURFACE_WIDTH};
