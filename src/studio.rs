//! The try-on engine tying customization, garment state, and tracking together.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::StudioConfig;
use crate::customizer::{Configurable, GarmentCustomizer};
use crate::error::{Error, Result};
use crate::input::ImageInput;
use crate::layer::{FabricBase, LogoPlacement, LogoSpec, PatternKind, PatternSpec, TextPlacement};
use crate::pose::{
    LandmarkFrame, PoseSlot, PoseTransformMapper, SmoothedTransform, TickOutcome, TrackingPhase,
};
use crate::profile::CustomizationProfile;
use crate::quantize::{format_hex, parse_hex, Color, Palette};
use crate::renderer::{Renderer, TrackingNotice};
use crate::state::{CustomizationState, GarmentId, DEFAULT_BASE_COLOR};

/// Which interaction mode the studio is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudioMode {
    /// Editing garments in the showroom.
    #[default]
    Editor,
    /// Following the user's body through the camera.
    TryOn,
}

/// The customization and try-on engine.
///
/// Owns the layer stack, every garment's record, and the pose mapper. All
/// edits target the active garment and re-apply its material immediately.
/// Renderer failures (unknown ids) are logged and never abort an edit.
///
/// # Example
///
/// ```
/// use tryon_renderer::{Color, GarmentId, StudioConfig, TryOnStudio};
/// # use tryon_renderer::{Renderer, Result, SmoothedTransform, Surface};
/// # struct Scene;
/// # impl Renderer for Scene {
/// #     fn apply_material(&mut self, _: &GarmentId, _: Option<&Surface>, _: Color) -> Result<()> { Ok(()) }
/// #     fn set_transform(&mut self, _: &str, _: &SmoothedTransform) -> Result<()> { Ok(()) }
/// #     fn set_visible(&mut self, _: &str, _: bool) -> Result<()> { Ok(()) }
/// # }
/// # let mut scene = Scene;
///
/// let mut studio = TryOnStudio::with_seed(StudioConfig::default(), 1);
/// studio.register_garment(GarmentId::from("T-Shirt"));
///
/// studio.set_color(&mut scene, Color::new(200, 30, 30)).unwrap();
/// assert_eq!(studio.state().color(&GarmentId::from("T-Shirt")), Color::new(200, 30, 30));
/// ```
#[derive(Debug)]
pub struct TryOnStudio {
    config: StudioConfig,
    customizer: GarmentCustomizer,
    state: CustomizationState,
    mapper: PoseTransformMapper,
    slot: PoseSlot,
    mode: StudioMode,
}

impl TryOnStudio {
    pub fn new(config: StudioConfig, customizer: GarmentCustomizer) -> Self {
        let mapper = PoseTransformMapper::new(config.tracking.clone());
        Self {
            config,
            customizer,
            state: CustomizationState::new(),
            mapper,
            slot: PoseSlot::new(),
            mode: StudioMode::Editor,
        }
    }

    /// Creates a studio with a plain fabric and a seeded generator.
    pub fn with_seed(config: StudioConfig, seed: u64) -> Self {
        Self::new(
            config,
            GarmentCustomizer::new(FabricBase::plain(), StdRng::seed_from_u64(seed)),
        )
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn state(&self) -> &CustomizationState {
        &self.state
    }

    pub fn customizer(&self) -> &GarmentCustomizer {
        &self.customizer
    }

    pub fn mapper(&self) -> &PoseTransformMapper {
        &self.mapper
    }

    pub fn mode(&self) -> StudioMode {
        self.mode
    }

    pub fn tracking_phase(&self) -> TrackingPhase {
        self.mapper.phase()
    }

    /// A handle the pose source can publish into from another thread.
    ///
    /// Frames published outside try-on mode are discarded on entry.
    pub fn pose_slot(&self) -> PoseSlot {
        self.slot.clone()
    }

    // ========================================================================
    // Garments
    // ========================================================================

    /// Registers a garment as its model finishes loading.
    pub fn register_garment(&mut self, id: GarmentId) {
        tracing::debug!(garment = %id, "garment registered");
        self.state.register(id);
    }

    /// Forgets a destroyed garment.
    pub fn remove_garment(&mut self, id: &GarmentId) -> bool {
        let removed = self.state.remove(id).is_some();
        if removed {
            tracing::debug!(garment = %id, "garment removed");
        }
        removed
    }

    /// Makes `id` active and re-applies its stored color and composite.
    ///
    /// Returns false (and does nothing) if `id` is already active or unknown.
    pub fn switch_garment(&mut self, renderer: &mut dyn Renderer, id: &GarmentId) -> bool {
        let Some(record) = self.state.switch_active(id) else {
            return false;
        };
        tracing::info!(garment = %id, "active garment switched");
        let result = renderer.apply_material(id, record.composite.as_ref(), record.base_color);
        report_renderer_error(result, id.as_str(), "material");
        true
    }

    fn active_id(&self) -> Result<GarmentId> {
        self.state
            .active()
            .cloned()
            .ok_or_else(|| Error::invalid_input("no garment is active"))
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Sets the active garment's base color.
    pub fn set_color(&mut self, renderer: &mut dyn Renderer, color: Color) -> Result<()> {
        let id = self.active_id()?;
        self.state.set_color(&id, color)?;
        tracing::debug!(garment = %id, color = %format_hex(color), "base color set");
        self.apply_material(renderer, &id);
        Ok(())
    }

    /// Restores the active garment's base color to white.
    pub fn reset_color(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        self.set_color(renderer, DEFAULT_BASE_COLOR)
    }

    /// Replaces the fabric base from an uploaded photo.
    pub fn set_fabric(&mut self, renderer: &mut dyn Renderer, input: &ImageInput) -> Result<()> {
        let id = self.active_id()?;
        let fabric = FabricBase::from_input(input)?;
        self.customizer.set_fabric(fabric);
        self.recomposite_garment(renderer, &id)
    }

    /// Extracts a palette from an uploaded texture source and fills the
    /// pattern layer with it.
    pub fn set_pattern_from_image(
        &mut self,
        renderer: &mut dyn Renderer,
        input: &ImageInput,
        kind: PatternKind,
    ) -> Result<Palette> {
        let id = self.active_id()?;
        let source = input.decode()?;
        let palette = self.customizer.set_pattern_from_image(
            &source,
            kind,
            self.config.palette_size,
            self.config.quantize_mode,
        )?;
        self.recomposite_garment(renderer, &id)?;
        Ok(palette)
    }

    /// Sets the pattern layer directly.
    pub fn set_pattern(&mut self, renderer: &mut dyn Renderer, spec: PatternSpec) -> Result<()> {
        let id = self.active_id()?;
        self.customizer.layers.pattern.set_config(Some(spec));
        self.recomposite_garment(renderer, &id)
    }

    pub fn set_text(
        &mut self,
        renderer: &mut dyn Renderer,
        content: &str,
        color: Color,
        placement: TextPlacement,
        font_size: f32,
        offset: (f32, f32),
    ) -> Result<()> {
        let id = self.active_id()?;
        self.customizer
            .set_text(content, color, placement, font_size, offset);
        self.recomposite_garment(renderer, &id)
    }

    /// Decodes an uploaded logo and places it at the default size.
    pub fn upload_logo(
        &mut self,
        renderer: &mut dyn Renderer,
        input: &ImageInput,
        placement: LogoPlacement,
    ) -> Result<()> {
        self.active_id()?;
        let image = input.decode()?;
        self.set_logo(renderer, LogoSpec::new(image, placement))
    }

    pub fn set_logo(&mut self, renderer: &mut dyn Renderer, logo: LogoSpec) -> Result<()> {
        let id = self.active_id()?;
        self.customizer.set_logo(logo);
        self.recomposite_garment(renderer, &id)
    }

    pub fn clear_pattern(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let id = self.active_id()?;
        self.customizer.layers.pattern.clear();
        self.recomposite_garment(renderer, &id)
    }

    pub fn clear_text(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let id = self.active_id()?;
        self.customizer.layers.text.clear();
        self.recomposite_garment(renderer, &id)
    }

    pub fn clear_logo(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let id = self.active_id()?;
        self.customizer.layers.logo.clear();
        self.recomposite_garment(renderer, &id)
    }

    /// Applies a profile to the active garment and the layer stack.
    ///
    /// The whole profile is validated before anything changes.
    pub fn apply_profile(
        &mut self,
        renderer: &mut dyn Renderer,
        profile: &CustomizationProfile,
    ) -> Result<()> {
        let id = self.active_id()?;
        let color = profile.base_color.as_deref().map(parse_hex).transpose()?;
        self.customizer.apply_profile(profile)?;
        if let Some(color) = color {
            self.state.set_color(&id, color)?;
        }
        self.recomposite_garment(renderer, &id)
    }

    /// Exports the layer settings plus the active garment's base color.
    pub fn export_profile(&self) -> CustomizationProfile {
        let mut profile = self.customizer.export_profile();
        profile.base_color = self
            .state
            .active()
            .map(|id| format_hex(self.state.color(id)));
        profile
    }

    /// Re-composites the active garment and applies the result.
    ///
    /// A garment with plain fabric and no active layers keeps no composite,
    /// so the renderer shows its base color alone.
    pub fn recomposite(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        let id = self.active_id()?;
        self.recomposite_garment(renderer, &id)
    }

    fn recomposite_garment(&mut self, renderer: &mut dyn Renderer, id: &GarmentId) -> Result<()> {
        if self.customizer.is_bare() {
            self.state.clear_composite(id)?;
        } else {
            let composite = self.customizer.composite();
            self.state.set_composite(id, composite)?;
        }
        self.apply_material(renderer, id);
        Ok(())
    }

    fn apply_material(&self, renderer: &mut dyn Renderer, id: &GarmentId) {
        let result = renderer.apply_material(id, self.state.composite(id), self.state.color(id));
        report_renderer_error(result, id.as_str(), "material");
    }

    // ========================================================================
    // Try-on
    // ========================================================================

    /// Switches to try-on: resets tracking and hides the overlay until a
    /// body is found.
    pub fn enter_try_on(&mut self, renderer: &mut dyn Renderer) {
        if self.mode == StudioMode::TryOn {
            return;
        }
        tracing::info!("entering try-on mode");
        self.mode = StudioMode::TryOn;
        self.reset_tracking();
        self.set_overlay_visible(renderer, false);
        notify(renderer, TrackingNotice::Searching);
    }

    /// Returns to the editor: snaps the overlay back to rest and shows it.
    pub fn exit_try_on(&mut self, renderer: &mut dyn Renderer) {
        if self.mode == StudioMode::Editor {
            return;
        }
        tracing::info!("leaving try-on mode");
        self.mode = StudioMode::Editor;
        self.reset_tracking();
        let rest = *self.mapper.transform();
        self.set_overlay_transform(renderer, &rest);
        self.set_overlay_visible(renderer, true);
    }

    /// Delivers a pose estimate. `None` means the estimator saw no body.
    ///
    /// Ignored outside try-on mode.
    pub fn on_pose_frame(&self, frame: Option<LandmarkFrame>) {
        if self.mode != StudioMode::TryOn {
            tracing::trace!("pose frame ignored outside try-on");
            return;
        }
        self.slot.publish(frame);
    }

    /// Runs one rendered frame of tracking.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> TickOutcome {
        if self.mode != StudioMode::TryOn {
            return TickOutcome::Idle;
        }

        let latest = self.slot.latest();
        let outcome = self.mapper.tick(latest.as_ref());
        match outcome {
            TickOutcome::Updated {
                transform,
                acquired,
            } => {
                if acquired {
                    self.set_overlay_visible(renderer, true);
                    notify(renderer, TrackingNotice::Acquired);
                }
                self.set_overlay_transform(renderer, &transform);
            }
            TickOutcome::Lost {
                just_lost: true, ..
            } => {
                self.set_overlay_visible(renderer, false);
                notify(renderer, TrackingNotice::Lost);
            }
            TickOutcome::Idle | TickOutcome::Degrading { .. } | TickOutcome::Lost { .. } => {}
        }
        outcome
    }

    fn reset_tracking(&mut self) {
        self.mapper.reset();
        self.slot.clear();
    }

    fn set_overlay_visible(&self, renderer: &mut dyn Renderer, visible: bool) {
        let result = renderer.set_visible(&self.config.overlay_object, visible);
        report_renderer_error(result, &self.config.overlay_object, "visibility");
    }

    fn set_overlay_transform(&self, renderer: &mut dyn Renderer, transform: &SmoothedTransform) {
        let result = renderer.set_transform(&self.config.overlay_object, transform);
        report_renderer_error(result, &self.config.overlay_object, "transform");
    }
}

fn notify(renderer: &mut dyn Renderer, notice: TrackingNotice) {
    tracing::info!(?notice, "{}", notice.message());
    renderer.tracking_notice(notice);
}

/// Logs a failed scene call. Unknown garments are expected while models
/// load, so they only show up at debug level.
fn report_renderer_error(result: Result<()>, target: &str, what: &str) {
    let Err(err) = result else {
        return;
    };
    if err.is_silent() {
        tracing::debug!(target_id = target, %err, "renderer skipped {what}");
    } else {
        tracing::warn!(target_id = target, %err, "renderer rejected {what}");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{BodyLandmark, Landmark};
    use crate::profile::TextSettings;
    use crate::renderer::testing::RecordingRenderer;
    use crate::surface::Surface;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    const SHIRT: &str = "T-Shirt";
    const HOODIE: &str = "Hoodie";
    const OVERLAY: &str = "overlay";

    fn studio() -> TryOnStudio {
        let mut studio = TryOnStudio::with_seed(StudioConfig::default(), 3);
        studio.register_garment(GarmentId::from(SHIRT));
        studio.register_garment(GarmentId::from(HOODIE));
        studio
    }

    fn scene() -> RecordingRenderer {
        RecordingRenderer::new(&[SHIRT, HOODIE], &[OVERLAY])
    }

    fn png(img: &RgbaImage) -> ImageInput {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        ImageInput::new(out.into_inner(), "image/png")
    }

    fn body() -> LandmarkFrame {
        let at = |x: f32, y: f32| Landmark::new(x, y, 0.0);
        LandmarkFrame::new()
            .with(BodyLandmark::LeftShoulder, at(0.6, 0.35))
            .with(BodyLandmark::RightShoulder, at(0.4, 0.35))
            .with(BodyLandmark::LeftElbow, at(0.65, 0.5))
            .with(BodyLandmark::RightElbow, at(0.35, 0.5))
            .with(BodyLandmark::LeftHip, at(0.58, 0.65))
            .with(BodyLandmark::RightHip, at(0.42, 0.65))
    }

    #[test]
    fn edits_recomposite_and_apply_material() {
        let mut studio = studio();
        let mut scene = scene();
        let shirt = GarmentId::from(SHIRT);

        studio
            .set_text(&mut scene, "HELLO", Color::new(0, 0, 0), TextPlacement::Front, 30.0, (0.0, 0.0))
            .unwrap();

        assert!(studio.state().composite(&shirt).is_some());
        let materials = scene.materials();
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].0, &shirt);
        assert_eq!(materials[0].1, studio.state().composite(&shirt));
        assert_eq!(materials[0].2, DEFAULT_BASE_COLOR);
    }

    #[test]
    fn switching_and_back_restores_color_and_composite() {
        let mut studio = studio();
        let mut scene = scene();
        let (shirt, hoodie) = (GarmentId::from(SHIRT), GarmentId::from(HOODIE));

        studio.set_color(&mut scene, Color::new(10, 20, 30)).unwrap();
        studio
            .set_pattern(
                &mut scene,
                PatternSpec::new(PatternKind::Gradient, Palette::new(vec![Color::new(0, 255, 0)])),
            )
            .unwrap();
        let shirt_composite = studio.state().composite(&shirt).cloned();

        assert!(studio.switch_garment(&mut scene, &hoodie));
        assert_eq!(studio.state().color(&hoodie), DEFAULT_BASE_COLOR);
        assert!(studio.state().composite(&hoodie).is_none());

        assert!(studio.switch_garment(&mut scene, &shirt));
        let last = *scene.materials().last().unwrap();
        assert_eq!(last.0, &shirt);
        assert_eq!(last.1, shirt_composite.as_ref());
        assert_eq!(last.2, Color::new(10, 20, 30));
    }

    #[test]
    fn switching_to_active_or_unknown_does_nothing() {
        let mut studio = studio();
        let mut scene = scene();

        assert!(!studio.switch_garment(&mut scene, &GarmentId::from(SHIRT)));
        assert!(!studio.switch_garment(&mut scene, &GarmentId::from("Jacket")));
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn color_on_one_garment_never_touches_another() {
        let mut studio = studio();
        let mut scene = scene();

        studio.set_color(&mut scene, Color::new(1, 2, 3)).unwrap();
        assert_eq!(studio.state().color(&GarmentId::from(HOODIE)), DEFAULT_BASE_COLOR);

        studio.reset_color(&mut scene).unwrap();
        assert_eq!(studio.state().color(&GarmentId::from(SHIRT)), DEFAULT_BASE_COLOR);
    }

    #[test]
    fn non_image_upload_stores_nothing() {
        let mut studio = studio();
        let mut scene = scene();
        let input = ImageInput::new(b"%PDF-1.4".to_vec(), "application/pdf");

        let err = studio
            .set_pattern_from_image(&mut scene, &input, PatternKind::Grid)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(studio.state().composite(&GarmentId::from(SHIRT)).is_none());
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn pattern_upload_extracts_configured_palette_size() {
        let mut studio = studio();
        let mut scene = scene();
        let source = RgbaImage::from_pixel(30, 30, Rgba([200, 100, 50, 255]));

        let palette = studio
            .set_pattern_from_image(&mut scene, &png(&source), PatternKind::Grid)
            .unwrap();

        assert_eq!(palette.len(), 5);
        assert_eq!(scene.materials().len(), 1);
    }

    #[test]
    fn renderer_errors_do_not_fail_edits() {
        let mut studio = studio();
        let mut scene = RecordingRenderer::new(&[HOODIE], &[]);

        studio.set_color(&mut scene, Color::new(9, 9, 9)).unwrap();
        studio.enter_try_on(&mut scene);

        assert!(scene.materials().is_empty());
        assert_eq!(studio.state().color(&GarmentId::from(SHIRT)), Color::new(9, 9, 9));
    }

    #[test]
    fn clearing_text_keeps_pattern() {
        let mut studio = studio();
        let mut scene = scene();
        let green = Palette::new(vec![Color::new(0, 255, 0)]);

        studio
            .set_pattern(&mut scene, PatternSpec::new(PatternKind::Gradient, green))
            .unwrap();
        studio
            .set_text(&mut scene, "X", Color::new(0, 0, 0), TextPlacement::Front, 30.0, (0.0, 0.0))
            .unwrap();
        studio.clear_text(&mut scene).unwrap();

        assert!(studio.customizer().layers.pattern.is_active());
        assert!(!studio.customizer().layers.text.has_config());
        let composite = studio.state().composite(&GarmentId::from(SHIRT)).unwrap();
        assert_eq!(composite, &Surface::filled(Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn logo_upload_rejects_non_images() {
        let mut studio = studio();
        let mut scene = scene();
        let input = ImageInput::new(Vec::new(), "text/plain");
        assert!(studio.upload_logo(&mut scene, &input, LogoPlacement::Front).is_err());
        assert!(!studio.customizer().layers.logo.has_config());
    }

    #[test]
    fn edits_without_active_garment_fail() {
        let mut studio = studio();
        let mut scene = scene();
        let green = Palette::new(vec![Color::new(0, 255, 0)]);
        studio
            .set_pattern(&mut scene, PatternSpec::new(PatternKind::Gradient, green))
            .unwrap();
        studio.remove_garment(&GarmentId::from(SHIRT));
        scene.calls.clear();

        let black = Color::new(0, 0, 0);
        let logo = LogoSpec::new(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])), LogoPlacement::Front);
        let fabric = png(&RgbaImage::from_pixel(4, 4, Rgba([90, 60, 30, 255])));

        assert!(studio.set_color(&mut scene, black).is_err());
        assert!(studio.set_text(&mut scene, "HI", black, TextPlacement::Front, 30.0, (0.0, 0.0)).is_err());
        assert!(studio.set_logo(&mut scene, logo).is_err());
        assert!(studio.set_fabric(&mut scene, &fabric).is_err());
        assert!(studio.clear_pattern(&mut scene).is_err());

        let layers = &studio.customizer().layers;
        assert!(!layers.text.has_config());
        assert!(!layers.logo.has_config());
        assert!(layers.pattern.has_config());
        assert!(studio.customizer().fabric().is_plain());
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn oversized_logo_recomposites_without_aborting() {
        let mut studio = studio();
        let mut scene = scene();
        let logo = LogoSpec::new(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])), LogoPlacement::Front)
            .with_size(1e12, 1e12);

        studio.set_logo(&mut scene, logo).unwrap();
        assert!(studio.state().composite(&GarmentId::from(SHIRT)).is_some());
    }

    #[test]
    fn clearing_every_layer_drops_the_composite() {
        let mut studio = studio();
        let mut scene = scene();
        let shirt = GarmentId::from(SHIRT);

        studio
            .set_text(&mut scene, "X", Color::new(0, 0, 0), TextPlacement::Front, 30.0, (0.0, 0.0))
            .unwrap();
        assert!(studio.state().composite(&shirt).is_some());

        studio.clear_text(&mut scene).unwrap();
        assert!(studio.state().composite(&shirt).is_none());
        assert_eq!(scene.materials().last().unwrap().1, None);
    }

    #[test]
    fn fabric_alone_keeps_a_composite() {
        let mut studio = studio();
        let mut scene = scene();
        let fabric = png(&RgbaImage::from_pixel(4, 4, Rgba([90, 60, 30, 255])));

        studio.set_fabric(&mut scene, &fabric).unwrap();
        studio.recomposite(&mut scene).unwrap();

        let composite = studio.state().composite(&GarmentId::from(SHIRT)).unwrap();
        assert_eq!(composite, studio.customizer().fabric().surface());
        assert_eq!(scene.materials().len(), 2);
    }

    #[test]
    fn profile_sets_color_and_exports_it() {
        let mut studio = studio();
        let mut scene = scene();
        let profile = CustomizationProfile::new()
            .with_base_color("#aabbcc")
            .with_text(TextSettings {
                content: "NO. 7".into(),
                ..Default::default()
            });

        studio.apply_profile(&mut scene, &profile).unwrap();
        assert_eq!(studio.state().color(&GarmentId::from(SHIRT)), Color::new(0xaa, 0xbb, 0xcc));

        let exported = studio.export_profile();
        assert_eq!(exported.base_color.as_deref(), Some("#aabbcc"));
        assert_eq!(exported.text.unwrap().content, "NO. 7");
    }

    #[test]
    fn bad_profile_color_changes_nothing() {
        let mut studio = studio();
        let mut scene = scene();
        let profile = CustomizationProfile::new().with_base_color("blue-ish");

        assert!(studio.apply_profile(&mut scene, &profile).is_err());
        assert!(scene.calls.is_empty());
    }

    #[test]
    fn try_on_hides_until_acquired() {
        let mut studio = studio();
        let mut scene = scene();

        studio.enter_try_on(&mut scene);
        assert_eq!(studio.mode(), StudioMode::TryOn);
        assert_eq!(scene.visibility(), vec![false]);
        assert_eq!(scene.notices(), vec![TrackingNotice::Searching]);

        // Nothing delivered yet.
        assert_eq!(studio.tick(&mut scene), TickOutcome::Idle);
        assert_eq!(studio.tracking_phase(), TrackingPhase::Lost);

        studio.on_pose_frame(Some(body()));
        assert!(matches!(
            studio.tick(&mut scene),
            TickOutcome::Updated { acquired: true, .. }
        ));
        assert_eq!(scene.visibility(), vec![false, true]);
        assert_eq!(scene.transforms().len(), 1);

        // The same frame keeps easing toward its target.
        studio.tick(&mut scene);
        assert_eq!(scene.transforms().len(), 2);
        assert_eq!(studio.tracking_phase(), TrackingPhase::Tracking);
    }

    #[test]
    fn losing_the_body_hides_overlay_once() {
        let mut studio = studio();
        let mut scene = scene();
        studio.enter_try_on(&mut scene);
        studio.on_pose_frame(Some(body()));
        studio.tick(&mut scene);

        studio.on_pose_frame(None);
        for _ in 0..30 {
            assert!(matches!(studio.tick(&mut scene), TickOutcome::Degrading { .. }));
        }
        assert!(matches!(
            studio.tick(&mut scene),
            TickOutcome::Lost { lost_frames: 31, just_lost: true }
        ));
        studio.tick(&mut scene);

        assert_eq!(
            scene.notices(),
            vec![TrackingNotice::Searching, TrackingNotice::Acquired, TrackingNotice::Lost]
        );
        assert_eq!(scene.visibility(), vec![false, true, false]);
    }

    #[test]
    fn frames_outside_try_on_are_ignored() {
        let mut studio = studio();
        let mut scene = scene();

        studio.on_pose_frame(Some(body()));
        assert_eq!(studio.tick(&mut scene), TickOutcome::Idle);

        // Frames written straight into the slot before entry are discarded.
        studio.pose_slot().publish(Some(body()));
        studio.enter_try_on(&mut scene);
        assert_eq!(studio.tick(&mut scene), TickOutcome::Idle);
    }

    #[test]
    fn exit_snaps_overlay_to_rest_and_shows_it() {
        let mut studio = studio();
        let mut scene = scene();
        studio.enter_try_on(&mut scene);
        studio.on_pose_frame(Some(body()));
        for _ in 0..5 {
            studio.tick(&mut scene);
        }

        studio.exit_try_on(&mut scene);

        assert_eq!(studio.mode(), StudioMode::Editor);
        let rest = SmoothedTransform::rest(&studio.config().tracking);
        assert_eq!(scene.transforms().last(), Some(&rest));
        assert_eq!(scene.visibility().last(), Some(&true));
        assert_eq!(studio.tick(&mut scene), TickOutcome::Idle);
    }
}
