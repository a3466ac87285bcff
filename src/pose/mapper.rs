//! Landmark-to-transform mapping with smoothing and tracking-loss detection.

use std::f32::consts::PI;

use glam::Vec3;

use super::landmark::{BodyLandmark, LandmarkFrame};
use crate::config::TrackingConfig;

/// Depth offset of the overlay for a torso at `z = 0`.
const DEPTH_BASE: f32 = -2.0;
/// World units of depth per unit of landmark `z`.
const DEPTH_SCALE: f32 = 6.0;
/// Vertical scale grows with distance from the camera plane.
const HEIGHT_BASE: f32 = 6.0;
const HEIGHT_DEPTH_GAIN: f32 = 12.0;
const HEIGHT_STRETCH: f32 = 1.5;
/// Z scale as a share of X scale.
const DEPTH_RATIO: f32 = 0.8;

// ============================================================================
// State
// ============================================================================

/// Coarse tracking status derived from [`TrackingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    /// Visible and the last frame was complete.
    Tracking,
    /// Visible, but recent frames were incomplete.
    Degrading,
    /// Hidden until the next complete frame.
    Lost,
}

/// Frame-loss bookkeeping for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingState {
    pub lost_frames: u32,
    pub visible: bool,
}

impl Default for TrackingState {
    /// Starts hidden: nothing is shown until a body is first seen.
    fn default() -> Self {
        Self {
            lost_frames: 0,
            visible: false,
        }
    }
}

impl TrackingState {
    pub fn phase(&self) -> TrackingPhase {
        match (self.visible, self.lost_frames) {
            (false, _) => TrackingPhase::Lost,
            (true, 0) => TrackingPhase::Tracking,
            (true, _) => TrackingPhase::Degrading,
        }
    }
}

/// Position, scale, and yaw of the overlay object in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedTransform {
    pub position: Vec3,
    pub scale: Vec3,
    /// Rotation around the vertical axis, in radians.
    pub rotation_y: f32,
}

impl SmoothedTransform {
    /// The configured rest transform.
    pub fn rest(config: &TrackingConfig) -> Self {
        Self {
            position: Vec3::from_array(config.rest_position),
            scale: Vec3::from_array(config.rest_scale),
            rotation_y: config.rest_rotation_y,
        }
    }

    /// Moves every component `t` of the way toward `target`.
    pub fn lerp_toward(&mut self, target: &Self, t: f32) {
        self.position = self.position.lerp(target.position, t);
        self.scale = self.scale.lerp(target.scale, t);
        self.rotation_y += (target.rotation_y - self.rotation_y) * t;
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No frame has been delivered; nothing changed.
    Idle,
    /// A complete frame moved the transform.
    Updated {
        transform: SmoothedTransform,
        /// True when this frame made a hidden overlay visible again.
        acquired: bool,
    },
    /// An incomplete frame was tolerated.
    Degrading { lost_frames: u32 },
    /// Tracking is lost and the overlay is hidden.
    Lost {
        lost_frames: u32,
        /// True on the tick the overlay was hidden.
        just_lost: bool,
    },
}

// ============================================================================
// Mapper
// ============================================================================

/// Turns pose frames into a stable overlay transform.
///
/// Call [`tick`](Self::tick) once per rendered frame with the latest pose
/// frame. The same frame may be passed on several ticks; each tick lerps a
/// little further toward its target.
#[derive(Debug, Clone)]
pub struct PoseTransformMapper {
    config: TrackingConfig,
    state: TrackingState,
    smoothed: SmoothedTransform,
}

impl Default for PoseTransformMapper {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

impl PoseTransformMapper {
    pub fn new(config: TrackingConfig) -> Self {
        let smoothed = SmoothedTransform::rest(&config);
        Self {
            config,
            state: TrackingState::default(),
            smoothed,
        }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn phase(&self) -> TrackingPhase {
        self.state.phase()
    }

    pub fn transform(&self) -> &SmoothedTransform {
        &self.smoothed
    }

    /// Snaps the transform to rest and hides the overlay until the next
    /// complete frame.
    pub fn reset(&mut self) {
        self.smoothed = SmoothedTransform::rest(&self.config);
        self.state = TrackingState::default();
    }

    /// Advances one rendered frame.
    ///
    /// `None` means no frame was ever delivered and leaves everything as is.
    /// A frame missing any required landmark counts toward tracking loss.
    pub fn tick(&mut self, frame: Option<&LandmarkFrame>) -> TickOutcome {
        let Some(frame) = frame else {
            return TickOutcome::Idle;
        };

        match compute_target(frame, &self.config) {
            Some(target) => {
                let acquired = !self.state.visible;
                if acquired {
                    tracing::info!("tracking acquired");
                }
                self.state = TrackingState {
                    lost_frames: 0,
                    visible: true,
                };
                self.smoothed.lerp_toward(&target, self.config.smoothing);
                TickOutcome::Updated {
                    transform: self.smoothed,
                    acquired,
                }
            }
            None => self.record_missing(frame),
        }
    }

    fn record_missing(&mut self, frame: &LandmarkFrame) -> TickOutcome {
        self.state.lost_frames = self.state.lost_frames.saturating_add(1);
        let lost_frames = self.state.lost_frames;
        tracing::debug!(lost_frames, missing = ?frame.missing(), "incomplete pose frame");

        if lost_frames > self.config.max_lost_frames {
            let just_lost = self.state.visible;
            self.state.visible = false;
            if just_lost {
                tracing::warn!(lost_frames, "tracking lost");
            }
            TickOutcome::Lost {
                lost_frames,
                just_lost,
            }
        } else if self.state.visible {
            TickOutcome::Degrading { lost_frames }
        } else {
            TickOutcome::Lost {
                lost_frames,
                just_lost: false,
            }
        }
    }
}

/// Computes the unsmoothed target transform for a frame.
///
/// Returns `None` unless every required landmark is present. Elbows gate
/// the frame but do not feed the result.
pub fn compute_target(frame: &LandmarkFrame, config: &TrackingConfig) -> Option<SmoothedTransform> {
    if !frame.is_complete() {
        return None;
    }
    let point = |part: BodyLandmark| frame.get(part).map(|l| l.to_vec3());
    let left_shoulder = point(BodyLandmark::LeftShoulder)?;
    let right_shoulder = point(BodyLandmark::RightShoulder)?;
    let left_hip = point(BodyLandmark::LeftHip)?;
    let right_hip = point(BodyLandmark::RightHip)?;

    let center = (left_shoulder + right_shoulder + left_hip + right_hip) / 4.0;
    let depth = 1.0 + center.z;

    let half_w = config.viewport_width / 2.0;
    let half_h = config.viewport_height / 2.0;
    let position = Vec3::new(
        ((0.5 - center.x) * config.viewport_width * depth).clamp(-half_w, half_w),
        ((0.5 - center.y) * config.viewport_height * depth).clamp(-half_h, half_h),
        DEPTH_BASE - center.z * DEPTH_SCALE,
    );

    let torso_width = (left_shoulder.x - right_shoulder.x)
        .abs()
        .max((left_hip.x - right_hip.x).abs());
    let torso_height =
        ((left_shoulder.y + right_shoulder.y) / 2.0 - (left_hip.y + right_hip.y) / 2.0).abs();

    let scale_x = torso_width * config.width_scale * depth;
    let scale_y = torso_height * (HEIGHT_BASE + center.z.abs() * HEIGHT_DEPTH_GAIN) * HEIGHT_STRETCH;
    let scale = Vec3::new(scale_x, scale_y, scale_x * DEPTH_RATIO);

    let yaw = |v: Vec3| v.x.atan2(v.z);
    let mean_yaw = (yaw(right_shoulder - left_shoulder) + yaw(right_hip - left_hip)) / 2.0;
    let rotation_y = if mean_yaw.abs() > config.turn_threshold { PI } else { 0.0 };

    Some(SmoothedTransform {
        position,
        scale,
        rotation_y,
    })
}

// ============================================================================
// Tests
// ============================================================================
