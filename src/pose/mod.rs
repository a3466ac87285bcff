//! Body tracking for the try-on overlay.
//!
//! Pose frames arrive through a [`PoseSlot`] at the estimator's cadence.
//! Once per rendered frame the [`PoseTransformMapper`] reads the latest one
//! and moves the overlay's [`SmoothedTransform`] toward it, hiding the
//! overlay when the body has been out of view for too long.

pub mod landmark;
pub mod mapper;
pub mod slot;

pub use landmark::{BodyLandmark, Landmark, LandmarkFrame};
pub use mapper::{
    compute_target, PoseTransformMapper, SmoothedTransform, TickOutcome, TrackingPhase,
    TrackingState,
};
pub use slot::PoseSlot;
