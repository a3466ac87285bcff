//! Body landmarks as delivered by the pose estimator.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One estimated body point.
///
/// `x` and `y` are normalized to the camera frame (0-1, origin top-left);
/// `z` is depth relative to the hips, smaller meaning closer to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// The body points the tracker needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyLandmark {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftHip,
    RightHip,
}

impl BodyLandmark {
    /// Every landmark that must be present for a frame to count as tracked.
    pub const REQUIRED: [BodyLandmark; 6] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftHip,
        Self::RightHip,
    ];

    /// Position of this landmark in the estimator's 33-point body model.
    pub const fn index(self) -> usize {
        match self {
            Self::LeftShoulder => 11,
            Self::RightShoulder => 12,
            Self::LeftElbow => 13,
            Self::RightElbow => 14,
            Self::LeftHip => 23,
            Self::RightHip => 24,
        }
    }
}

/// The named points of one pose estimate.
///
/// An empty frame stands for a delivery with no detected body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: HashMap<BodyLandmark, Landmark>,
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the tracked points out of the estimator's indexed output.
    ///
    /// Indices past the end of `landmarks` are simply absent.
    pub fn from_indexed(landmarks: &[Landmark]) -> Self {
        let points = BodyLandmark::REQUIRED
            .iter()
            .filter_map(|&part| landmarks.get(part.index()).map(|l| (part, *l)))
            .collect();
        Self { points }
    }

    pub fn with(mut self, part: BodyLandmark, landmark: Landmark) -> Self {
        self.points.insert(part, landmark);
        self
    }

    pub fn insert(&mut self, part: BodyLandmark, landmark: Landmark) {
        self.points.insert(part, landmark);
    }

    pub fn get(&self, part: BodyLandmark) -> Option<Landmark> {
        self.points.get(&part).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if every required landmark is present.
    pub fn is_complete(&self) -> bool {
        BodyLandmark::REQUIRED.iter().all(|p| self.points.contains_key(p))
    }

    /// Required landmarks this frame lacks.
    pub fn missing(&self) -> Vec<BodyLandmark> {
        BodyLandmark::REQUIRED
            .into_iter()
            .filter(|p| !self.points.contains_key(p))
            .collect()
    }
}
