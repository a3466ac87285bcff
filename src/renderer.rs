//! The boundary to the 3D scene.

use crate::error::Result;
use crate::pose::SmoothedTransform;
use crate::quantize::Color;
use crate::state::GarmentId;
use crate::surface::Surface;

/// User-facing tracking status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingNotice {
    /// Try-on started; waiting for a body to appear.
    Searching,
    /// A body was found and the overlay is shown.
    Acquired,
    /// The body has been out of view too long; the overlay is hidden.
    Lost,
}

impl TrackingNotice {
    /// Text suitable for a status banner.
    pub fn message(self) -> &'static str {
        match self {
            Self::Searching => "Looking for you - step in front of the camera",
            Self::Acquired => "Tracking",
            Self::Lost => "Tracking Lost - Please align yourself with the camera",
        }
    }
}

/// A scene that can show garments and move the try-on overlay.
///
/// Implementations return [`Error::MissingGarment`](crate::Error::MissingGarment)
/// or [`Error::InvalidInput`](crate::Error::InvalidInput) for ids they do
/// not know; the engine logs such errors and carries on.
pub trait Renderer {
    /// Applies a garment's material: its composite as the color map (or no
    /// map) tinted by `base_color`.
    fn apply_material(
        &mut self,
        garment: &GarmentId,
        composite: Option<&Surface>,
        base_color: Color,
    ) -> Result<()>;

    /// Moves an object.
    fn set_transform(&mut self, object_id: &str, transform: &SmoothedTransform) -> Result<()>;

    /// Shows or hides an object.
    fn set_visible(&mut self, object_id: &str, visible: bool) -> Result<()>;

    /// Surfaces a tracking status change to the user.
    fn tracking_notice(&mut self, _notice: TrackingNotice) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::Error;

    /// One call received by [`RecordingRenderer`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum RenderCall {
        Material {
            garment: GarmentId,
            composite: Option<Surface>,
            base_color: Color,
        },
        Transform {
            object_id: String,
            transform: SmoothedTransform,
        },
        Visible {
            object_id: String,
            visible: bool,
        },
        Notice(TrackingNotice),
    }

    /// Records every call; rejects ids outside `garments`/`objects`.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub garments: Vec<GarmentId>,
        pub objects: Vec<String>,
        pub calls: Vec<RenderCall>,
    }

    impl RecordingRenderer {
        pub fn new(garments: &[&str], objects: &[&str]) -> Self {
            Self {
                garments: garments.iter().map(|g| GarmentId::from(*g)).collect(),
                objects: objects.iter().map(|o| o.to_string()).collect(),
                calls: Vec::new(),
            }
        }

        pub fn materials(&self) -> Vec<(&GarmentId, Option<&Surface>, Color)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    RenderCall::Material {
                        garment,
                        composite,
                        base_color,
                    } => Some((garment, composite.as_ref(), *base_color)),
                    _ => None,
                })
                .collect()
        }

        pub fn notices(&self) -> Vec<TrackingNotice> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    RenderCall::Notice(n) => Some(*n),
                    _ => None,
                })
                .collect()
        }

        pub fn visibility(&self) -> Vec<bool> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    RenderCall::Visible { visible, .. } => Some(*visible),
                    _ => None,
                })
                .collect()
        }

        pub fn transforms(&self) -> Vec<SmoothedTransform> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    RenderCall::Transform { transform, .. } => Some(*transform),
                    _ => None,
                })
                .collect()
        }

        fn check_object(&self, object_id: &str) -> Result<()> {
            if self.objects.iter().any(|o| o == object_id) {
                Ok(())
            } else {
                Err(Error::invalid_input(format!("no object named {object_id}")))
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn apply_material(
            &mut self,
            garment: &GarmentId,
            composite: Option<&Surface>,
            base_color: Color,
        ) -> Result<()> {
            if !self.garments.contains(garment) {
                return Err(Error::MissingGarment(garment.clone()));
            }
            self.calls.push(RenderCall::Material {
                garment: garment.clone(),
                composite: composite.cloned(),
                base_color,
            });
            Ok(())
        }

        fn set_transform(&mut self, object_id: &str, transform: &SmoothedTransform) -> Result<()> {
            self.check_object(object_id)?;
            self.calls.push(RenderCall::Transform {
                object_id: object_id.to_string(),
                transform: *transform,
            });
            Ok(())
        }

        fn set_visible(&mut self, object_id: &str, visible: bool) -> Result<()> {
            self.check_object(object_id)?;
            self.calls.push(RenderCall::Visible {
                object_id: object_id.to_string(),
                visible,
            });
            Ok(())
        }

        fn tracking_notice(&mut self, notice: TrackingNotice) {
            self.calls.push(RenderCall::Notice(notice));
        }
    }
}
