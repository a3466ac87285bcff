//! Per-garment customization records.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quantize::Color;
use crate::surface::Surface;

/// Base color of a garment that has never been painted.
pub const DEFAULT_BASE_COLOR: Color = Color::new(255, 255, 255);

/// Identifies a garment model, e.g. `"T-Shirt"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GarmentId(String);

impl GarmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GarmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GarmentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GarmentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What is remembered about one garment.
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentRecord {
    pub base_color: Color,
    /// The last composite applied to this garment, if any.
    pub composite: Option<Surface>,
}

impl Default for GarmentRecord {
    fn default() -> Self {
        Self {
            base_color: DEFAULT_BASE_COLOR,
            composite: None,
        }
    }
}

/// Customization records for every loaded garment, plus which one is active.
///
/// Records are isolated: writing one garment's color or composite never
/// touches another's.
#[derive(Debug, Clone, Default)]
pub struct CustomizationState {
    records: HashMap<GarmentId, GarmentRecord>,
    active: Option<GarmentId>,
}

impl CustomizationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a garment with default settings. Re-registering keeps the existing record.
    ///
    /// The first garment registered becomes active.
    pub fn register(&mut self, id: GarmentId) {
        if self.active.is_none() {
            self.active = Some(id.clone());
        }
        self.records.entry(id).or_default();
    }

    /// Removes a garment's record. Returns the record if it existed.
    ///
    /// Removing the active garment leaves no garment active.
    pub fn remove(&mut self, id: &GarmentId) -> Option<GarmentRecord> {
        let removed = self.records.remove(id);
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        removed
    }

    pub fn contains(&self, id: &GarmentId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of registered garments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over registered garment ids in no particular order.
    pub fn garments(&self) -> impl Iterator<Item = &GarmentId> {
        self.records.keys()
    }

    pub fn set_color(&mut self, id: &GarmentId, color: Color) -> Result<()> {
        self.record_mut(id)?.base_color = color;
        Ok(())
    }

    pub fn set_composite(&mut self, id: &GarmentId, surface: Surface) -> Result<()> {
        self.record_mut(id)?.composite = Some(surface);
        Ok(())
    }

    /// Drops the stored composite, e.g. after every layer was cleared.
    pub fn clear_composite(&mut self, id: &GarmentId) -> Result<()> {
        self.record_mut(id)?.composite = None;
        Ok(())
    }

    /// Stored base color, or white for unknown garments.
    pub fn color(&self, id: &GarmentId) -> Color {
        self.records
            .get(id)
            .map(|r| r.base_color)
            .unwrap_or(DEFAULT_BASE_COLOR)
    }

    /// Stored composite, or `None` for unknown or unpainted garments.
    pub fn composite(&self, id: &GarmentId) -> Option<&Surface> {
        self.records.get(id).and_then(|r| r.composite.as_ref())
    }

    pub fn record(&self, id: &GarmentId) -> Option<&GarmentRecord> {
        self.records.get(id)
    }

    /// The active garment id.
    pub fn active(&self) -> Option<&GarmentId> {
        self.active.as_ref()
    }

    /// Makes `id` the active garment.
    ///
    /// Returns the newly active record so the caller can re-apply it, or
    /// `None` when nothing changed (already active, or unknown).
    pub fn switch_active(&mut self, id: &GarmentId) -> Option<&GarmentRecord> {
        if self.active.as_ref() == Some(id) {
            return None;
        }
        if !self.records.contains_key(id) {
            tracing::warn!(garment = %id, "switch to unknown garment ignored");
            return None;
        }

        tracing::debug!(from = ?self.active, to = %id, "switching active garment");
        self.active = Some(id.clone());
        self.records.get(id)
    }

    fn record_mut(&mut self, id: &GarmentId) -> Result<&mut GarmentRecord> {
        match self.records.get_mut(id) {
            Some(record) => Ok(record),
            None => {
                tracing::warn!(garment = %id, "update for unknown garment ignored");
                Err(Error::MissingGarment(id.clone()))
            }
        }
    }
}
