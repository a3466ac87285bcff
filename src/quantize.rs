//! Approximate palette extraction for driving procedural patterns.
//!
//! [`extract_palette`] is a one-shot clustering: random seeds, a single
//! nearest-centroid assignment, and per-cluster means. It is cheap and
//! yields plausible dominant colors, nothing more. [`QuantizeMode::Refined`]
//! adds centroid-update passes for callers that want a closer fit.

use image::RgbaImage;
use palette::Srgb;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Stride over the raw RGBA buffer, in bytes (every 5th pixel).
pub const SAMPLE_STRIDE_BYTES: usize = 20;

/// Default number of colors pulled from a texture source.
pub const DEFAULT_CLUSTERS: usize = 5;

/// An RGB color with 8-bit channels.
pub type Color = Srgb<u8>;

// ============================================================================
// Palette
// ============================================================================

/// An ordered, immutable set of representative colors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns a uniformly random color, or `None` for an empty palette.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[rng.gen_range(0..self.colors.len())])
    }

    /// Formats every color as `#rrggbb`.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| format_hex(*c)).collect()
    }

    /// Parses a list of `#rrggbb` strings.
    pub fn from_hex<S: AsRef<str>>(values: &[S]) -> Result<Self> {
        values
            .iter()
            .map(|v| parse_hex(v.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Formats a color as a lowercase `#rrggbb` string.
pub fn format_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parses `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(value: &str) -> Result<Color> {
    value
        .trim()
        .parse::<Color>()
        .map_err(|e| Error::invalid_input(format!("invalid color {value:?}: {e}")))
}

// ============================================================================
// Extraction
// ============================================================================

/// Clustering strategy for [`extract_palette_with_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum QuantizeMode {
    /// One assignment pass from random seeds.
    #[default]
    SinglePass,
    /// Up to `iterations` extra centroid-update passes, stopping early once
    /// assignments settle.
    Refined { iterations: u32 },
}

/// Extracts a palette of exactly `k` colors with a single clustering pass.
///
/// Fails with [`Error::InvalidInput`] when `k` is zero. An image with no
/// readable pixels yields `k` black entries.
pub fn extract_palette<R: Rng + ?Sized>(image: &RgbaImage, k: usize, rng: &mut R) -> Result<Palette> {
    extract_palette_with_mode(image, k, QuantizeMode::SinglePass, rng)
}

/// Extracts a palette of exactly `k` colors using the given clustering mode.
#[tracing::instrument(skip(image, rng), fields(width = image.width(), height = image.height()))]
pub fn extract_palette_with_mode<R: Rng + ?Sized>(
    image: &RgbaImage,
    k: usize,
    mode: QuantizeMode,
    rng: &mut R,
) -> Result<Palette> {
    if k == 0 {
        return Err(Error::invalid_input("palette must have at least one color"));
    }

    let samples = sample_pixels(image);
    if samples.is_empty() {
        tracing::debug!("no readable pixels, returning black palette");
        return Ok(Palette::new(vec![Color::new(0, 0, 0); k]));
    }

    let mut centroids: Vec<[f32; 3]> = (0..k)
        .map(|_| samples[rng.gen_range(0..samples.len())])
        .collect();
    let mut assignment = assign(&samples, &centroids);

    if let QuantizeMode::Refined { iterations } = mode {
        for _ in 0..iterations {
            centroids = update_centroids(&samples, &assignment, &centroids);
            let next = assign(&samples, &centroids);
            if next == assignment {
                break;
            }
            assignment = next;
        }
    }

    Ok(cluster_means(&samples, &assignment, k))
}

/// Collects RGB triples at a fixed stride through the raw buffer.
fn sample_pixels(image: &RgbaImage) -> Vec<[f32; 3]> {
    image
        .as_raw()
        .chunks_exact(4)
        .step_by(SAMPLE_STRIDE_BYTES / 4)
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect()
}

/// Index of the nearest centroid for every sample.
fn assign(samples: &[[f32; 3]], centroids: &[[f32; 3]]) -> Vec<usize> {
    samples
        .iter()
        .map(|s| {
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (idx, c) in centroids.iter().enumerate() {
                let dist = distance_sq(s, c);
                if dist < best_dist {
                    best_dist = dist;
                    best = idx;
                }
            }
            best
        })
        .collect()
}

fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Sums and counts per cluster.
fn accumulate(samples: &[[f32; 3]], assignment: &[usize], k: usize) -> Vec<([f64; 3], usize)> {
    let mut sums = vec![([0f64; 3], 0usize); k];
    for (s, &idx) in samples.iter().zip(assignment) {
        let entry = &mut sums[idx];
        entry.0[0] += s[0] as f64;
        entry.0[1] += s[1] as f64;
        entry.0[2] += s[2] as f64;
        entry.1 += 1;
    }
    sums
}

/// Moves each centroid to its cluster mean; empty clusters keep their seed.
fn update_centroids(samples: &[[f32; 3]], assignment: &[usize], centroids: &[[f32; 3]]) -> Vec<[f32; 3]> {
    accumulate(samples, assignment, centroids.len())
        .into_iter()
        .zip(centroids)
        .map(|((sum, count), old)| {
            if count == 0 {
                *old
            } else {
                let n = count as f64;
                [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
            }
        })
        .collect()
}

/// Per-cluster mean color; empty clusters are black.
fn cluster_means(samples: &[[f32; 3]], assignment: &[usize], k: usize) -> Palette {
    accumulate(samples, assignment, k)
        .into_iter()
        .map(|(sum, count)| {
            let n = count.max(1) as f64;
            let channel = |v: f64| (v / n).round().clamp(0.0, 255.0) as u8;
            Color::new(channel(sum[0]), channel(sum[1]), channel(sum[2]))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
