//! Printed text layer.

use std::sync::Arc;

use rand::Rng;
use resvg::usvg::fontdb;
use serde::{Deserialize, Serialize};

use super::{LayerConfig, LayerEffect, RenderContext};
use crate::quantize::{format_hex, Color};
use crate::raster::{composite_over, escape_xml, render_svg};
use crate::surface::{Surface, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: f32 = 30.0;

/// Range of copies drawn by [`TextPlacement::Many`] (inclusive).
pub const SCATTER_COPIES: (usize, usize) = (5, 10);

const FRONT_NUDGE: (f32, f32) = (50.0, 35.0);
const BACK_NUDGE: (f32, f32) = (0.0, 20.0);

// ============================================================================
// TextPlacement
// ============================================================================

/// Where the text is printed on the garment map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TextPlacement {
    /// Chest, on the left half of the map.
    #[default]
    Front,
    /// Back, on the right half of the map.
    Back,
    /// Both front and back.
    Both,
    /// Scattered copies at random positions.
    Many,
}

impl std::str::FromStr for TextPlacement {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "both" => Ok(Self::Both),
            "many" => Ok(Self::Many),
            other => Err(crate::Error::invalid_input(format!(
                "unknown text placement {other:?}"
            ))),
        }
    }
}

fn front_anchor() -> (f32, f32) {
    (
        SURFACE_WIDTH as f32 * 0.25 + FRONT_NUDGE.0,
        SURFACE_HEIGHT as f32 / 2.0 + FRONT_NUDGE.1,
    )
}

fn back_anchor() -> (f32, f32) {
    (
        SURFACE_WIDTH as f32 * 0.75 + BACK_NUDGE.0,
        SURFACE_HEIGHT as f32 / 2.0 + BACK_NUDGE.1,
    )
}

/// Computes the text centers for a placement, shifted by `offset`.
///
/// Every placement except [`TextPlacement::Many`] is deterministic; `Many`
/// draws a fresh count and fresh positions from `rng` on each call.
pub fn compute_positions<R: Rng + ?Sized>(
    placement: TextPlacement,
    offset: (f32, f32),
    rng: &mut R,
) -> Vec<(f32, f32)> {
    let shift = |(x, y): (f32, f32)| (x + offset.0, y + offset.1);

    match placement {
        TextPlacement::Front => vec![shift(front_anchor())],
        TextPlacement::Back => vec![shift(back_anchor())],
        TextPlacement::Both => vec![shift(front_anchor()), shift(back_anchor())],
        TextPlacement::Many => {
            let count = rng.gen_range(SCATTER_COPIES.0..=SCATTER_COPIES.1);
            (0..count)
                .map(|_| {
                    shift((
                        rng.r#gen::<f32>() * SURFACE_WIDTH as f32,
                        rng.r#gen::<f32>() * SURFACE_HEIGHT as f32,
                    ))
                })
                .collect()
        }
    }
}

// ============================================================================
// TextSpec
// ============================================================================

/// Configuration for the text layer.
///
/// Positions are resolved once when the spec is built, so re-compositing
/// the same spec prints the text in the same places.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    /// The text to print. Empty text paints nothing.
    pub content: String,

    pub color: Color,

    pub placement: TextPlacement,

    /// Font size in surface pixels.
    pub font_size: f32,

    /// User offset applied to every position.
    pub offset: (f32, f32),

    positions: Vec<(f32, f32)>,
}

impl TextSpec {
    /// Builds a spec and resolves its positions.
    pub fn new<R: Rng + ?Sized>(
        content: impl Into<String>,
        color: Color,
        placement: TextPlacement,
        font_size: f32,
        offset: (f32, f32),
        rng: &mut R,
    ) -> Self {
        Self {
            content: content.into().trim().to_string(),
            color,
            placement,
            font_size: if font_size > 0.0 { font_size } else { DEFAULT_FONT_SIZE },
            offset,
            positions: compute_positions(placement, offset, rng),
        }
    }

    /// Text centers in surface pixel space, in draw order.
    pub fn positions(&self) -> &[(f32, f32)] {
        &self.positions
    }

    /// SVG markup drawing every copy of the text, centered on its position.
    fn to_svg(&self) -> String {
        let fill = format_hex(self.color);
        let content = escape_xml(&self.content);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SURFACE_WIDTH}" height="{SURFACE_HEIGHT}">"#
        );
        for (x, y) in &self.positions {
            svg.push_str(&format!(
                r#"<text x="{x}" y="{y}" font-family="Arial, Helvetica, sans-serif" font-size="{}" fill="{fill}" text-anchor="middle" dominant-baseline="central">{content}</text>"#,
                self.font_size
            ));
        }
        svg.push_str("</svg>");
        svg
    }

    /// Draws the text with glyphs from `fonts`.
    fn paint_with_fonts(&self, surface: &mut Surface, fonts: Arc<fontdb::Database>) {
        if self.content.is_empty() || self.positions.is_empty() {
            return;
        }

        let Some(rendered) = render_svg(&self.to_svg(), fonts) else {
            tracing::warn!(text = %self.content, "text layer failed to render, omitting it");
            return;
        };
        composite_over(surface.image_mut(), &rendered, 0, 0);
    }
}

impl LayerConfig for TextSpec {
    fn differs_from(&self, other: &Self) -> bool {
        self.content != other.content
            || self.color != other.color
            || self.placement != other.placement
            || (self.font_size - other.font_size).abs() > 0.0001
            || self.positions != other.positions
    }
}

impl LayerEffect for TextSpec {
    fn paint(&self, surface: &mut Surface, ctx: &mut RenderContext<'_>) {
        self.paint_with_fonts(surface, ctx.fonts());
    }
}

// ============================================================================
// Tests
// ============================================================================
