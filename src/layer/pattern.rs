//! Procedural pattern layer driven by an extracted palette.

use image::{Rgba, RgbaImage};
use palette::{Mix, Srgb};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{LayerConfig, LayerEffect, RenderContext};
use crate::quantize::{Color, Palette};
use crate::raster::{circle_image, composite_over};
use crate::surface::Surface;

/// Edge length of a grid cell in pixels.
pub const GRID_CELL: u32 = 64;

/// Number of circles drawn by the splatter pattern.
pub const SPLATTER_COUNT: usize = 100;

/// Splatter radius range in pixels (min inclusive, max exclusive).
pub const SPLATTER_RADIUS: (f32, f32) = (10.0, 60.0);

/// Gaussian blur sigma applied to each splatter circle.
pub const SPLATTER_BLUR: f32 = 5.0;

// ============================================================================
// PatternKind
// ============================================================================

/// The procedural fill to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Randomly placed, blurred circles.
    Splatter,
    /// Left-to-right gradient through the palette.
    Gradient,
    /// 64x64 tiles of random palette colors.
    Grid,
    /// Blank layer.
    #[default]
    None,
}

impl std::str::FromStr for PatternKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "splatter" => Ok(Self::Splatter),
            "gradient" => Ok(Self::Gradient),
            "grid" => Ok(Self::Grid),
            "" | "none" => Ok(Self::None),
            other => Err(crate::Error::invalid_input(format!(
                "unknown pattern kind {other:?}"
            ))),
        }
    }
}

// ============================================================================
// PatternSpec
// ============================================================================

/// Configuration for the pattern layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub palette: Palette,
}

impl PatternSpec {
    pub fn new(kind: PatternKind, palette: Palette) -> Self {
        Self { kind, palette }
    }

    /// Returns true if this spec paints nothing.
    pub fn is_blank(&self) -> bool {
        self.kind == PatternKind::None || self.palette.is_empty()
    }
}

impl LayerConfig for PatternSpec {
    fn differs_from(&self, other: &Self) -> bool {
        self != other
    }
}

impl LayerEffect for PatternSpec {
    fn paint(&self, surface: &mut Surface, ctx: &mut RenderContext<'_>) {
        render_pattern(surface, self, ctx.rng());
    }
}

/// Renders `spec` into `surface`, overwriting whatever was there.
///
/// Only the gradient is deterministic; grid and splatter draw from `rng`.
pub fn render_pattern<R: Rng + ?Sized>(surface: &mut Surface, spec: &PatternSpec, rng: &mut R) {
    surface.clear();
    if spec.is_blank() {
        return;
    }

    let img = surface.image_mut();
    match spec.kind {
        PatternKind::Gradient => paint_gradient(img, &spec.palette),
        PatternKind::Grid => paint_grid(img, &spec.palette, rng),
        PatternKind::Splatter => paint_splatter(img, &spec.palette, rng),
        PatternKind::None => {}
    }
}

fn opaque(color: Color) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}

/// Color of the gradient at `t` in 0-1, with stops evenly spaced at `i/(k-1)`.
fn gradient_color(colors: &[Color], t: f32) -> Color {
    if colors.len() == 1 {
        return colors[0];
    }

    let segments = colors.len() - 1;
    let pos = t.clamp(0.0, 1.0) * segments as f32;
    let idx = (pos.floor() as usize).min(segments - 1);
    let local = pos - idx as f32;

    let start: Srgb<f32> = colors[idx].into_format();
    let end: Srgb<f32> = colors[idx + 1].into_format();
    start.mix(end, local).into_format()
}

fn paint_gradient(img: &mut RgbaImage, palette: &Palette) {
    let width = img.width();
    let span = width.saturating_sub(1).max(1) as f32;

    let columns: Vec<Rgba<u8>> = (0..width)
        .map(|x| opaque(gradient_color(palette.colors(), x as f32 / span)))
        .collect();

    for (x, _, pixel) in img.enumerate_pixels_mut() {
        *pixel = columns[x as usize];
    }
}

fn paint_grid<R: Rng + ?Sized>(img: &mut RgbaImage, palette: &Palette, rng: &mut R) {
    let (width, height) = img.dimensions();

    for cell_x in (0..width).step_by(GRID_CELL as usize) {
        for cell_y in (0..height).step_by(GRID_CELL as usize) {
            let Some(color) = palette.pick(rng) else {
                return;
            };
            let fill = opaque(color);
            for y in cell_y..(cell_y + GRID_CELL).min(height) {
                for x in cell_x..(cell_x + GRID_CELL).min(width) {
                    img.put_pixel(x, y, fill);
                }
            }
        }
    }
}

fn paint_splatter<R: Rng + ?Sized>(img: &mut RgbaImage, palette: &Palette, rng: &mut R) {
    let (width, height) = (img.width() as f32, img.height() as f32);

    for _ in 0..SPLATTER_COUNT {
        let x = rng.gen_range(0.0..width);
        let y = rng.gen_range(0.0..height);
        let radius = rng.gen_range(SPLATTER_RADIUS.0..SPLATTER_RADIUS.1);
        let Some(color) = palette.pick(rng) else {
            return;
        };
        splat(img, x, y, radius, color);
    }
}

/// Draws one circle, then a blurred copy of it on top.
fn splat(img: &mut RgbaImage, x: f32, y: f32, radius: f32, color: Color) {
    let margin = radius + 3.0 * SPLATTER_BLUR;
    let origin_x = (x - margin).floor();
    let origin_y = (y - margin).floor();
    let size = (2.0 * margin).ceil() as u32 + 1;

    let Some(mut sharp) = circle_image(size, size, x - origin_x, y - origin_y, radius, opaque(color))
    else {
        return;
    };

    // Only the coverage is blurred; color stays constant so edges fade instead of darkening.
    for pixel in sharp.pixels_mut() {
        pixel.0 = [color.red, color.green, color.blue, pixel[3]];
    }
    let mut soft = image::imageops::blur(&sharp, SPLATTER_BLUR);
    for pixel in soft.pixels_mut() {
        pixel.0 = [color.red, color.green, color.blue, pixel[3]];
    }

    composite_over(img, &sharp, origin_x as i32, origin_y as i32);
    composite_over(img, &soft, origin_x as i32, origin_y as i32);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{SURFACE_HEIGHT, SURFACE_WIDTH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);
    const GREEN: Color = Color::new(0, 255, 0);

    fn render(kind: PatternKind, colors: Vec<Color>, seed: u64) -> Surface {
        let mut surface = Surface::filled(Rgba([9, 9, 9, 255]));
        let mut rng = StdRng::seed_from_u64(seed);
        render_pattern(&mut surface, &PatternSpec::new(kind, Palette::new(colors)), &mut rng);
        surface
    }

    #[test]
    fn gradient_edges_match_palette_ends() {
        let surface = render(PatternKind::Gradient, vec![RED, BLUE], 0);

        for y in [0, SURFACE_HEIGHT / 2, SURFACE_HEIGHT - 1] {
            assert_eq!(surface.pixel(0, y).0, [255, 0, 0, 255]);
            assert_eq!(surface.pixel(SURFACE_WIDTH - 1, y).0, [0, 0, 255, 255]);
        }

        let mid = surface.pixel(SURFACE_WIDTH / 2, 0);
        assert!(mid[0] > 100 && mid[0] < 155, "mid red {}", mid[0]);
        assert!(mid[2] > 100 && mid[2] < 155, "mid blue {}", mid[2]);
    }

    #[test]
    fn gradient_passes_through_middle_stop() {
        let surface = render(PatternKind::Gradient, vec![RED, GREEN, BLUE], 0);
        let mid = surface.pixel((SURFACE_WIDTH - 1) / 2, 0);
        assert!(mid[1] > 250, "middle stop should be green, got {:?}", mid.0);
    }

    #[test]
    fn single_color_gradient_is_solid() {
        let surface = render(PatternKind::Gradient, vec![GREEN], 0);
        assert!(surface.image().pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    #[test]
    fn none_and_empty_palette_are_blank() {
        assert!(render(PatternKind::None, vec![RED], 0).is_transparent());
        assert!(render(PatternKind::Grid, vec![], 0).is_transparent());
        assert!(render(PatternKind::Splatter, vec![], 0).is_transparent());
    }

    #[test]
    fn grid_cells_are_uniform_palette_colors() {
        let palette = [RED, GREEN, BLUE];
        let surface = render(PatternKind::Grid, palette.to_vec(), 42);

        for cell_x in (0..SURFACE_WIDTH).step_by(GRID_CELL as usize) {
            for cell_y in (0..SURFACE_HEIGHT).step_by(GRID_CELL as usize) {
                let corner = surface.pixel(cell_x, cell_y);
                assert!(palette.iter().any(|c| opaque(*c) == corner));
                assert_eq!(surface.pixel(cell_x + GRID_CELL - 1, cell_y + GRID_CELL - 1), corner);
            }
        }
    }

    #[test]
    fn grid_uses_more_than_one_color() {
        let surface = render(PatternKind::Grid, vec![RED, BLUE], 42);
        let reds = surface.image().pixels().filter(|p| p.0 == [255, 0, 0, 255]).count();
        let total = (SURFACE_WIDTH * SURFACE_HEIGHT) as usize;
        // 64 cells: all-one-color has probability 2^-63.
        assert!(reds > 0 && reds < total);
    }

    #[test]
    fn splatter_covers_a_large_share_of_the_surface() {
        let surface = render(PatternKind::Splatter, vec![RED, BLUE], 7);
        let covered = surface.image().pixels().filter(|p| p[3] > 0).count();
        let total = (SURFACE_WIDTH * SURFACE_HEIGHT) as usize;
        assert!(covered * 4 > total, "only {covered} of {total} pixels covered");
    }

    #[test]
    fn splatter_with_one_color_never_shifts_hue() {
        let surface = render(PatternKind::Splatter, vec![GREEN], 3);
        for pixel in surface.image().pixels().filter(|p| p[3] > 0) {
            assert_eq!(&pixel.0[..3], &[0, 255, 0]);
        }
    }

    #[test]
    fn parse_pattern_kind() {
        assert_eq!("Grid".parse::<PatternKind>().unwrap(), PatternKind::Grid);
        assert_eq!("".parse::<PatternKind>().unwrap(), PatternKind::None);
        assert!("stripes".parse::<PatternKind>().is_err());
    }
}
