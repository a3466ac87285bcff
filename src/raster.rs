//! Raster primitives shared by the layers: SVG rendering through resvg,
//! anti-aliased shape fills through tiny-skia, and pixel compositing.

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Transform,
};
use resvg::usvg::{fontdb, Options, Tree};

// ============================================================================
// SVG Rendering
// ============================================================================

/// System fonts, loaded once on first text render.
pub fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Renders an SVG document at its natural size (1 user unit = 1 pixel).
///
/// Text elements resolve against `fonts`. Returns `None` if the SVG cannot
/// be parsed or has an empty canvas.
pub fn render_svg(svg_data: &str, fonts: Arc<fontdb::Database>) -> Option<RgbaImage> {
    let mut opts = Options::default();
    opts.fontdb = fonts;

    let tree = Tree::from_str(svg_data, &opts).ok()?;
    let size = tree.size().to_int_size();

    let mut pixmap = Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Escapes the characters XML treats specially in text content and attributes.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A database holding only the bundled Tuffy face, serving `sans-serif`.
#[cfg(test)]
pub(crate) fn test_fonts() -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();
    db.load_font_data(
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/fonts/Tuffy.ttf")).to_vec(),
    );
    db.set_sans_serif_family("Tuffy");
    Arc::new(db)
}

// ============================================================================
// Shapes
// ============================================================================

/// Fills an anti-aliased circle into a new transparent image of the given size.
///
/// Returns `None` for a degenerate radius or image size.
pub fn circle_image(
    width: u32,
    height: u32,
    cx: f32,
    cy: f32,
    radius: f32,
    color: Rgba<u8>,
) -> Option<RgbaImage> {
    let mut pixmap = Pixmap::new(width, height)?;
    let path = PathBuilder::from_circle(cx, cy, radius)?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    Some(pixmap_to_rgba_image(&pixmap))
}

/// Converts a straight-alpha image to a premultiplied tiny-skia pixmap.
fn rgba_image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

/// Converts a tiny-skia pixmap (premultiplied) to a straight-alpha image.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Pixels falling
/// outside the destination are clipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;

        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Scales `src` to `width` x `height` and returns it placed at `(x, y)` on a
/// transparent canvas of `canvas` size.
///
/// Only the part landing on the canvas is rasterized, so the drawn size may
/// exceed the canvas by any amount. Returns `None` when nothing can be drawn.
pub fn scaled_onto_canvas(
    canvas: (u32, u32),
    src: &RgbaImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Option<RgbaImage> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 || !(width > 0.0 && height > 0.0) {
        return None;
    }
    if !(width.is_finite() && height.is_finite() && x.is_finite() && y.is_finite()) {
        return None;
    }

    let source = rgba_image_to_pixmap(src)?;
    let mut target = Pixmap::new(canvas.0, canvas.1)?;

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform =
        Transform::from_row(width / src_w as f32, 0.0, 0.0, height / src_h as f32, x, y);
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);

    Some(pixmap_to_rgba_image(&target))
}

/// Alpha blends two RGBA pixels (source over destination).
///
/// Fully transparent sources leave the destination untouched and fully
/// opaque sources replace it, so those cases are exact.
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => return dst,
        255 => return src,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Composites `src` onto `dest` with the multiply blend mode.
///
/// Follows the canvas `multiply` composite operation: the blended color is
/// `Cs * Cb` where the backdrop is present, then painted source-over. Both
/// images must have the same dimensions; extra pixels are ignored.
pub fn multiply_over(dest: &mut RgbaImage, src: &RgbaImage) {
    for (dst, src) in dest.pixels_mut().zip(src.pixels()) {
        let sa = src[3] as f32 / 255.0;
        let da = dst[3] as f32 / 255.0;
        if sa == 0.0 {
            continue;
        }

        let out_a = sa + da * (1.0 - sa);
        let mut out = [0u8; 4];
        for c in 0..3 {
            let cs = src[c] as f32 / 255.0;
            let cb = dst[c] as f32 / 255.0;
            let mixed = (1.0 - da) * cs + da * cs * cb;
            let value = (mixed * sa + cb * da * (1.0 - sa)) / out_a;
            out[c] = (value * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round() as u8;
        dst.0 = out;
    }
}

/// Scales the alpha channel of every pixel by `opacity` (clamped to 0-1).
pub fn apply_opacity(image: &mut RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
    }
}

// ============================================================================
// Tests
// ============================================================================
