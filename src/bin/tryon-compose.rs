use std::path::PathBuf;

use clap::Parser;
use tryon_renderer::{
    parse_hex, Error, FabricBase, GarmentCustomizer, ImageInput, LogoPlacement, LogoSpec,
    PatternKind, QuantizeMode, TextPlacement,
};

/// Composite a garment texture from a fabric photo and customization layers.
#[derive(Parser, Debug)]
#[command(name = "tryon-compose", version)]
struct Cli {
    /// Fabric photo for the base layer. Plain white when omitted.
    #[arg(long)]
    fabric: Option<PathBuf>,

    /// Image to extract the pattern palette from.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Pattern drawn with the extracted palette.
    #[arg(long, default_value = "splatter")]
    pattern: PatternKind,

    /// Number of palette colors to extract.
    #[arg(long, default_value_t = 5)]
    colors: usize,

    /// Refine the palette with up to this many clustering passes.
    #[arg(long)]
    refine: Option<u32>,

    /// Text to print.
    #[arg(long)]
    text: Option<String>,

    /// Text color as #rrggbb.
    #[arg(long, default_value = "#000000")]
    text_color: String,

    #[arg(long, default_value = "front")]
    text_placement: TextPlacement,

    #[arg(long, default_value_t = 30.0)]
    font_size: f32,

    /// Logo image.
    #[arg(long)]
    logo: Option<PathBuf>,

    #[arg(long, default_value = "front")]
    logo_placement: LogoPlacement,

    /// Logo width; height follows the image's aspect ratio.
    #[arg(long)]
    logo_width: Option<f32>,

    /// Seed for the random pattern kinds and scattered text.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> tryon_renderer::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let fabric = match &cli.fabric {
        Some(path) => FabricBase::from_input(&ImageInput::from_path(path)?)?,
        None => FabricBase::plain(),
    };
    let mut customizer = GarmentCustomizer::with_seed(fabric, cli.seed);

    if let Some(path) = &cli.texture {
        let source = ImageInput::from_path(path)?.decode()?;
        let mode = match cli.refine {
            Some(iterations) => QuantizeMode::Refined { iterations },
            None => QuantizeMode::SinglePass,
        };
        let palette = customizer.set_pattern_from_image(&source, cli.pattern, cli.colors, mode)?;
        eprintln!("palette: {}", palette.to_hex().join(" "));
    }

    if let Some(text) = &cli.text {
        let color = parse_hex(&cli.text_color)?;
        customizer.set_text(text, color, cli.text_placement, cli.font_size, (0.0, 0.0));
    }

    if let Some(path) = &cli.logo {
        let image = ImageInput::from_path(path)?.decode()?;
        let mut logo = LogoSpec::new(image, cli.logo_placement);
        if let Some(width) = cli.logo_width {
            logo = logo.with_locked_aspect(width);
        }
        customizer.set_logo(logo);
    }

    let composite = customizer.composite().into_image();

    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::resource_unavailable(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    composite
        .save_with_format(&cli.out, image::ImageFormat::Png)
        .map_err(|e| Error::resource_unavailable(format!("write png '{}': {e}", cli.out.display())))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}
