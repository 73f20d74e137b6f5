use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use palette::Srgb;
use palettely::generator::open_image;
use palettely::render::render_preview;
use palettely::{GeneratorConfig, Harmony, PaletteGenerator, SortBy, Terminal, parse_hex, to_hex};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Extract dominant-color palettes from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image files, or directories whose .jpg/.jpeg/.png files are processed
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors to extract
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// Side of the square working image
    #[arg(short, long)]
    subsampling: Option<u32>,

    /// Palette order: area, saturation, value, saturation+value,
    /// standard_deviation (eye_catching), nearest_to
    #[arg(long)]
    sort_by: Option<String>,

    /// Target color for nearest_to, as hex
    #[arg(short, long)]
    target: Option<String>,

    /// Report only the first N colors
    #[arg(long)]
    top: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print palettes as JSON instead of swatches
    #[arg(long)]
    json: bool,

    /// Write a preview image with the palette strip into this directory
    #[arg(short, long)]
    preview: Option<PathBuf>,

    /// Also print a harmony of the leading color (complementary,
    /// split_complementary, triadic, tetradic, analogous)
    #[arg(long)]
    harmony: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(colors) = args.colors {
        config.colors = colors;
    }
    if let Some(size) = args.subsampling {
        config.subsampling_size = size;
    }
    if let Some(name) = &args.sort_by {
        let target = args.target.as_deref().map(parse_hex).transpose()?;
        config.sort_by = SortBy::from_name(name, target)?;
    }
    if args.top.is_some() {
        config.top = args.top;
    }
    Ok(config)
}

fn write_preview(dir: &Path, input: &Path, palette: &[Srgb<u8>]) -> Result<PathBuf> {
    let image = open_image(input)?;
    let preview = render_preview(&image, palette)?;
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    fs::create_dir_all(dir)?;
    let out_path = dir.join(format!("{stem}_palette.png"));
    preview
        .save(&out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;
    Ok(out_path)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = resolve_config(&args)?;
    let generator = PaletteGenerator::new(config)?;
    let harmony = args.harmony.as_deref().map(str::parse::<Harmony>).transpose()?;
    let terminal = Terminal::detect();

    let mut palettes = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            let batch = generator
                .generate_from_dir(input)
                .with_context(|| format!("processing directory {}", input.display()))?;
            palettes.extend(batch);
        } else {
            let palette = generator
                .generate(input)
                .with_context(|| format!("processing {}", input.display()))?;
            palettes.push((input.clone(), palette));
        }
    }

    let mut report = Vec::new();
    for (path, palette) in &palettes {
        let harmony_colors = match (harmony, palette.first()) {
            (Some(h), Some(lead)) => h.apply(*lead),
            _ => Vec::new(),
        };

        if let Some(dir) = &args.preview {
            let out_path = write_preview(dir, path, palette)?;
            eprintln!("Saved → {}", out_path.display());
        }

        if args.json {
            report.push(json!({
                "path": path.display().to_string(),
                "palette": palette.iter().copied().map(to_hex).collect::<Vec<_>>(),
                "harmony": harmony_colors.iter().copied().map(to_hex).collect::<Vec<_>>(),
            }));
        } else {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            println!("{name}");
            println!("{}", terminal.swatch_line(palette));
            let codes: Vec<_> = palette.iter().copied().map(to_hex).collect();
            println!("{}", codes.join(" "));
            if !harmony_colors.is_empty() {
                println!("{}", terminal.swatch_line(&harmony_colors));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
