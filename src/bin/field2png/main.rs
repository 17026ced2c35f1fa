// field2png - Render a constellation field headlessly to PNG
//
// Runs the same simulation the page does, without a browser, and writes
// the final frame (or every Nth frame) as PNG. Useful for tuning configs.
//
// Usage: cargo run --bin field2png -- RUST SYSTEMS WEB [--frames 600] [--every 60]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use constellation_engine::{Constellation, FieldConfig, Motion, Theme};
use image::RgbaImage;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "field2png", about = "Render a constellation field to PNG")]
struct Args {
    /// Words to cycle through
    #[arg(required = true)]
    words: Vec<String>,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Frames to simulate
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Also write every Nth frame (0 = final frame only)
    #[arg(long, default_value_t = 0)]
    every: u32,

    /// Sampling density multiplier
    #[arg(long)]
    density: Option<f32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Light theme instead of dark
    #[arg(long)]
    light: bool,

    /// Honor reduced motion (no word rotation, softer pointer)
    #[arg(long)]
    reduced_motion: bool,

    /// Pointer position as X,Y held for the whole run
    #[arg(long, value_parser = parse_point)]
    pointer: Option<(f32, f32)>,

    /// JSON file with FieldConfig overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; numbered frames go next to it
    #[arg(long, default_value = "field.png")]
    out: PathBuf,
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s.split_once(',').ok_or("expected X,Y")?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn load_config(args: &Args) -> Result<FieldConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            FieldConfig::from_json(&json)?
        }
        None => FieldConfig::default(),
    };
    if let Some(density) = args.density {
        config.density = density;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn write_png(field: &Constellation, path: &Path) -> Result<()> {
    let pixels = field.renderer().pixels().to_vec();
    let Some(img) = RgbaImage::from_raw(field.width(), field.height(), pixels) else {
        bail!("framebuffer does not match {}x{}", field.width(), field.height());
    };
    img.save(path).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn frame_path(out: &Path, frame: u32) -> PathBuf {
    let stem = out.file_stem().and_then(|s| s.to_str()).unwrap_or("field");
    out.with_file_name(format!("{stem}-{frame:05}.png"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.width == 0 || args.height == 0 {
        bail!("width and height must be non-zero");
    }

    let config = load_config(&args)?;
    let mut field = Constellation::new(args.width, args.height, args.words.clone(), config)?;
    field.set_motion(Motion::from_reduced(args.reduced_motion));
    field.set_theme(if args.light { Theme::Light } else { Theme::Dark });
    if let Some((x, y)) = args.pointer {
        field.pointer_move(x, y);
    }

    info!(
        "simulating {} frames at {}x{} ({} words)",
        args.frames, args.width, args.height, args.words.len()
    );

    field.start();
    for frame in 1..=args.frames {
        field.tick(frame as f64 * 1000.0 / 60.0);
        if !field.is_running() {
            bail!("simulation stopped at frame {frame}");
        }
        if args.every > 0 && frame % args.every == 0 {
            write_png(&field, &frame_path(&args.out, frame))?;
        }
    }

    info!(
        "final word '{}', {} particles",
        field.active_word().unwrap_or(""),
        field.particles().len()
    );
    write_png(&field, &args.out)
}
