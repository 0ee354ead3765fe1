use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use pazurugen_core::{piece_name, PuzzleGrid, PuzzleManifest};
use pazurugen_render::{create_images, decode_rgba};
use rand::Rng;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Parser)]
#[command(
    name = "pazurugen",
    version,
    about = "Cuts source images into interlocking puzzle pieces"
)]
struct Cli {
    /// Directory scanned for source images.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    #[arg(long)]
    rows: Option<u32>,
    #[arg(long)]
    cols: Option<u32>,
    /// Shape seed, decimal or 0x-prefixed hex. Random when omitted.
    #[arg(long)]
    seed: Option<String>,
    /// Output directory; wiped and recreated on every run.
    #[arg(long, default_value = "generated-puzzles")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let sources = collect_images(&cli.dir)?;
    if sources.is_empty() {
        eprintln!("no png/jpg/jpeg images found in {}", cli.dir.display());
        eprintln!("drop source images there or point --dir somewhere else");
        return Ok(());
    }

    let rows = resolve_count(cli.rows, "rows")?;
    let cols = resolve_count(cli.cols, "cols")?;
    let seed = match cli.seed.as_deref() {
        Some(raw) => parse_seed_arg(raw)?,
        None => rand::rng().random(),
    };
    println!("grid: {rows}x{cols}, seed: 0x{seed:08X}");

    if cli.out.exists() {
        fs::remove_dir_all(&cli.out)?;
    }
    fs::create_dir_all(&cli.out)?;

    let mut written = 0usize;
    for path in &sources {
        match generate_one(path, rows, cols, seed, &cli.out) {
            Ok(pieces) => {
                written += 1;
                println!("{}: {pieces} pieces", path.display());
            }
            Err(err) => log::error!("{}: {err}", path.display()),
        }
    }

    println!("done: {written} of {} puzzles in {}", sources.len(), cli.out.display());
    if written < sources.len() {
        eprintln!("{} image(s) failed, see log output", sources.len() - written);
    }
    Ok(())
}

/// Generates one puzzle: a subfolder of piece PNGs plus a JSON manifest.
fn generate_one(
    path: &Path,
    rows: u32,
    cols: u32,
    seed: u32,
    out: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or("source file has no usable name")?;

    let bytes = fs::read(path)?;
    let image = decode_rgba(&bytes)?;
    let grid = PuzzleGrid::new(rows, cols, seed)?;
    let set = create_images(&grid, &image)?;

    let puzzle_dir = out.join(stem);
    fs::create_dir_all(&puzzle_dir)?;
    for rendered in &set.pieces {
        let name = piece_name(rendered.row, rendered.col);
        rendered.image.save(puzzle_dir.join(format!("{stem}-{name}.png")))?;
    }

    let manifest = PuzzleManifest::new(&grid, set.width, set.height);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(puzzle_dir.join(format!("{stem}-manifest.json")), json)?;

    Ok(set.pieces.len())
}

fn collect_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_path(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn resolve_count(flag: Option<u32>, label: &str) -> Result<u32, Box<dyn std::error::Error>> {
    match flag {
        Some(0) => Err(format!("{label} must be at least 1").into()),
        Some(value) => Ok(value),
        None => prompt_count(label),
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_count(label: &str) -> Result<u32, Box<dyn std::error::Error>> {
    loop {
        let raw = prompt(label)?;
        match parse_count(&raw) {
            Some(value) => return Ok(value),
            None => eprintln!("enter a positive whole number"),
        }
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}
