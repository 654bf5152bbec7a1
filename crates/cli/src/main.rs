//! CLI tool for rebuilding slide images as editable decks.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slide_core::{
    LayoutConfig, LayoutEngine, Pipeline, PipelineConfig, SidecarDetector, SlideLayout,
    SourceImage,
};
use slide_pptx::{PptxInspector, PptxWriter};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Rebuild slide images as editable PowerPoint decks.
#[derive(Parser, Debug)]
#[command(name = "slide-rebuild")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct images into one deck, one slide per image
    Build(BuildArgs),
    /// Print the shapes of an existing deck
    Inspect {
        /// Deck to read (.pptx)
        deck: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Input slide image(s) (.png, .jpg, .webp)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output deck file or directory (default: next to the first image)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding detection sidecars (default: next to each image)
    #[arg(short, long)]
    detections: Option<PathBuf>,

    /// Maximum number of images processed at once
    #[arg(short, long, default_value = "4")]
    window: usize,

    /// Detection attempts per image
    #[arg(short, long, default_value = "3")]
    attempts: usize,

    /// Layout configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the reconstructed layouts as JSON instead of writing a deck
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Build(build_args) => build(build_args, args.verbose),
        Command::Inspect { deck } => inspect(deck),
    }
}

/// Reconstruct every input image and write the successful ones.
fn build(args: &BuildArgs, verbose: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LayoutConfig::default(),
    };

    let mut images = Vec::with_capacity(args.input.len());
    for input_path in &args.input {
        match SourceImage::from_path(input_path) {
            Ok(image) => images.push(image),
            Err(e) => eprintln!("Error reading {}: {}", input_path.display(), e),
        }
    }
    if images.is_empty() {
        bail!("No readable input images");
    }

    let detector = match &args.detections {
        Some(dir) => SidecarDetector::new().with_directory(dir),
        None => SidecarDetector::new(),
    };
    let pipeline = Pipeline::new(
        LayoutEngine::new(config),
        PipelineConfig::new()
            .with_window(args.window)
            .with_detect_attempts(args.attempts),
    );

    let outcomes = pipeline
        .run(&detector, &images)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut layouts: Vec<(String, SlideLayout)> = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(layout) => {
                if verbose {
                    eprintln!(
                        "Processed: {} ({} objects)",
                        outcome.name,
                        layout.objects.len()
                    );
                }
                layouts.push((outcome.name, layout));
            }
            Err(e) => eprintln!("Error processing {}: {}", outcome.name, e),
        }
    }

    if layouts.is_empty() {
        bail!("No image could be reconstructed");
    }

    if args.json {
        let mut entries = Vec::with_capacity(layouts.len());
        for (name, layout) in &layouts {
            entries.push(serde_json::json!({
                "image": name,
                "layout": serde_json::to_value(layout)?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let output_path = get_output_path(&args.input[0], args.output.as_ref())?;
    let title = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Reconstructed slides")
        .to_string();
    let slides: Vec<SlideLayout> = layouts.into_iter().map(|(_, layout)| layout).collect();

    PptxWriter::new()
        .with_title(title)
        .write_to_path(&slides, &output_path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if verbose {
        eprintln!(
            "Written {} slide(s) to: {}",
            slides.len(),
            output_path.display()
        );
    }

    Ok(())
}

/// Print a shape-level summary of a deck.
fn inspect(deck: &Path) -> Result<()> {
    let file =
        File::open(deck).with_context(|| format!("Failed to open {}", deck.display()))?;
    let summary = PptxInspector::new()
        .inspect(BufReader::new(file))
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "{}: {} slide(s), {} x {} EMU",
        deck.display(),
        summary.slides.len(),
        summary.width,
        summary.height
    )?;
    for slide in &summary.slides {
        writeln!(out, "Slide {}", slide.number)?;
        for shape in &slide.shapes {
            writeln!(
                out,
                "  {:<14} at ({}, {}) size {} x {}{}",
                shape.name,
                shape.x,
                shape.y,
                shape.cx,
                shape.cy,
                match &shape.fill {
                    Some(fill) => format!(" fill #{}", fill),
                    None => String::new(),
                }
            )?;
            for line in shape.text.lines() {
                writeln!(out, "    | {}", line)?;
            }
        }
    }

    Ok(())
}

/// Load a layout configuration file.
fn load_config(path: &Path) -> Result<LayoutConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    LayoutConfig::from_json(&json)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid config {}", path.display()))
}

/// Determine the deck path: an explicit `.pptx` file, a directory, or next
/// to the first input image.
fn get_output_path(input_path: &Path, output: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.pptx", stem);

    let output_path = match output {
        Some(path) if has_pptx_extension(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            path.clone()
        }
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

fn has_pptx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pptx"))
        .unwrap_or(false)
}
