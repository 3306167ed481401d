use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ocrpad::detection::default_model_dir;
use ocrpad::headless::extract_file;
use ocrpad::{AppConfig, EngineRegistry, Language, OcrOptions, OcrsFactory};

#[derive(Parser)]
#[command(name = "ocrpad")]
#[command(about = "Read text from images with OCR and edit the result")]
struct Cli {
    /// Image to read without opening the GUI (.png, .jpg, .jpeg)
    #[arg(value_name = "IMAGE")]
    image_path: Option<PathBuf>,

    /// OCR languages in preferred order (en, es, pt, fr, de, it, ru)
    #[arg(short = 'l', long = "lang", value_delimiter = ',', default_value = "es,en")]
    languages: Vec<Language>,

    /// Request hardware acceleration
    #[arg(long)]
    gpu: bool,

    /// Do not draw detected boxes
    #[arg(long, conflicts_with = "boxes_out")]
    no_boxes: bool,

    /// Save the image with detected boxes drawn on it
    #[arg(long, value_name = "PATH")]
    boxes_out: Option<PathBuf>,

    /// Print detections and text as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Directory containing text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig {
        model_dir: args.model_dir.clone().unwrap_or_else(default_model_dir),
        options: OcrOptions::new(args.languages.clone(), args.gpu, !args.no_boxes),
    };

    match &args.image_path {
        Some(image_path) => run_headless(&config, image_path, args.boxes_out.as_deref(), args.json),
        None => run_gui(config),
    }
}

#[cfg(feature = "gui")]
fn run_gui(config: AppConfig) -> anyhow::Result<()> {
    ocrpad::gui::run(config)
}

#[cfg(not(feature = "gui"))]
fn run_gui(_config: AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("no IMAGE given and this build has no GUI (enable the `gui` feature)")
}

/// Upload and extract once, printing the result
fn run_headless(
    config: &AppConfig,
    image_path: &Path,
    boxes_out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let registry = EngineRegistry::new(Box::new(OcrsFactory::new(&config.model_dir)));
    let report = extract_file(Arc::new(registry), config.options.clone(), image_path, boxes_out)?;
    println!("{}", report.render(json)?);
    Ok(())
}
