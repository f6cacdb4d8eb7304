use anyhow::{Context, Result};
use clap::Parser;
use face_crop::detector::model_path_or_default;
use face_crop::{process_path, validate_input, RustFaceDetector};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Detects and crops faces in an image or a directory of images.")]
struct Args {
    /// Path to the input photo or directory
    #[clap(value_parser)]
    path: PathBuf,

    /// Path to the output directory
    #[clap(short, long, value_parser, default_value = "outputs")]
    output: PathBuf,

    /// SeetaFace model file (downloaded if missing)
    #[clap(long, value_parser)]
    model: Option<PathBuf>,
}

/// Main program logic
fn run(args: Args) -> Result<()> {
    // Reject a bad input path before touching the model or the output directory.
    validate_input(&args.path)?;

    let model_path = model_path_or_default(args.model);
    info!("Initializing face detector from {:?}", model_path);
    let mut detector = RustFaceDetector::new(&model_path).context("Failed to initialize face detector")?;

    let start_time = Instant::now();
    let summary = process_path(&args.path, &args.output, &mut detector)
        .with_context(|| format!("Failed to process {:?}", args.path))?;

    debug!("{:?} in {:.2?}", summary, start_time.elapsed());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    run(args)
}
