use anyhow::Context;
use clap::Parser;
use image_compressor::models::{CompressionStats, DEFAULT_MAX_DIMENSION, UploadOptions};
use image_compressor::services::ImageCompressor;
use image_compressor::utils::validation::compressed_filename;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "compress", version, about = "Compress an image to JPEG")]
struct CliArgs {
    /// Image to compress (JPEG, PNG, GIF or WebP)
    input: PathBuf,

    /// JPEG quality, 1 (smallest) to 100 (best)
    #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Copy the source EXIF block into the output
    #[arg(long, default_value_t = false)]
    preserve_exif: bool,

    /// Rotate according to the EXIF orientation tag
    #[arg(long, default_value_t = false)]
    auto_rotate: bool,

    /// Longest allowed side in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION, value_parser = clap::value_parser!(u32).range(1..))]
    max_dimension: u32,

    /// Output path (defaults to `<stem>_compressed_<quality>.jpg` next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the result dimensions and size as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn default_output(input: &Path, quality: u8) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(compressed_filename(&name, quality))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compress=info,image_compressor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let options = UploadOptions::new(
        args.quality,
        args.preserve_exif,
        args.auto_rotate,
        args.max_dimension,
    )?;

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let result = ImageCompressor::compress(&data, &options)
        .with_context(|| format!("Failed to compress {}", args.input.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, args.quality));
    std::fs::write(&output, &result.data)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "✅ {} -> {} ({}x{}, {} -> {} bytes)",
        args.input.display(),
        output.display(),
        result.final_width,
        result.final_height,
        data.len(),
        result.compressed_size_bytes
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string(&CompressionStats::from(&result))?
        );
    }

    Ok(())
}
