use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use photo_triage::config::{self, ClassifyConfig, CropConfig, ServiceConfig};
use photo_triage::{
    CategoryMapping, ClassifyPipeline, DetectionRequest, DetectionResult, HttpVisionService,
    SidecarVisionService, VisionService, crop_image,
};

#[derive(Parser)]
#[command(name = "photo-triage")]
#[command(about = "Sort images by detected labels and dominant color, or crop detected objects")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sort images in directories according to their detected labels
    Classify(ClassifyArgs),
    /// Crop every confidently detected object out of an image
    Crop(CropArgs),
}

#[derive(Args)]
struct ServiceArgs {
    /// Vision service endpoint receiving DetectLabels-style requests
    #[arg(long, env = "VISION_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Read recorded responses (<image file name>.json) from this directory; takes precedence over --endpoint
    #[arg(long, value_name = "DIR")]
    detections: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Retries after a failed service call
    #[arg(long, default_value_t = 2)]
    retries: u32,
}

#[derive(Args)]
struct ClassifyArgs {
    /// The directory containing the images to sort. It must exist.
    #[arg(value_name = "IMAGES_DIR")]
    images_dir: PathBuf,

    /// The directory in which to store the output. Created if missing.
    #[arg(short = 'o', long = "output_dir", visible_alias = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// The maximum amount of images to take from the folder
    #[arg(long = "max_image_count", visible_alias = "maxi", default_value_t = config::DEFAULT_MAX_IMAGE_COUNT)]
    max_image_count: usize,

    /// The maximum amount of labels to detect per image
    #[arg(long = "max_label_count", visible_alias = "maxl", default_value_t = config::DEFAULT_MAX_LABEL_COUNT)]
    max_label_count: u32,

    /// The minimum confidence for a label to be taken into account
    #[arg(long = "min_confidence", visible_alias = "minc", default_value_t = config::DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f64,

    /// Images with a sharpness score at or below this are not sorted
    #[arg(long = "min_sharpness", visible_alias = "mins", default_value_t = config::DEFAULT_MIN_SHARPNESS)]
    min_sharpness: f64,

    /// Label prefix to category table
    #[arg(long, value_name = "CSV", default_value = config::DEFAULT_CATEGORIES_PATH)]
    categories: PathBuf,

    /// Images processed concurrently
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Stop at the first image that fails instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    #[command(flatten)]
    service: ServiceArgs,
}

#[derive(Args)]
struct CropArgs {
    /// The path to the image to crop
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// The directory to store the cropped images
    #[arg(short = 'o', long = "output_dir", visible_alias = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    #[command(flatten)]
    service: ServiceArgs,
}

/// Service chosen on the command line
enum Backend {
    Http(HttpVisionService),
    Sidecar(SidecarVisionService),
}

impl Backend {
    fn from_args(args: &ServiceArgs) -> anyhow::Result<Self> {
        if let Some(dir) = &args.detections {
            return Ok(Backend::Sidecar(SidecarVisionService::new(dir)));
        }

        let Some(endpoint) = &args.endpoint else {
            bail!("no vision service configured: pass --endpoint (or set VISION_ENDPOINT) or --detections");
        };

        let mut service_config = ServiceConfig::new(endpoint.as_str());
        service_config.timeout = Duration::from_secs(args.timeout);
        service_config.max_retries = args.retries;
        Ok(Backend::Http(HttpVisionService::new(service_config)?))
    }
}

impl VisionService for Backend {
    async fn detect(&self, request: &DetectionRequest<'_>) -> photo_triage::Result<DetectionResult> {
        match self {
            Backend::Http(service) => service.detect(request).await,
            Backend::Sidecar(service) => service.detect(request).await,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn classify(args: ClassifyArgs) -> anyhow::Result<()> {
    if !args.images_dir.is_dir() {
        bail!("images directory does not exist: {}", args.images_dir.display());
    }

    let mapping = CategoryMapping::load(&args.categories)
        .with_context(|| format!("Failed to load category mapping {}", args.categories.display()))?;
    info!(entries = mapping.len(), "loaded category mapping");

    let backend = Backend::from_args(&args.service)?;
    let classify_config = ClassifyConfig {
        output_dir: args.output_dir,
        max_image_count: args.max_image_count,
        max_label_count: args.max_label_count,
        min_confidence: args.min_confidence,
        min_sharpness: args.min_sharpness,
        concurrency: args.concurrency,
        fail_fast: args.fail_fast,
    };

    let pipeline = ClassifyPipeline::new(backend, mapping, classify_config);
    let report = pipeline.run(&args.images_dir).await?;

    println!("\n=== Classification Results ===");
    println!("Images processed: {}", report.total());
    println!("  classified: {}", report.classified.len());
    println!("  skipped (blurry): {}", report.skipped.len());
    println!("  failed: {}", report.failed.len());

    for (path, error) in &report.failed {
        println!("    {}: {}", path.display(), error);
    }

    if !report.failed.is_empty() {
        bail!("{} image(s) could not be classified", report.failed.len());
    }

    Ok(())
}

async fn crop(args: CropArgs) -> anyhow::Result<()> {
    let backend = Backend::from_args(&args.service)?;
    let crop_config = CropConfig {
        output_dir: args.output_dir,
        ..CropConfig::default()
    };

    let written = crop_image(&backend, &args.input_path, &crop_config).await?;

    println!("\n=== Cropped Images ===");
    println!("Total crops: {}", written.len());
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Classify(args) => classify(args).await,
        Command::Crop(args) => crop(args).await,
    }
}
