//! Run configuration.
//!
//! Every operation takes its settings from one of these values; nothing is
//! read from process-wide state.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_IMAGE_COUNT: usize = 20;
pub const DEFAULT_MAX_LABEL_COUNT: u32 = 10;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 55.0;
pub const DEFAULT_MIN_SHARPNESS: f64 = 60.0;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_MIN_INSTANCE_CONFIDENCE: f64 = 75.0;
pub const DEFAULT_CATEGORIES_PATH: &str = "./categories.csv";

/// Settings for sorting a directory of images
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Root of the `colors/` and `labels/` trees
    pub output_dir: PathBuf,
    pub max_image_count: usize,
    /// Forwarded to the vision service
    pub max_label_count: u32,
    /// Forwarded to the vision service
    pub min_confidence: f64,
    /// Images at or below this sharpness are skipped
    pub min_sharpness: f64,
    /// Images processed at once
    pub concurrency: usize,
    /// Abort the batch on the first failed image instead of moving on
    pub fail_fast: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            max_image_count: DEFAULT_MAX_IMAGE_COUNT,
            max_label_count: DEFAULT_MAX_LABEL_COUNT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_sharpness: DEFAULT_MIN_SHARPNESS,
            concurrency: DEFAULT_CONCURRENCY,
            fail_fast: false,
        }
    }
}

/// Settings for cutting detected instances out of one image
#[derive(Debug, Clone)]
pub struct CropConfig {
    pub output_dir: PathBuf,
    /// Instances below this confidence are not cropped
    pub min_instance_confidence: f64,
    pub max_label_count: u32,
    pub min_confidence: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            min_instance_confidence: DEFAULT_MIN_INSTANCE_CONFIDENCE,
            max_label_count: DEFAULT_MAX_LABEL_COUNT,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Connection settings for the HTTP vision service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub timeout: Duration,
    /// Extra attempts after the first failed request
    pub max_retries: u32,
}

impl ServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}
