pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod paths;
pub mod pipeline;
pub mod triage;
pub mod vision;

pub use config::{ClassifyConfig, CropConfig, ServiceConfig};
pub use error::{Result, TriageError};
pub use models::{BoundingBox, DetectionResult, DominantColor, ImageProperties, Instance, Label, Quality};
pub use pipeline::{BatchReport, ClassifyPipeline, ImageOutcome, crop_image, list_images};
pub use triage::{Categorization, CategorizationEngine, CategoryMapping, CategoryResolver};
pub use vision::{DetectionRequest, HttpVisionService, SidecarVisionService, VisionService};
