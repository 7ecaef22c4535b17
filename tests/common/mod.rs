mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from photo_triage for tests
pub use photo_triage::{
    BoundingBox, CategoryMapping, ClassifyConfig, ClassifyPipeline, CropConfig, DetectionRequest,
    DetectionResult, DominantColor, ImageOutcome, ImageProperties, Instance, Label, Quality,
    TriageError, VisionService,
};
