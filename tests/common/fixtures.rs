use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use image::{ImageBuffer, Rgb};
use photo_triage::{
    BoundingBox, DetectionRequest, DetectionResult, DominantColor, ImageProperties, Instance, Label,
    Quality, TriageError, VisionService,
};

/// Writes a `width` x `height` red image at `path`; the format follows the extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb([255u8, 0u8, 0u8]));
    img.save(path).expect("Failed to save test image");
}

/// Vision service returning canned results keyed by image file name.
/// Unknown images fail as if the service were down.
#[derive(Default)]
pub struct FixedVisionService {
    results: HashMap<String, DetectionResult>,
    pub requests: Mutex<Vec<(String, u32, f64)>>,
}

impl FixedVisionService {
    pub fn with(mut self, file_name: &str, result: DetectionResult) -> Self {
        self.results.insert(file_name.to_string(), result);
        self
    }
}

impl VisionService for FixedVisionService {
    async fn detect(&self, request: &DetectionRequest<'_>) -> Result<DetectionResult, TriageError> {
        let name = request
            .image_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        self.requests
            .lock()
            .unwrap()
            .push((name.clone(), request.max_labels, request.min_confidence));

        self.results
            .get(&name)
            .cloned()
            .ok_or_else(|| TriageError::ServiceUnavailable(format!("no result for {}", name)))
    }
}

pub fn detection(sharpness: Option<f64>, colors: &[(f64, &str)], labels: Vec<Label>) -> DetectionResult {
    DetectionResult {
        image_properties: ImageProperties {
            quality: Some(Quality { sharpness }),
            dominant_colors: colors
                .iter()
                .map(|&(pixel_percent, name)| DominantColor {
                    pixel_percent,
                    color_name: name.to_string(),
                })
                .collect(),
        },
        labels,
    }
}

/// A label covering the whole image
pub fn whole_label(name: &str) -> Label {
    Label { name: name.to_string(), confidence: 95.0, instances: vec![] }
}

/// A label with one instance per `(confidence, box)`
pub fn instance_label(name: &str, instances: &[(f64, BoundingBox)]) -> Label {
    Label {
        name: name.to_string(),
        confidence: 95.0,
        instances: instances
            .iter()
            .map(|&(confidence, bounding_box)| Instance { confidence, bounding_box })
            .collect(),
    }
}

pub fn bbox(left: f64, top: f64, width: f64, height: f64) -> BoundingBox {
    BoundingBox { left, top, width, height }
}

pub const TEST_CATEGORIES: &str = "Dog,Animals\nDo,Verbs\nSky,Nature\nBeach,Places\n";
