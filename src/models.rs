use serde::Deserialize;

/// Detection result returned by the vision service for a single image.
///
/// Field names follow the PascalCase shape of a DetectLabels response so the
/// service's JSON deserializes as-is. Anything we don't use is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectionResult {
    #[serde(default)]
    pub image_properties: ImageProperties,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageProperties {
    #[serde(default)]
    pub quality: Option<Quality>,
    #[serde(default)]
    pub dominant_colors: Vec<DominantColor>,
}

impl ImageProperties {
    /// Sharpness score, if the service measured one
    pub fn sharpness(&self) -> Option<f64> {
        self.quality.as_ref().and_then(|q| q.sharpness)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quality {
    #[serde(default)]
    pub sharpness: Option<f64>,
}

/// One weighted color observation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DominantColor {
    #[serde(default)]
    pub pixel_percent: f64,
    #[serde(rename = "SimplifiedColor")]
    pub color_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Label {
    /// A label without instances describes the whole image rather than a region of it.
    pub fn is_whole_image(&self) -> bool {
        self.instances.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub confidence: f64,
    pub bounding_box: BoundingBox,
}

/// Region of an image as fractions of its width and height
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}
