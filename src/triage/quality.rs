use crate::models::ImageProperties;

/// Returns true if `sharpness` is strictly above `threshold`
pub fn is_sharp(sharpness: f64, threshold: f64) -> bool {
    sharpness > threshold
}

/// Rejects images that are too blurry to sort
#[derive(Debug, Clone, Copy)]
pub struct ImageQualityGate {
    pub min_sharpness: f64,
}

impl ImageQualityGate {
    pub fn new(min_sharpness: f64) -> Self {
        Self { min_sharpness }
    }

    /// Unmeasured images pass whatever the threshold, `+inf` included
    pub fn admits(&self, properties: &ImageProperties) -> bool {
        match properties.sharpness() {
            Some(sharpness) => is_sharp(sharpness, self.min_sharpness),
            None => true,
        }
    }
}
