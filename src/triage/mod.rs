pub mod categories;
pub mod color;
pub mod quality;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::DetectionResult;
use crate::paths::path_segment;

pub use categories::{CategoryMapping, CategoryResolver};
pub use color::dominant_color;
pub use quality::{ImageQualityGate, is_sharp};

pub const COLORS_DIR: &str = "colors";
pub const LABELS_DIR: &str = "labels";
pub const UNCATEGORIZED: &str = "uncategorized";

/// Outcome of triaging one image
#[derive(Debug, Clone, PartialEq)]
pub enum Categorization {
    /// Below the sharpness threshold; nothing gets copied
    Skipped { sharpness: Option<f64> },
    /// Directories, relative to the output root, that should receive a copy
    Destinations(BTreeSet<PathBuf>),
}

/// Decides where an image belongs from its detection result.
///
/// Performs no I/O; copying into the returned destinations is up to the caller.
pub struct CategorizationEngine<R> {
    resolver: R,
}

impl<R: CategoryResolver> CategorizationEngine<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn categorize(
        &self,
        image_path: &Path,
        detection: &DetectionResult,
        min_sharpness: f64,
    ) -> Result<Categorization> {
        let properties = &detection.image_properties;
        if !ImageQualityGate::new(min_sharpness).admits(properties) {
            return Ok(Categorization::Skipped { sharpness: properties.sharpness() });
        }

        let color = dominant_color(&properties.dominant_colors)?;

        let mut destinations = BTreeSet::new();
        destinations.insert(Path::new(COLORS_DIR).join(path_segment(color)));

        for label in detection.labels.iter().filter(|l| l.is_whole_image()) {
            let category = self.resolver.resolve(&label.name).unwrap_or(UNCATEGORIZED);
            destinations.insert(
                Path::new(LABELS_DIR)
                    .join(path_segment(category))
                    .join(path_segment(&label.name)),
            );
        }

        tracing::debug!(
            image = %image_path.display(),
            color,
            destinations = destinations.len(),
            "categorized"
        );

        Ok(Categorization::Destinations(destinations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;
    use crate::models::{BoundingBox, DominantColor, ImageProperties, Instance, Label, Quality};

    fn engine() -> CategorizationEngine<CategoryMapping> {
        CategorizationEngine::new(
            CategoryMapping::parse("Dog,Animals\nSky,Nature\n").unwrap(),
        )
    }

    fn label(name: &str, instances: usize) -> Label {
        Label {
            name: name.to_string(),
            confidence: 90.0,
            instances: (0..instances)
                .map(|_| Instance {
                    confidence: 90.0,
                    bounding_box: BoundingBox { left: 0.0, top: 0.0, width: 0.5, height: 0.5 },
                })
                .collect(),
        }
    }

    fn detection(sharpness: Option<f64>, labels: Vec<Label>) -> DetectionResult {
        DetectionResult {
            image_properties: ImageProperties {
                quality: Some(Quality { sharpness }),
                dominant_colors: vec![
                    DominantColor { pixel_percent: 20.0, color_name: "white".to_string() },
                    DominantColor { pixel_percent: 55.0, color_name: "blue".to_string() },
                ],
            },
            labels,
        }
    }

    fn destinations(result: Categorization) -> Vec<String> {
        match result {
            Categorization::Destinations(set) => {
                set.into_iter().map(|p| p.to_string_lossy().replace('\\', "/")).collect()
            }
            other => panic!("expected destinations, got {other:?}"),
        }
    }

    #[test]
    fn test_blurry_image_is_skipped() {
        let result = engine()
            .categorize(Path::new("a.jpg"), &detection(Some(12.0), vec![label("Sky", 0)]), 60.0)
            .unwrap();
        assert_eq!(result, Categorization::Skipped { sharpness: Some(12.0) });
    }

    #[test]
    fn test_color_and_whole_image_labels() {
        let labels = vec![label("Sky", 0), label("Dog", 1), label("Grass", 0)];
        let result = engine()
            .categorize(Path::new("a.jpg"), &detection(Some(80.0), labels), 60.0)
            .unwrap();

        assert_eq!(
            destinations(result),
            vec![
                "colors/blue",
                "labels/Nature/Sky",
                "labels/uncategorized/Grass",
            ]
        );
    }

    #[test]
    fn test_instance_labels_never_contribute() {
        let result = engine()
            .categorize(Path::new("a.jpg"), &detection(None, vec![label("Dog", 1), label("Dog", 3)]), 60.0)
            .unwrap();
        assert_eq!(destinations(result), vec!["colors/blue"]);
    }

    #[test]
    fn test_duplicate_destinations_collapse() {
        let result = engine()
            .categorize(Path::new("a.jpg"), &detection(None, vec![label("Sky", 0), label("Sky", 0)]), 60.0)
            .unwrap();
        assert_eq!(destinations(result), vec!["colors/blue", "labels/Nature/Sky"]);
    }

    #[test]
    fn test_separators_in_names_stay_inside_directory() {
        let result = engine()
            .categorize(Path::new("a.jpg"), &detection(None, vec![label("../etc", 0)]), 60.0)
            .unwrap();
        assert_eq!(destinations(result), vec!["colors/blue", "labels/uncategorized/.._etc"]);
    }

    #[test]
    fn test_dot_names_stay_inside_directory() {
        let mut detection = detection(None, vec![label("..", 0), label(".", 0), label("", 0)]);
        detection.image_properties.dominant_colors =
            vec![DominantColor { pixel_percent: 90.0, color_name: "..".to_string() }];

        let engine = CategorizationEngine::new(CategoryMapping::parse("..,..\n").unwrap());
        let result = engine.categorize(Path::new("a.jpg"), &detection, 60.0).unwrap();

        assert_eq!(
            destinations(result),
            vec![
                "colors/_..",
                "labels/_../_..",
                "labels/uncategorized/_",
                "labels/uncategorized/_.",
            ]
        );
    }

    #[test]
    fn test_sharp_image_without_colors_is_invalid() {
        let mut detection = detection(Some(90.0), vec![label("Sky", 0)]);
        detection.image_properties.dominant_colors.clear();
        let err = engine().categorize(Path::new("a.jpg"), &detection, 60.0).unwrap_err();
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }
}
