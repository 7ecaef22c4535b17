use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::{ClassifyConfig, CropConfig};
use crate::error::{Result, TriageError};
use crate::extraction::{ImageCropper, extract_bounding_boxes};
use crate::triage::{Categorization, CategorizationEngine, CategoryResolver};
use crate::vision::{DetectionRequest, VisionService};

/// File extensions picked up from the input directory (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// List up to `max` supported images in `dir`, ordered by file name
pub fn list_images(dir: &Path, max: usize) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| TriageError::io(dir, e))? {
        let path = entry.map_err(|e| TriageError::io(dir, e))?.path();
        if path.is_file() && is_supported(&path) {
            images.push(path);
        }
    }

    images.sort();
    images.truncate(max);
    Ok(images)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Copy `image` into `<output_dir>/<destination>/`, creating the directory if needed
pub async fn copy_into(image: &Path, output_dir: &Path, destination: &Path) -> Result<PathBuf> {
    let dir = output_dir.join(destination);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| TriageError::io(&dir, e))?;

    let target = dir.join(image.file_name().unwrap_or_default());
    tokio::fs::copy(image, &target)
        .await
        .map_err(|e| TriageError::io(&target, e))?;

    Ok(target)
}

/// What happened to one image of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    /// Copies written, one per destination
    Classified(Vec<PathBuf>),
    Skipped { sharpness: Option<f64> },
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub classified: Vec<(PathBuf, Vec<PathBuf>)>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, TriageError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.classified.len() + self.skipped.len() + self.failed.len()
    }
}

/// Sorts a directory of images into color and label directories
pub struct ClassifyPipeline<S, R> {
    service: S,
    engine: CategorizationEngine<R>,
    config: ClassifyConfig,
}

impl<S: VisionService, R: CategoryResolver> ClassifyPipeline<S, R> {
    pub fn new(service: S, resolver: R, config: ClassifyConfig) -> Self {
        Self {
            service,
            engine: CategorizationEngine::new(resolver),
            config,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Detect, categorize and fan out a single image
    pub async fn classify_image(&self, image_path: &Path) -> Result<ImageOutcome> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| TriageError::io(image_path, e))?;

        let request = DetectionRequest {
            image_path,
            image_bytes: &bytes,
            max_labels: self.config.max_label_count,
            min_confidence: self.config.min_confidence,
        };
        let detection = self.service.detect(&request).await?;

        let destinations = match self
            .engine
            .categorize(image_path, &detection, self.config.min_sharpness)?
        {
            Categorization::Skipped { sharpness } => return Ok(ImageOutcome::Skipped { sharpness }),
            Categorization::Destinations(destinations) => destinations,
        };

        let mut written = Vec::with_capacity(destinations.len());
        for destination in &destinations {
            let target = copy_into(image_path, &self.config.output_dir, destination).await?;
            debug!(image = %image_path.display(), target = %target.display(), "copied");
            written.push(target);
        }

        Ok(ImageOutcome::Classified(written))
    }

    /// Classify every supported image in `images_dir`.
    ///
    /// A failing image is recorded in the report and the batch moves on,
    /// unless `fail_fast` is set, in which case its error is returned.
    pub async fn run(&self, images_dir: &Path) -> Result<BatchReport> {
        let images = list_images(images_dir, self.config.max_image_count)?;
        info!(count = images.len(), dir = %images_dir.display(), "found images");

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| TriageError::io(&self.config.output_dir, e))?;

        let mut outcomes = stream::iter(images)
            .map(|path| async move {
                let outcome = self.classify_image(&path).await;
                (path, outcome)
            })
            .buffer_unordered(self.config.concurrency.max(1));

        let mut report = BatchReport::default();

        while let Some((path, outcome)) = outcomes.next().await {
            match outcome {
                Ok(ImageOutcome::Classified(written)) => {
                    info!(image = %path.display(), copies = written.len(), "classified");
                    report.classified.push((path, written));
                }
                Ok(ImageOutcome::Skipped { sharpness }) => {
                    info!(image = %path.display(), ?sharpness, "considered blurry, not classifying");
                    report.skipped.push(path);
                }
                Err(e) if self.config.fail_fast => {
                    error!(image = %path.display(), error = %e, "aborting batch");
                    return Err(e);
                }
                Err(e) => {
                    warn!(image = %path.display(), error = %e, "failed to classify");
                    report.failed.push((path, e));
                }
            }
        }

        Ok(report)
    }
}

/// Detect instances in `input` and write one crop per confident instance
pub async fn crop_image<S: VisionService>(
    service: &S,
    input: &Path,
    config: &CropConfig,
) -> Result<Vec<PathBuf>> {
    let bytes = tokio::fs::read(input)
        .await
        .map_err(|e| TriageError::io(input, e))?;

    let request = DetectionRequest {
        image_path: input,
        image_bytes: &bytes,
        max_labels: config.max_label_count,
        min_confidence: config.min_confidence,
    };
    let detection = service.detect(&request).await?;

    let boxes = extract_bounding_boxes(&detection.labels, config.min_instance_confidence);
    info!(image = %input.display(), instances = boxes.len(), "extracted bounding boxes");

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| TriageError::io(&config.output_dir, e))?;

    let cropper = ImageCropper::open(input)?;
    cropper.crop_all(&boxes, &config.output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("a.jpg")));
        assert!(is_supported(Path::new("a.JPEG")));
        assert!(is_supported(Path::new("dir/a.Png")));
        assert!(!is_supported(Path::new("a.gif")));
        assert!(!is_supported(Path::new("jpg")));
        assert!(!is_supported(Path::new("a.jpg.json")));
    }

    #[test]
    fn test_list_images_filters_sorts_and_truncates() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        for name in ["c.png", "a.jpg", "b.JPEG", "notes.txt", "d.gif"] {
            std::fs::write(dir.path().join(name), b"x")?;
        }
        std::fs::create_dir(dir.path().join("folder.jpg"))?;

        let all = list_images(dir.path(), 20)?;
        let names: Vec<String> = all
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.png"]);

        assert_eq!(list_images(dir.path(), 2)?.len(), 2);
        assert!(list_images(dir.path(), 0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_list_images_missing_dir() {
        let err = list_images(Path::new("/does/not/exist"), 20).unwrap_err();
        assert!(matches!(err, TriageError::Io { .. }));
    }

    #[tokio::test]
    async fn test_copy_into_is_idempotent() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let image = dir.path().join("photo.jpg");
        std::fs::write(&image, b"jpeg bytes")?;
        let out = dir.path().join("out");

        let first = copy_into(&image, &out, Path::new("colors/blue")).await?;
        let second = copy_into(&image, &out, Path::new("colors/blue")).await?;

        assert_eq!(first, second);
        assert_eq!(first, out.join("colors").join("blue").join("photo.jpg"));
        assert_eq!(std::fs::read(&first)?, b"jpeg bytes");
        Ok(())
    }
}
