use std::path::{Path, PathBuf};

use super::{DetectionRequest, VisionService};
use crate::error::{Result, TriageError};
use crate::models::DetectionResult;

/// Serves pre-recorded responses stored as `<dir>/<image file name>.json`.
///
/// Labels are filtered by the request's confidence floor and label budget the
/// way the live service would apply them.
pub struct SidecarVisionService {
    dir: PathBuf,
}

impl SidecarVisionService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn sidecar_path(&self, image_path: &Path) -> PathBuf {
        let mut name = image_path.file_name().unwrap_or_default().to_os_string();
        name.push(".json");
        self.dir.join(name)
    }
}

impl VisionService for SidecarVisionService {
    async fn detect(&self, request: &DetectionRequest<'_>) -> Result<DetectionResult> {
        let path = self.sidecar_path(request.image_path);

        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            TriageError::ServiceUnavailable(format!("no recorded response at {}: {}", path.display(), e))
        })?;
        let mut result: DetectionResult = serde_json::from_str(&text).map_err(|e| {
            TriageError::ServiceUnavailable(format!("malformed recorded response {}: {}", path.display(), e))
        })?;

        result.labels.retain(|label| label.confidence >= request.min_confidence);
        result.labels.truncate(request.max_labels as usize);

        Ok(result)
    }
}
