//! Vision-service collaborators.
//!
//! The crate only depends on the [`VisionService`] contract: one call per image,
//! returning a [`DetectionResult`]. Two implementations ship with it, an HTTP
//! client and an offline reader for pre-computed JSON responses.

pub mod http;
pub mod sidecar;

use std::future::Future;
use std::path::Path;

use crate::error::Result;
use crate::models::DetectionResult;

pub use http::HttpVisionService;
pub use sidecar::SidecarVisionService;

/// Inputs for one detection call
#[derive(Debug, Clone, Copy)]
pub struct DetectionRequest<'a> {
    pub image_path: &'a Path,
    pub image_bytes: &'a [u8],
    pub max_labels: u32,
    pub min_confidence: f64,
}

pub trait VisionService: Send + Sync {
    fn detect(
        &self,
        request: &DetectionRequest<'_>,
    ) -> impl Future<Output = Result<DetectionResult>> + Send;
}
