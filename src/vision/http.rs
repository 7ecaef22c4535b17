//! HTTP client for a DetectLabels-style endpoint.
//!
//! The request body mirrors DetectLabels: the image travels base64-encoded in
//! `Image.Bytes`, and both general labels and image properties are requested.
//! Failed attempts are retried with a linear backoff; once retries are used up
//! the image is reported as [`TriageError::ServiceUnavailable`].

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{DetectionRequest, VisionService};
use crate::config::ServiceConfig;
use crate::error::{Result, TriageError};
use crate::models::DetectionResult;

const RETRY_BACKOFF: Duration = Duration::from_millis(500);
const FEATURES: [&str; 2] = ["GENERAL_LABELS", "IMAGE_PROPERTIES"];

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DetectLabelsBody<'a> {
    image: ImageBody,
    max_labels: u32,
    min_confidence: f64,
    features: &'a [&'a str],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ImageBody {
    bytes: String,
}

pub struct HttpVisionService {
    http_client: Client,
    config: ServiceConfig,
}

impl HttpVisionService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TriageError::ServiceUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client, config })
    }

    async fn attempt(&self, body: &DetectLabelsBody<'_>) -> std::result::Result<DetectionResult, String> {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("service returned {}: {}", status, text.trim()));
        }

        response
            .json::<DetectionResult>()
            .await
            .map_err(|e| format!("undecodable response: {}", e))
    }
}

impl VisionService for HttpVisionService {
    async fn detect(&self, request: &DetectionRequest<'_>) -> Result<DetectionResult> {
        let body = DetectLabelsBody {
            image: ImageBody { bytes: STANDARD.encode(request.image_bytes) },
            max_labels: request.max_labels,
            min_confidence: request.min_confidence,
            features: &FEATURES,
        };

        let attempts = self.config.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            debug!(image = %request.image_path.display(), attempt, "calling vision service");

            match self.attempt(&body).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(image = %request.image_path.display(), attempt, error = %e, "vision service call failed");
                    last_error = e;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
        }

        Err(TriageError::ServiceUnavailable(format!(
            "{} after {} attempt(s): {}",
            request.image_path.display(),
            attempts,
            last_error
        )))
    }
}
