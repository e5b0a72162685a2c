// ABOUTME: HTTP client for the coach API - posture analysis, workout plans, nutrition advice
// ABOUTME: One network call per invocation, no retries; non-2xx maps to ServiceError with server detail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! Coach API client.
//!
//! Thin transport layer over the remote coach service. Retry policy, if any,
//! belongs to callers; a failed call surfaces exactly once.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::errors::CoachError;
use crate::http_client::{create_client_with_timeout, shared_client};
use crate::models::{
    AnalysisRequest, ExerciseLibraryResponse, ExerciseType, HealthStatus, NutritionAdviceRequest,
    NutritionAdviceResponse, PostureAnalysis, WorkoutPlanRequest, WorkoutPlanResponse,
};

/// Submit an image plus label, get back a structured posture analysis.
///
/// The seam between the live trainer loop and the network: production code
/// uses [`CoachApiClient`], tests use deterministic fakes.
#[async_trait]
pub trait PostureAnalyzer: Send + Sync {
    /// Perform exactly one analysis round trip.
    async fn analyze(&self, request: AnalysisRequest) -> Result<PostureAnalysis, CoachError>;
}

/// HTTP client for the coach service.
pub struct CoachApiClient {
    client: Client,
    base_url: Url,
}

impl CoachApiClient {
    /// Build a client from runtime configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: create_client_with_timeout(
                config.http_timeout_secs,
                config.http_connect_timeout_secs,
            ),
            base_url: config.api_base_url.clone(),
        }
    }

    /// Build a client against an explicit base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, CoachError> {
        Ok(Self {
            client: shared_client().clone(),
            base_url: Url::parse(base_url)?,
        })
    }

    /// Resolve an endpoint path against the base URL, keeping any base path
    /// component (e.g. an API gateway stage like `/prod`) intact.
    fn endpoint(&self, path: &str) -> Result<Url, CoachError> {
        let mut base = self.base_url.clone();
        // A base without a trailing slash would make join() replace its last
        // path segment instead of appending.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// `POST /analyze-posture` with a JPEG frame and an exercise label.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure, `Service` on a non-2xx
    /// response.
    pub async fn analyze_posture(
        &self,
        image: Bytes,
        exercise_type: ExerciseType,
    ) -> Result<PostureAnalysis, CoachError> {
        let url = self.endpoint("/analyze-posture")?;
        debug!(exercise = %exercise_type, bytes = image.len(), "submitting frame for analysis");

        let part = Part::bytes(image.to_vec())
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .part("file", part)
            .text("exercise_type", exercise_type.as_str());

        let response = self.client.post(url).multipart(form).send().await?;
        decode(response).await
    }

    /// `POST /workout-plan`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure, `Service` on a non-2xx
    /// response.
    pub async fn workout_plan(
        &self,
        request: &WorkoutPlanRequest,
    ) -> Result<WorkoutPlanResponse, CoachError> {
        self.post_json("/workout-plan", request).await
    }

    /// `POST /nutrition-advice`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure, `Service` on a non-2xx
    /// response.
    pub async fn nutrition_advice(
        &self,
        request: &NutritionAdviceRequest,
    ) -> Result<NutritionAdviceResponse, CoachError> {
        self.post_json("/nutrition-advice", request).await
    }

    /// `GET /exercise-library`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure, `Service` on a non-2xx
    /// response.
    pub async fn exercise_library(&self) -> Result<ExerciseLibraryResponse, CoachError> {
        self.get_json("/exercise-library").await
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Returns `Transport` on network failure, `Service` on a non-2xx
    /// response.
    pub async fn health(&self) -> Result<HealthStatus, CoachError> {
        self.get_json("/health").await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoachError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url).json(body).send().await?;
        decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoachError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl PostureAnalyzer for CoachApiClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<PostureAnalysis, CoachError> {
        self.analyze_posture(request.image, request.exercise_type)
            .await
    }
}

/// Decode a successful body, or turn a non-2xx response into `Service`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CoachError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CoachError::Service {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

/// Pull the most specific explanation out of an error body.
///
/// The service emits `detail` (FastAPI validation errors), or
/// `message`/`error` (lambda handler); a non-JSON body is used verbatim.
fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_owned();
            }
        }
    }
    body.trim().to_owned()
}
