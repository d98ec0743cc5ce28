//! Boundary to the generative diagnostic service.

use std::sync::Arc;

use async_trait::async_trait;
use showroom_core::{DiagnosticError, ProductState};
use tracing::{info, warn};

use crate::record::DiagnosticRecord;

/// What the service is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRequest {
    pub product_name: String,
    pub tagline: String,
}

impl DiagnosticRequest {
    pub fn new(product_name: impl Into<String>, tagline: impl Into<String>) -> Self {
        Self { product_name: product_name.into(), tagline: tagline.into() }
    }

    pub fn for_product(state: ProductState) -> Self {
        let config = state.config();
        Self::new(config.name, config.tagline)
    }

    /// Instruction text sent to the service.
    pub fn prompt(&self) -> String {
        format!(
            "Perform a futuristic technical diagnostic on a product called \"{}\" ({}). \
             Provide 3 highly technical and unique futuristic specifications. \
             Also provide a general structural integrity score (0-100) and a short \
             1-sentence status message. Respond with JSON of the shape \
             {{\"specs\": [{{\"label\", \"value\", \"unit\"}}], \"integrityScore\", \"statusMessage\"}}.",
            self.product_name, self.tagline
        )
    }
}

/// A generative text service answering diagnostic requests with raw JSON.
#[async_trait]
pub trait DiagnosticService: Send + Sync {
    async fn generate(&self, request: &DiagnosticRequest) -> Result<String, DiagnosticError>;
}

#[async_trait]
impl<T: DiagnosticService + ?Sized> DiagnosticService for Arc<T> {
    async fn generate(&self, request: &DiagnosticRequest) -> Result<String, DiagnosticError> {
        (**self).generate(request).await
    }
}

/// No service configured; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableService;

#[async_trait]
impl DiagnosticService for UnavailableService {
    async fn generate(&self, _request: &DiagnosticRequest) -> Result<String, DiagnosticError> {
        Err(DiagnosticError::Service { reason: "no diagnostic service configured".to_string() })
    }
}

/// Answers every request with the same prepared text.
#[derive(Debug, Clone, Default)]
pub struct CannedService {
    response: String,
}

impl CannedService {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl DiagnosticService for CannedService {
    async fn generate(&self, _request: &DiagnosticRequest) -> Result<String, DiagnosticError> {
        Ok(self.response.clone())
    }
}

/// Ask the service for a diagnostic.
///
/// Never fails: service errors, empty payloads and malformed JSON all yield
/// [`DiagnosticRecord::fallback`]. There is no retry and no timeout.
pub async fn run_diagnostic<S>(service: &S, request: &DiagnosticRequest) -> DiagnosticRecord
where
    S: DiagnosticService + ?Sized,
{
    info!(product = %request.product_name, "Requesting diagnostic");

    let outcome = match service.generate(request).await {
        Ok(text) => DiagnosticRecord::parse(&text),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(record) => {
            info!(
                product = %request.product_name,
                integrity = record.integrity_score,
                specs = record.specs.len(),
                "Diagnostic received"
            );
            record
        }
        Err(error) => {
            warn!(product = %request.product_name, %error, "Diagnostic failed, using fallback record");
            DiagnosticRecord::fallback()
        }
    }
}
