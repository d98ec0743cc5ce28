//! Diagnostic payload.

use serde::{Deserialize, Serialize};
use showroom_core::DiagnosticError;

/// One technical specification line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecEntry {
    pub label: String,
    pub value: String,
    pub unit: String,
}

impl SpecEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into(), unit: unit.into() }
    }
}

/// Result of a product diagnostic, in the service's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    pub specs: Vec<SpecEntry>,
    /// Nominally 0 to 100; not validated.
    pub integrity_score: f64,
    pub status_message: String,
}

impl DiagnosticRecord {
    /// The record shown when the service cannot deliver one.
    pub fn fallback() -> Self {
        Self {
            specs: vec![
                SpecEntry::new("Core Flux", "0.82", "THz"),
                SpecEntry::new("Sync Latency", "1.2", "ns"),
                SpecEntry::new("Energy Efficiency", "A++", "NODE"),
            ],
            integrity_score: 99.0,
            status_message: "System operational. All parameters within nominal range.".to_string(),
        }
    }

    /// Parse raw service text.
    pub fn parse(text: &str) -> Result<Self, DiagnosticError> {
        if text.trim().is_empty() {
            return Err(DiagnosticError::EmptyResponse);
        }
        serde_json::from_str(text).map_err(|e| DiagnosticError::Parse { reason: e.to_string() })
    }

    /// Integrity as a bar fill fraction in [0, 1].
    pub fn integrity_fraction(&self) -> f64 {
        (self.integrity_score / 100.0).clamp(0.0, 1.0)
    }
}
