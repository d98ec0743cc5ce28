//! Error types for the Showroom engine.

use thiserror::Error;

/// Top-level error type for the Showroom engine.
#[derive(Debug, Error)]
pub enum ShowroomError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Diagnostic(#[from] DiagnosticError),
}

/// Errors looking up catalog entries from text.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown product identifier: {id} (expected one of EYEWEAR, APPAREL, TIMEPIECE, HEADSET)")]
    UnknownProduct { id: String },
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {reason}")]
    Malformed { reason: String },

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

/// Errors during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding failed: {reason}")]
    Encode { reason: String },

    #[error("Frame buffer size {actual} does not match {width}x{height} RGBA")]
    BufferSize { width: u32, height: u32, actual: usize },

    #[error("Manifest serialization failed: {reason}")]
    Manifest { reason: String },
}

/// Failures of the external diagnostic service.
///
/// These never reach the user: the diagnostic path substitutes the
/// fallback record instead.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("Diagnostic service unavailable: {reason}")]
    Service { reason: String },

    #[error("Diagnostic service returned no payload")]
    EmptyResponse,

    #[error("Malformed diagnostic payload: {reason}")]
    Parse { reason: String },

    #[error("Diagnostic task ended without a result")]
    Abandoned,
}
