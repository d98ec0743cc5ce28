//! Product diagnostics for the Showroom engine.
//!
//! A diagnostic is requested from an external generative service, which
//! answers with JSON text. Any failure along the way degrades to a fixed
//! fallback record, so callers always receive a [`DiagnosticRecord`].

pub mod record;
pub mod service;
pub mod panel;

pub use record::{DiagnosticRecord, SpecEntry};
pub use service::{run_diagnostic, CannedService, DiagnosticRequest, DiagnosticService, UnavailableService};
pub use panel::{DiagnosticPanel, HudView, PanelState, Ticket, SKELETON_ROWS};
