//! Diagnostic HUD state: the in-flight gate and its view model.

use serde::Serialize;
use showroom_core::ProductState;
use tracing::debug;

use crate::record::{DiagnosticRecord, SpecEntry};

/// Placeholder row widths shown while a diagnostic is loading, as fractions.
pub const SKELETON_ROWS: [(u8, u8); 3] = [(3, 4), (1, 2), (2, 3)];

/// Identifies one diagnostic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Loading {
        ticket: Ticket,
        product: ProductState,
    },
    Ready(DiagnosticRecord),
}

/// Gate allowing at most one diagnostic in flight.
///
/// Every [`begin`](Self::begin) issues a fresh ticket; a completion is only
/// accepted for the ticket currently loading.
#[derive(Debug, Default)]
pub struct DiagnosticPanel {
    state: PanelState,
    next_ticket: u64,
}

impl DiagnosticPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic for `product`. Returns `None` while one is loading.
    pub fn begin(&mut self, product: ProductState) -> Option<Ticket> {
        if self.is_loading() {
            debug!(product = %product, "Diagnostic already in flight");
            return None;
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.state = PanelState::Loading { ticket, product };
        debug!(product = %product, ticket = ticket.0, "Diagnostic started");
        Some(ticket)
    }

    /// Store the result of `ticket`. Stale tickets are dropped.
    pub fn complete(&mut self, ticket: Ticket, record: DiagnosticRecord) -> bool {
        match self.state {
            PanelState::Loading { ticket: current, .. } if current == ticket => {
                self.state = PanelState::Ready(record);
                true
            }
            _ => {
                debug!(ticket = ticket.0, "Dropping stale diagnostic result");
                false
            }
        }
    }

    /// Forget the record and abandon any request in flight.
    pub fn clear(&mut self) {
        if let PanelState::Loading { ticket, .. } = self.state {
            debug!(ticket = ticket.0, "Abandoning diagnostic");
        }
        self.state = PanelState::Idle;
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PanelState::Loading { .. })
    }

    /// The ticket currently loading, if any.
    pub fn pending(&self) -> Option<Ticket> {
        match self.state {
            PanelState::Loading { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&DiagnosticRecord> {
        match &self.state {
            PanelState::Ready(record) => Some(record),
            _ => None,
        }
    }
}

/// What the HUD shows for the current panel state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HudView {
    Hidden,
    Loading {
        accent: String,
        skeleton_rows: Vec<f32>,
    },
    Ready {
        accent: String,
        specs: Vec<SpecEntry>,
        integrity_score: f64,
        integrity_fraction: f64,
        status_message: String,
    },
}

impl HudView {
    /// Build the view for `panel`, tinted with the active product's primary color.
    pub fn new(panel: &DiagnosticPanel, active: ProductState) -> Self {
        let accent = active.config().color.to_hex();
        match panel.state() {
            PanelState::Idle => HudView::Hidden,
            PanelState::Loading { .. } => HudView::Loading {
                accent,
                skeleton_rows: SKELETON_ROWS.iter().map(|&(n, d)| f32::from(n) / f32::from(d)).collect(),
            },
            PanelState::Ready(record) => HudView::Ready {
                accent,
                specs: record.specs.clone(),
                integrity_score: record.integrity_score,
                integrity_fraction: record.integrity_fraction(),
                status_message: record.status_message.clone(),
            },
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self, HudView::Hidden)
    }
}
