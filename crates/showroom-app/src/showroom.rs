//! The showroom controller.
//!
//! Owns the active product and everything that reacts to it. Each trigger
//! (product selection, scan start, scan end) is an explicit state diff, so a
//! transition fires exactly once per change.

use std::sync::Arc;

use serde::Serialize;
use showroom_core::{DiagnosticError, MaterialUniforms, ProductState};
use showroom_diagnostic::{
    run_diagnostic, DiagnosticPanel, DiagnosticRecord, DiagnosticRequest, DiagnosticService, HudView, Ticket,
};
use showroom_motion::TransitionDirector;
use showroom_render_3d::{compose_scene, MeshLibrary, OrbitField, PostSettings, Scene3D, SceneInput};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ShowroomConfig;
use crate::overlay::Overlay;

/// Snapshot of the animated state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameState {
    pub time: f32,
    pub product: ProductState,
    pub uniforms: MaterialUniforms,
    pub camera_distance: f32,
    /// Product rotation around x and y.
    pub rotation: [f32; 2],
    pub scanning: bool,
    pub bloom_intensity: f32,
}

/// A diagnostic request running on the tokio runtime.
struct PendingDiagnostic {
    ticket: Ticket,
    receiver: oneshot::Receiver<DiagnosticRecord>,
    task: JoinHandle<()>,
}

pub struct Showroom {
    director: TransitionDirector,
    panel: DiagnosticPanel,
    pending: Option<PendingDiagnostic>,
    markers: OrbitField,
    meshes: MeshLibrary,
    post: PostSettings,
    fov: f32,
}

impl Showroom {
    /// Mount the showroom at `now`, playing the entry transition.
    pub fn new(config: &ShowroomConfig, now: f32) -> Self {
        let scene = &config.scene;
        info!(product = %scene.initial_product, "Mounting showroom");
        Self {
            director: TransitionDirector::mount(scene.initial_product, scene.initial_camera_distance, now),
            panel: DiagnosticPanel::new(),
            pending: None,
            markers: OrbitField::seeded(scene.marker_count, scene.marker_seed),
            meshes: MeshLibrary::new(&config.render.tessellation()),
            post: config.post,
            fov: scene.fov,
        }
    }

    pub fn state(&self) -> ProductState {
        self.director.state()
    }

    pub fn is_scanning(&self) -> bool {
        self.director.is_scanning()
    }

    pub fn panel(&self) -> &DiagnosticPanel {
        &self.panel
    }

    pub fn director(&self) -> &TransitionDirector {
        &self.director
    }

    pub fn markers(&self) -> &OrbitField {
        &self.markers
    }

    /// Show `next`. Returns `false` if it is already on display.
    ///
    /// Clears the diagnostic record and abandons a running scan; its
    /// response, if it still arrives, is discarded.
    pub fn select(&mut self, next: ProductState, now: f32) -> bool {
        if next == self.director.state() {
            return false;
        }
        info!(from = %self.director.state(), to = %next, "Selecting product");

        self.panel.clear();
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
        self.director.abandon_scan(now);
        self.director.on_state_change(next, now)
    }

    /// Start a diagnostic of the active product on the current tokio runtime.
    ///
    /// Returns `false` while one is already in flight, or when called outside
    /// a runtime; neither case starts a scan.
    pub fn run_diagnostic(&mut self, service: Arc<dyn DiagnosticService>, now: f32) -> bool {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(error) => {
                warn!(%error, "No tokio runtime, diagnostic not started");
                return false;
            }
        };
        let product = self.director.state();
        let Some(ticket) = self.panel.begin(product) else {
            return false;
        };
        self.director.on_scan_change(true, now);

        let (sender, receiver) = oneshot::channel();
        let request = DiagnosticRequest::for_product(product);
        let task = handle.spawn(async move {
            let record = run_diagnostic(service.as_ref(), &request).await;
            // The receiver is gone when the product changed meanwhile.
            let _ = sender.send(record);
        });
        self.pending = Some(PendingDiagnostic { ticket, receiver, task });
        true
    }

    /// Collect a finished diagnostic without blocking.
    pub fn poll_diagnostic(&mut self, now: f32) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let record = match pending.receiver.try_recv() {
            Ok(record) => record,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Closed) => abandoned(),
        };
        let ticket = pending.ticket;
        self.pending = None;
        self.finish_diagnostic(ticket, record, now);
    }

    /// Wait for the diagnostic in flight, if any, and apply it.
    pub async fn await_diagnostic(&mut self, now: f32) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let record = match pending.receiver.await {
            Ok(record) => record,
            Err(_) => abandoned(),
        };
        self.finish_diagnostic(pending.ticket, record, now);
    }

    fn finish_diagnostic(&mut self, ticket: Ticket, record: DiagnosticRecord, now: f32) {
        if self.panel.complete(ticket, record) {
            self.director.on_scan_change(false, now);
        }
    }

    /// Advance the showroom to `now`.
    pub fn tick(&mut self, now: f32) -> FrameState {
        self.poll_diagnostic(now);
        self.markers.advance();
        let uniforms = *self.director.tick(now);
        let rotation = self.director.rotation();
        FrameState {
            time: now,
            product: self.director.state(),
            uniforms,
            camera_distance: self.director.camera_distance(),
            rotation: [rotation.x, rotation.y],
            scanning: uniforms.scanning,
            bloom_intensity: self.post.bloom_intensity_for(uniforms.scanning),
        }
    }

    /// Scene for the state reached by the last [`tick`](Self::tick).
    pub fn compose_scene(&self) -> Scene3D {
        let input = SceneInput {
            state: self.director.state(),
            uniforms: *self.director.uniforms(),
            camera_distance: self.director.camera_distance(),
            rotation: self.director.rotation(),
        };
        let mut scene = compose_scene(&input, &self.meshes, &self.markers, &self.post);
        scene.camera.fov = self.fov;
        scene
    }

    pub fn overlay(&self) -> Overlay {
        Overlay::new(self.director.state())
    }

    pub fn hud(&self) -> HudView {
        HudView::new(&self.panel, self.director.state())
    }
}

fn abandoned() -> DiagnosticRecord {
    let error = DiagnosticError::Abandoned;
    warn!(%error, "Using fallback record");
    DiagnosticRecord::fallback()
}

impl Drop for Showroom {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}
