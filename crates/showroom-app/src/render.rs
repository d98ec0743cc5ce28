//! Offline rendering of a scripted showroom session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use showroom_core::{ProductState, ShowroomError};
use showroom_diagnostic::{DiagnosticService, HudView};
use showroom_export::{FrameSequence, Manifest};
use showroom_render_3d::SoftwareRenderer3D;
use tracing::{debug, info};

use crate::config::ShowroomConfig;
use crate::overlay::Overlay;
use crate::showroom::{FrameState, Showroom};

/// A product selection at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub product: ProductState,
    pub at: f32,
}

/// User input replayed while rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScript {
    pub selections: Vec<Selection>,
    /// Time the diagnostic scan is triggered, if at all.
    pub scan_at: Option<f32>,
    /// Seconds after the trigger at which the service response is applied.
    pub scan_latency: f32,
}

impl Default for RenderScript {
    fn default() -> Self {
        Self { selections: Vec::new(), scan_at: None, scan_latency: 1.5 }
    }
}

/// Per-frame manifest payload.
#[derive(Debug, Clone, Serialize)]
pub struct FrameInfo {
    pub state: FrameState,
    pub overlay: Overlay,
    pub hud: HudView,
}

/// Render `config.render.frames` frames of a scripted session into `out`.
///
/// On a current-thread runtime the diagnostic only progresses while it is
/// awaited, which happens `scan_latency` seconds after the trigger. That
/// keeps the frame sequence reproducible.
pub async fn render_sequence(
    config: &ShowroomConfig,
    script: &RenderScript,
    service: Arc<dyn DiagnosticService>,
    out: &Path,
) -> Result<(PathBuf, Manifest<FrameInfo>), ShowroomError> {
    config.validate()?;
    let (width, height, fps) = (config.render.width, config.render.height, config.render.fps);

    let mut selections = script.selections.clone();
    selections.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut selections = selections.into_iter().peekable();

    let mut showroom = Showroom::new(config, 0.0);
    let mut renderer = SoftwareRenderer3D::new(width, height)?;
    let mut sequence = FrameSequence::create(out, width, height, fps)?;

    info!(frames = config.render.frames, width, height, out = %out.display(), "Rendering showroom");

    let mut scan_requested = false;
    let mut answer_at: Option<f32> = None;

    for frame in 0..config.render.frames {
        let now = frame as f32 / fps as f32;

        while let Some(selection) = selections.next_if(|s| s.at <= now) {
            showroom.select(selection.product, now);
        }

        if let Some(scan_at) = script.scan_at {
            if !scan_requested && now >= scan_at {
                scan_requested = true;
                if showroom.run_diagnostic(Arc::clone(&service), now) {
                    answer_at = Some(now + script.scan_latency);
                }
            }
        }
        if answer_at.is_some_and(|at| now >= at) {
            answer_at = None;
            showroom.await_diagnostic(now).await;
        }

        let state = showroom.tick(now);
        let scene = showroom.compose_scene();
        let pixels = renderer.render(&scene);
        sequence.push(pixels, FrameInfo { state, overlay: showroom.overlay(), hud: showroom.hud() })?;
        debug!(frame, product = %state.product, scanning = state.scanning, "Frame rendered");
    }

    let (manifest_path, manifest) = sequence.finish()?;
    info!(frames = manifest.frame_count, manifest = %manifest_path.display(), "Done");
    Ok((manifest_path, manifest))
}
