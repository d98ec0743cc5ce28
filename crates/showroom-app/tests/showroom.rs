use std::sync::Arc;

use showroom_app::{Showroom, ShowroomConfig};
use showroom_core::ProductState;
use showroom_diagnostic::{CannedService, DiagnosticRecord, DiagnosticService, HudView, PanelState, UnavailableService};
use showroom_render_3d::SoftwareRenderer3D;

const RESPONSE: &str = r#"{
    "specs": [
        {"label": "Retina Mesh", "value": "16", "unit": "K"},
        {"label": "Phase Drift", "value": "0.003", "unit": "rad"},
        {"label": "Neural Sync", "value": "98", "unit": "%"}
    ],
    "integrityScore": 93,
    "statusMessage": "Optics aligned."
}"#;

fn config() -> ShowroomConfig {
    let mut config = ShowroomConfig::default();
    config.render.tessellation_segments = 12;
    config
}

fn unavailable() -> Arc<dyn DiagnosticService> {
    Arc::new(UnavailableService)
}

#[test]
fn test_mount_flies_camera_to_product_zoom() {
    let mut showroom = Showroom::new(&config(), 0.0);
    assert_eq!(showroom.state(), ProductState::Eyewear);
    assert_eq!(showroom.director().camera_target(), 6.0);

    let start = showroom.tick(0.0);
    assert!((start.camera_distance - 10.0).abs() < 1e-4);
    let settled = showroom.tick(5.0);
    assert!((settled.camera_distance - 6.0).abs() < 1e-4);
}

#[test]
fn test_select_is_a_state_diff() {
    let mut showroom = Showroom::new(&config(), 0.0);
    assert!(!showroom.select(ProductState::Eyewear, 1.0));
    assert!(showroom.select(ProductState::Headset, 1.0));
    assert!(!showroom.select(ProductState::Headset, 1.5));

    let frame = showroom.tick(5.0);
    assert_eq!(frame.product, ProductState::Headset);
    assert!(frame.uniforms.vr_mode);
    assert_eq!(showroom.director().camera_target(), 6.0);
    assert_eq!(showroom.overlay().id_label, "ID_NEURAL_VISION 3");
}

#[tokio::test]
async fn test_unavailable_service_yields_fallback() {
    let mut showroom = Showroom::new(&config(), 0.0);
    assert!(showroom.run_diagnostic(unavailable(), 1.0));
    assert!(showroom.is_scanning());
    assert!(showroom.panel().is_loading());
    assert!(matches!(showroom.hud(), HudView::Loading { .. }));

    // Only one diagnostic at a time.
    assert!(!showroom.run_diagnostic(unavailable(), 1.1));

    showroom.await_diagnostic(2.0).await;
    assert!(!showroom.is_scanning());
    assert_eq!(showroom.panel().record(), Some(&DiagnosticRecord::fallback()));
}

#[tokio::test]
async fn test_service_response_shown_verbatim() {
    let mut showroom = Showroom::new(&config(), 0.0);
    showroom.select(ProductState::Headset, 0.0);
    assert!(showroom.run_diagnostic(Arc::new(CannedService::new(RESPONSE)), 1.0));
    showroom.await_diagnostic(2.0).await;

    match showroom.hud() {
        HudView::Ready { accent, specs, integrity_score, status_message, .. } => {
            assert_eq!(accent, "#A855F7");
            assert_eq!(specs[0].label, "Retina Mesh");
            assert_eq!(integrity_score, 93.0);
            assert_eq!(status_message, "Optics aligned.");
        }
        other => panic!("expected ready HUD, got {other:?}"),
    }

    // A new request clears the previous record while loading.
    assert!(showroom.run_diagnostic(unavailable(), 3.0));
    assert_eq!(showroom.panel().record(), None);
}

#[tokio::test]
async fn test_tick_polls_without_blocking() {
    let mut showroom = Showroom::new(&config(), 0.0);
    showroom.run_diagnostic(Arc::new(CannedService::new(RESPONSE)), 1.0);

    // The single-threaded test runtime has not run the request yet.
    let frame = showroom.tick(1.0);
    assert!(frame.scanning);
    assert_eq!(frame.bloom_intensity, 2.5);

    for _ in 0..100 {
        if !showroom.panel().is_loading() {
            break;
        }
        tokio::task::yield_now().await;
        showroom.poll_diagnostic(1.2);
    }
    assert!(!showroom.panel().is_loading());
    assert_eq!(showroom.panel().record().map(|r| r.integrity_score), Some(93.0));

    let frame = showroom.tick(1.3);
    assert!(!frame.scanning);
    assert_eq!(frame.bloom_intensity, 1.2);
}

#[tokio::test]
async fn test_selection_abandons_scan() {
    let mut showroom = Showroom::new(&config(), 0.0);
    assert!(showroom.run_diagnostic(Arc::new(CannedService::new(RESPONSE)), 1.0));
    showroom.tick(1.2);

    assert!(showroom.select(ProductState::Apparel, 1.5));
    assert!(!showroom.is_scanning());
    assert!(!showroom.director().scan_wave().is_running());
    assert_eq!(showroom.panel().state(), &PanelState::Idle);
    assert_eq!(showroom.hud(), HudView::Hidden);

    // The abandoned response never lands.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    showroom.await_diagnostic(2.0).await;
    let frame = showroom.tick(2.0);
    assert!(!frame.scanning);
    assert_eq!(showroom.panel().record(), None);

    // The trigger is available again.
    assert!(showroom.run_diagnostic(unavailable(), 2.5));
}

#[test]
fn test_scene_and_render() {
    let mut config = config();
    config.scene.fov = 50.0;
    config.scene.marker_count = 4;
    let mut showroom = Showroom::new(&config, 0.0);
    showroom.tick(0.5);

    let scene = showroom.compose_scene();
    assert_eq!(scene.camera.fov, 50.0);
    assert!(scene.object("product").is_some());
    assert_eq!(scene.objects.iter().filter(|o| o.name == "marker").count(), 4);

    let mut renderer = SoftwareRenderer3D::new(48, 32).unwrap();
    let pixels = renderer.render(&scene);
    assert_eq!(pixels.len(), 48 * 32 * 4);
    assert!(pixels.chunks(4).all(|p| p[3] == 255));
}

#[test]
fn test_markers_spin_each_tick() {
    let mut showroom = Showroom::new(&config(), 0.0);
    showroom.tick(0.0);
    showroom.tick(0.1);
    let spin = showroom.markers().markers()[0].spin;
    assert!((spin - 0.04).abs() < 1e-6);
}
