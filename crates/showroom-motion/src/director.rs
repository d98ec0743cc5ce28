//! The transition director.
//!
//! Owns every time-based change of the product display: material uniforms,
//! camera distance and mesh rotation. Triggers are explicit method calls made
//! once per state change; [`TransitionDirector::tick`] samples all tracks.
//!
//! The morph factor is a single last-writer cell: a product pulse, a scan
//! oscillation and a scan relax each replace whatever drove it before.

use glam::Vec2;
use showroom_core::{Color, MaterialUniforms, ProductState};
use tracing::debug;

use crate::oscillator::Oscillator;
use crate::tween::Track;

/// Durations and targets of every transition, in seconds.
pub mod timings {
    use crate::easing::Easing;

    pub const COLOR_DURATION: f32 = 1.5;
    pub const COLOR_EASING: Easing = Easing::Power3InOut;

    pub const SURFACE_DURATION: f32 = 1.2;
    pub const SURFACE_EASING: Easing = Easing::Power1Out;

    pub const MORPH_PULSE_PEAK: f32 = 4.0;
    pub const MORPH_REST: f32 = 0.2;
    pub const MORPH_PULSE_DURATION: f32 = 3.0;
    pub const MORPH_PULSE_EASING: Easing = Easing::elastic_out(1.0, 0.4);

    pub const CAMERA_DURATION: f32 = 2.0;
    pub const CAMERA_EASING: Easing = Easing::ExpoInOut;

    pub const SCAN_MORPH_PEAK: f32 = 2.0;
    pub const SCAN_HALF_PERIOD: f32 = 0.5;
    pub const SCAN_EASING: Easing = Easing::Power1Out;
    pub const SCAN_RELAX_DURATION: f32 = 1.0;
    pub const SCAN_RELAX_EASING: Easing = Easing::Power1Out;

    /// Rotation per tick around (x, y), in radians.
    pub const ROTATION_STEP: (f32, f32) = (0.0005, 0.002);
    pub const SCAN_ROTATION_MULTIPLIER: f32 = 5.0;
}

use self::timings::*;

/// Drives material uniforms, camera distance and rotation over time.
#[derive(Debug, Clone)]
pub struct TransitionDirector {
    state: ProductState,
    uniforms: MaterialUniforms,
    color: Track<Color>,
    accent: Track<Color>,
    metalness: Track<f32>,
    roughness: Track<f32>,
    morph: Track<f32>,
    scan_wave: Oscillator,
    camera_distance: Track<f32>,
    /// Accumulated mesh rotation around x and y.
    rotation: Vec2,
}

impl TransitionDirector {
    /// Create a director showing `state` and immediately play its entry
    /// transition: the camera flies in from `camera_distance` and the morph
    /// pulse fires.
    pub fn mount(state: ProductState, camera_distance: f32, now: f32) -> Self {
        let uniforms = MaterialUniforms::for_product(state);
        let mut director = Self {
            state,
            uniforms,
            color: Track::new(uniforms.color),
            accent: Track::new(uniforms.accent_color),
            metalness: Track::new(uniforms.metalness),
            roughness: Track::new(uniforms.roughness),
            morph: Track::new(uniforms.morph_factor),
            scan_wave: Oscillator::new(),
            camera_distance: Track::new(camera_distance),
            rotation: Vec2::ZERO,
        };
        director.play_transition(now);
        director
    }

    /// Transition to `next`. Returns `false` (and queues nothing) when `next`
    /// is already the active product.
    pub fn on_state_change(&mut self, next: ProductState, now: f32) -> bool {
        if next == self.state {
            return false;
        }
        debug!(from = %self.state, to = %next, now, "product transition");
        self.state = next;
        self.play_transition(now);
        true
    }

    /// Start or stop the scan effect. Returns `false` if nothing changed.
    pub fn on_scan_change(&mut self, scanning: bool, now: f32) -> bool {
        if scanning == self.uniforms.scanning {
            return false;
        }
        self.uniforms.scanning = scanning;
        if scanning {
            let current = self.morph.tick(now);
            self.morph.set(current);
            self.scan_wave.start(current, SCAN_MORPH_PEAK, now, SCAN_HALF_PERIOD, SCAN_EASING);
            debug!(now, from = current, "scan started");
        } else {
            self.settle_scan_wave(now);
            self.morph.animate_to(MORPH_REST, now, SCAN_RELAX_DURATION, SCAN_RELAX_EASING);
            debug!(now, "scan ended");
        }
        true
    }

    /// Drop an in-progress scan without the relax tween. Used when a product
    /// change supersedes the scan.
    pub fn abandon_scan(&mut self, now: f32) {
        if !self.uniforms.scanning {
            return;
        }
        self.uniforms.scanning = false;
        self.settle_scan_wave(now);
        debug!(now, "scan abandoned");
    }

    /// Advance every track to `now` and return the uniforms for this frame.
    pub fn tick(&mut self, now: f32) -> &MaterialUniforms {
        self.uniforms.time = now;
        self.uniforms.color = self.color.tick(now);
        self.uniforms.accent_color = self.accent.tick(now);
        self.uniforms.metalness = self.metalness.tick(now);
        self.uniforms.roughness = self.roughness.tick(now);
        self.uniforms.morph_factor = match self.scan_wave.sample(now) {
            Some(value) => {
                self.morph.set(value);
                value
            }
            None => self.morph.tick(now),
        };
        self.camera_distance.tick(now);

        let (step_x, step_y) = ROTATION_STEP;
        let speed = if self.uniforms.scanning { SCAN_ROTATION_MULTIPLIER } else { 1.0 };
        self.rotation += Vec2::new(step_x, step_y) * speed;

        &self.uniforms
    }

    pub fn state(&self) -> ProductState {
        self.state
    }

    pub fn uniforms(&self) -> &MaterialUniforms {
        &self.uniforms
    }

    pub fn is_scanning(&self) -> bool {
        self.uniforms.scanning
    }

    pub fn camera_distance(&self) -> f32 {
        self.camera_distance.value()
    }

    /// Distance the camera is heading to.
    pub fn camera_target(&self) -> f32 {
        self.camera_distance.target()
    }

    /// Mesh rotation around x and y, in radians.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn scan_wave(&self) -> &Oscillator {
        &self.scan_wave
    }

    fn play_transition(&mut self, now: f32) {
        let config = self.state.config();

        self.color
            .animate_to(MaterialUniforms::target_color(config), now, COLOR_DURATION, COLOR_EASING);
        self.accent
            .animate_to(MaterialUniforms::target_accent(config), now, COLOR_DURATION, COLOR_EASING);
        self.metalness.animate_to(config.metalness, now, SURFACE_DURATION, SURFACE_EASING);
        self.roughness.animate_to(config.roughness, now, SURFACE_DURATION, SURFACE_EASING);
        self.uniforms.vr_mode = self.state.is_vr();

        self.scan_wave.cancel();
        self.morph.animate_from_to(
            MORPH_PULSE_PEAK,
            MORPH_REST,
            now,
            MORPH_PULSE_DURATION,
            MORPH_PULSE_EASING,
        );
        self.uniforms.morph_factor = MORPH_PULSE_PEAK;

        self.camera_distance.animate_to(config.zoom, now, CAMERA_DURATION, CAMERA_EASING);
    }

    fn settle_scan_wave(&mut self, now: f32) {
        if let Some(value) = self.scan_wave.sample(now) {
            self.morph.set(value);
        }
        self.scan_wave.cancel();
    }
}
