//! Procedural product material and scene lights.
//!
//! The product surface is not textured: every fragment color is computed
//! from its position, normal and UV plus the current [`MaterialUniforms`].
//! Decor objects use flat unlit colors instead.

use glam::{Vec2, Vec3};
use showroom_core::{Color, MaterialUniforms};

use crate::noise::{fract, smoothstep, value_noise};

/// How the renderer colors an object's fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// The procedural product material, with vertex displacement.
    Procedural,
    /// Unlit color blended over the frame with the given opacity.
    Unlit { color: Color, opacity: f32 },
    /// Black with opacity fading from the center of the object to `radius`.
    ContactShadow { opacity: f32, radius: f32 },
}

/// A light source.
///
/// The procedural material and the unlit decor do not sample lights; they are
/// scene data carried into frame manifests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Light {
    /// Point light.
    Point {
        position: [f32; 3],
        color: Color,
        intensity: f32,
    },
    /// Spot light aimed at `target`.
    Spot {
        position: [f32; 3],
        target: [f32; 3],
        color: Color,
        intensity: f32,
        /// Cone half-angle in radians.
        angle: f32,
        /// Fraction of the cone that fades out.
        penumbra: f32,
    },
    /// Ambient light.
    Ambient {
        color: Color,
        intensity: f32,
    },
}

impl Light {
    /// Create a point light.
    pub fn point(position: [f32; 3], color: Color, intensity: f32) -> Self {
        Light::Point { position, color, intensity }
    }

    /// Create a spot light aimed at the origin.
    pub fn spot(position: [f32; 3], color: Color, intensity: f32, angle: f32, penumbra: f32) -> Self {
        Light::Spot { position, target: [0.0; 3], color, intensity, angle, penumbra }
    }

    /// Create an ambient light.
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Point { intensity, .. }
            | Light::Spot { intensity, .. }
            | Light::Ambient { intensity, .. } => *intensity,
        }
    }
}

/// Per-fragment geometry fed to [`shade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingInput {
    /// Undisplaced object-space position; all patterns live in this space.
    pub position: Vec3,
    pub world_position: Vec3,
    /// World-space unit normal.
    pub normal: Vec3,
    pub uv: Vec2,
    pub camera_position: Vec3,
}

/// Temporal multipliers of the emissive glow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissiveLayers {
    pub breathe: f32,
    pub flicker: f32,
    /// Applied to the summed mask intensity.
    pub intensity_scale: f32,
}

/// Breathing and flicker at time `t`. Scanning swaps in a faster, deeper
/// modulation and doubles the emissive intensity.
pub fn emissive_layers(t: f32, scanning: bool) -> EmissiveLayers {
    if scanning {
        EmissiveLayers {
            breathe: 1.0 + 0.5 * (t * 10.0).sin(),
            flicker: 0.8 + 0.2 * (t * 120.0).sin(),
            intensity_scale: 2.0,
        }
    } else {
        EmissiveLayers {
            breathe: 0.6 + 0.4 * (t * 1.2).sin(),
            flicker: 0.96 + 0.04 * (t * 60.0).sin(),
            intensity_scale: 1.0,
        }
    }
}

/// Edge brightening: 0 facing the viewer, 1 at grazing angles.
pub fn fresnel(normal: Vec3, view_dir: Vec3) -> f32 {
    (1.0 - normal.dot(view_dir).max(0.0)).powi(3)
}

/// Panel-line mask in [0, 1].
///
/// VR mode draws a 12x6 grid in UV space. Otherwise horizontal bands scroll
/// up the object at 30% strength.
pub fn panel_lines(position: Vec3, uv: Vec2, t: f32, vr_mode: bool) -> f32 {
    if vr_mode {
        let gx = (fract(uv.x * 12.0 - 0.5) - 0.5).abs();
        let gy = (fract(uv.y * 6.0 - 0.5) - 0.5).abs();
        smoothstep(0.46, 0.5, gx.max(gy))
    } else {
        let band = (fract(position.y * 6.0 - t * 0.2) - 0.5).abs();
        smoothstep(0.46, 0.5, band) * 0.3
    }
}

/// Offset a product vertex along its normal by the morph wave.
pub fn displace(position: Vec3, normal: Vec3, uniforms: &MaterialUniforms) -> Vec3 {
    let wave = (position.y * 2.5 + uniforms.time).sin() * 0.08 * uniforms.morph_factor;
    position + normal * wave * uniforms.displacement
}

#[inline]
fn rgb(color: Color) -> Vec3 {
    Vec3::from(color.to_array())
}

/// Linear RGB of the product surface at one fragment.
pub fn shade(input: &ShadingInput, uniforms: &MaterialUniforms) -> Vec3 {
    let t = uniforms.time;
    let normal = input.normal.normalize_or_zero();
    let view_dir = (input.camera_position - input.world_position).normalize_or_zero();

    let edge = fresnel(normal, view_dir);
    let grain = value_noise(input.position * 30.0 + Vec3::splat(t * 0.05)) * 0.1;
    let panels = panel_lines(input.position, input.uv, t, uniforms.vr_mode);

    let activity = smoothstep(0.75, 1.0, value_noise(input.position * 8.0 + Vec3::splat(t * 0.5)));
    let ring = smoothstep(0.97, 1.0, (input.position.y * 12.0 - t * 3.0).sin());

    let layers = emissive_layers(t, uniforms.scanning);
    let intensity = (panels * 4.0 + activity * 2.0 + ring * 6.0) * layers.intensity_scale;
    let emission = rgb(uniforms.accent_color) * intensity * layers.breathe * layers.flicker;

    let base = rgb(uniforms.color) + Vec3::splat(grain * (1.0 - uniforms.roughness));

    // Reflect the eye ray and compare it against a light straight overhead.
    let incident = -view_dir;
    let reflected = incident - 2.0 * incident.dot(normal) * normal;
    let specular = reflected.dot(Vec3::Y).max(0.0).powi(40);
    let reflection = (edge + specular * uniforms.metalness) * (1.2 - uniforms.roughness);

    base + Vec3::splat(reflection) + emission
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use showroom_core::ProductState;

    fn facing_camera(position: Vec3) -> ShadingInput {
        ShadingInput {
            position,
            world_position: position,
            normal: Vec3::Z,
            uv: Vec2::ZERO,
            camera_position: Vec3::new(position.x, position.y, 10.0),
        }
    }

    #[test]
    fn test_fresnel_head_on_and_grazing() {
        assert_eq!(fresnel(Vec3::Z, Vec3::Z), 0.0);
        assert_eq!(fresnel(Vec3::Z, Vec3::X), 1.0);
        assert_eq!(fresnel(Vec3::Z, -Vec3::Z), 1.0);
    }

    #[test]
    fn test_emissive_layers_at_rest() {
        let calm = emissive_layers(0.0, false);
        assert!((calm.breathe - 0.6).abs() < 1e-6);
        assert!((calm.flicker - 0.96).abs() < 1e-6);
        assert_eq!(calm.intensity_scale, 1.0);

        let scan = emissive_layers(0.0, true);
        assert!((scan.breathe - 1.0).abs() < 1e-6);
        assert!((scan.flicker - 0.8).abs() < 1e-6);
        assert_eq!(scan.intensity_scale, 2.0);
    }

    #[test]
    fn test_vr_grid_lines_sit_between_cells() {
        // Cell borders fall at uv = (k + 0.5) / 12 horizontally.
        let on_line = panel_lines(Vec3::ZERO, Vec2::new(0.5 / 12.0, 0.3), 0.0, true);
        let mid_cell = panel_lines(Vec3::ZERO, Vec2::new(0.0, 0.0), 0.0, true);
        assert!(on_line > 0.99, "{on_line}");
        assert_eq!(mid_cell, 0.0);
    }

    #[test]
    fn test_bands_are_dimmer_than_grid() {
        let band = panel_lines(Vec3::ZERO, Vec2::ZERO, 0.0, false);
        assert!((band - 0.3).abs() < 1e-6);
        let between = panel_lines(Vec3::new(0.0, 0.5 / 6.0, 0.0), Vec2::ZERO, 0.0, false);
        assert_eq!(between, 0.0);
    }

    #[test]
    fn test_no_displacement_without_morph() {
        let mut uniforms = MaterialUniforms::for_product(ProductState::Apparel);
        let p = Vec3::new(0.3, 1.1, 0.25);
        assert_eq!(displace(p, Vec3::Z, &uniforms), p);

        uniforms.morph_factor = 4.0;
        uniforms.time = 0.7;
        let moved = displace(p, Vec3::Z, &uniforms);
        let expected = (1.1_f32 * 2.5 + 0.7).sin() * 0.08 * 4.0 * 0.5;
        assert!((moved.z - p.z - expected).abs() < 1e-6);
        assert_eq!(moved.x, p.x);
    }

    #[test]
    fn test_scanning_doubles_emission_under_same_modulation() {
        let input = facing_camera(Vec3::new(0.4, 0.0, 0.2));
        let mut uniforms = MaterialUniforms::for_product(ProductState::Eyewear);
        uniforms.time = 0.0;

        let emission_of = |u: &MaterialUniforms| {
            let mut dark = *u;
            dark.accent_color = Color::BLACK;
            shade(&input, u) - shade(&input, &dark)
        };

        let calm = emission_of(&uniforms);
        uniforms.scanning = true;
        let scanning = emission_of(&uniforms);

        // At t = 0: calm 0.6 * 0.96, scanning 2 * 1.0 * 0.8.
        let ratio = (2.0 * 1.0 * 0.8) / (0.6 * 0.96);
        assert!(calm.x > 0.0);
        assert!((scanning.x / calm.x - ratio).abs() < 1e-3);
    }

    #[test]
    fn test_base_color_shows_through_on_matte_surface() {
        let mut uniforms = MaterialUniforms::for_product(ProductState::Apparel);
        uniforms.accent_color = Color::BLACK;
        uniforms.roughness = 1.0;
        uniforms.metalness = 0.0;

        let out = shade(&facing_camera(Vec3::new(0.1, 0.2, 0.25)), &uniforms);
        let base = rgb(uniforms.color);
        // Head-on and fully rough: no fresnel, grain or specular.
        assert!((out - base).abs().max_element() < 1e-5, "{out} vs {base}");
    }

    #[test]
    fn test_light_intensity_accessor() {
        assert_eq!(Light::ambient(Color::WHITE, 0.2).intensity(), 0.2);
        assert_eq!(Light::point([0.0; 3], Color::WHITE, 1.5).intensity(), 1.5);
    }

    proptest! {
        #[test]
        fn shade_is_finite(
            x in -3.0f32..3.0, y in -3.0f32..3.0, z in -3.0f32..3.0,
            t in 0.0f32..100.0, scanning in any::<bool>(), idx in 0usize..4,
        ) {
            let mut uniforms = MaterialUniforms::for_product(ProductState::ALL[idx]);
            uniforms.time = t;
            uniforms.scanning = scanning;
            uniforms.morph_factor = 2.0;
            let out = shade(&facing_camera(Vec3::new(x, y, z)), &uniforms);
            prop_assert!(out.is_finite());
            prop_assert!(out.min_element() >= 0.0);
        }
    }
}
