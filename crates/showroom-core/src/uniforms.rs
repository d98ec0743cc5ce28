//! Live shader parameters of the product display.

use crate::catalog::{ProductState, StateConfig};
use crate::types::Color;

/// Default vertex displacement scale applied to the morph wave.
pub const DEFAULT_DISPLACEMENT: f32 = 0.5;

/// Mutable per-frame inputs of the procedural material.
///
/// Owned by a single product display. The transition director writes it,
/// the renderer reads a copy of it every frame. Colors are linear.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialUniforms {
    /// Elapsed seconds since the display started.
    pub time: f32,
    pub color: Color,
    pub accent_color: Color,
    /// Amplitude of the displacement wave.
    pub morph_factor: f32,
    pub displacement: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub vr_mode: bool,
    pub scanning: bool,
}

impl MaterialUniforms {
    /// Uniforms at rest for the given product.
    pub fn for_product(state: ProductState) -> Self {
        let config = state.config();
        Self {
            time: 0.0,
            color: config.color.to_linear(),
            accent_color: config.accent_color.to_linear(),
            morph_factor: 0.0,
            displacement: DEFAULT_DISPLACEMENT,
            roughness: config.roughness,
            metalness: config.metalness,
            vr_mode: state.is_vr(),
            scanning: false,
        }
    }

    /// Linear primary color a transition toward `config` should reach.
    pub fn target_color(config: &StateConfig) -> Color {
        config.color.to_linear()
    }

    /// Linear accent color a transition toward `config` should reach.
    pub fn target_accent(config: &StateConfig) -> Color {
        config.accent_color.to_linear()
    }
}
