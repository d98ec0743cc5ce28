//! Rendering for the Showroom engine.
//!
//! This crate provides:
//! - Product and decor geometry with tessellation to triangle meshes
//! - Value noise and the procedural product material
//! - Scene composition (camera, lights, product, orbit markers, floor grid)
//! - Software rasterizer with depth buffer
//! - Post-processing chain (bloom, film grain, vignette)

mod geometry;
mod tessellation;
mod noise;
mod material;
mod scene;
mod renderer;
mod post;

pub use geometry::{Mesh, Shape, ShapeKind};
pub use tessellation::{tessellate_with_options, TessellationOptions};
pub use noise::{hash, smoothstep, value_noise};
pub use material::{
    displace, emissive_layers, fresnel, panel_lines, shade, EmissiveLayers, Light, Shading,
    ShadingInput,
};
pub use scene::{
    compose_scene, Camera, GridFloor, MeshLibrary, OrbitField, OrbitMarker, Scene3D,
    SceneInput, SceneObject, FLOOR_Y, MARKER_COUNT, MARKER_SPIN_STEP,
};
pub use renderer::{SoftwareRenderer3D, MAX_VIEWPORT};
pub use post::PostSettings;
