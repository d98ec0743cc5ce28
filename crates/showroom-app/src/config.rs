//! Showroom configuration.
//!
//! Loaded from JSON. Every field has a default, so a file only needs the
//! values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use showroom_core::{ConfigError, ProductState};
use showroom_render_3d::{PostSettings, TessellationOptions, MARKER_COUNT, MAX_VIEWPORT};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowroomConfig {
    pub render: RenderConfig,
    pub scene: SceneConfig,
    pub post: PostSettings,
}

/// Output frame sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub frames: u32,
    /// Segments around curved surfaces.
    pub tessellation_segments: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { width: 960, height: 540, fps: 30, frames: 90, tessellation_segments: 48 }
    }
}

impl RenderConfig {
    pub fn tessellation(&self) -> TessellationOptions {
        TessellationOptions {
            curve_segments: self.tessellation_segments,
            face_segments: (self.tessellation_segments / 3).max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub initial_product: ProductState,
    pub marker_count: usize,
    /// Seed of the orbit marker parameters.
    pub marker_seed: u64,
    /// Camera distance the mount transition starts from.
    pub initial_camera_distance: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            initial_product: ProductState::Eyewear,
            marker_count: MARKER_COUNT,
            marker_seed: 0x5eed,
            initial_camera_distance: 10.0,
            fov: 45.0,
        }
    }
}

impl ShowroomConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Malformed { reason: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let render = &self.render;
        dimension("render.width", render.width)?;
        dimension("render.height", render.height)?;
        positive("render.fps", render.fps)?;
        if !(8..=128).contains(&render.tessellation_segments) {
            return Err(invalid("render.tessellation_segments", "must be between 8 and 128"));
        }

        let scene = &self.scene;
        if !(scene.initial_camera_distance.is_finite() && scene.initial_camera_distance > 0.0) {
            return Err(invalid("scene.initial_camera_distance", "must be a positive number"));
        }
        if !(scene.fov > 0.0 && scene.fov < 180.0) {
            return Err(invalid("scene.fov", "must be between 0 and 180 degrees"));
        }

        let post = &self.post;
        non_negative("post.bloom_threshold", post.bloom_threshold)?;
        non_negative("post.bloom_radius", post.bloom_radius)?;
        non_negative("post.bloom_intensity", post.bloom_intensity)?;
        non_negative("post.bloom_scanning_intensity", post.bloom_scanning_intensity)?;
        non_negative("post.vignette_offset", post.vignette_offset)?;
        non_negative("post.vignette_darkness", post.vignette_darkness)?;
        if !(0.0..=1.0).contains(&post.noise_opacity) {
            return Err(invalid("post.noise_opacity", "must be between 0 and 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.to_string(), reason: reason.to_string() }
}

fn positive(field: &str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(())
}

fn dimension(field: &str, value: u32) -> Result<(), ConfigError> {
    positive(field, value)?;
    if value > MAX_VIEWPORT {
        return Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("must be at most {MAX_VIEWPORT} pixels"),
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(field, "must be a non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ShowroomConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scene.marker_count, 15);
        assert_eq!(config.scene.fov, 45.0);
        assert_eq!(config.post, PostSettings::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ShowroomConfig::from_json(
            r#"{
                "render": { "width": 320, "height": 180 },
                "scene": { "initial_product": "HEADSET" },
                "post": { "noise_opacity": 0.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.fps, 30);
        assert_eq!(config.scene.initial_product, ProductState::Headset);
        assert_eq!(config.post.noise_opacity, 0.0);
        assert_eq!(config.post.bloom_intensity, 1.2);
    }

    #[test]
    fn test_invalid_values() {
        let err = ShowroomConfig::from_json(r#"{"render": {"fps": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "render.fps"));

        let err = ShowroomConfig::from_json(r#"{"render": {"width": 65536, "height": 65536}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "render.width"));

        let err = ShowroomConfig::from_json(r#"{"post": {"noise_opacity": 2.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "post.noise_opacity"));

        let err = ShowroomConfig::from_json(r#"{"scene": {"fov": 190}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "scene.fov"));
    }

    #[test]
    fn test_unknown_product_is_malformed() {
        let err = ShowroomConfig::from_json(r#"{"scene": {"initial_product": "HOVERBOARD"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShowroomConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showroom.json");
        std::fs::write(&path, r#"{"render": {"frames": 12}}"#).unwrap();
        assert_eq!(ShowroomConfig::load(&path).unwrap().render.frames, 12);
    }
}
