//! 3D software renderer with depth buffer.
//!
//! Fragments accumulate in a linear HDR buffer. Post-processing runs on that
//! buffer, and only the final resolve converts to sRGB bytes.

use glam::{Mat4, Vec2, Vec3, Vec4};
use showroom_core::{Color, MaterialUniforms, RenderError};

use crate::material::{displace, shade, Shading, ShadingInput};
use crate::post;
use crate::scene::{GridFloor, Scene3D, SceneObject};

/// Largest accepted width or height, in pixels.
pub const MAX_VIEWPORT: u32 = 16_384;

/// Triangles or line ends closer than this to the eye are dropped or clipped.
const NEAR_W: f32 = 1e-3;

/// A mesh vertex after the vertex stage.
#[derive(Debug, Clone, Copy)]
struct Vertex {
    /// Pixel x, pixel y, NDC depth.
    screen: Vec3,
    w: f32,
    world: Vec3,
    normal: Vec3,
    /// Undisplaced object-space position.
    local: Vec3,
    uv: Vec2,
}

/// 3D software renderer.
pub struct SoftwareRenderer3D {
    width: u32,
    height: u32,
    hdr: Vec<Vec3>,
    color_buffer: Vec<u8>,
    depth_buffer: Vec<f32>,
}

impl SoftwareRenderer3D {
    /// Create a new software renderer.
    ///
    /// Both sides must be in `1..=MAX_VIEWPORT`.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let invalid = || RenderError::InvalidViewport { width, height };
        if width == 0 || height == 0 || width > MAX_VIEWPORT || height > MAX_VIEWPORT {
            return Err(invalid());
        }
        let pixels = (width as usize).checked_mul(height as usize).ok_or_else(invalid)?;
        let bytes = pixels.checked_mul(4).ok_or_else(invalid)?;
        Ok(Self {
            width,
            height,
            hdr: vec![Vec3::ZERO; pixels],
            color_buffer: vec![0; bytes],
            depth_buffer: vec![f32::INFINITY; pixels],
        })
    }

    /// Clear the buffers.
    pub fn clear(&mut self, color: Color) {
        self.hdr.fill(Vec3::new(color.r, color.g, color.b));
        self.depth_buffer.fill(f32::INFINITY);
    }

    /// Render a scene and return the RGBA8 frame.
    pub fn render(&mut self, scene: &Scene3D) -> &[u8] {
        self.clear(scene.background);

        let aspect = self.width as f32 / self.height as f32;
        let view_proj = scene.camera.projection_matrix(aspect) * scene.camera.view_matrix();
        let camera_pos = scene.camera.position();

        let (translucent, opaque): (Vec<&SceneObject>, Vec<&SceneObject>) =
            scene.objects.iter().partition(|o| o.is_translucent());

        for obj in opaque {
            self.render_object(obj, &view_proj, camera_pos, &scene.uniforms);
        }

        if let Some(grid) = &scene.grid {
            self.render_grid(grid, &view_proj);
        }

        // Back to front, like any alpha-blended pass.
        let mut translucent = translucent;
        translucent.sort_by(|a, b| {
            let da = (a.transform.w_axis.truncate() - camera_pos).length_squared();
            let db = (b.transform.w_axis.truncate() - camera_pos).length_squared();
            db.total_cmp(&da)
        });
        for obj in translucent {
            self.render_object(obj, &view_proj, camera_pos, &scene.uniforms);
        }

        post::apply_chain(
            &scene.post,
            scene.bloom_intensity,
            &mut self.hdr,
            self.width,
            self.height,
            scene.uniforms.time,
        );

        self.resolve();
        &self.color_buffer
    }

    /// Gamma-correct and quantize the HDR buffer into the color buffer.
    fn resolve(&mut self) {
        for (px, c) in self.color_buffer.chunks_exact_mut(4).zip(&self.hdr) {
            let c = c.clamp(Vec3::ZERO, Vec3::ONE);
            let (r, g, b, _) = Color::rgb(c.x, c.y, c.z).to_srgb().to_rgba8();
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn render_object(
        &mut self,
        obj: &SceneObject,
        view_proj: &Mat4,
        camera_pos: Vec3,
        uniforms: &MaterialUniforms,
    ) {
        let mesh = &obj.mesh;
        if mesh.indices.is_empty() {
            return;
        }

        let procedural = matches!(obj.shading, Shading::Procedural);
        let normal_matrix = obj.transform.inverse().transpose();

        let vertices: Vec<Vertex> = mesh
            .vertices
            .iter()
            .enumerate()
            .map(|(i, &local)| {
                let normal = mesh.normals.get(i).copied().unwrap_or(Vec3::Y);
                let uv = mesh.uvs.get(i).copied().unwrap_or(Vec2::ZERO);
                let moved = if procedural { displace(local, normal, uniforms) } else { local };
                let world = obj.transform.transform_point3(moved);
                let clip = *view_proj * world.extend(1.0);
                Vertex {
                    screen: self.clip_to_screen(clip),
                    w: clip.w,
                    world,
                    normal: normal_matrix.transform_vector3(normal).normalize_or_zero(),
                    local,
                    uv,
                }
            })
            .collect();

        for tri in mesh.indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (
                vertices.get(tri[0] as usize),
                vertices.get(tri[1] as usize),
                vertices.get(tri[2] as usize),
            ) else {
                continue;
            };

            // Simple near-plane rejection
            if a.w <= NEAR_W || b.w <= NEAR_W || c.w <= NEAR_W {
                continue;
            }

            self.rasterize_triangle([a, b, c], &obj.shading, uniforms, camera_pos);
        }
    }

    /// Convert clip coordinates to pixel coordinates plus NDC depth.
    fn clip_to_screen(&self, clip: Vec4) -> Vec3 {
        let ndc = clip.truncate() / clip.w;
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32, // Flip Y
            ndc.z,
        )
    }

    /// Rasterize a single triangle.
    fn rasterize_triangle(
        &mut self,
        [v0, v1, v2]: [&Vertex; 3],
        shading: &Shading,
        uniforms: &MaterialUniforms,
        camera_pos: Vec3,
    ) {
        let (s0, s1, s2) = (v0.screen, v1.screen, v2.screen);

        // Get bounding box
        let min_x = s0.x.min(s1.x).min(s2.x).max(0.0) as i32;
        let max_x = s0.x.max(s1.x).max(s2.x).min(self.width as f32 - 1.0) as i32;
        let min_y = s0.y.min(s1.y).min(s2.y).max(0.0) as i32;
        let max_y = s0.y.max(s1.y).max(s2.y).min(self.height as f32 - 1.0) as i32;

        // Compute edge function denominator
        let area = edge_function(s0.truncate(), s1.truncate(), s2.truncate());
        if area.abs() < 0.0001 {
            return; // Degenerate triangle
        }
        let inv_area = 1.0 / area;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                let w0 = edge_function(s1.truncate(), s2.truncate(), p);
                let w1 = edge_function(s2.truncate(), s0.truncate(), p);
                let w2 = edge_function(s0.truncate(), s1.truncate(), p);

                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if !inside {
                    continue;
                }

                let (b0, b1, b2) = (w0 * inv_area, w1 * inv_area, w2 * inv_area);
                let depth = s0.z * b0 + s1.z * b1 + s2.z * b2;

                let idx = self.index(x as usize, y as usize);
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                match *shading {
                    Shading::Procedural => {
                        self.depth_buffer[idx] = depth;
                        let input = ShadingInput {
                            position: v0.local * b0 + v1.local * b1 + v2.local * b2,
                            world_position: v0.world * b0 + v1.world * b1 + v2.world * b2,
                            normal: (v0.normal * b0 + v1.normal * b1 + v2.normal * b2).normalize_or_zero(),
                            uv: v0.uv * b0 + v1.uv * b1 + v2.uv * b2,
                            camera_position: camera_pos,
                        };
                        self.hdr[idx] = shade(&input, uniforms);
                    }
                    Shading::Unlit { color, opacity } => {
                        let src = Vec3::new(color.r, color.g, color.b);
                        self.hdr[idx] = self.hdr[idx].lerp(src, opacity);
                    }
                    Shading::ContactShadow { opacity, radius } => {
                        let local = v0.local * b0 + v1.local * b1 + v2.local * b2;
                        let falloff = (1.0 - local.length() / radius).clamp(0.0, 1.0);
                        self.hdr[idx] *= 1.0 - opacity * falloff * falloff;
                    }
                }
            }
        }
    }

    fn render_grid(&mut self, grid: &GridFloor, view_proj: &Mat4) {
        for (a, b, color) in grid.lines() {
            let ca = *view_proj * a.extend(1.0);
            let cb = *view_proj * b.extend(1.0);
            let Some((ca, cb)) = clip_segment_near(ca, cb) else {
                continue;
            };
            let (from, to) = (self.clip_to_screen(ca), self.clip_to_screen(cb));
            let Some((from, to)) = clip_segment_rect(from, to, self.width as f32, self.height as f32) else {
                continue;
            };
            self.draw_line(from, to, Vec3::new(color.r, color.g, color.b));
        }
    }

    /// Depth-tested line with one sample per pixel step.
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Vec3) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            if p.x < 0.0 || p.y < 0.0 || p.x >= self.width as f32 || p.y >= self.height as f32 {
                continue;
            }
            let idx = self.index(p.x as usize, p.y as usize);
            if p.z < self.depth_buffer[idx] {
                self.depth_buffer[idx] = p.z;
                self.hdr[idx] = color;
            }
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width as usize + x
    }

    /// Get the width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the color buffer.
    pub fn buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    /// Get the depth buffer.
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}

/// Clip a clip-space segment to the part in front of the eye.
fn clip_segment_near(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    match (a.w > NEAR_W, b.w > NEAR_W) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let t = (NEAR_W - a.w) / (b.w - a.w);
            let cut = a.lerp(b, t);
            if a_in {
                Some((a, cut))
            } else {
                Some((cut, b))
            }
        }
    }
}

/// Liang-Barsky clip of a screen-space segment to `[0, width) x [0, height)`.
/// Depth stays affine along the segment, so it is clipped with x and y.
fn clip_segment_rect(from: Vec3, to: Vec3, width: f32, height: f32) -> Option<(Vec3, Vec3)> {
    let d = to - from;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    let max_x = width - 1e-3;
    let max_y = height - 1e-3;
    for (p, q) in [(-d.x, from.x), (d.x, max_x - from.x), (-d.y, from.y), (d.y, max_y - from.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((from + d * t0, from + d * t1))
}

/// Edge function for triangle rasterization.
#[inline]
fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostSettings;
    use crate::scene::{compose_scene, MeshLibrary, OrbitField, SceneInput};
    use crate::tessellation::TessellationOptions;
    use showroom_core::ProductState;

    fn quiet_post() -> PostSettings {
        PostSettings { noise_opacity: 0.0, vignette_darkness: 0.0, vignette_offset: 0.0, ..PostSettings::default() }
    }

    fn product_scene(state: ProductState, t: f32) -> Scene3D {
        let meshes = MeshLibrary::new(&TessellationOptions { curve_segments: 16, face_segments: 2 });
        let mut uniforms = MaterialUniforms::for_product(state);
        uniforms.time = t;
        let input = SceneInput { state, uniforms, camera_distance: state.config().zoom, rotation: Vec2::ZERO };
        compose_scene(&input, &meshes, &OrbitField::seeded(0, 0), &PostSettings::default())
    }

    #[test]
    fn test_renderer_new() {
        let renderer = SoftwareRenderer3D::new(100, 100).unwrap();
        assert_eq!(renderer.width(), 100);
        assert_eq!(renderer.height(), 100);
        assert_eq!(renderer.buffer().len(), 100 * 100 * 4);
        assert_eq!(renderer.depth_buffer().len(), 100 * 100);
    }

    #[test]
    fn test_zero_viewport_rejected() {
        assert!(matches!(
            SoftwareRenderer3D::new(0, 10),
            Err(RenderError::InvalidViewport { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_oversized_viewport_rejected() {
        assert!(matches!(
            SoftwareRenderer3D::new(65_536, 65_536),
            Err(RenderError::InvalidViewport { width: 65_536, height: 65_536 })
        ));
        assert!(SoftwareRenderer3D::new(MAX_VIEWPORT + 1, 1).is_err());
        assert!(SoftwareRenderer3D::new(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_renderer_clear_and_resolve() {
        let mut renderer = SoftwareRenderer3D::new(10, 10).unwrap();
        renderer.clear(Color::rgb(1.0, 0.0, 0.0));
        renderer.resolve();

        assert_eq!(&renderer.buffer()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_render_empty_scene() {
        let mut renderer = SoftwareRenderer3D::new(64, 48).unwrap();
        let mut scene = Scene3D::new();
        scene.post = quiet_post();
        scene.bloom_intensity = 0.0;
        scene.background = Color::from_rgb8(128, 128, 128).to_linear();

        let buffer = renderer.render(&scene);
        assert_eq!(buffer.len(), 64 * 48 * 4);
        assert!(buffer.chunks(4).all(|px| px == [128, 128, 128, 255]));
    }

    #[test]
    fn test_render_product() {
        let mut renderer = SoftwareRenderer3D::new(96, 64).unwrap();
        let scene = product_scene(ProductState::Timepiece, 0.5);
        let bg = scene.background.to_srgb().to_rgba8();

        let buffer = renderer.render(&scene).to_vec();

        let differs = buffer.chunks(4).filter(|px| (px[0], px[1], px[2]) != (bg.0, bg.1, bg.2)).count();
        assert!(differs > 100, "only {differs} pixels drawn");
        assert!(renderer.depth_buffer().iter().any(|d| d.is_finite()));
    }

    #[test]
    fn test_translucent_objects_do_not_write_depth() {
        let mut renderer = SoftwareRenderer3D::new(32, 32).unwrap();
        let mut scene = product_scene(ProductState::Apparel, 0.0);
        scene.objects.retain(|o| o.name == "backdrop");
        scene.grid = None;
        assert_eq!(scene.objects.len(), 1);

        renderer.render(&scene);
        assert!(renderer.depth_buffer().iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_grid_draws_below_horizon() {
        let mut renderer = SoftwareRenderer3D::new(64, 64).unwrap();
        let mut scene = product_scene(ProductState::Eyewear, 0.0);
        scene.objects.clear();
        scene.post = quiet_post();

        renderer.render(&scene);
        let depth = renderer.depth_buffer();
        let upper = depth[..32 * 64].iter().filter(|d| d.is_finite()).count();
        let lower = depth[32 * 64..].iter().filter(|d| d.is_finite()).count();
        assert_eq!(upper, 0);
        assert!(lower > 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = product_scene(ProductState::Headset, 1.25);
        let mut a = SoftwareRenderer3D::new(48, 32).unwrap();
        let mut b = SoftwareRenderer3D::new(48, 32).unwrap();
        assert_eq!(a.render(&scene), b.render(&scene));
    }

    #[test]
    fn test_clip_segment_near() {
        let a = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::new(0.0, 0.0, 0.0, -1.0);
        let (from, to) = clip_segment_near(a, b).unwrap();
        assert_eq!(from, a);
        assert!((to.w - NEAR_W).abs() < 1e-6);
        assert!(clip_segment_near(b, b).is_none());
    }

    #[test]
    fn test_clip_segment_rect() {
        let (from, to) = clip_segment_rect(
            Vec3::new(-10.0, 5.0, 0.0),
            Vec3::new(30.0, 5.0, 1.0),
            20.0,
            10.0,
        )
        .unwrap();
        assert!((from.x - 0.0).abs() < 1e-4);
        assert!((from.z - 0.25).abs() < 1e-4);
        assert!(to.x < 20.0 && to.x > 19.9);
        assert!(clip_segment_rect(Vec3::new(-5.0, -5.0, 0.0), Vec3::new(-1.0, -1.0, 0.0), 20.0, 10.0).is_none());
    }
}
