//! 3D scene composition for the showroom stage.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};
use std::sync::Arc;

use glam::{EulerRot, Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use showroom_core::{Color, GeometryKind, MaterialUniforms, ProductState};

use crate::geometry::{Mesh, Shape};
use crate::material::{Light, Shading};
use crate::post::PostSettings;
use crate::tessellation::{tessellate_with_options, TessellationOptions};

/// Number of orbiting markers around the product.
pub const MARKER_COUNT: usize = 15;
/// Marker spin added on every tick, in radians.
pub const MARKER_SPIN_STEP: f32 = 0.02;
/// Height of the floor grid and the contact shadow.
pub const FLOOR_Y: f32 = -3.1;

const BACKGROUND: Color = Color::from_rgb8(0x05, 0x05, 0x05);
const GRID_LINE: Color = Color::from_rgb8(0x11, 0x11, 0x11);

// Hover of the product group.
const FLOAT_SPEED: f32 = 2.0;
const FLOAT_INTENSITY: f32 = 0.5;
const FLOAT_ROTATION_INTENSITY: f32 = 0.5;

/// A 3D scene containing objects, lights, and camera.
#[derive(Debug, Clone)]
pub struct Scene3D {
    /// Objects in the scene.
    pub objects: Vec<SceneObject>,
    /// Lights in the scene.
    pub lights: Vec<Light>,
    /// Camera settings.
    pub camera: Camera,
    /// Background color (linear).
    pub background: Color,
    pub grid: Option<GridFloor>,
    /// Material inputs for objects with procedural shading.
    pub uniforms: MaterialUniforms,
    pub post: PostSettings,
    /// Bloom intensity in effect for this frame.
    pub bloom_intensity: f32,
}

impl Default for Scene3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene3D {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            camera: Camera::default(),
            background: BACKGROUND.to_linear(),
            grid: None,
            uniforms: MaterialUniforms::for_product(ProductState::Eyewear),
            post: PostSettings::default(),
            bloom_intensity: PostSettings::default().bloom_intensity,
        }
    }

    /// Add an object to the scene.
    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Add a light to the scene.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// An object in the 3D scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: &'static str,
    /// Shared tessellated mesh, in object space.
    pub mesh: Arc<Mesh>,
    /// Object-to-world transform.
    pub transform: Mat4,
    pub shading: Shading,
}

impl SceneObject {
    pub fn new(name: &'static str, mesh: Arc<Mesh>, shading: Shading) -> Self {
        Self { name, mesh, transform: Mat4::IDENTITY, shading }
    }

    /// Apply a transform.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_translucent(&self) -> bool {
        !matches!(self.shading, Shading::Procedural)
    }
}

/// Camera settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Target point the camera is looking at.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Azimuth angle (horizontal rotation).
    pub azimuth: f32,
    /// Elevation angle (vertical rotation).
    pub elevation: f32,
    /// Field of view in degrees.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    pub fn looking_from(distance: f32) -> Self {
        Self { distance, ..Self::default() }
    }

    /// Get the camera position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Get the projection matrix for the given aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }
}

/// Square line grid lying on the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridFloor {
    pub size: f32,
    pub divisions: u32,
    pub y: f32,
    /// Scroll offset along Z, in [0, 2).
    pub offset_z: f32,
    /// Color of the two center lines (linear).
    pub center_color: Color,
    /// Color of every other line (linear).
    pub line_color: Color,
}

impl GridFloor {
    /// World-space endpoints and color of every line.
    pub fn lines(&self) -> impl Iterator<Item = (Vec3, Vec3, Color)> + '_ {
        let half = self.size / 2.0;
        let step = self.size / self.divisions as f32;
        let center = self.divisions / 2;
        (0..=self.divisions).flat_map(move |i| {
            let k = -half + i as f32 * step;
            let color = if i == center { self.center_color } else { self.line_color };
            let z = self.offset_z;
            [
                (Vec3::new(-half, self.y, k + z), Vec3::new(half, self.y, k + z), color),
                (Vec3::new(k, self.y, -half + z), Vec3::new(k, self.y, half + z), color),
            ]
        })
    }
}

/// One orbiting marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitMarker {
    pub radius: f32,
    /// Angular speed in radians per second.
    pub speed: f32,
    pub phase: f32,
    /// Accumulated spin around Y.
    pub spin: f32,
}

impl OrbitMarker {
    /// Position at time `t`: a flat circle with a slow vertical bob.
    pub fn position(&self, t: f32) -> Vec3 {
        let u = t * self.speed + self.phase;
        Vec3::new(u.cos() * self.radius, (u * 0.5).sin() * 2.0, u.sin() * self.radius)
    }
}

/// Markers orbiting the product. Parameters are drawn once per field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitField {
    markers: Vec<OrbitMarker>,
}

impl OrbitField {
    pub fn seeded(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let markers = (0..count)
            .map(|_| OrbitMarker {
                radius: rng.gen_range(4.0..8.0),
                speed: rng.gen_range(0.2..0.5),
                phase: rng.gen_range(0.0..TAU),
                spin: 0.0,
            })
            .collect();
        Self { markers }
    }

    pub fn markers(&self) -> &[OrbitMarker] {
        &self.markers
    }

    /// Spin every marker by one tick.
    pub fn advance(&mut self) {
        for marker in &mut self.markers {
            marker.spin += MARKER_SPIN_STEP;
        }
    }
}

/// Tessellated meshes reused across frames.
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    products: [Arc<Mesh>; 6],
    marker: Arc<Mesh>,
    marker_ring: Arc<Mesh>,
    light_bar: Arc<Mesh>,
    backdrop: Arc<Mesh>,
    shadow: Arc<Mesh>,
}

impl MeshLibrary {
    pub fn new(options: &TessellationOptions) -> Self {
        let build = |shape: Shape| Arc::new(tessellate_with_options(&shape, options));

        let mut ring = tessellate_with_options(&Shape::torus(0.1, 0.005), options);
        ring.transform(Mat4::from_rotation_x(FRAC_PI_2));

        Self {
            products: GeometryKind::ALL.map(|kind| build(Shape::for_geometry(kind))),
            marker: build(Shape::box_shape(0.05, 0.2, 0.05)),
            marker_ring: Arc::new(ring),
            light_bar: build(Shape::box_shape(0.1, 20.0, 0.1)),
            backdrop: build(Shape::plane(50.0, 50.0)),
            shadow: build(Shape::disc(10.0)),
        }
    }

    pub fn product(&self, kind: GeometryKind) -> Arc<Mesh> {
        let slot = match kind {
            GeometryKind::Sphere => 0,
            GeometryKind::Box => 1,
            GeometryKind::Torus => 2,
            GeometryKind::Cylinder => 3,
            GeometryKind::WideBox => 4,
            GeometryKind::VrVisor => 5,
        };
        Arc::clone(&self.products[slot])
    }
}

impl Default for MeshLibrary {
    fn default() -> Self {
        Self::new(&TessellationOptions::default())
    }
}

/// Everything the stage needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneInput {
    pub state: ProductState,
    pub uniforms: MaterialUniforms,
    pub camera_distance: f32,
    /// Accumulated product rotation around x and y.
    pub rotation: Vec2,
}

/// Hover transform of the product group at time `t`.
fn float_transform(t: f32) -> Mat4 {
    let phase = t / 4.0 * FLOAT_SPEED;
    let (sin, cos) = phase.sin_cos();
    let rotation = Mat4::from_euler(
        EulerRot::XYZ,
        cos / 8.0 * FLOAT_ROTATION_INTENSITY,
        sin / 8.0 * FLOAT_ROTATION_INTENSITY,
        sin / 20.0 * FLOAT_ROTATION_INTENSITY,
    );
    Mat4::from_translation(Vec3::new(0.0, sin / 10.0 * FLOAT_INTENSITY, 0.0)) * rotation
}

/// Build the frame's scene: lights keyed to the product, the product itself,
/// orbiting markers, floor grid, backdrop, light bars and contact shadow.
pub fn compose_scene(
    input: &SceneInput,
    meshes: &MeshLibrary,
    markers: &OrbitField,
    post: &PostSettings,
) -> Scene3D {
    let config = input.state.config();
    let primary = config.color.to_linear();
    let accent = config.accent_color.to_linear();
    let t = input.uniforms.time;

    let mut scene = Scene3D {
        camera: Camera::looking_from(input.camera_distance),
        uniforms: input.uniforms,
        post: *post,
        bloom_intensity: post.bloom_intensity_for(input.uniforms.scanning),
        ..Scene3D::new()
    };

    scene.add_light(Light::ambient(Color::WHITE, 0.2));
    scene.add_light(Light::spot([10.0, 15.0, 10.0], primary, config.bg_intensity * 8.0, 0.3, 1.0));
    scene.add_light(Light::point([-10.0, -5.0, -10.0], accent, 1.5));

    let spin = Mat4::from_euler(EulerRot::XYZ, input.rotation.x, input.rotation.y, 0.0);
    scene.add_object(
        SceneObject::new("product", meshes.product(config.geometry), Shading::Procedural)
            .with_transform(float_transform(t) * spin),
    );

    for marker in markers.markers() {
        let transform = Mat4::from_translation(marker.position(t)) * Mat4::from_rotation_y(marker.spin);
        scene.add_object(
            SceneObject::new("marker", Arc::clone(&meshes.marker), Shading::Unlit { color: primary, opacity: 0.4 })
                .with_transform(transform),
        );
        scene.add_object(
            SceneObject::new("marker-ring", Arc::clone(&meshes.marker_ring), Shading::Unlit { color: primary, opacity: 0.2 })
                .with_transform(transform),
        );
    }

    scene.add_object(
        SceneObject::new("backdrop", Arc::clone(&meshes.backdrop), Shading::Unlit { color: Color::BLACK, opacity: 0.8 })
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0))),
    );

    for i in 0..5 {
        let x = (i as f32 - 2.0) * 10.0;
        scene.add_object(
            SceneObject::new("light-bar", Arc::clone(&meshes.light_bar), Shading::Unlit { color: primary, opacity: 0.1 })
                .with_transform(Mat4::from_translation(Vec3::new(x, 5.0, -15.0)) * Mat4::from_rotation_z(FRAC_PI_4)),
        );
    }

    scene.add_object(
        SceneObject::new("contact-shadow", Arc::clone(&meshes.shadow), Shading::ContactShadow { opacity: 0.4, radius: 10.0 })
            .with_transform(Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, 0.0))),
    );

    scene.grid = Some(GridFloor {
        size: 100.0,
        divisions: 50,
        y: FLOOR_Y,
        offset_z: (t * 0.5) % 2.0,
        center_color: config.grid_color.to_linear(),
        line_color: GRID_LINE.to_linear(),
    });

    scene
}
