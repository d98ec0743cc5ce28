//! 3D geometry types and operations.

use glam::{Mat4, Vec2, Vec3};
use showroom_core::GeometryKind;

/// An analytic shape, tessellated on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
}

/// The kind of shape. All shapes are centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Box { width: f32, height: f32, depth: f32 },
    /// Cylinder or truncated cone along the Y axis.
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32, open_ended: bool },
    Sphere { radius: f32 },
    /// Ring in the XY plane.
    Torus { radius: f32, tube: f32 },
    /// Quad in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// Flat disc in the XZ plane facing +Y.
    Disc { radius: f32 },
}

impl Shape {
    /// Create a box shape centered at origin.
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self { kind: ShapeKind::Box { width, height, depth } }
    }

    /// Create a cylinder (or frustum, when the radii differ) along the Y axis.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, open_ended: bool) -> Self {
        Self { kind: ShapeKind::Cylinder { radius_top, radius_bottom, height, open_ended } }
    }

    /// Create a sphere shape centered at origin.
    pub fn sphere(radius: f32) -> Self {
        Self { kind: ShapeKind::Sphere { radius } }
    }

    /// Create a torus lying in the XY plane.
    pub fn torus(radius: f32, tube: f32) -> Self {
        Self { kind: ShapeKind::Torus { radius, tube } }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Self { kind: ShapeKind::Plane { width, height } }
    }

    pub fn disc(radius: f32) -> Self {
        Self { kind: ShapeKind::Disc { radius } }
    }

    /// The product body for a catalog geometry kind.
    pub fn for_geometry(kind: GeometryKind) -> Self {
        match kind {
            GeometryKind::Box => Shape::box_shape(3.0, 4.0, 0.5),
            GeometryKind::WideBox => Shape::box_shape(5.0, 1.5, 0.4),
            GeometryKind::Torus => Shape::torus(2.0, 0.4),
            GeometryKind::Cylinder => Shape::cylinder(2.5, 2.5, 1.0, true),
            GeometryKind::VrVisor => Shape::cylinder(2.0, 2.2, 2.5, false),
            GeometryKind::Sphere => Shape::sphere(2.2),
        }
    }

    /// Get the shape kind.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

}

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Transform all vertices by a matrix.
    pub fn transform(&mut self, matrix: Mat4) {
        let normal_matrix = matrix.inverse().transpose();

        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize();
        }
    }
}
