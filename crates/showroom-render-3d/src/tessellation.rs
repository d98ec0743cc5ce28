//! Tessellation of 3D shapes to triangle meshes.

use super::geometry::{Mesh, Shape, ShapeKind};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Tessellation quality settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationOptions {
    /// Number of segments around curved surfaces.
    pub curve_segments: u32,
    /// Subdivisions along each edge of flat faces and cylinder walls.
    ///
    /// The product body is displaced per vertex, so flat faces need interior
    /// vertices for the wave to show.
    pub face_segments: u32,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            curve_segments: 48,
            face_segments: 16,
        }
    }
}

/// Tessellate a shape with specific options.
pub fn tessellate_with_options(shape: &Shape, options: &TessellationOptions) -> Mesh {
    let curve = options.curve_segments.max(8);
    let faces = options.face_segments.max(1);
    match *shape.kind() {
        ShapeKind::Box { width, height, depth } => tessellate_box(width, height, depth, faces),
        ShapeKind::Cylinder { radius_top, radius_bottom, height, open_ended } => {
            tessellate_cylinder(radius_top, radius_bottom, height, open_ended, curve, faces)
        }
        ShapeKind::Sphere { radius } => tessellate_sphere(radius, curve),
        ShapeKind::Torus { radius, tube } => tessellate_torus(radius, tube, curve, (curve / 4).max(8)),
        ShapeKind::Plane { width, height } => tessellate_plane(width, height),
        ShapeKind::Disc { radius } => tessellate_disc(radius, curve),
    }
}

/// Push quad indices for a `(cols + 1) x (rows + 1)` vertex grid starting at `base`.
fn grid_indices(indices: &mut Vec<u32>, base: u32, cols: u32, rows: u32) {
    let stride = cols + 1;
    for j in 0..rows {
        for i in 0..cols {
            let a = base + j * stride + i;
            let b = a + 1;
            let c = a + stride + 1;
            let d = a + stride;
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
}

/// Tessellate a box centered at origin, each face subdivided into a grid.
fn tessellate_box(width: f32, height: f32, depth: f32, segments: u32) -> Mesh {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    // (origin corner, u edge, v edge); u x v points out of the box.
    let faces = [
        (Vec3::new(-hw, -hh, hd), Vec3::X * width, Vec3::Y * height),   // front
        (Vec3::new(hw, -hh, -hd), -Vec3::X * width, Vec3::Y * height),  // back
        (Vec3::new(hw, -hh, hd), -Vec3::Z * depth, Vec3::Y * height),   // right
        (Vec3::new(-hw, -hh, -hd), Vec3::Z * depth, Vec3::Y * height),  // left
        (Vec3::new(-hw, hh, hd), Vec3::X * width, -Vec3::Z * depth),    // top
        (Vec3::new(-hw, -hh, -hd), Vec3::X * width, Vec3::Z * depth),   // bottom
    ];

    let per_face = ((segments + 1) * (segments + 1)) as usize;
    let mut mesh = Mesh {
        vertices: Vec::with_capacity(per_face * 6),
        normals: Vec::with_capacity(per_face * 6),
        uvs: Vec::with_capacity(per_face * 6),
        indices: Vec::with_capacity((segments * segments * 36) as usize),
    };

    for (origin, u_edge, v_edge) in faces {
        let base = mesh.vertices.len() as u32;
        let normal = u_edge.cross(v_edge).normalize();

        for j in 0..=segments {
            let v = j as f32 / segments as f32;
            for i in 0..=segments {
                let u = i as f32 / segments as f32;
                mesh.vertices.push(origin + u_edge * u + v_edge * v);
                mesh.normals.push(normal);
                mesh.uvs.push(Vec2::new(u, v));
            }
        }

        grid_indices(&mut mesh.indices, base, segments, segments);
    }

    mesh
}

/// Tessellate a cylinder or frustum centered at origin, extending along Y axis.
fn tessellate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    open_ended: bool,
    segments: u32,
    height_segments: u32,
) -> Mesh {
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    let mut mesh = Mesh::new();

    // Side wall, top row first
    for j in 0..=height_segments {
        let v = j as f32 / height_segments as f32;
        let radius = radius_top + (radius_bottom - radius_top) * v;
        let y = half_height - v * height;

        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();

            mesh.vertices.push(Vec3::new(radius * sin, y, radius * cos));
            mesh.normals.push(Vec3::new(sin, slope, cos).normalize());
            mesh.uvs.push(Vec2::new(u, 1.0 - v));
        }
    }
    grid_indices(&mut mesh.indices, 0, segments, height_segments);

    if !open_ended {
        cylinder_cap(&mut mesh, radius_top, half_height, segments, true);
        cylinder_cap(&mut mesh, radius_bottom, -half_height, segments, false);
    }

    mesh
}

fn cylinder_cap(mesh: &mut Mesh, radius: f32, y: f32, segments: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(Vec3::new(0.0, y, 0.0));
    mesh.normals.push(normal);
    mesh.uvs.push(Vec2::splat(0.5));

    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(Vec3::new(radius * sin, y, radius * cos));
        mesh.normals.push(normal);
        mesh.uvs.push(Vec2::new(sin * 0.5 + 0.5, cos * 0.5 + 0.5));
    }

    for i in 0..segments {
        let a = center + 1 + i;
        if top {
            mesh.indices.extend_from_slice(&[center, a, a + 1]);
        } else {
            mesh.indices.extend_from_slice(&[center, a + 1, a]);
        }
    }
}

/// Tessellate a sphere centered at origin.
fn tessellate_sphere(radius: f32, segments: u32) -> Mesh {
    let rings = segments / 2;

    let mut mesh = Mesh::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;
            let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin()).normalize();

            mesh.vertices.push(normal * radius);
            mesh.normals.push(normal);
            mesh.uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    grid_indices(&mut mesh.indices, 0, segments, rings);
    mesh
}

/// Tessellate a torus in the XY plane.
fn tessellate_torus(radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32) -> Mesh {
    let mut mesh = Mesh::new();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32;
        let (sin_v, cos_v) = (v * TAU).sin_cos();

        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();

            let ring = radius + tube * cos_v;
            let vertex = Vec3::new(ring * cos_u, ring * sin_u, tube * sin_v);
            let center = Vec3::new(radius * cos_u, radius * sin_u, 0.0);

            mesh.vertices.push(vertex);
            mesh.normals.push((vertex - center).normalize());
            mesh.uvs.push(Vec2::new(u, v));
        }
    }

    grid_indices(&mut mesh.indices, 0, tubular_segments, radial_segments);
    mesh
}

/// Tessellate a quad in the XY plane facing +Z.
fn tessellate_plane(width: f32, height: f32) -> Mesh {
    let hw = width / 2.0;
    let hh = height / 2.0;
    Mesh {
        vertices: vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
        ],
        normals: vec![Vec3::Z; 4],
        uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE],
        indices: vec![0, 1, 3, 0, 3, 2],
    }
}

/// Tessellate a disc in the XZ plane facing +Y.
fn tessellate_disc(radius: f32, segments: u32) -> Mesh {
    let mut mesh = Mesh::new();
    cylinder_cap(&mut mesh, radius, 0.0, segments, true);
    mesh
}
