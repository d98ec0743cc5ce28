//! Lattice value noise.

use glam::Vec3;

/// GLSL-style `fract`: always in [0, 1), also for negative input.
#[inline]
pub(crate) fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn fract3(v: Vec3) -> Vec3 {
    Vec3::new(fract(v.x), fract(v.y), fract(v.z))
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Pseudo-random value in [0, 1) for a lattice point.
pub fn hash(p: Vec3) -> f32 {
    let p = fract3(p * 0.318_309_9 + Vec3::splat(0.1)) * 17.0;
    fract(p.x * p.y * p.z * (p.x + p.y + p.z))
}

/// Trilinear interpolation of lattice hashes with smoothstep weights.
pub fn value_noise(x: Vec3) -> f32 {
    let i = x.floor();
    let f = x - i;
    let f = f * f * (Vec3::splat(3.0) - 2.0 * f);

    let corner = |dx: f32, dy: f32, dz: f32| hash(i + Vec3::new(dx, dy, dz));

    mix(
        mix(
            mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), f.x),
            mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), f.x),
            f.y,
        ),
        mix(
            mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), f.x),
            mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), f.x),
            f.y,
        ),
        f.z,
    )
}
