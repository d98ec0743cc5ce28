//! Full-frame effects applied to the linear HDR buffer before display.

use glam::Vec3;

use crate::noise::{hash, smoothstep};

/// Width of the soft knee above the bloom threshold.
const BLOOM_SMOOTHING: f32 = 0.025;

/// Post-processing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PostSettings {
    /// Luminance above which pixels bloom.
    pub bloom_threshold: f32,
    /// Blur radius as a fraction of the shorter frame side (scaled by 0.05).
    pub bloom_radius: f32,
    pub bloom_intensity: f32,
    /// Bloom intensity while a scan is active.
    pub bloom_scanning_intensity: f32,
    pub noise_opacity: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            bloom_threshold: 0.2,
            bloom_radius: 0.4,
            bloom_intensity: 1.2,
            bloom_scanning_intensity: 2.5,
            noise_opacity: 0.02,
            vignette_offset: 0.1,
            vignette_darkness: 1.1,
        }
    }
}

impl PostSettings {
    pub fn bloom_intensity_for(&self, scanning: bool) -> f32 {
        if scanning {
            self.bloom_scanning_intensity
        } else {
            self.bloom_intensity
        }
    }

    /// Blur radius in pixels for a frame of the given size.
    pub fn bloom_radius_px(&self, width: u32, height: u32) -> usize {
        let short_side = width.min(height) as f32;
        (self.bloom_radius * short_side * 0.05).round().max(1.0) as usize
    }
}

#[inline]
fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

/// Bloom, film grain, then vignette, in place.
pub(crate) fn apply_chain(
    settings: &PostSettings,
    bloom_intensity: f32,
    hdr: &mut [Vec3],
    width: u32,
    height: u32,
    time: f32,
) {
    bloom(hdr, width, height, settings.bloom_threshold, settings.bloom_radius_px(width, height), bloom_intensity);
    grain(hdr, width, settings.noise_opacity, time);
    vignette(hdr, width, height, settings.vignette_offset, settings.vignette_darkness);
}

pub(crate) fn bloom(hdr: &mut [Vec3], width: u32, height: u32, threshold: f32, radius: usize, intensity: f32) {
    if intensity <= 0.0 || hdr.is_empty() {
        return;
    }
    let (w, h) = (width as usize, height as usize);

    let mut bright: Vec<Vec3> = hdr
        .iter()
        .map(|&c| c * smoothstep(threshold, threshold + BLOOM_SMOOTHING, luminance(c)))
        .collect();

    // Two box passes per axis approximate a gaussian.
    let mut scratch = vec![Vec3::ZERO; bright.len()];
    for _ in 0..2 {
        box_blur(&bright, &mut scratch, w, h, radius, 1, w);
        box_blur(&scratch, &mut bright, h, w, radius, w, 1);
    }

    for (out, glow) in hdr.iter_mut().zip(&bright) {
        *out += *glow * intensity;
    }
}

/// One-dimensional running-sum blur along lines of `len` samples spaced by
/// `step`, for `lines` lines spaced by `line_step`.
fn box_blur(src: &[Vec3], dst: &mut [Vec3], len: usize, lines: usize, radius: usize, step: usize, line_step: usize) {
    let window = (2 * radius + 1) as f32;
    for line in 0..lines {
        let start = line * line_step;
        let at = |i: isize| -> Vec3 {
            let i = i.clamp(0, len as isize - 1) as usize;
            src[start + i * step]
        };

        let r = radius as isize;
        let mut sum = (-r..=r).map(at).fold(Vec3::ZERO, |acc, c| acc + c);
        for i in 0..len as isize {
            dst[start + i as usize * step] = sum / window;
            sum += at(i + r + 1) - at(i - r);
        }
    }
}

/// Screen-blend per-pixel noise that changes every frame.
pub(crate) fn grain(hdr: &mut [Vec3], width: u32, opacity: f32, time: f32) {
    if opacity <= 0.0 || width == 0 {
        return;
    }
    let seed = (time * 60.0).floor();
    for (i, c) in hdr.iter_mut().enumerate() {
        let x = (i % width as usize) as f32;
        let y = (i / width as usize) as f32;
        let n = hash(Vec3::new(x, y, seed));
        let headroom = (Vec3::ONE - *c).max(Vec3::ZERO);
        *c += headroom * n * opacity;
    }
}

/// Darken toward the corners.
pub(crate) fn vignette(hdr: &mut [Vec3], width: u32, height: u32, offset: f32, darkness: f32) {
    let (w, h) = (width as f32, height as f32);
    for (i, c) in hdr.iter_mut().enumerate() {
        let u = ((i % width as usize) as f32 + 0.5) / w - 0.5;
        let v = ((i / width as usize) as f32 + 0.5) / h - 0.5;
        let d = (u * u + v * v).sqrt();
        *c *= smoothstep(0.8, offset * 0.799, d * (darkness + offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = PostSettings::default();
        assert_eq!(s.bloom_intensity_for(false), 1.2);
        assert_eq!(s.bloom_intensity_for(true), 2.5);
        assert_eq!(s.bloom_radius_px(1280, 720), 14);
        assert_eq!(s.bloom_radius_px(8, 8), 1);
    }

    #[test]
    fn test_bloom_ignores_dark_pixels() {
        let mut hdr = vec![Vec3::splat(0.1); 16 * 16];
        bloom(&mut hdr, 16, 16, 0.2, 2, 1.2);
        assert!(hdr.iter().all(|c| (*c - Vec3::splat(0.1)).length() < 1e-6));
    }

    #[test]
    fn test_bloom_spreads_bright_pixel() {
        let mut hdr = vec![Vec3::ZERO; 9 * 9];
        hdr[4 * 9 + 4] = Vec3::splat(10.0);
        bloom(&mut hdr, 9, 9, 0.2, 1, 1.0);

        assert!(hdr[4 * 9 + 5].x > 0.0, "neighbor should glow");
        assert!(hdr[4 * 9 + 4].x > 10.0);
        assert!(hdr[0].length() < 1e-4);
    }

    #[test]
    fn test_box_blur_preserves_flat_field() {
        let src = vec![Vec3::ONE; 5 * 3];
        let mut dst = vec![Vec3::ZERO; src.len()];
        box_blur(&src, &mut dst, 5, 3, 2, 1, 5);
        assert!(dst.iter().all(|c| (*c - Vec3::ONE).length() < 1e-5));
    }

    #[test]
    fn test_vignette_keeps_center_darkens_corners() {
        let mut hdr = vec![Vec3::ONE; 101 * 101];
        vignette(&mut hdr, 101, 101, 0.1, 1.1);
        assert!((hdr[50 * 101 + 50] - Vec3::ONE).length() < 1e-5);
        assert!(hdr[0].x < 0.05);
    }

    #[test]
    fn test_grain_is_subtle_and_brightening() {
        let mut hdr = vec![Vec3::splat(0.5); 32];
        grain(&mut hdr, 8, 0.02, 1.0);
        for c in &hdr {
            assert!(c.x >= 0.5 && c.x <= 0.51 + 1e-6);
        }
    }
}
