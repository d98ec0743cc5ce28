//! Per-property interpolation state.

use showroom_core::Color;

use crate::easing::Easing;

/// Values that can be interpolated.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Color {
    fn lerp(self, other: Self, t: f32) -> Self {
        Color::lerp(self, other, t)
    }
}

/// One interpolation from `from` to `to`, starting at `start` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
    pub start: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, start: f32, duration: f32, easing: Easing) -> Self {
        Self { from, to, start, duration, easing }
    }

    /// Elapsed fraction in [0, 1]. Zero-length tweens are complete immediately.
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn sample(&self, now: f32) -> T {
        let p = self.progress(now);
        if p >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(p))
    }

    pub fn is_finished(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A single animated property: its current value plus at most one live tween.
///
/// Starting a new tween replaces the live one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track<T> {
    value: T,
    tween: Option<Tween<T>>,
}

impl<T: Lerp> Track<T> {
    pub fn new(value: T) -> Self {
        Self { value, tween: None }
    }

    /// Last sampled value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Value the track is heading to.
    pub fn target(&self) -> T {
        self.tween.map(|t| t.to).unwrap_or(self.value)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Set the value immediately, cancelling any live tween.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.tween = None;
    }

    /// Tween from the value at `now` toward `to`.
    pub fn animate_to(&mut self, to: T, now: f32, duration: f32, easing: Easing) {
        let from = self.tick(now);
        self.tween = Some(Tween::new(from, to, now, duration, easing));
    }

    /// Jump to `from`, then tween toward `to`.
    pub fn animate_from_to(&mut self, from: T, to: T, now: f32, duration: f32, easing: Easing) {
        self.value = from;
        self.tween = Some(Tween::new(from, to, now, duration, easing));
    }

    /// Sample the live tween at `now`; drops it once finished.
    pub fn tick(&mut self, now: f32) -> T {
        if let Some(tween) = self.tween {
            self.value = tween.sample(now);
            if tween.is_finished(now) {
                self.tween = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_linear_sampling() {
        let tween = Tween::new(0.0_f32, 10.0, 1.0, 2.0, Easing::Linear);
        assert_eq!(tween.sample(0.0), 0.0);
        assert_eq!(tween.sample(2.0), 5.0);
        assert_eq!(tween.sample(3.0), 10.0);
        assert_eq!(tween.sample(99.0), 10.0);
        assert!(!tween.is_finished(2.5));
        assert!(tween.is_finished(3.0));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let tween = Tween::new(1.0_f32, 2.0, 0.0, 0.0, Easing::Power1Out);
        assert_eq!(tween.sample(0.0), 2.0);
    }

    #[test]
    fn test_track_retarget_starts_from_current_value() {
        let mut track = Track::new(0.0_f32);
        track.animate_to(10.0, 0.0, 1.0, Easing::Linear);
        assert_eq!(track.tick(0.5), 5.0);

        // Supersede mid-flight: the new tween starts where the old one was.
        track.animate_to(0.0, 0.75, 1.0, Easing::Linear);
        assert_eq!(track.value(), 7.5);
        assert_eq!(track.target(), 0.0);
        assert_eq!(track.tick(1.25), 3.75);
    }

    #[test]
    fn test_track_finishes_and_rests() {
        let mut track = Track::new(1.0_f32);
        track.animate_to(3.0, 0.0, 1.0, Easing::Power1Out);
        assert!(track.is_animating());
        assert_eq!(track.tick(1.0), 3.0);
        assert!(!track.is_animating());
        assert_eq!(track.tick(5.0), 3.0);
    }

    #[test]
    fn test_set_cancels_tween() {
        let mut track = Track::new(0.0_f32);
        track.animate_to(1.0, 0.0, 1.0, Easing::Linear);
        track.set(0.25);
        assert!(!track.is_animating());
        assert_eq!(track.tick(0.9), 0.25);
    }

    #[test]
    fn test_color_track() {
        let mut track = Track::new(Color::BLACK);
        track.animate_to(Color::WHITE, 0.0, 2.0, Easing::Linear);
        let mid = track.tick(1.0);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert_eq!(mid.a, 1.0);
    }
}
