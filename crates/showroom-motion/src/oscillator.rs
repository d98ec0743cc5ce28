//! Repeating yoyo interpolation.

use crate::easing::Easing;

/// Lifecycle of an [`Oscillator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscillatorState {
    Idle,
    Running {
        from: f32,
        to: f32,
        start: f32,
        half_period: f32,
        easing: Easing,
    },
    Cancelled,
}

/// Swings a value between two endpoints forever, until cancelled.
///
/// Each half-cycle lasts `half_period` seconds; odd half-cycles play the
/// eased curve backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    state: OscillatorState,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    pub fn new() -> Self {
        Self { state: OscillatorState::Idle }
    }

    pub fn state(&self) -> OscillatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, OscillatorState::Running { .. })
    }

    pub fn start(&mut self, from: f32, to: f32, start: f32, half_period: f32, easing: Easing) {
        self.state = OscillatorState::Running { from, to, start, half_period, easing };
    }

    /// Stop oscillating. A cancelled oscillator never produces values again
    /// until restarted.
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.state = OscillatorState::Cancelled;
        }
    }

    /// Value at `now`, or `None` unless running.
    pub fn sample(&self, now: f32) -> Option<f32> {
        let OscillatorState::Running { from, to, start, half_period, easing } = self.state else {
            return None;
        };
        if half_period <= 0.0 {
            return Some(to);
        }
        let elapsed = (now - start).max(0.0) / half_period;
        let cycle = elapsed.floor();
        let phase = elapsed - cycle;
        let forward = (cycle as u64) % 2 == 0;
        let t = if forward { easing.apply(phase) } else { easing.apply(1.0 - phase) };
        Some(from + (to - from) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_produces_nothing() {
        let osc = Oscillator::new();
        assert_eq!(osc.sample(1.0), None);
        assert_eq!(osc.state(), OscillatorState::Idle);
    }

    #[test]
    fn test_yoyo_between_endpoints() {
        let mut osc = Oscillator::new();
        osc.start(0.2, 2.0, 10.0, 0.5, Easing::Linear);

        assert!((osc.sample(10.0).unwrap() - 0.2).abs() < 1e-5);
        assert!((osc.sample(10.25).unwrap() - 1.1).abs() < 1e-5);
        // Peak at the end of the first half-cycle, back down after the second.
        assert!((osc.sample(10.4999).unwrap() - 2.0).abs() < 1e-2);
        assert!((osc.sample(10.75).unwrap() - 1.1).abs() < 1e-5);
        assert!((osc.sample(11.0).unwrap() - 0.2).abs() < 1e-5);
        // Keeps going indefinitely.
        assert!((osc.sample(110.25).unwrap() - 1.1).abs() < 1e-3);
    }

    #[test]
    fn test_cancel_stops_sampling() {
        let mut osc = Oscillator::new();
        osc.start(0.0, 1.0, 0.0, 0.5, Easing::Power1Out);
        assert!(osc.is_running());
        osc.cancel();
        assert_eq!(osc.state(), OscillatorState::Cancelled);
        assert_eq!(osc.sample(0.3), None);
    }

    #[test]
    fn test_cancel_when_idle_stays_idle() {
        let mut osc = Oscillator::new();
        osc.cancel();
        assert_eq!(osc.state(), OscillatorState::Idle);
    }
}
