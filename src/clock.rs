//! Frame clock
//!
//! Turns animation-frame timestamps into a clamped simulation step so a stalled
//! tab can't produce one enormous physics step.

use crate::consts::MAX_DT;

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Delta time in seconds since the previous call, clamped to [0, MAX_DT].
    ///
    /// The first call only records the timestamp and yields 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_DT)
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp (e.g. after the loop was suspended)
    pub fn restart(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0.0);
    }

    #[test]
    fn test_regular_frame() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let dt = clock.advance(16.0);
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), MAX_DT);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
    }

    #[test]
    fn test_restart() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.restart();
        assert_eq!(clock.advance(10_000.0), 0.0);
    }
}
