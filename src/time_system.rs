//! Simulation clock.
//!
//! Every timer in the game (reloads, attack cooldowns, searches, the
//! extraction countdown) stores a start timestamp and compares it against
//! `GameClock::time` each tick. Nothing ever blocks or sleeps.

use crate::constants::TIMER_EPSILON;

/// Monotonic game time clock (in seconds)
#[derive(Debug, Clone, Default)]
pub struct GameClock {
    /// Current game time in seconds (simulation time, not real time)
    pub time: f32,
    /// Number of ticks advanced so far
    pub tick: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { time: 0.0, tick: 0 }
    }

    /// Advance by one tick of `dt` seconds. Negative or NaN steps are
    /// clamped to zero so time never runs backwards.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_nan() { 0.0 } else { dt.max(0.0) };
        self.time += dt;
        self.tick += 1;
        dt
    }

}

/// True once `duration` seconds have passed between `start` and `now`.
pub fn has_elapsed(now: f32, start: f32, duration: f32) -> bool {
    now - start + TIMER_EPSILON >= duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = GameClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.time, 0.75);
        assert_eq!(clock.tick, 2);
    }

    #[test]
    fn test_deadline_counts_as_elapsed() {
        // 1.3 - 1.0 rounds below 0.3 in f32
        assert!(1.3f32 - 1.0 < 0.3);
        assert!(has_elapsed(1.3, 1.0, 0.3));
        assert!(!has_elapsed(1.29, 1.0, 0.3));
        assert!(has_elapsed(5.0, f32::NEG_INFINITY, 0.3));
    }

    #[test]
    fn test_advance_never_goes_backwards() {
        let mut clock = GameClock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(-5.0), 0.0);
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.time, 1.0);
    }
}
