//! Timers and Auto-Repeat
//!
//! [`Timer`] is a one-shot countdown. [`AutoRepeater`] fires repeatedly while
//! something is held, speeding up the longer it is held. Both are driven by
//! explicit `tick(dt)` calls from the frame loop.

use serde::{Deserialize, Serialize};

use crate::math::LARGE_FLOAT;

/// Interval ramp for an [`AutoRepeater`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRepeaterSettings {
    /// Interval between triggers at the start of a hold.
    pub slowest_interval: f32,
    /// Interval between triggers once fully ramped.
    pub fastest_interval: f32,
    /// Hold time needed to reach the fastest interval.
    pub ramp_time: f32,
}

impl Default for AutoRepeaterSettings {
    fn default() -> Self {
        Self {
            slowest_interval: 0.3,
            fastest_interval: 0.05,
            ramp_time: 0.9,
        }
    }
}

/// Repeats an activation while held, with a ramping rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRepeater {
    pub settings: AutoRepeaterSettings,
    /// Time held so far. `LARGE_FLOAT` when inactive.
    time: f32,
    /// When the next trigger happens. `LARGE_FLOAT` when inactive.
    next_trigger: f32,
}

impl Default for AutoRepeater {
    fn default() -> Self {
        Self::new(AutoRepeaterSettings::default())
    }
}

impl AutoRepeater {
    pub fn new(settings: AutoRepeaterSettings) -> Self {
        Self {
            settings,
            time: LARGE_FLOAT,
            next_trigger: LARGE_FLOAT,
        }
    }

    pub fn start(&mut self) {
        self.time = 0.0;
        self.next_trigger = self.settings.slowest_interval;
    }

    pub fn stop(&mut self) {
        self.time = LARGE_FLOAT;
        self.next_trigger = LARGE_FLOAT;
    }

    pub fn is_active(&self) -> bool {
        self.time != LARGE_FLOAT
    }

    /// Advances the hold time. Returns how many triggers happened.
    pub fn tick(&mut self, dt: f32) -> usize {
        if !self.is_active() || self.time > self.next_trigger {
            return 0;
        }

        let s = self.settings;
        self.time += dt;
        let mut triggers = 0;
        while self.time >= self.next_trigger {
            triggers += 1;
            let interval = s.slowest_interval
                + (self.time / s.ramp_time) * (s.fastest_interval - s.slowest_interval);
            let interval = interval.clamp(
                s.fastest_interval.min(s.slowest_interval),
                s.slowest_interval.max(s.fastest_interval),
            );
            // A zero interval would never catch up with the hold time.
            if interval <= 0.0 {
                self.next_trigger = self.time + f32::EPSILON;
                break;
            }
            self.next_trigger += interval;
        }
        triggers
    }
}

/// One-shot countdown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timer {
    pub time_left: f32,
    pub duration: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            time_left: 0.0,
            duration,
        }
    }

    /// Restarts the countdown from the full duration.
    pub fn start(&mut self) {
        self.time_left = self.duration;
    }

    pub fn start_with(&mut self, duration: f32) {
        self.duration = duration;
        self.start();
    }

    pub fn stop(&mut self) {
        self.time_left = 0.0;
    }

    /// Returns true on the tick the timer reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.time_left == 0.0 {
            return false;
        }
        self.time_left = (self.time_left - dt).max(0.0);
        self.time_left == 0.0
    }

    pub fn ratio_left(&self) -> f32 {
        if self.duration == 0.0 {
            0.0
        } else {
            self.time_left / self.duration
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_repeater_inactive_does_nothing() {
        let mut r = AutoRepeater::default();
        assert_eq!(r.tick(10.0), 0);
    }

    #[test]
    fn test_auto_repeater_first_trigger_at_slowest() {
        let mut r = AutoRepeater::default();
        r.start();
        assert_eq!(r.tick(0.29), 0);
        assert_eq!(r.tick(0.02), 1);
    }

    #[test]
    fn test_auto_repeater_ramps_up() {
        let mut r = AutoRepeater::default();
        r.start();
        // Count triggers early on and in the last 0.3s of a 1.5s hold.
        let mut early = 0;
        for _ in 0..35 {
            early += r.tick(0.01);
        }
        for _ in 0..85 {
            r.tick(0.01);
        }
        let mut late = 0;
        for _ in 0..30 {
            late += r.tick(0.01);
        }
        assert_eq!(early, 1);
        assert!(late >= 5, "late triggers: {late}");
    }

    #[test]
    fn test_auto_repeater_stop() {
        let mut r = AutoRepeater::default();
        r.start();
        r.stop();
        assert!(!r.is_active());
        assert_eq!(r.tick(1.0), 0);
    }

    #[test]
    fn test_timer() {
        let mut t = Timer::new(1.0);
        assert!(!t.tick(0.5));
        t.start();
        assert!(!t.tick(0.5));
        assert!((t.ratio_left() - 0.5).abs() < 1e-6);
        assert!(t.tick(0.6));
        assert_eq!(t.time_left, 0.0);
        assert!(!t.tick(0.1));
    }
}
