use bevy::prelude::*;
use std::time::Duration;

/// A restartable one-shot countdown.
///
/// Thin layer over bevy's [`Timer`] that accepts raw `f32` seconds from the simulation
/// (sanitized, since `Duration::from_secs_f32` panics on negative or NaN input) and
/// restarts itself whenever it fires. The interval may be changed between ticks; a
/// shorter interval fires on the next tick if enough time has already accumulated.
#[derive(Debug, Clone)]
pub struct Countdown {
    timer: Timer,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        Self {
            timer: Timer::new(to_duration(secs), TimerMode::Once),
        }
    }

    /// Advance by `dt` seconds. Returns true (and restarts) when the interval elapsed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer.tick(to_duration(dt));
        if self.timer.finished() {
            self.timer.reset();
            true
        } else {
            false
        }
    }

    /// Change the interval without losing accumulated time
    pub fn set_interval(&mut self, secs: f32) {
        self.timer.set_duration(to_duration(secs));
    }

    /// Restart from zero with a new interval
    pub fn restart(&mut self, secs: f32) {
        self.timer.set_duration(to_duration(secs));
        self.timer.reset();
    }

    pub fn interval(&self) -> f32 {
        self.timer.duration().as_secs_f32()
    }

    pub fn remaining(&self) -> f32 {
        self.timer.remaining_secs()
    }
}

fn to_duration(secs: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f32(secs)
    } else {
        Duration::ZERO
    }
}

/// A flag that can be raised exactly once per session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latch {
    fired: bool,
}

impl Latch {
    /// Fires the first time `condition` holds; false forever after
    pub fn trigger(&mut self, condition: bool) -> bool {
        if self.fired || !condition {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
