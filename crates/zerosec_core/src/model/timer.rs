//! Session countdown state machine.
//!
//! # Responsibility
//! - Count down a configurable number of one-second ticks.
//! - Report expiry synchronously from the tick that reaches zero.
//!
//! # Invariants
//! - `remaining_seconds` never goes below zero and never exceeds `duration_seconds`.
//! - `Expired` implies `remaining_seconds == 0`.
//! - Only a `Running` timer accepts ticks.
//!
//! State flow: `Idle -> Running -> Expired -> (reset) -> Idle`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Not counting. Either full duration or paused partway.
    Idle,
    /// Counting down.
    Running,
    /// Reached zero; waits for restart or reset.
    Expired,
}

/// Result of delivering one tick to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Timer was not running; nothing changed.
    Ignored,
    /// One second elapsed; carries remaining seconds (> 0).
    Counted(u32),
    /// This tick reached zero.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTimer {
    duration_seconds: u32,
    remaining_seconds: u32,
    state: TimerState,
}

impl SessionTimer {
    /// Creates an idle timer at full duration. Zero is raised to one second.
    pub fn new(duration_seconds: u32) -> Self {
        let duration_seconds = duration_seconds.max(1);
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            state: TimerState::Idle,
        }
    }

    /// Creates an idle timer paused at `remaining_seconds`.
    ///
    /// Zero or out-of-range values reload to the full duration.
    pub fn paused(duration_seconds: u32, remaining_seconds: u32) -> Self {
        let mut timer = Self::new(duration_seconds);
        if (1..=timer.duration_seconds).contains(&remaining_seconds) {
            timer.remaining_seconds = remaining_seconds;
        }
        timer
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Returns whether the timer is idle with nothing elapsed.
    pub fn is_fresh(&self) -> bool {
        self.state == TimerState::Idle && self.remaining_seconds == self.duration_seconds
    }

    /// Starts counting. Returns `false` if already running.
    ///
    /// A timer sitting at zero reloads to the full duration first.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Running {
            return false;
        }
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.duration_seconds;
        }
        self.state = TimerState::Running;
        true
    }

    /// Pauses a running timer, keeping the remaining time.
    pub fn stop(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.state = TimerState::Idle;
        true
    }

    /// Returns to idle at full duration from any state.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_seconds = self.duration_seconds;
    }

    /// Advances one second.
    pub fn tick(&mut self) -> TimerTick {
        if self.state != TimerState::Running {
            return TimerTick::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = TimerState::Expired;
            return TimerTick::Expired;
        }
        TimerTick::Counted(self.remaining_seconds)
    }

    /// Changes the configured duration.
    ///
    /// A fresh timer reloads to the new duration. Otherwise remaining time
    /// is kept, clamped to the new duration.
    pub fn set_duration(&mut self, duration_seconds: u32) {
        let fresh = self.is_fresh();
        self.duration_seconds = duration_seconds.max(1);
        if fresh {
            self.remaining_seconds = self.duration_seconds;
        } else {
            self.remaining_seconds = self.remaining_seconds.min(self.duration_seconds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionTimer, TimerState, TimerTick};

    #[test]
    fn ticks_count_down_to_expiry() {
        let mut timer = SessionTimer::new(3);
        assert!(timer.start());
        assert_eq!(timer.tick(), TimerTick::Counted(2));
        assert_eq!(timer.tick(), TimerTick::Counted(1));
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.tick(), TimerTick::Ignored);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = SessionTimer::new(5);
        assert_eq!(timer.tick(), TimerTick::Ignored);
        assert_eq!(timer.remaining_seconds(), 5);
    }

    #[test]
    fn start_is_noop_while_running() {
        let mut timer = SessionTimer::new(5);
        assert!(timer.start());
        timer.tick();
        assert!(!timer.start());
        assert_eq!(timer.remaining_seconds(), 4);
    }

    #[test]
    fn stop_pauses_without_reloading() {
        let mut timer = SessionTimer::new(5);
        timer.start();
        timer.tick();
        timer.tick();
        assert!(timer.stop());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_seconds(), 3);
        assert!(!timer.is_fresh());

        timer.start();
        assert_eq!(timer.tick(), TimerTick::Counted(2));
    }

    #[test]
    fn restart_after_expiry_reloads_full_duration() {
        let mut timer = SessionTimer::new(1);
        timer.start();
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert!(timer.start());
        assert_eq!(timer.remaining_seconds(), 1);
    }

    #[test]
    fn reset_on_fresh_timer_changes_nothing() {
        let mut timer = SessionTimer::new(30);
        let before = timer.clone();
        timer.reset();
        assert_eq!(timer, before);
    }

    #[test]
    fn set_duration_reloads_only_fresh_timer() {
        let mut fresh = SessionTimer::new(60);
        fresh.set_duration(30);
        assert_eq!(fresh.remaining_seconds(), 30);

        let mut partial = SessionTimer::new(60);
        partial.start();
        for _ in 0..10 {
            partial.tick();
        }
        partial.set_duration(90);
        assert_eq!(partial.remaining_seconds(), 50);
        partial.set_duration(20);
        assert_eq!(partial.remaining_seconds(), 20);
    }

    #[test]
    fn paused_rejects_out_of_range_remaining() {
        assert_eq!(SessionTimer::paused(30, 12).remaining_seconds(), 12);
        assert_eq!(SessionTimer::paused(30, 0).remaining_seconds(), 30);
        assert_eq!(SessionTimer::paused(30, 45).remaining_seconds(), 30);
    }
}
