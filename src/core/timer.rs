/// Adaptive answer timer — difficulty-scaled countdown with escalating
/// urgency thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tuning for the answer timer. All times are in seconds and are
/// divided by the current difficulty level when a round starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub base_answer_time: f32,
    pub warning_time: f32,
    pub critical_time: f32,
    pub max_difficulty_level: u32,
    /// Difficulty rises after this many completed rounds.
    pub difficulty_change_intervals: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            base_answer_time: 180.0,
            warning_time: 60.0,
            critical_time: 30.0,
            max_difficulty_level: 3,
            difficulty_change_intervals: 3,
        }
    }
}

/// How close the timer is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Normal,
    Warning,
    Critical,
}

/// Something the owner should announce. At most one event is produced
/// per tick; timing out wins over an urgency change in the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// The countdown crossed an urgency threshold. Produced only on the
    /// crossing, not every tick spent below it.
    UrgencyChanged(Urgency),
    /// The countdown ran out. Produced exactly once per round; the
    /// timer stops itself. Treating a timeout as a default (incorrect)
    /// answer is the caller's decision.
    TimedOut,
}

/// Derived display fields — pure formatting, no state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDisplay {
    pub minutes: u32,
    pub seconds: u32,
    pub hundredths: u32,
}

impl fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}\"{:02}.{:02}'",
            self.minutes, self.seconds, self.hundredths
        )
    }
}

/// Countdown for a debate answer window.
///
/// Each round runs for `base_answer_time / difficulty_level` seconds.
/// Every `difficulty_change_intervals` completed rounds the difficulty
/// rises by one, saturating at `max_difficulty_level`; it never falls.
#[derive(Debug, Clone)]
pub struct AnswerTimer {
    config: TimerConfig,
    remaining: f32,
    urgency: Urgency,
    active: bool,
    difficulty_level: u32,
    rounds_since_escalation: u32,
}

impl AnswerTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            remaining: 0.0,
            urgency: Urgency::Normal,
            active: false,
            difficulty_level: 1,
            rounds_since_escalation: 0,
        }
    }

    /// Arm the timer for a new round at the current difficulty.
    pub fn start(&mut self) {
        self.remaining = self.config.base_answer_time / self.difficulty_level as f32;
        self.urgency = Urgency::Normal;
        self.active = true;
    }

    /// Advance the countdown.
    pub fn tick(&mut self, dt: f32) -> Option<TimerEvent> {
        if !self.active {
            return None;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.stop();
            return Some(TimerEvent::TimedOut);
        }
        let urgency = self.current_urgency();
        if urgency != self.urgency {
            self.urgency = urgency;
            return Some(TimerEvent::UrgencyChanged(urgency));
        }
        None
    }

    /// Deactivate and count the round toward difficulty escalation.
    /// A no-op when the timer is not running, so an external stop after
    /// a timeout does not count the round twice.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.rounds_since_escalation += 1;
        if self.rounds_since_escalation == self.config.difficulty_change_intervals {
            self.rounds_since_escalation = 0;
            if self.difficulty_level < self.config.max_difficulty_level {
                self.difficulty_level += 1;
            }
        }
    }

    fn current_urgency(&self) -> Urgency {
        let level = self.difficulty_level as f32;
        if self.remaining < self.config.critical_time / level {
            Urgency::Critical
        } else if self.remaining < self.config.warning_time / level {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }

    /// Derive the display split of the remaining time.
    pub fn display(&self) -> TimerDisplay {
        let total = self.remaining.max(0.0);
        TimerDisplay {
            minutes: (total / 60.0) as u32,
            seconds: (total % 60.0) as u32,
            hundredths: ((total - total.floor()) * 100.0) as u32,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn difficulty_level(&self) -> u32 {
        self.difficulty_level
    }
}
