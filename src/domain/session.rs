//! Session state and timer accounting.
//!
//! `SessionState` is the single source of truth for the shared workout
//! display: timer, per-participant round counts, and the active plan part.
//! It is pure data plus accounting logic; all I/O and locking live in the
//! layers above. The action router owns the only mutable handle, so every
//! primitive here can assume exclusive access.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::time::Clock;

use super::plan::WorkoutPlan;

/// Timer mode recognized by the shared display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerMode {
    Stopwatch,
    Countdown,
    Emom,
    Tabata,
}

/// Timer configuration, replaced wholesale by `CONFIGURE_TIMER` or adopted
/// from a plan. Field names match the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub mode: TimerMode,
    /// Countdown length in seconds.
    #[serde(default)]
    pub duration: u32,
    /// Round count for interval modes.
    #[serde(default)]
    pub rounds: u32,
    /// Work phase in seconds (EMOM/TABATA).
    #[serde(default)]
    pub work: u32,
    /// Rest phase in seconds (TABATA).
    #[serde(default)]
    pub rest: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            duration: 0,
            rounds: 0,
            work: 0,
            rest: 0,
        }
    }
}

impl TimerConfig {
    /// Countdown config derived from a plan part's duration.
    pub fn countdown_minutes(minutes: u32) -> Self {
        Self {
            mode: TimerMode::Countdown,
            duration: minutes * 60,
            rounds: 0,
            work: 0,
            rest: 0,
        }
    }
}

/// Point-in-time read-only projection of the session, serialized to every
/// client as the `STATE_UPDATE` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timer_running: bool,
    /// Displayed elapsed time, truncated to whole seconds.
    pub timer_val: u64,
    pub timer_config: TimerConfig,
    pub active_part_index: usize,
    pub rounds: HashMap<String, u32>,
    pub workout: WorkoutPlan,
}

/// The single shared session state.
///
/// Elapsed time is accumulated at full precision across toggles; only the
/// snapshot truncates to whole seconds, so rounding error never compounds.
pub struct SessionState {
    clock: Arc<dyn Clock>,
    timer_running: bool,
    /// Time accumulated while not running.
    elapsed: Duration,
    /// Monotonic reading at which the current run began; present only while
    /// running.
    run_start: Option<Duration>,
    timer_config: TimerConfig,
    rounds: HashMap<String, u32>,
    workout: WorkoutPlan,
    active_part_index: usize,
}

impl SessionState {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timer_running: false,
            elapsed: Duration::ZERO,
            run_start: None,
            timer_config: TimerConfig::default(),
            rounds: HashMap::new(),
            workout: WorkoutPlan::default(),
            active_part_index: 0,
        }
    }

    /// Start the timer if stopped, stop it if running. There are only two
    /// states, so toggling is always a valid transition.
    pub fn toggle_timer(&mut self) {
        let now = self.clock.now();
        if self.timer_running {
            if let Some(start) = self.run_start.take() {
                self.elapsed += now.saturating_sub(start);
            }
            self.timer_running = false;
        } else {
            self.run_start = Some(now);
            self.timer_running = true;
        }
    }

    /// Count a round for the given participant, creating the entry lazily.
    /// No-op for an empty id.
    pub fn add_round(&mut self, participant: &str) {
        if participant.is_empty() {
            return;
        }
        *self.rounds.entry(participant.to_string()).or_insert(0) += 1;
    }

    /// Stop the timer and zero the elapsed time, regardless of prior state.
    pub fn reset_timer(&mut self) {
        self.timer_running = false;
        self.elapsed = Duration::ZERO;
        self.run_start = None;
    }

    /// Clear all round counts.
    pub fn reset_rounds(&mut self) {
        self.rounds.clear();
    }

    /// Replace the timer configuration wholesale. A new mode always starts
    /// from zero, so this also resets the timer.
    pub fn configure_timer(&mut self, config: TimerConfig) {
        self.timer_config = config;
        self.reset_timer();
    }

    /// Replace the workout plan. Adopts the plan's timer preset when it
    /// carries one, otherwise falls back to a zeroed stopwatch; either way
    /// the timer restarts from zero and the first part becomes active.
    pub fn set_workout(&mut self, plan: WorkoutPlan) {
        self.timer_config = plan.timer.clone().unwrap_or_default();
        self.workout = plan;
        self.active_part_index = 0;
        self.reset_timer();
    }

    /// Select the active plan part. Out-of-range indices (and empty plans)
    /// are silently ignored rather than crashing the shared session. When
    /// the selected part carries a duration, the timer is auto-configured
    /// to a countdown of that length and reset; otherwise the current
    /// config is left untouched.
    pub fn set_active_part(&mut self, index: usize) {
        if index >= self.workout.parts.len() {
            return;
        }
        self.active_part_index = index;
        if let Some(minutes) = self.workout.parts[index].duration_min() {
            if minutes > 0 {
                self.configure_timer(TimerConfig::countdown_minutes(minutes));
            }
        }
    }

    /// Displayed elapsed time: the accumulated value plus the current run,
    /// if one is in progress. Monotone while running.
    pub fn displayed_elapsed(&self) -> Duration {
        match self.run_start {
            Some(start) if self.timer_running => {
                self.elapsed + self.clock.now().saturating_sub(start)
            }
            _ => self.elapsed,
        }
    }

    /// Produce a fresh snapshot. Must be taken after a mutation, at the
    /// broadcast instant.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timer_running: self.timer_running,
            timer_val: self.displayed_elapsed().as_secs(),
            timer_config: self.timer_config.clone(),
            active_part_index: self.active_part_index,
            rounds: self.rounds.clone(),
            workout: self.workout.clone(),
        }
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn timer_config(&self) -> &TimerConfig {
        &self.timer_config
    }

    pub fn rounds(&self) -> &HashMap<String, u32> {
        &self.rounds
    }

    pub fn workout(&self) -> &WorkoutPlan {
        &self.workout
    }

    pub fn active_part_index(&self) -> usize {
        self.active_part_index
    }
}
