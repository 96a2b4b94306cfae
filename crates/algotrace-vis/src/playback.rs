//! Playback controls for an algorithm trace.
//!
//! [`Playback`] is the synchronous state machine: it owns the trace and the
//! cursor and decides what each transport operation does. It has no clock;
//! [`crate::Player`] owns the timer and calls [`Playback::tick`].

use std::time::Duration;

use algotrace_engine::{Step, Trace};
use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Freshly loaded or reset; cursor at 0
    Idle,
    /// Auto-advancing
    Playing,
    /// Stopped mid-trace
    Paused,
    /// Stopped on the terminal step
    Finished,
}

/// Outcome of one auto-advance tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Cursor moved to this index; keep ticking.
    Advanced(usize),
    /// Already on the last step; playback stopped.
    Finished,
    /// Not playing; nothing happened.
    Ignored,
}

/// Playback controller for a trace.
#[derive(Debug, Clone)]
pub struct Playback {
    trace: Trace,
    cursor: usize,
    state: PlaybackState,
    speed_ms: u64,
    config: PlaybackConfig,
}

impl Playback {
    /// Create a controller positioned on the first step.
    pub fn new(trace: Trace, config: PlaybackConfig) -> Self {
        Self {
            trace,
            cursor: 0,
            state: PlaybackState::Idle,
            speed_ms: config.clamp_speed(config.default_speed_ms),
            config,
        }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// The step the view should render.
    pub fn current_step(&self) -> &Step {
        // cursor <= last_index is maintained by every transition.
        &self.trace.steps()[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_steps(&self) -> usize {
        self.trace.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Interval between auto-advances.
    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Replace the trace and return to the first step, stopped.
    pub fn load(&mut self, trace: Trace) {
        self.trace = trace;
        self.cursor = 0;
        self.state = PlaybackState::Idle;
    }

    /// Start auto-advancing.
    ///
    /// Returns true only when this call moved playback into `Playing`; a
    /// call while already playing, or on the last step, changes nothing.
    pub fn play(&mut self) -> bool {
        if self.is_playing() || self.cursor >= self.trace.last_index() {
            return false;
        }
        self.state = PlaybackState::Playing;
        true
    }

    /// Stop auto-advancing, keeping the cursor.
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.settle();
        }
    }

    /// Move the cursor by `delta`, clamped to the trace. Ignored while playing.
    ///
    /// Returns whether the cursor moved.
    pub fn step(&mut self, delta: isize) -> bool {
        if self.is_playing() {
            return false;
        }
        let target = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.trace.last_index());
        let moved = target != self.cursor;
        self.cursor = target;
        if moved {
            self.settle();
        }
        moved
    }

    /// Step forward one step.
    pub fn step_forward(&mut self) -> bool {
        self.step(1)
    }

    /// Step backward one step.
    pub fn step_backward(&mut self) -> bool {
        self.step(-1)
    }

    /// Jump to `index` (clamped), pausing first.
    pub fn scrub(&mut self, index: usize) {
        self.cursor = index.min(self.trace.last_index());
        self.settle();
    }

    /// Set the auto-advance interval, clamped to the configured bounds.
    ///
    /// Returns the interval actually applied.
    pub fn set_speed(&mut self, ms: u64) -> u64 {
        self.speed_ms = self.config.clamp_speed(ms);
        self.speed_ms
    }

    /// Return to the first step, stopped.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = PlaybackState::Idle;
    }

    /// Advance one step if playing.
    ///
    /// On the last step the tick stops playback instead of advancing, so the
    /// cursor never passes the end and never wraps.
    pub fn tick(&mut self) -> Tick {
        if !self.is_playing() {
            return Tick::Ignored;
        }
        if self.cursor >= self.trace.last_index() {
            self.state = PlaybackState::Finished;
            return Tick::Finished;
        }
        self.cursor += 1;
        Tick::Advanced(self.cursor)
    }

    /// Progress through the trace (0.0 - 1.0).
    pub fn progress(&self) -> f64 {
        let last = self.trace.last_index();
        if last == 0 {
            1.0
        } else {
            self.cursor as f64 / last as f64
        }
    }

    /// Stopped state for the current cursor.
    fn settle(&mut self) {
        self.state = if self.cursor == self.trace.last_index() {
            PlaybackState::Finished
        } else {
            PlaybackState::Paused
        };
    }
}

/// Playback status for sending to frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub cursor: usize,
    pub trace_len: usize,
    pub is_playing: bool,
    pub speed_ms: u64,
    pub state: PlaybackState,
    pub progress: f64,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            cursor: playback.cursor,
            trace_len: playback.total_steps(),
            is_playing: playback.is_playing(),
            speed_ms: playback.speed_ms,
            state: playback.state,
            progress: playback.progress(),
        }
    }
}
