//! Held-key tracking for terminal environments.
//!
//! Movement and turning are sampled as "is the key down this tick". Terminals
//! that report key releases drive this directly. Terminals that do not only
//! send presses (plus auto-repeat presses), so a held key is released
//! automatically once no press has been seen for `key_release_timeout_ms`.
//!
//! Toggle/cycle/quit are edge-triggered: each press is delivered exactly once,
//! in the next sample.

use arrayvec::ArrayVec;

use crate::types::{InputAction, InputSample};

// Long enough to bridge the gap before a typical terminal's first auto-repeat.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 300;

const HELD_ACTIONS: [InputAction; 4] = [
    InputAction::MoveForward,
    InputAction::MoveBack,
    InputAction::TurnLeft,
    InputAction::TurnRight,
];

/// Tracks input state between ticks.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Time of the last press for each held action, `None` if released
    held_since: [Option<u64>; 4],
    /// One-shot actions waiting for the next sample
    pending: ArrayVec<InputAction, 16>,
    /// `None` when the terminal reports releases
    key_release_timeout_ms: Option<u64>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            held_since: [None; 4],
            pending: ArrayVec::new(),
            key_release_timeout_ms: Some(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.key_release_timeout_ms = Some(timeout_ms);
        self
    }

    /// Rely on real release events instead of a timeout.
    pub fn with_release_events(mut self) -> Self {
        self.key_release_timeout_ms = None;
        self
    }

    pub fn key_release_timeout_ms(&self) -> Option<u64> {
        self.key_release_timeout_ms
    }

    fn slot(action: InputAction) -> Option<usize> {
        HELD_ACTIONS.iter().position(|&a| a == action)
    }

    /// Record a press (or auto-repeat) at `now_ms`.
    pub fn handle_press(&mut self, action: InputAction, now_ms: u64) {
        match Self::slot(action) {
            Some(i) => self.held_since[i] = Some(now_ms),
            None => {
                // Drop presses beyond capacity rather than grow per tick.
                let _ = self.pending.try_push(action);
            }
        }
    }

    pub fn handle_release(&mut self, action: InputAction) {
        if let Some(i) = Self::slot(action) {
            self.held_since[i] = None;
        }
    }

    pub fn release_all(&mut self) {
        self.held_since = [None; 4];
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        Self::slot(action)
            .map(|i| self.held_since[i].is_some())
            .unwrap_or(false)
    }

    /// Take this tick's input sample.
    ///
    /// Expires stale held keys and drains pending one-shot actions.
    pub fn sample(&mut self, now_ms: u64) -> InputSample {
        if let Some(timeout) = self.key_release_timeout_ms {
            for held in self.held_since.iter_mut() {
                if matches!(*held, Some(t) if now_ms.saturating_sub(t) > timeout) {
                    *held = None;
                }
            }
        }

        let mut sample = InputSample::default();
        for (i, &action) in HELD_ACTIONS.iter().enumerate() {
            if self.held_since[i].is_some() {
                sample.set(action);
            }
        }
        for action in self.pending.drain(..) {
            sample.set(action);
        }
        sample
    }
}
