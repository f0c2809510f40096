//! Push-button debouncing.
//!
//! Mechanical switches chatter for a few milliseconds around every
//! actuation. [`DebouncedButton`] turns the noisy line into a single
//! [`Pressed`](ButtonEvent::Pressed) and a single
//! [`Released`](ButtonEvent::Released) edge per genuine actuation using a
//! single time-threshold gate: a raw sample that differs from the
//! debounced level is accepted only once [`DEBOUNCE_INTERVAL`] has elapsed
//! since the last accepted change. Chatter inside the gate window is
//! coalesced into whatever level the line shows at the first poll after
//! the gate opens.
//!
//! The clock is the 64-bit `embassy-time` tick counter, which does not
//! wrap within any realistic uptime, so plain `duration_since`
//! comparisons are safe.

use embassy_time::{Duration, Instant};

use crate::events::ButtonEvent;

/// Quiescent interval a level change must survive before it is accepted.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_micros(20_000);

/// Debounce state machine for one active-low push button.
///
/// Levels follow the pull-up wiring convention: `true` is released,
/// `false` is pressed.
///
/// Actuations spaced closer together than [`DEBOUNCE_INTERVAL`] coalesce —
/// a press immediately followed by a release inside the window may be
/// merged or lost. This is accepted, not corrected.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebouncedButton {
    /// Last accepted (debounced) line level. `true` = released.
    level: bool,
    /// Whether a press is logically active, post-debounce.
    pressed: bool,
    /// Time of the last accepted level change; gates further changes.
    last_accepted: Instant,
}

impl DebouncedButton {
    /// Latch the initial line level.
    ///
    /// The logical state starts released regardless of the level: if the
    /// button is held during startup, the eventual release edge is
    /// swallowed rather than reported as a phantom event.
    pub fn new(initial_level: bool, now: Instant) -> Self {
        Self {
            level: initial_level,
            pressed: false,
            last_accepted: now,
        }
    }

    /// Feed one raw sample, returning the accepted edge if any.
    ///
    /// A sample equal to the debounced level is a no-op. A differing
    /// sample is accepted on the first poll at or after the gate opens,
    /// which advances the gate and may fire an edge event.
    pub fn update(&mut self, level: bool, now: Instant) -> Option<ButtonEvent> {
        if level == self.level {
            return None;
        }
        if now.duration_since(self.last_accepted) < DEBOUNCE_INTERVAL {
            return None;
        }

        self.last_accepted = now;
        self.level = level;

        // Active-low: falling edge is a press, rising edge a release.
        // The `pressed` guard keeps a startup-held button from producing
        // a release edge that was never preceded by a press.
        if !level && !self.pressed {
            self.pressed = true;
            Some(ButtonEvent::Pressed)
        } else if level && self.pressed {
            self.pressed = false;
            Some(ButtonEvent::Released)
        } else {
            None
        }
    }

    /// Whether a press is currently active, post-debounce.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Last accepted line level (`true` = released).
    pub fn level(&self) -> bool {
        self.level
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
