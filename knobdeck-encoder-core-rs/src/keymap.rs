//! Mapping channel events to key-style output identifiers.
//!
//! The discrete-event firmware shape assigns each channel three
//! identifiers (typically USB HID usage IDs): one per rotation direction
//! and one for the button. The channel itself knows nothing about them —
//! the loop owner holds a [`KeyAssignment`] next to each channel and maps
//! events as they come out.

use crate::events::{ButtonEvent, Direction};

/// Key identifiers for one channel's three outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyAssignment {
    /// Identifier emitted once per clockwise detent.
    pub clockwise: u8,
    /// Identifier emitted once per counter-clockwise detent.
    pub counter_clockwise: u8,
    /// Identifier emitted once per accepted button press.
    pub button: u8,
}

impl KeyAssignment {
    /// Identifier for one completed detent.
    pub fn rotation(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Clockwise => self.clockwise,
            Direction::CounterClockwise => self.counter_clockwise,
        }
    }

    /// Identifier for a button edge, if one is assigned.
    ///
    /// Only presses map to a key; releases are reported in the event set
    /// for observability but emit nothing.
    pub fn button(&self, event: ButtonEvent) -> Option<u8> {
        match event {
            ButtonEvent::Pressed => Some(self.button),
            ButtonEvent::Released => None,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
