//! Event types reported by a channel poll.

/// Rotation direction of one completed detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// One detent clockwise.
    Clockwise,
    /// One detent counter-clockwise.
    CounterClockwise,
}

impl Direction {
    /// Signed movement contribution of one detent in this direction.
    pub fn delta(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Debounced button edge.
///
/// Exactly one `Pressed` and one `Released` are produced per genuine
/// actuation (see [`DebouncedButton`](crate::debounce::DebouncedButton)
/// for the coalescing limitation on sub-interval actuations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Falling edge — the knob was pushed in.
    Pressed,
    /// Rising edge — the knob was let go.
    Released,
}

/// Everything one [`update`](crate::channel::EncoderChannel::update) call
/// observed: zero, one, or two independent events.
///
/// Rotation and button state are decoupled — a detent can complete in the
/// same poll that a button edge is accepted, and both are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventSet {
    /// Completed detent, if the sub-step accumulator crossed the threshold.
    pub rotation: Option<Direction>,
    /// Accepted button edge, if the debounce gate admitted one.
    pub button: Option<ButtonEvent>,
}

impl EventSet {
    /// Returns `true` if this poll produced no events at all.
    pub fn is_empty(&self) -> bool {
        self.rotation.is_none() && self.button.is_none()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
