//! Quadrature transition decoding and detent accumulation.
//!
//! A rotary encoder's A/B lines step through the 4-state Gray cycle
//! `00 → 01 → 11 → 10 → 00` for one rotation direction and the mirror
//! cycle for the other. [`decode_transition`] maps one observed
//! state-pair to a direction; [`DetentAccumulator`] counts those
//! sub-steps into whole mechanical detents.

use crate::events::Direction;

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Direction lookup over all 16 ordered (previous, current) state pairs.
///
/// Indexed by `(previous << 2) | current`. `+1` is one clockwise sub-step,
/// `-1` one counter-clockwise sub-step, `0` is no change or an invalid
/// double-bit transition.
const TRANSITION_TABLE: [i8; 16] = [
    0,  // 00 -> 00: no change
    1,  // 00 -> 01: CW
    -1, // 00 -> 10: CCW
    0,  // 00 -> 11: invalid (both bits changed)
    -1, // 01 -> 00: CCW
    0,  // 01 -> 01: no change
    0,  // 01 -> 10: invalid (both bits changed)
    1,  // 01 -> 11: CW
    1,  // 10 -> 00: CW
    0,  // 10 -> 01: invalid (both bits changed)
    0,  // 10 -> 10: no change
    -1, // 10 -> 11: CCW
    0,  // 11 -> 00: invalid (both bits changed)
    -1, // 11 -> 01: CCW
    1,  // 11 -> 10: CW
    0,  // 11 -> 11: no change
];

/// Decode one A/B line-state transition into a direction.
///
/// Pure table lookup. Both arguments are 2-bit states (`(a << 1) | b`);
/// bits above the low two are masked off. Returns `+1` for a clockwise
/// sub-step, `-1` for a counter-clockwise sub-step, and `0` for
/// no-change pairs and for transitions where both bits flipped at once —
/// those cannot occur in one poll under correct sampling, so they are
/// ignored rather than guessed at.
pub fn decode_transition(previous: u8, current: u8) -> i8 {
    let index = ((previous & 0b11) << 2) | (current & 0b11);
    TRANSITION_TABLE[index as usize]
}

// ---------------------------------------------------------------------------
// Detent accumulation
// ---------------------------------------------------------------------------

/// Counts quadrature sub-steps into whole detents.
///
/// Most encoders emit four sub-steps per mechanical click; the threshold
/// is configurable for other phase counts. Reversing direction
/// mid-accumulation simply walks the counter back through zero — there
/// is no direction lock within a cycle, so after N sub-steps one way it
/// takes `threshold + N` sub-steps the other way to complete a detent.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetentAccumulator {
    /// Net sub-steps since the last emitted detent.
    sub_steps: i16,
    /// Sub-steps per detent, non-zero (validated by channel construction).
    threshold: u8,
}

impl DetentAccumulator {
    /// Create an accumulator that emits one detent per `threshold` net
    /// sub-steps.
    pub fn new(threshold: u8) -> Self {
        Self {
            sub_steps: 0,
            threshold,
        }
    }

    /// Apply one decoded sub-step (`+1`, `-1`, or `0`).
    ///
    /// Returns the completed detent's direction when the net count
    /// reaches the threshold in either direction, resetting the counter
    /// to zero in the same call. Sub-threshold counts are retained.
    pub fn apply(&mut self, direction: i8) -> Option<Direction> {
        if direction == 0 {
            return None;
        }
        self.sub_steps += i16::from(direction);

        let threshold = i16::from(self.threshold);
        if self.sub_steps >= threshold {
            self.sub_steps = 0;
            Some(Direction::Clockwise)
        } else if self.sub_steps <= -threshold {
            self.sub_steps = 0;
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }

    /// Net sub-steps currently held, bounded by the threshold magnitude.
    pub fn sub_steps(&self) -> i16 {
        self.sub_steps
    }
}

// ── Tests ────────────────────────────────────────────────────────────────
