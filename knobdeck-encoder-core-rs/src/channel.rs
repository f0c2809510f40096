//! Per-encoder channel: line ownership, decode, debounce, accumulation.
//!
//! One [`EncoderChannel`] exists per physical encoder and owns its three
//! digital inputs exclusively. Each poll, [`update`](EncoderChannel::update)
//! reads the lines, advances the quadrature and button state machines, and
//! reports the resulting [`EventSet`]. Channels share no state — the loop
//! owner holds them in a fixed array and services them in order.
//!
//! ```text
//!  A ──┐
//!  B ──┼─► quadrature decode ─► detent accumulator ─► rotation event
//!      │                               │
//!      │                               └─► movement accumulator ─► drain_movement()
//!  SW ─┴─► debounce gate ──────────────────► button event
//! ```
//!
//! Both output shapes are served by the same channel: the discrete-event
//! consumer maps the reported events through a
//! [`KeyAssignment`](crate::keymap::KeyAssignment), while the
//! accumulated-motion consumer calls
//! [`drain_movement`](EncoderChannel::drain_movement) on its report cadence
//! and ignores the per-poll events.

use core::convert::Infallible;

use embassy_time::Instant;
use embedded_hal::digital::InputPin;

use crate::debounce::DebouncedButton;
use crate::error::ConfigError;
use crate::events::EventSet;
use crate::quadrature::{decode_transition, DetentAccumulator};

/// Sub-steps per detent on common 4-phase encoders.
pub const DEFAULT_DETENT_THRESHOLD: u8 = 4;

/// Smallest movement value representable in a report byte.
///
/// The clamp range is symmetric ([-127, 127]) rather than i8's natural
/// -128, matching the wire range the accumulated value is drained into.
const MOVEMENT_MIN: i8 = -127;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Static per-channel configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Channel position in the owner's array; used for diagnostics only.
    pub index: u8,
    /// Quadrature sub-steps per mechanical detent. Must be non-zero.
    pub detent_threshold: u8,
}

impl ChannelConfig {
    /// Configuration for a standard 4-phase encoder at `index`.
    pub const fn new(index: u8) -> Self {
        Self {
            index,
            detent_threshold: DEFAULT_DETENT_THRESHOLD,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// State machine for one rotary encoder with push button.
///
/// Generic over any `embedded-hal` input pins whose reads cannot fail.
/// The poll path carries no error returns, so fallible pins are rejected
/// at the type level instead of being ignored at runtime.
///
/// All three lines are wired active-low with pull-ups: the A/B state is
/// formed from inverted readings, and a low button line means pressed.
///
/// # Example
///
/// ```no_run
/// use embassy_time::Instant;
/// use encoder_core::{ChannelConfig, EncoderChannel};
///
/// # fn example<P: embedded_hal::digital::InputPin<Error = core::convert::Infallible>>(a: P, b: P, sw: P) {
/// let mut channel =
///     EncoderChannel::new(ChannelConfig::new(0), a, b, sw, Instant::now()).unwrap();
///
/// loop {
///     let events = channel.update(Instant::now());
///     if let Some(direction) = events.rotation {
///         // one detent completed
///     }
/// }
/// # }
/// ```
pub struct EncoderChannel<A, B, SW> {
    config: ChannelConfig,

    // The three lines this channel owns exclusively.
    line_a: A,
    line_b: B,
    line_button: SW,

    /// Combined A/B reading as of the most recent poll.
    quadrature_state: u8,
    detent: DetentAccumulator,
    /// Whole detents since the last drain, clamped to [-127, 127].
    movement: i8,
    button: DebouncedButton,
}

impl<A, B, SW> EncoderChannel<A, B, SW>
where
    A: InputPin<Error = Infallible>,
    B: InputPin<Error = Infallible>,
    SW: InputPin<Error = Infallible>,
{
    /// Build a channel and latch the initial line levels.
    ///
    /// This is the one-time initialization step: the current A/B state
    /// and button level are read here so the first poll compares against
    /// real levels instead of assumed ones. The lines themselves must
    /// already be configured as pulled-up inputs.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroDetentThreshold`] if the configured threshold
    /// is zero.
    pub fn new(
        config: ChannelConfig,
        mut line_a: A,
        mut line_b: B,
        mut line_button: SW,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        if config.detent_threshold == 0 {
            return Err(ConfigError::ZeroDetentThreshold);
        }

        let quadrature_state = read_ab_state(&mut line_a, &mut line_b);
        let button_level = read_level(&mut line_button);

        Ok(Self {
            config,
            line_a,
            line_b,
            line_button,
            quadrature_state,
            detent: DetentAccumulator::new(config.detent_threshold),
            movement: 0,
            button: DebouncedButton::new(button_level, now),
        })
    }

    /// Poll the three lines once and report what happened.
    ///
    /// Rotation is evaluated before the button; the two are independent
    /// and both may fire in the same poll. No blocking, no I/O beyond
    /// the three line reads — safe to call from a latency-sensitive loop.
    pub fn update(&mut self, now: Instant) -> EventSet {
        let mut events = EventSet::default();

        // ── Rotation ─────────────────────────────────────────────────
        let current = read_ab_state(&mut self.line_a, &mut self.line_b);
        if current != self.quadrature_state {
            let direction = decode_transition(self.quadrature_state, current);
            if let Some(detent) = self.detent.apply(direction) {
                self.movement = self.movement.saturating_add(detent.delta()).max(MOVEMENT_MIN);
                events.rotation = Some(detent);

                #[cfg(feature = "defmt")]
                defmt::debug!("encoder {}: {} detent", self.config.index, detent);
            }
            // Advance even when the transition decoded to nothing, so a
            // stale comparison never outlives one poll.
            self.quadrature_state = current;
        }

        // ── Button ───────────────────────────────────────────────────
        let level = read_level(&mut self.line_button);
        if let Some(edge) = self.button.update(level, now) {
            events.button = Some(edge);

            #[cfg(feature = "defmt")]
            defmt::debug!("encoder {}: button {}", self.config.index, edge);
        }

        events
    }

    /// Take the accumulated movement since the last drain and reset it.
    ///
    /// The value counts whole detents, positive clockwise, clamped to
    /// [-127, 127]. Update and drain run on the same thread, so the
    /// read-and-reset pair cannot interleave with an increment.
    pub fn drain_movement(&mut self) -> i8 {
        let movement = self.movement;
        self.movement = 0;
        movement
    }

    /// Whether the button is currently held, post-debounce.
    pub fn is_pressed(&self) -> bool {
        self.button.is_pressed()
    }

    /// This channel's position in the owner's array.
    pub fn index(&self) -> u8 {
        self.config.index
    }
}

// ---------------------------------------------------------------------------
// Line reading
// ---------------------------------------------------------------------------

/// Read one infallible line.
fn read_level<P>(pin: &mut P) -> bool
where
    P: InputPin<Error = Infallible>,
{
    match pin.is_high() {
        Ok(level) => level,
        Err(error) => match error {},
    }
}

/// Combined 2-bit A/B state, inverted for the active-low wiring.
fn read_ab_state<A, B>(line_a: &mut A, line_b: &mut B) -> u8
where
    A: InputPin<Error = Infallible>,
    B: InputPin<Error = Infallible>,
{
    let a = !read_level(line_a);
    let b = !read_level(line_b);
    (u8::from(a) << 1) | u8::from(b)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ButtonEvent, Direction};

    use std::cell::Cell;
    use std::rc::Rc;

    /// Shared-level fake input line. Clones observe the same level, so
    /// the test keeps one handle while the channel owns the other.
    #[derive(Clone)]
    struct FakeLine(Rc<Cell<bool>>);

    impl FakeLine {
        fn high() -> Self {
            FakeLine(Rc::new(Cell::new(true)))
        }

        fn set(&self, level: bool) {
            self.0.set(level);
        }
    }

    impl embedded_hal::digital::ErrorType for FakeLine {
        type Error = Infallible;
    }

    impl InputPin for FakeLine {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.get())
        }
    }

    struct Harness {
        a: FakeLine,
        b: FakeLine,
        sw: FakeLine,
        channel: EncoderChannel<FakeLine, FakeLine, FakeLine>,
    }

    impl Harness {
        /// All lines idle high (logical state 00, button released).
        fn new(detent_threshold: u8) -> Self {
            let a = FakeLine::high();
            let b = FakeLine::high();
            let sw = FakeLine::high();
            let config = ChannelConfig {
                index: 0,
                detent_threshold,
            };
            let channel = EncoderChannel::new(
                config,
                a.clone(),
                b.clone(),
                sw.clone(),
                at(0),
            )
            .unwrap();
            Harness { a, b, sw, channel }
        }

        /// Drive the raw lines to show the given logical 2-bit state.
        fn set_ab(&self, state: u8) {
            // Logical 1 is a low line (active-low wiring).
            self.a.set(state & 0b10 == 0);
            self.b.set(state & 0b01 == 0);
        }

        /// Walk one full clockwise detent cycle, returning the events of
        /// the final poll.
        fn clockwise_cycle(&mut self, start_micros: u64) -> EventSet {
            let mut last = EventSet::default();
            for (i, state) in [0b01, 0b11, 0b10, 0b00].iter().enumerate() {
                self.set_ab(*state);
                last = self.channel.update(at(start_micros + i as u64 * 250));
            }
            last
        }

        /// Walk one full counter-clockwise detent cycle.
        fn counter_clockwise_cycle(&mut self, start_micros: u64) -> EventSet {
            let mut last = EventSet::default();
            for (i, state) in [0b10, 0b11, 0b01, 0b00].iter().enumerate() {
                self.set_ab(*state);
                last = self.channel.update(at(start_micros + i as u64 * 250));
            }
            last
        }
    }

    fn at(micros: u64) -> Instant {
        Instant::from_micros(micros)
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn zero_threshold_is_rejected() {
        let config = ChannelConfig {
            index: 0,
            detent_threshold: 0,
        };
        let result = EncoderChannel::new(
            config,
            FakeLine::high(),
            FakeLine::high(),
            FakeLine::high(),
            at(0),
        );
        assert_eq!(result.err(), Some(ConfigError::ZeroDetentThreshold));
    }

    #[test]
    fn initial_state_is_latched_not_assumed() {
        // Lines already mid-cycle at construction: A low, B high → 10.
        let a = FakeLine::high();
        let b = FakeLine::high();
        let sw = FakeLine::high();
        a.set(false);

        let mut channel = EncoderChannel::new(
            ChannelConfig::new(0),
            a.clone(),
            b.clone(),
            sw.clone(),
            at(0),
        )
        .unwrap();

        // First poll sees the same state — no phantom sub-step.
        let events = channel.update(at(1_000));
        assert!(events.is_empty());
    }

    // ── Rotation ─────────────────────────────────────────────────────

    #[test]
    fn one_clockwise_cycle_yields_one_detent_on_the_fourth_poll() {
        let mut h = Harness::new(4);

        // First three transitions stay below the threshold.
        for (i, state) in [0b01, 0b11, 0b10].iter().enumerate() {
            h.set_ab(*state);
            let events = h.channel.update(at(i as u64 * 250));
            assert!(events.is_empty(), "premature event at poll {}", i);
        }

        h.set_ab(0b00);
        let events = h.channel.update(at(1_000));
        assert_eq!(events.rotation, Some(Direction::Clockwise));
        assert!(events.button.is_none());
    }

    #[test]
    fn counter_clockwise_cycle_yields_a_counter_clockwise_detent() {
        let mut h = Harness::new(4);
        let events = h.counter_clockwise_cycle(0);
        assert_eq!(events.rotation, Some(Direction::CounterClockwise));
    }

    #[test]
    fn double_bit_jump_is_ignored_but_state_advances() {
        let mut h = Harness::new(4);

        // 00 → 11 changes both bits at once — decoded as nothing.
        h.set_ab(0b11);
        let events = h.channel.update(at(250));
        assert!(events.is_empty());
        assert_eq!(h.channel.detent.sub_steps(), 0);
        assert_eq!(h.channel.quadrature_state, 0b11);

        // The state still advanced, so decoding resumes from 11.
        h.set_ab(0b10);
        h.channel.update(at(500));
        assert_eq!(h.channel.detent.sub_steps(), 1);
    }

    #[test]
    fn unchanged_lines_produce_no_events() {
        let mut h = Harness::new(4);
        for i in 0..10 {
            assert!(h.channel.update(at(i * 1_000)).is_empty());
        }
    }

    // ── Movement accumulator ─────────────────────────────────────────

    #[test]
    fn drain_returns_net_detents_and_resets() {
        let mut h = Harness::new(4);
        let mut t = 0;
        for _ in 0..3 {
            h.clockwise_cycle(t);
            t += 1_000;
        }
        for _ in 0..2 {
            h.counter_clockwise_cycle(t);
            t += 1_000;
        }

        assert_eq!(h.channel.drain_movement(), 1);
        assert_eq!(h.channel.drain_movement(), 0);
    }

    #[test]
    fn movement_saturates_at_plus_127() {
        let mut h = Harness::new(4);
        let mut t = 0;
        for _ in 0..130 {
            h.clockwise_cycle(t);
            t += 1_000;
        }
        assert_eq!(h.channel.drain_movement(), 127);
    }

    #[test]
    fn movement_saturates_at_minus_127() {
        let mut h = Harness::new(4);
        let mut t = 0;
        for _ in 0..130 {
            h.counter_clockwise_cycle(t);
            t += 1_000;
        }
        assert_eq!(h.channel.drain_movement(), -127);
    }

    // ── Button ───────────────────────────────────────────────────────

    #[test]
    fn button_press_and_release_round_trip() {
        let mut h = Harness::new(4);

        h.sw.set(false);
        let events = h.channel.update(at(25_000));
        assert_eq!(events.button, Some(ButtonEvent::Pressed));
        assert!(h.channel.is_pressed());

        h.sw.set(true);
        let events = h.channel.update(at(50_000));
        assert_eq!(events.button, Some(ButtonEvent::Released));
        assert!(!h.channel.is_pressed());
    }

    #[test]
    fn rotation_and_button_can_fire_in_the_same_poll() {
        let mut h = Harness::new(4);

        // Three sub-steps in, then the final transition lands in the
        // same poll as a debounce-accepted press.
        for (i, state) in [0b01, 0b11, 0b10].iter().enumerate() {
            h.set_ab(*state);
            h.channel.update(at(i as u64 * 250));
        }
        h.set_ab(0b00);
        h.sw.set(false);

        let events = h.channel.update(at(25_000));
        assert_eq!(events.rotation, Some(Direction::Clockwise));
        assert_eq!(events.button, Some(ButtonEvent::Pressed));
    }

    #[test]
    fn bouncy_press_is_debounced_at_channel_level() {
        let mut h = Harness::new(4);

        // Chatter within the gate window.
        h.sw.set(false);
        assert!(h.channel.update(at(1_000)).is_empty());
        h.sw.set(true);
        assert!(h.channel.update(at(2_000)).is_empty());
        h.sw.set(false);
        assert!(h.channel.update(at(3_000)).is_empty());

        // Settled low; accepted at the first poll after the gate opens.
        let events = h.channel.update(at(20_000));
        assert_eq!(events.button, Some(ButtonEvent::Pressed));
    }

    // ── Custom threshold ─────────────────────────────────────────────

    #[test]
    fn half_cycle_completes_a_detent_at_threshold_two() {
        let mut h = Harness::new(2);

        h.set_ab(0b01);
        assert!(h.channel.update(at(250)).is_empty());
        h.set_ab(0b11);
        let events = h.channel.update(at(500));
        assert_eq!(events.rotation, Some(Direction::Clockwise));
    }
}
