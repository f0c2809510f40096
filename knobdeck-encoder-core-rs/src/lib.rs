//! Signal-processing core for the knobdeck rotary encoders.
//!
//! This crate turns raw digital line levels from four independent rotary
//! encoders (each with a push button) into discrete application events:
//! quadrature decoding, detent accumulation, and debounced button-edge
//! detection. It contains no USB, report-transport, or host-side logic —
//! the owning firmware polls each [`EncoderChannel`] in a tight loop and
//! forwards the resulting events or drained motion to its report channel.
//!
//! # Architecture
//!
//! ```text
//! firmware main loop (1 ms cadence)
//!         │  update() per channel, fixed order
//!         ▼
//! EncoderChannel ──► EventSet { rotation, button }     (discrete shape)
//!   │    │
//!   │    └─ DebouncedButton    20 ms single-threshold gate
//!   └─ quadrature decode ─ DetentAccumulator ─ movement accumulator
//!                                                      │
//!                                     drain_movement() ┘ (motion shape,
//!                                                       10 ms report cadence)
//! ```
//!
//! Channels are fully independent: no shared state, no locking, no
//! blocking. Each `update` call completes in microseconds — a handful of
//! line reads and integer state transitions.
//!
//! # Output shapes
//!
//! Two mutually exclusive firmware shapes consume a channel:
//!
//! - **Discrete events** — each detent or accepted press maps to one key
//!   identifier via [`KeyAssignment`], emitted once per event.
//! - **Accumulated motion** — detents accumulate into a signed byte
//!   drained by [`EncoderChannel::drain_movement`] on the owner's report
//!   cadence, clamped to [-127, 127].
//!
//! # Crate features
//!
//! - **`defmt`** — structured logging at event-emission points and
//!   `defmt::Format` derives on the event types.

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod debounce;
pub mod error;
pub mod events;
pub mod keymap;
pub mod quadrature;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use channel::{ChannelConfig, EncoderChannel, DEFAULT_DETENT_THRESHOLD};
pub use debounce::{DebouncedButton, DEBOUNCE_INTERVAL};
pub use error::ConfigError;
pub use events::{ButtonEvent, Direction, EventSet};
pub use keymap::KeyAssignment;
pub use quadrature::{decode_transition, DetentAccumulator};
