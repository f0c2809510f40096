//! Accumulated-motion example
//!
//! Demonstrates the raw-motion output shape of `encoder-core` on the
//! Raspberry Pi Pico: channels are polled every millisecond, and every
//! 10 ms the accumulated movement of all four encoders is drained into a
//! payload of four signed bytes plus a button bitmask — the same shape a
//! vendor report channel would carry to the host. The payload is logged
//! via defmt whenever there is movement or the button mask changed.
//!
//! # Wiring
//!
//! | Encoder | A (CLK) | B (DT) | SW (Button) |
//! |---------|---------|--------|-------------|
//! | 1       | GP2     | GP3    | GP4         |
//! | 2       | GP5     | GP6    | GP7         |
//! | 3       | GP8     | GP9    | GP10        |
//! | 4       | GP11    | GP12   | GP13        |
//!
//! All lines are active-low with internal pull-ups enabled.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use encoder_core::{ChannelConfig, EncoderChannel};

/// Channels are serviced once per poll period.
const POLL_PERIOD: Duration = Duration::from_millis(1);

/// Accumulated movement is drained on this cadence.
const REPORT_INTERVAL: Duration = Duration::from_millis(10);

/// Concrete channel type — all lines are type-erased RP2040 inputs.
type Channel = EncoderChannel<Input<'static>, Input<'static>, Input<'static>>;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("motion-report example starting");

    let now = Instant::now();
    let mut channels: [Channel; 4] = [
        EncoderChannel::new(
            ChannelConfig::new(0),
            Input::new(p.PIN_2, Pull::Up),
            Input::new(p.PIN_3, Pull::Up),
            Input::new(p.PIN_4, Pull::Up),
            now,
        )
        .expect("encoder 1 configuration invalid"),
        EncoderChannel::new(
            ChannelConfig::new(1),
            Input::new(p.PIN_5, Pull::Up),
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
            now,
        )
        .expect("encoder 2 configuration invalid"),
        EncoderChannel::new(
            ChannelConfig::new(2),
            Input::new(p.PIN_8, Pull::Up),
            Input::new(p.PIN_9, Pull::Up),
            Input::new(p.PIN_10, Pull::Up),
            now,
        )
        .expect("encoder 3 configuration invalid"),
        EncoderChannel::new(
            ChannelConfig::new(3),
            Input::new(p.PIN_11, Pull::Up),
            Input::new(p.PIN_12, Pull::Up),
            Input::new(p.PIN_13, Pull::Up),
            now,
        )
        .expect("encoder 4 configuration invalid"),
    ];

    info!("channels initialized — turn a knob to see motion payloads");

    let mut ticker = Ticker::every(POLL_PERIOD);
    let mut last_drained = Instant::now();
    let mut last_buttons = 0u8;

    loop {
        let now = Instant::now();

        // Per-poll events are not consumed in this shape; the channels
        // accumulate detents internally until the next drain below.
        for channel in channels.iter_mut() {
            channel.update(now);
        }

        if now.duration_since(last_drained) >= REPORT_INTERVAL {
            let mut movement = [0i8; 4];
            for (slot, channel) in movement.iter_mut().zip(channels.iter_mut()) {
                *slot = channel.drain_movement();
            }

            let mut buttons = 0u8;
            for (i, channel) in channels.iter().enumerate() {
                if channel.is_pressed() {
                    buttons |= 1 << i;
                }
            }

            // Quiet when idle: emit only on movement or a button change.
            let has_movement = movement.iter().any(|&m| m != 0);
            if has_movement || buttons != last_buttons {
                info!(
                    "motion [{=i8} {=i8} {=i8} {=i8}] buttons {=u8:b}",
                    movement[0], movement[1], movement[2], movement[3], buttons,
                );
                last_buttons = buttons;
            }

            last_drained = now;
        }

        ticker.next().await;
    }
}
