//! Interrupt-driven reader for three-channel (A, B, Z) rotary encoders.
//!
//! This crate measures encoder timing from pin interrupts: the interval
//! between consecutive edges on each channel, the revolution time from the
//! index pulse, and how many A edges arrived in each revolution. The last
//! one is compared against the encoder's notches per revolution (NPR) to
//! spot missed or spurious counts.
//!
//! # Architecture
//!
//! - **[`InterruptPin`]**: the only hardware seam. A board implements it for
//!   its pin type, or uses [`AsyncEdgePin`] on async HALs such as Embassy.
//! - **[`Channel`]**: one configured pin with its trigger [`Signal`] and
//!   ISR state.
//! - **[`EdgeTimer`] / [`IndexTimer`]**: `static`-friendly latches updated
//!   from the handler through [`ChannelIsr::on_interrupt`].
//! - **[`Encoder`]**: owns the A/B/Z channels and reads the latches.
//!
//! # Quick start
//!
//! ```ignore
//! use embassy_time::Instant;
//! use encoder_quality_check::*;
//!
//! static A: EdgeTimer = EdgeTimer::new();
//! static B: EdgeTimer = EdgeTimer::new();
//! static Z: IndexTimer<'static> = IndexTimer::new(&A);
//!
//! fn on_a() { A.on_interrupt(Instant::now()); }
//! fn on_z() { Z.on_interrupt(Instant::now()); }
//!
//! let mut encoder = Encoder::new(600, EncoderTimers { a: &A, b: &B, z: &Z });
//! encoder.add_channel(ChannelId::A, pin_a, PinMode::PullUp, Signal::Rising)?;
//! encoder.add_channel(ChannelId::Z, pin_z, PinMode::PullUp, Signal::Rising)?;
//! encoder.start(ChannelId::A, on_a)?;
//! encoder.start(ChannelId::Z, on_z)?;
//!
//! let state: heapless::String<STATE_LEN_MAX> = encoder.state_string()?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: enable [`defmt::Format`] implementations and
//!   configuration warnings for embedded logging.

#![no_std]

pub use channel::{Channel, ChannelStatus};
pub use dispatch::{AsyncEdgePin, EdgeDispatch};
pub use encoder::{
    ChannelId, Encoder, EncoderConfig, EncoderTimers, IndexCheck, STATE_LEN_MAX,
};
pub use error::{ChannelError, DispatchError, EncoderError};
pub use pin::{InterruptPin, PinMode, Signal};
pub use timing::{ChannelIsr, EdgeLatch, EdgeTimer, IndexLatch, IndexTimer};

mod channel;
mod dispatch;
mod encoder;
mod error;
mod pin;
mod timing;

#[cfg(test)]
mod test_pin;
