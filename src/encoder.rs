//! Three-channel (A, B, Z) rotary encoder.
//!
//! [`Encoder`] owns up to one [`Channel`] per [`ChannelId`] and reads the
//! interrupt-side timing latches to report per-channel intervals, the
//! revolution time, an RPM estimate and a per-revolution notch check.

use core::fmt;

use crate::channel::{Channel, ChannelStatus};
use crate::error::EncoderError;
use crate::pin::{InterruptPin, PinMode, Signal};
use crate::timing::{EdgeTimer, IndexTimer};

const MICROS_PER_MINUTE: f32 = 60_000_000.0;

/// Longest text [`Encoder::write_state`] can produce: `u32::MAX` NPR and
/// notch count, three `pin 255 INPUT_PULLUP FALLING INACTIVE` channels and
/// `u64::MAX` intervals.
pub const STATE_LEN_MAX: usize = 233;

/// Logical role of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelId {
    /// Quadrature phase A. Its edges are the notch count.
    A,
    /// Quadrature phase B.
    B,
    /// Index pulse, once per revolution.
    Z,
}

impl ChannelId {
    pub const ALL: [ChannelId; 3] = [ChannelId::A, ChannelId::B, ChannelId::Z];

    fn slot(self) -> usize {
        match self {
            ChannelId::A => 0,
            ChannelId::B => 1,
            ChannelId::Z => 2,
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ChannelId::A => "A",
            ChannelId::B => "B",
            ChannelId::Z => "Z",
        };
        f.write_str(name)
    }
}

/// The interrupt-side latches an [`Encoder`] reads from.
///
/// These are normally `static` items so that the `fn()` handlers passed to
/// [`Encoder::start`] can reach them. `z` should count notches from `a`.
#[derive(Clone, Copy)]
pub struct EncoderTimers<'a> {
    pub a: &'a EdgeTimer,
    pub b: &'a EdgeTimer,
    pub z: &'a IndexTimer<'a>,
}

/// Encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Notches per revolution. 0 disables RPM-from-A and the notch check.
    pub npr: u32,
    /// Allowed difference between counted and expected A edges per
    /// revolution before [`Encoder::check_revolution`] reports a failure.
    pub notch_tolerance: u32,
}

/// Outcome of comparing the last revolution's notch count with the NPR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexCheck {
    /// No complete revolution measured yet, or nothing to compare against.
    Pending,
    /// Count within tolerance.
    Pass { counted: u32 },
    /// Count outside tolerance.
    Fail { expected: u32, counted: u32 },
}

/// A rotary encoder made of up to three interrupt-driven channels.
///
/// # Example
///
/// ```ignore
/// use encoder_quality_check::{ChannelId, Encoder, EncoderTimers, PinMode, Signal};
///
/// let mut encoder = Encoder::new(600, EncoderTimers { a: &A, b: &B, z: &Z });
/// encoder.add_channel(ChannelId::A, pin_a, PinMode::PullUp, Signal::Rising)?;
/// encoder.add_channel(ChannelId::Z, pin_z, PinMode::PullUp, Signal::Rising)?;
/// encoder.start(ChannelId::A, on_a_edge)?;
/// encoder.start(ChannelId::Z, on_z_edge)?;
///
/// let interval = encoder.channel_a_int_frequency_micros();
/// ```
pub struct Encoder<'a, P: InterruptPin> {
    config: EncoderConfig,
    channels: [Option<Channel<P>>; 3],
    timers: EncoderTimers<'a>,
}

impl<'a, P: InterruptPin> Encoder<'a, P> {
    /// Create an encoder with `npr` notches per revolution and no channels.
    pub fn new(npr: u32, timers: EncoderTimers<'a>) -> Self {
        Self::with_config(
            EncoderConfig {
                npr,
                ..EncoderConfig::default()
            },
            timers,
        )
    }

    pub fn with_config(config: EncoderConfig, timers: EncoderTimers<'a>) -> Self {
        Self {
            config,
            channels: [None, None, None],
            timers,
        }
    }

    pub fn npr(&self) -> u32 {
        self.config.npr
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Channel registration
    // -----------------------------------------------------------------------

    /// Build a [`Channel`] on `pin` and store it in slot `id`.
    ///
    /// The slot's timing data is cleared. The pin is dropped if the call
    /// fails.
    ///
    /// # Errors
    /// * [`EncoderError::ChannelInUse`] if the slot is already occupied
    /// * [`EncoderError::BadConfig`] if the channel failed configuration
    pub fn add_channel(
        &mut self,
        id: ChannelId,
        pin: P,
        pin_mode: PinMode,
        signal: Signal,
    ) -> Result<(), EncoderError<P::Error>> {
        if self.channels[id.slot()].is_some() {
            #[cfg(feature = "defmt")]
            defmt::warn!("channel {} already assigned", id);
            return Err(EncoderError::ChannelInUse(id));
        }

        let channel = Channel::new(pin, pin_mode, signal);
        if channel.status() == ChannelStatus::BadConfig {
            return Err(EncoderError::BadConfig(id));
        }

        self.reset_timing(id);
        self.channels[id.slot()] = Some(channel);
        Ok(())
    }

    /// Release the channel in slot `id`, if any, and clear its timing data.
    pub fn remove_channel(&mut self, id: ChannelId) -> Option<Channel<P>> {
        let channel = self.channels[id.slot()].take();
        if channel.is_some() {
            self.reset_timing(id);
        }
        channel
    }

    pub fn channel(&self, id: ChannelId) -> Option<&Channel<P>> {
        self.channels[id.slot()].as_ref()
    }

    /// Attach `handler` to the channel in slot `id`.
    pub fn start(&mut self, id: ChannelId, handler: fn()) -> Result<(), EncoderError<P::Error>> {
        self.channel_mut(id)?.start_isr(handler)?;
        Ok(())
    }

    /// Detach the handler of the channel in slot `id` and clear its timing
    /// data.
    ///
    /// Edges are missed while a channel is stopped, so the next one can no
    /// longer be paired with the last. Stopping A also discards the
    /// revolution data, whose notch count relies on every A edge.
    pub fn stop(&mut self, id: ChannelId) -> Result<(), EncoderError<P::Error>> {
        self.channel_mut(id)?.stop_isr()?;
        self.reset_timing(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Timing queries
    // -----------------------------------------------------------------------

    /// Microseconds between the two most recent A interrupts, 0 if unknown.
    pub fn channel_a_int_frequency_micros(&self) -> u64 {
        self.timers.a.interval_micros()
    }

    /// Microseconds between the two most recent B interrupts, 0 if unknown.
    pub fn channel_b_int_frequency_micros(&self) -> u64 {
        self.timers.b.interval_micros()
    }

    /// Microseconds between the two most recent index pulses (the
    /// revolution time), 0 if unknown.
    pub fn channel_z_int_frequency_micros(&self) -> u64 {
        self.timers.z.revolution_micros()
    }

    /// A edges counted during the last complete revolution.
    pub fn notches(&self) -> Option<u32> {
        self.timers.z.notches()
    }

    /// Rotation speed in revolutions per minute.
    ///
    /// Uses the revolution time when the index channel has measured one,
    /// otherwise the A interval scaled by NPR.
    pub fn rpm(&self) -> Option<f32> {
        let revolution = self.channel_z_int_frequency_micros();
        if revolution > 0 {
            return Some(MICROS_PER_MINUTE / revolution as f32);
        }

        let interval = self.channel_a_int_frequency_micros();
        let per_notch = self.a_edges_per_notch()?;
        if interval == 0 || self.config.npr == 0 {
            return None;
        }

        let micros_per_rev = interval as f32 * self.config.npr as f32 * per_notch as f32;
        Some(MICROS_PER_MINUTE / micros_per_rev)
    }

    /// Compare the A edges of the last revolution with what NPR predicts.
    pub fn check_revolution(&self) -> IndexCheck {
        let Some(per_notch) = self.a_edges_per_notch() else {
            return IndexCheck::Pending;
        };
        let Some(counted) = self.notches() else {
            return IndexCheck::Pending;
        };
        if self.config.npr == 0 {
            return IndexCheck::Pending;
        }

        let expected = self.config.npr.saturating_mul(per_notch);
        if counted.abs_diff(expected) <= self.config.notch_tolerance {
            IndexCheck::Pass { counted }
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("revolution counted {} A edges, expected {}", counted, expected);
            IndexCheck::Fail { expected, counted }
        }
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    /// Write the aggregate encoder state as one line of text.
    ///
    /// ```text
    /// NPR 600 | A: pin 2 INPUT RISING ACTIVE 250us | B: - | Z: - | notches -
    /// ```
    pub fn write_state<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "NPR {}", self.config.npr)?;

        for id in ChannelId::ALL {
            write!(out, " | {}: ", id)?;
            match self.channel(id) {
                Some(channel) => {
                    channel.print(out)?;
                    write!(out, " {}us", self.interval_micros(id))?;
                }
                None => out.write_str("-")?,
            }
        }

        match self.notches() {
            Some(notches) => write!(out, " | notches {}", notches),
            None => out.write_str(" | notches -"),
        }
    }

    /// [`write_state`](Self::write_state) into a fixed-capacity string.
    ///
    /// A capacity of [`STATE_LEN_MAX`] never overflows.
    pub fn state_string<const N: usize>(&self) -> Result<heapless::String<N>, fmt::Error> {
        let mut text = heapless::String::new();
        self.write_state(&mut text)?;
        Ok(text)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn channel_mut(&mut self, id: ChannelId) -> Result<&mut Channel<P>, EncoderError<P::Error>> {
        self.channels[id.slot()]
            .as_mut()
            .ok_or(EncoderError::NoChannel(id))
    }

    fn interval_micros(&self, id: ChannelId) -> u64 {
        match id {
            ChannelId::A => self.channel_a_int_frequency_micros(),
            ChannelId::B => self.channel_b_int_frequency_micros(),
            ChannelId::Z => self.channel_z_int_frequency_micros(),
        }
    }

    fn a_edges_per_notch(&self) -> Option<u32> {
        self.channel(ChannelId::A)?.signal().edges_per_notch()
    }

    fn reset_timing(&self, id: ChannelId) {
        match id {
            // The index mark is an A edge count, so it goes stale with A.
            ChannelId::A => {
                self.timers.a.reset();
                self.reset_z_channel_data();
            }
            ChannelId::B => self.timers.b.reset(),
            ChannelId::Z => self.reset_z_channel_data(),
        }
    }

    fn reset_z_channel_data(&self) {
        self.timers.z.reset();
    }
}

impl<P: InterruptPin> fmt::Display for Encoder<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_state(f)
    }
}
