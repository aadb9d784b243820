//! A single interrupt-driven encoder channel.
//!
//! [`Channel`] owns one pin, remembers how it was configured, and tracks
//! whether a handler is currently attached. It never fails on
//! construction: a pin that could not be configured reports
//! [`ChannelStatus::BadConfig`] instead.

use core::fmt;

use crate::error::ChannelError;
use crate::pin::{InterruptPin, PinMode, Signal};

/// Lifecycle state of a [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelStatus {
    /// The pin could not be configured for interrupt input.
    #[default]
    BadConfig,
    /// A handler is attached and interrupts are being delivered.
    Active,
    /// Configured, but no handler is attached.
    Inactive,
}

impl ChannelStatus {
    /// Upper-case label used in channel descriptions.
    pub fn label(self) -> &'static str {
        match self {
            ChannelStatus::BadConfig => "BAD_CONFIG",
            ChannelStatus::Active => "ACTIVE",
            ChannelStatus::Inactive => "INACTIVE",
        }
    }
}

/// One encoder signal line wired to an interrupt-capable pin.
///
/// # Example
///
/// ```ignore
/// use encoder_quality_check::{Channel, ChannelStatus, PinMode, Signal};
///
/// let mut channel = Channel::new(pin, PinMode::PullUp, Signal::Rising);
/// assert_eq!(channel.status(), ChannelStatus::Inactive);
///
/// channel.start_isr(on_a_edge)?;
/// assert!(channel.is_isr_active());
/// ```
pub struct Channel<P: InterruptPin> {
    pin: P,
    pin_mode: PinMode,
    signal: Signal,
    isr_active: bool,
    status: ChannelStatus,
}

impl<P: InterruptPin> Channel<P> {
    /// Configure `pin` and wrap it as a channel.
    ///
    /// The status is [`Inactive`](ChannelStatus::Inactive) when the pin
    /// accepted the configuration. An output mode, or a pin driver error,
    /// leaves it at [`BadConfig`](ChannelStatus::BadConfig).
    pub fn new(mut pin: P, pin_mode: PinMode, signal: Signal) -> Self {
        let status = if !pin_mode.is_input() {
            #[cfg(feature = "defmt")]
            defmt::warn!("pin {}: output mode cannot trigger interrupts", pin.number());
            ChannelStatus::BadConfig
        } else {
            match pin.configure(pin_mode) {
                Ok(()) => ChannelStatus::Inactive,
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("pin {}: configuration rejected", pin.number());
                    ChannelStatus::BadConfig
                }
            }
        };

        Self {
            pin,
            pin_mode,
            signal,
            isr_active: false,
            status,
        }
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn pin_mode(&self) -> PinMode {
        self.pin_mode
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }

    /// Board pin number reported by the pin driver.
    pub fn pin(&self) -> u8 {
        self.pin.number()
    }

    /// Borrow the wrapped pin driver.
    pub fn pin_driver(&self) -> &P {
        &self.pin
    }

    pub fn is_isr_active(&self) -> bool {
        self.isr_active
    }

    /// Write a one-line description, e.g. `pin 2 INPUT RISING ACTIVE`.
    pub fn print<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "pin {} {} {} {}",
            self.pin(),
            self.pin_mode,
            self.signal,
            self.status.label()
        )
    }

    /// Attach `handler` to run on the configured [`Signal`].
    ///
    /// # Errors
    /// * [`ChannelError::BadConfig`] if the channel failed configuration
    /// * [`ChannelError::IsrActive`] if a handler is already attached
    /// * [`ChannelError::Pin`] if the pin driver refused the handler
    pub fn start_isr(&mut self, handler: fn()) -> Result<(), ChannelError<P::Error>> {
        if self.status == ChannelStatus::BadConfig {
            return Err(ChannelError::BadConfig);
        }
        if self.isr_active {
            return Err(ChannelError::IsrActive);
        }

        self.pin.attach(self.signal, handler)?;

        self.isr_active = true;
        self.status = ChannelStatus::Active;

        #[cfg(feature = "defmt")]
        defmt::debug!("pin {}: ISR attached on {}", self.pin.number(), self.signal);

        Ok(())
    }

    /// Detach the running handler.
    ///
    /// # Errors
    /// * [`ChannelError::IsrInactive`] if nothing is attached
    /// * [`ChannelError::Pin`] if the pin driver failed to detach; the
    ///   channel then still counts as active
    pub fn stop_isr(&mut self) -> Result<(), ChannelError<P::Error>> {
        if !self.isr_active {
            return Err(ChannelError::IsrInactive);
        }

        self.pin.detach()?;

        self.isr_active = false;
        self.status = ChannelStatus::Inactive;

        #[cfg(feature = "defmt")]
        defmt::debug!("pin {}: ISR detached", self.pin.number());

        Ok(())
    }
}

impl<P: InterruptPin> fmt::Display for Channel<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.print(f)
    }
}

impl<P: InterruptPin> Drop for Channel<P> {
    fn drop(&mut self) {
        if self.isr_active {
            // Nothing left to report a failure to.
            let _ = self.pin.detach();
        }
    }
}
