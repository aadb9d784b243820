//! Pin configuration types and the interrupt-pin seam to the HAL.
//!
//! The crate never touches hardware registers itself. Board support code
//! implements [`InterruptPin`] for whatever pin type the HAL provides (see
//! [`AsyncEdgePin`](crate::AsyncEdgePin) for async HALs such as Embassy).

use core::fmt;

/// Electrical configuration of a channel pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Push-pull output. Not usable as an encoder channel.
    Output,
    /// Input with the internal pull-up enabled.
    PullUp,
}

impl PinMode {
    /// Returns `true` if the pin can be sampled and trigger interrupts.
    pub fn is_input(self) -> bool {
        !matches!(self, PinMode::Output)
    }

    /// Upper-case label used in channel descriptions.
    pub fn label(self) -> &'static str {
        match self {
            PinMode::Input => "INPUT",
            PinMode::Output => "OUTPUT",
            PinMode::PullUp => "INPUT_PULLUP",
        }
    }
}

/// Condition on which a channel interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// High-to-low transition.
    Falling,
    /// Low-to-high transition.
    Rising,
    /// While the line is held low.
    Low,
    /// While the line is held high.
    High,
    /// Any transition.
    Change,
}

impl Signal {
    /// Number of interrupts a single encoder notch produces on this signal.
    ///
    /// Level triggers fire for as long as the level holds, so they have no
    /// fixed ratio and return `None`.
    pub fn edges_per_notch(self) -> Option<u32> {
        match self {
            Signal::Rising | Signal::Falling => Some(1),
            Signal::Change => Some(2),
            Signal::Low | Signal::High => None,
        }
    }

    /// Upper-case label used in channel descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Signal::Falling => "FALLING",
            Signal::Rising => "RISING",
            Signal::Low => "LOW",
            Signal::High => "HIGH",
            Signal::Change => "CHANGE",
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A GPIO pin that can be configured and can run a handler on a [`Signal`].
///
/// Handlers are plain `fn()` pointers because that is what interrupt
/// vectors can call. State the handler needs lives in `static` items,
/// typically an [`EdgeTimer`](crate::EdgeTimer) or
/// [`IndexTimer`](crate::IndexTimer).
pub trait InterruptPin {
    /// Error reported by the underlying pin driver.
    type Error;

    /// Board pin number, used for descriptions and logging.
    fn number(&self) -> u8;

    /// Apply the electrical configuration.
    fn configure(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Register `handler` to run whenever `signal` occurs on this pin.
    fn attach(&mut self, signal: Signal, handler: fn()) -> Result<(), Self::Error>;

    /// Remove the registered handler.
    fn detach(&mut self) -> Result<(), Self::Error>;
}
