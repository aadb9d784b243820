//! Error types for channels and the encoder.

use core::fmt;

use crate::encoder::ChannelId;

/// Errors reported by a [`Channel`](crate::Channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError<E> {
    /// Underlying pin driver error.
    Pin(E),

    /// The channel failed configuration and cannot run an ISR.
    BadConfig,

    /// A handler is already attached.
    IsrActive,

    /// No handler is attached.
    IsrInactive,
}

// Allow ergonomic `?` propagation from raw pin errors.
impl<E> From<E> for ChannelError<E> {
    fn from(error: E) -> Self {
        ChannelError::Pin(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ChannelError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelError::Pin(e) => write!(f, "Pin error: {:?}", e),
            ChannelError::BadConfig => write!(f, "Channel is badly configured"),
            ChannelError::IsrActive => write!(f, "ISR already attached"),
            ChannelError::IsrInactive => write!(f, "No ISR attached"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ChannelError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ChannelError::Pin(e) => defmt::write!(f, "Pin error: {}", e),
            ChannelError::BadConfig => defmt::write!(f, "Channel is badly configured"),
            ChannelError::IsrActive => defmt::write!(f, "ISR already attached"),
            ChannelError::IsrInactive => defmt::write!(f, "No ISR attached"),
        }
    }
}

/// Errors reported by an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError<E> {
    /// Error from the channel occupying the addressed slot.
    Channel(ChannelError<E>),

    /// The slot already holds a channel.
    ChannelInUse(ChannelId),

    /// No channel is registered in the slot.
    NoChannel(ChannelId),

    /// The new channel came up with [`ChannelStatus::BadConfig`](crate::ChannelStatus::BadConfig).
    BadConfig(ChannelId),
}

impl<E> From<ChannelError<E>> for EncoderError<E> {
    fn from(error: ChannelError<E>) -> Self {
        EncoderError::Channel(error)
    }
}

impl<E: fmt::Debug> fmt::Display for EncoderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::Channel(e) => write!(f, "{}", e),
            EncoderError::ChannelInUse(id) => write!(f, "Channel {} already assigned", id),
            EncoderError::NoChannel(id) => write!(f, "Channel {} not assigned", id),
            EncoderError::BadConfig(id) => write!(f, "Channel {} failed configuration", id),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for EncoderError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::Channel(e) => defmt::write!(f, "{}", e),
            EncoderError::ChannelInUse(id) => defmt::write!(f, "Channel {} already assigned", id),
            EncoderError::NoChannel(id) => defmt::write!(f, "Channel {} not assigned", id),
            EncoderError::BadConfig(id) => defmt::write!(f, "Channel {} failed configuration", id),
        }
    }
}

/// Errors from [`AsyncEdgePin`](crate::AsyncEdgePin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// The requested pin mode cannot deliver edge events.
    Unsupported,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DispatchError::Unsupported => write!(f, "Pin mode cannot deliver edge events"),
        }
    }
}
