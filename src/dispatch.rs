//! [`InterruptPin`] adapter for async HALs.
//!
//! Async HALs such as Embassy do not hand out interrupt vectors; they
//! expose pins implementing [`embedded_hal_async::digital::Wait`] instead.
//! [`EdgeDispatch`] bridges the two: the channel side holds an
//! [`AsyncEdgePin`] that records which handler to run and on which
//! [`Signal`], and a task drives [`EdgeDispatch::run`] with the real pin.
//!
//! ```ignore
//! static A_DISPATCH: EdgeDispatch = EdgeDispatch::new();
//!
//! #[embassy_executor::task]
//! async fn a_edges(mut input: Input<'static>) {
//!     let _ = A_DISPATCH.run(&mut input).await;
//! }
//!
//! encoder.add_channel(ChannelId::A, A_DISPATCH.pin(2), PinMode::PullUp, Signal::Rising)?;
//! ```

use core::cell::Cell;
use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal as Notify;
use embedded_hal_async::digital::Wait;

use crate::error::DispatchError;
use crate::pin::{InterruptPin, PinMode, Signal};

type Route = Option<(Signal, fn())>;

/// Shared slot between an [`AsyncEdgePin`] and the task waiting on the
/// physical pin.
pub struct EdgeDispatch {
    route: Mutex<CriticalSectionRawMutex, Cell<Route>>,
    armed: Notify<CriticalSectionRawMutex, ()>,
}

impl EdgeDispatch {
    pub const fn new() -> Self {
        Self {
            route: Mutex::new(Cell::new(None)),
            armed: Notify::new(),
        }
    }

    /// Channel-side handle for board pin `number`.
    pub fn pin(&self, number: u8) -> AsyncEdgePin<'_> {
        AsyncEdgePin {
            number,
            dispatch: self,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.route().is_some()
    }

    fn route(&self) -> Route {
        self.route.lock(|route| route.get())
    }

    fn set_route(&self, route: Route) {
        self.route.lock(|slot| slot.set(route));
        if route.is_some() {
            self.armed.signal(());
        } else {
            self.armed.reset();
        }
    }

    /// Wait on `pin` and run the attached handler for every matching event.
    ///
    /// Sleeps while nothing is attached. A handler detached while the pin
    /// was waiting is not called. Level signals run the handler for as long
    /// as the level holds, yielding to the executor between calls.
    ///
    /// Only returns when the pin reports an error.
    pub async fn run<W: Wait>(&self, pin: &mut W) -> Result<Infallible, W::Error> {
        loop {
            let Some((signal, _)) = self.route() else {
                self.armed.wait().await;
                continue;
            };

            match signal {
                Signal::Falling => pin.wait_for_falling_edge().await?,
                Signal::Rising => pin.wait_for_rising_edge().await?,
                Signal::Low => pin.wait_for_low().await?,
                Signal::High => pin.wait_for_high().await?,
                Signal::Change => pin.wait_for_any_edge().await?,
            }

            if let Some((_, handler)) = self.route() {
                handler();
            }

            if matches!(signal, Signal::Low | Signal::High) {
                embassy_futures::yield_now().await;
            }
        }
    }
}

impl Default for EdgeDispatch {
    fn default() -> Self {
        Self::new()
    }
}

/// [`InterruptPin`] backed by an [`EdgeDispatch`].
///
/// Pull resistors are chosen when the HAL input is created, so
/// [`configure`](InterruptPin::configure) only checks that the mode is an
/// input.
pub struct AsyncEdgePin<'d> {
    number: u8,
    dispatch: &'d EdgeDispatch,
}

impl InterruptPin for AsyncEdgePin<'_> {
    type Error = DispatchError;

    fn number(&self) -> u8 {
        self.number
    }

    fn configure(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        if mode.is_input() {
            Ok(())
        } else {
            Err(DispatchError::Unsupported)
        }
    }

    fn attach(&mut self, signal: Signal, handler: fn()) -> Result<(), Self::Error> {
        self.dispatch.set_route(Some((signal, handler)));
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Self::Error> {
        self.dispatch.set_route(None);
        Ok(())
    }
}
