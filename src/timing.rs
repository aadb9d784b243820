//! Interrupt-side timing latches.
//!
//! A handler registered with [`Channel::start_isr`](crate::Channel::start_isr)
//! is a bare `fn()`, so the state it updates lives in `static` items of the
//! types defined here. Every access goes through a critical-section mutex,
//! which makes the latches safe to update from interrupt context and read
//! from the main loop.
//!
//! ```ignore
//! static A: EdgeTimer = EdgeTimer::new();
//! static Z: IndexTimer<'static> = IndexTimer::new(&A);
//!
//! fn on_a_edge() {
//!     A.on_interrupt(Instant::now());
//! }
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

/// Work performed when a channel interrupt fires.
pub trait ChannelIsr {
    /// Record an interrupt that occurred at `now`.
    fn on_interrupt(&self, now: Instant);
}

// ---------------------------------------------------------------------------
// Edge timing
// ---------------------------------------------------------------------------

/// Copy of the state held by an [`EdgeTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeLatch {
    /// Time of the most recent interrupt.
    pub last_edge: Option<Instant>,
    /// Microseconds between the two most recent interrupts, 0 until two
    /// interrupts have been seen.
    pub interval_micros: u64,
    /// Interrupts seen since the last reset. Wraps on overflow.
    pub edges: u32,
}

impl EdgeLatch {
    const EMPTY: Self = Self {
        last_edge: None,
        interval_micros: 0,
        edges: 0,
    };

    fn record(&mut self, now: Instant) {
        self.edges = self.edges.wrapping_add(1);

        // A timestamp earlier than the previous edge keeps the old interval.
        if let Some(elapsed) = self.last_edge.and_then(|last| now.checked_duration_since(last)) {
            self.interval_micros = elapsed.as_micros();
        }

        self.last_edge = Some(now);
    }
}

/// Latches the interval between consecutive interrupts of one channel.
pub struct EdgeTimer {
    latch: Mutex<CriticalSectionRawMutex, Cell<EdgeLatch>>,
}

impl EdgeTimer {
    pub const fn new() -> Self {
        Self {
            latch: Mutex::new(Cell::new(EdgeLatch::EMPTY)),
        }
    }

    pub fn snapshot(&self) -> EdgeLatch {
        self.latch.lock(|latch| latch.get())
    }

    pub fn interval_micros(&self) -> u64 {
        self.snapshot().interval_micros
    }

    pub fn edges(&self) -> u32 {
        self.snapshot().edges
    }

    /// Forget all recorded interrupts.
    pub fn reset(&self) {
        self.latch.lock(|latch| latch.set(EdgeLatch::EMPTY));
    }
}

impl Default for EdgeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelIsr for EdgeTimer {
    fn on_interrupt(&self, now: Instant) {
        self.latch.lock(|latch| {
            let mut state = latch.get();
            state.record(now);
            latch.set(state);
        });
    }
}

// ---------------------------------------------------------------------------
// Index (Z) timing
// ---------------------------------------------------------------------------

/// Copy of the state held by an [`IndexTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndexLatch {
    /// Timing of the index pulses themselves; the interval is the
    /// revolution time.
    pub pulse: EdgeLatch,
    /// Notch-channel edges counted during the last complete revolution.
    pub notches: Option<u32>,
    /// Notch-channel edge count at the most recent index pulse.
    mark: Option<u32>,
}

impl IndexLatch {
    const EMPTY: Self = Self {
        pulse: EdgeLatch::EMPTY,
        notches: None,
        mark: None,
    };
}

/// Latches the revolution time from the index channel, plus the number of
/// notch-channel edges that arrived during that revolution.
pub struct IndexTimer<'a> {
    latch: Mutex<CriticalSectionRawMutex, Cell<IndexLatch>>,
    notch_source: &'a EdgeTimer,
}

impl<'a> IndexTimer<'a> {
    /// Create an index timer counting notches from `notch_source`
    /// (normally the A channel's timer).
    pub const fn new(notch_source: &'a EdgeTimer) -> Self {
        Self {
            latch: Mutex::new(Cell::new(IndexLatch::EMPTY)),
            notch_source,
        }
    }

    pub fn snapshot(&self) -> IndexLatch {
        self.latch.lock(|latch| latch.get())
    }

    /// Microseconds between the two most recent index pulses.
    pub fn revolution_micros(&self) -> u64 {
        self.snapshot().pulse.interval_micros
    }

    /// Notch edges counted in the last complete revolution.
    pub fn notches(&self) -> Option<u32> {
        self.snapshot().notches
    }

    /// Index pulses seen since the last reset.
    pub fn revolutions(&self) -> u32 {
        self.snapshot().pulse.edges
    }

    /// Forget revolution time, notch count and the notch mark.
    pub fn reset(&self) {
        self.latch.lock(|latch| latch.set(IndexLatch::EMPTY));
    }
}

impl ChannelIsr for IndexTimer<'_> {
    fn on_interrupt(&self, now: Instant) {
        // Read the notch count under the same lock so an edge cannot land
        // between the count and the mark.
        self.latch.lock(|latch| {
            let count = self.notch_source.edges();
            let mut state = latch.get();
            state.pulse.record(now);
            if let Some(mark) = state.mark {
                state.notches = Some(count.wrapping_sub(mark));
            }
            state.mark = Some(count);
            latch.set(state);
        });
    }
}
