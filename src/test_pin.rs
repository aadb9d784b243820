//! In-memory [`InterruptPin`] used by the unit tests.

use core::cell::Cell;

use crate::pin::{InterruptPin, PinMode, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPinError {
    Configure,
    Attach,
    Detach,
}

/// Counts calls that outlive the pin (detach on drop).
pub struct PinLog {
    detaches: Cell<u32>,
}

impl PinLog {
    pub fn new() -> Self {
        Self {
            detaches: Cell::new(0),
        }
    }

    pub fn detaches(&self) -> u32 {
        self.detaches.get()
    }
}

pub struct TestPin<'a> {
    number: u8,
    mode: Option<PinMode>,
    attached: Option<(Signal, fn())>,
    fail_configure: bool,
    fail_attach: bool,
    fail_detach: bool,
    log: Option<&'a PinLog>,
}

impl TestPin<'static> {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            mode: None,
            attached: None,
            fail_configure: false,
            fail_attach: false,
            fail_detach: false,
            log: None,
        }
    }
}

impl<'a> TestPin<'a> {
    pub fn with_log(number: u8, log: &'a PinLog) -> Self {
        Self {
            number,
            mode: None,
            attached: None,
            fail_configure: false,
            fail_attach: false,
            fail_detach: false,
            log: Some(log),
        }
    }

    pub fn fail_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    pub fn fail_attach(mut self) -> Self {
        self.fail_attach = true;
        self
    }

    pub fn fail_detach(mut self) -> Self {
        self.fail_detach = true;
        self
    }

    pub fn mode(&self) -> Option<PinMode> {
        self.mode
    }

    pub fn attached_signal(&self) -> Option<Signal> {
        self.attached.map(|(signal, _)| signal)
    }

    /// Simulate the hardware event: run the attached handler, if any.
    pub fn fire(&self) {
        if let Some((_, handler)) = self.attached {
            handler();
        }
    }
}

impl InterruptPin for TestPin<'_> {
    type Error = TestPinError;

    fn number(&self) -> u8 {
        self.number
    }

    fn configure(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        if self.fail_configure {
            return Err(TestPinError::Configure);
        }
        self.mode = Some(mode);
        Ok(())
    }

    fn attach(&mut self, signal: Signal, handler: fn()) -> Result<(), Self::Error> {
        if self.fail_attach {
            return Err(TestPinError::Attach);
        }
        self.attached = Some((signal, handler));
        Ok(())
    }

    fn detach(&mut self) -> Result<(), Self::Error> {
        if self.fail_detach {
            return Err(TestPinError::Detach);
        }
        self.attached = None;
        if let Some(log) = self.log {
            log.detaches.set(log.detaches.get() + 1);
        }
        Ok(())
    }
}
