/// Re-entrancy guard for routines that may be triggered again while an
/// earlier call is still awaiting. Extra calls are dropped, not queued.
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: Cell<bool>,
}

/// Held for the duration of one flight; releases the flag on drop
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        if self.busy.replace(true) {
            None
        } else {
            Some(FlightGuard { flight: self })
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.busy.set(false);
    }
}
