// Copyright (c) 2026 rezky_nightky

use std::rc::Rc;
use std::time::Instant;

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Time only moves when told to.
#[cfg(test)]
pub struct ManualClock {
    now: std::cell::Cell<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: std::cell::Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, d: std::time::Duration) {
        self.now.set(self.now.get() + d);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
