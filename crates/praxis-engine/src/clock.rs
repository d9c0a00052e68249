use std::cell::Cell;
use std::rc::Rc;

use jiff::{SignedDuration, Timestamp};

/// Wall-clock seam. Production code uses [`SystemClock`]; tests pin time
/// with [`FixedClock`] and advance it explicitly.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A settable clock. Clones share the same instant, so a test can keep one
/// handle and hand another to the engine.
#[derive(Debug, Clone)]
pub struct FixedClock(Rc<Cell<Timestamp>>);

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self(Rc::new(Cell::new(at)))
    }

    pub fn set(&self, at: Timestamp) {
        self.0.set(at);
    }

    pub fn advance(&self, by: SignedDuration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0.get()
    }
}
