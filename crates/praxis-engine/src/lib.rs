//! praxis-engine
//!
//! The questionnaire token lifecycle: issuing, validating, consuming, and
//! revoking time-boxed questionnaire links, plus client deactivation,
//! atomic erasure, and the retention sweep. All storage goes through the
//! injected [`Store`]; time goes through the injected [`Clock`] so tests
//! can pin and advance it.

pub mod clock;
pub mod error;
mod issue;
mod lifecycle;
pub mod notify;
mod retention;
mod revoke;
mod submit;
mod validate;

use jiff::Timestamp;
use praxis_store::Store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{EngineError, ErrorKind};
pub use issue::TOKEN_TTL;
pub use lifecycle::DELETION_GRACE;
pub use notify::{IssuedLink, LoggingNotifier, Notifier, NotifyError};
pub use retention::{SweepConfig, SweepReport};
pub use revoke::RevokedInfo;
pub use submit::Submission;

pub struct Engine<S: Store> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: Store> Engine<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> Timestamp {
        self.clock.now()
    }
}
