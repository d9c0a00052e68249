use std::cell::RefCell;

use praxis_engine::{Engine, FixedClock, IssuedLink, Notifier, NotifyError};
use praxis_store::MemoryStore;

pub const T0: &str = "2026-03-01T10:00:00Z";

pub fn engine() -> (Engine<MemoryStore>, FixedClock) {
    let clock = FixedClock::new(T0.parse().unwrap());
    let engine = Engine::with_clock(MemoryStore::new(), Box::new(clock.clone()));
    (engine, clock)
}

/// Captures outbound links instead of delivering them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(String, Vec<IssuedLink>)>>,
}

impl Notifier for RecordingNotifier {
    fn send_links(
        &self,
        recipient: &str,
        _name: Option<&str>,
        links: &[IssuedLink],
    ) -> Result<(), NotifyError> {
        self.sent
            .borrow_mut()
            .push((recipient.to_string(), links.to_vec()));
        Ok(())
    }
}

pub struct BouncingNotifier;

impl Notifier for BouncingNotifier {
    fn send_links(
        &self,
        _recipient: &str,
        _name: Option<&str>,
        _links: &[IssuedLink],
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp unreachable".to_string()))
    }
}
