use praxis_core::{Form, Questionnaire};
use praxis_store::Store;
use tracing::debug;

use crate::error::EngineError;

impl<S: Store> crate::Engine<S> {
    /// Look a presented token up without judging usability. Blank and
    /// unknown tokens both come back as `None`.
    pub fn resolve(&self, token: &str) -> Result<Option<Form>, EngineError> {
        if token.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.store.form_by_token(token)?)
    }

    /// Resolve a token and require it to be usable — active, unsubmitted,
    /// unexpired, and (when `expected` is given) of the expected
    /// questionnaire type. Every failure collapses into the same
    /// [`EngineError::InvalidToken`]; the holder learns nothing about which
    /// terminal state the token is in.
    pub fn assert_usable(
        &self,
        token: &str,
        expected: Option<Questionnaire>,
    ) -> Result<Form, EngineError> {
        let Some(form) = self.resolve(token)? else {
            return Err(EngineError::InvalidToken);
        };
        if !form.is_usable(self.now()) {
            debug!(form = %form.id, "token presented for unusable form");
            return Err(EngineError::InvalidToken);
        }
        if let Some(expected) = expected
            && form.questionnaire != expected
        {
            debug!(form = %form.id, "token presented against wrong questionnaire type");
            return Err(EngineError::InvalidToken);
        }
        Ok(form)
    }
}
