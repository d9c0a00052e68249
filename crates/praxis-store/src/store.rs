use std::collections::BTreeMap;

use jiff::Timestamp;
use praxis_core::{Client, Form, Questionnaire, ScoreValue};
use uuid::Uuid;

use crate::error::StoreError;

/// Conjunctive predicate over form rows. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FormFilter {
    pub ids: Option<Vec<Uuid>>,
    pub client_id: Option<Uuid>,
    pub questionnaire: Option<Questionnaire>,
    pub active: Option<bool>,
}

impl FormFilter {
    pub fn matches(&self, form: &Form) -> bool {
        if let Some(ids) = &self.ids
            && !ids.contains(&form.id)
        {
            return false;
        }
        if let Some(client_id) = self.client_id
            && form.client_id != client_id
        {
            return false;
        }
        if let Some(questionnaire) = self.questionnaire
            && form.questionnaire != questionnaire
        {
            return false;
        }
        if let Some(active) = self.active
            && form.active != active
        {
            return false;
        }
        true
    }
}

/// Partial update over form rows. Only present fields are written; no field
/// is ever reset to null through a patch.
#[derive(Debug, Clone, Default)]
pub struct FormPatch {
    pub active: Option<bool>,
    pub submitted_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub scores: Option<BTreeMap<String, ScoreValue>>,
}

impl FormPatch {
    /// An empty patch writes nothing and counts no rows, on any backend.
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
            && self.submitted_at.is_none()
            && self.revoked_at.is_none()
            && self.expires_at.is_none()
            && self.scores.is_none()
    }

    pub fn apply(&self, form: &mut Form) {
        if let Some(active) = self.active {
            form.active = active;
        }
        if let Some(submitted_at) = self.submitted_at {
            form.submitted_at = Some(submitted_at);
        }
        if let Some(revoked_at) = self.revoked_at {
            form.revoked_at = Some(revoked_at);
        }
        if let Some(expires_at) = self.expires_at {
            form.expires_at = expires_at;
        }
        if let Some(scores) = &self.scores {
            form.scores = scores.clone();
        }
    }
}

/// The narrow repository contract the engine services depend on.
///
/// Per-method calls are individually atomic; the one multi-statement
/// atomicity guarantee is [`Store::in_transaction`], used by the cascading
/// client delete. Emails passed in are expected pre-normalized.
pub trait Store {
    fn create_client(&self, client: &Client) -> Result<(), StoreError>;
    fn client_by_id(&self, id: Uuid) -> Result<Option<Client>, StoreError>;
    fn client_by_email(&self, email: &str) -> Result<Option<Client>, StoreError>;
    fn update_client(&self, client: &Client) -> Result<(), StoreError>;
    /// Inactive clients whose scheduled deletion date is at or before `now`.
    fn clients_due_for_deletion(&self, now: Timestamp) -> Result<Vec<Client>, StoreError>;

    fn create_form(&self, form: &Form) -> Result<(), StoreError>;
    fn form_by_token(&self, token: &str) -> Result<Option<Form>, StoreError>;
    /// A client's forms, optionally restricted to one questionnaire type,
    /// ordered by issuance time.
    fn forms_for_client(
        &self,
        client_id: Uuid,
        questionnaire: Option<Questionnaire>,
    ) -> Result<Vec<Form>, StoreError>;
    /// Apply `patch` to every form matching `filter`; returns the number of
    /// rows affected.
    fn update_forms(&self, filter: &FormFilter, patch: &FormPatch) -> Result<usize, StoreError>;
    fn delete_forms_for_client(&self, client_id: Uuid) -> Result<usize, StoreError>;
    fn delete_client(&self, id: Uuid) -> Result<(), StoreError>;

    /// Run `f` with all-or-nothing semantics: an `Err` return rolls every
    /// write inside the closure back.
    fn in_transaction(
        &self,
        f: &mut dyn FnMut(&dyn Store) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
}
