use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::SignedDuration;
use praxis_core::{Form, Questionnaire};
use praxis_store::{FormFilter, FormPatch, Store};
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::notify::{IssuedLink, Notifier};

/// Issued links stay usable for two weeks.
pub const TOKEN_TTL: SignedDuration = SignedDuration::from_hours(14 * 24);

/// 24 OS-random bytes, URL-safe base64: 192 bits of entropy in 32 chars.
fn generate_token() -> String {
    let mut bytes = [0u8; 24];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl<S: Store> crate::Engine<S> {
    /// Issue a fresh link for one (client, questionnaire) pair.
    ///
    /// Stale active flags on already-expired, submitted, or revoked forms
    /// are retired first, so the at-most-one-active invariant heals itself.
    /// A still-usable link blocks issuance; for the non-repeatable types a
    /// prior submission blocks it too.
    pub fn issue(
        &self,
        client_id: Uuid,
        questionnaire: Questionnaire,
    ) -> Result<Form, EngineError> {
        let client = self
            .store
            .client_by_id(client_id)?
            .ok_or(EngineError::ClientNotFound)?;
        let now = self.now();
        let existing = self.store.forms_for_client(client.id, Some(questionnaire))?;

        let stale: Vec<Uuid> = existing
            .iter()
            .filter(|f| f.is_stale(now))
            .map(|f| f.id)
            .collect();
        if !stale.is_empty() {
            debug!(client = %client.id, %questionnaire, count = stale.len(), "retiring stale active flags");
            self.store.update_forms(
                &FormFilter {
                    ids: Some(stale),
                    active: Some(true),
                    ..Default::default()
                },
                &FormPatch {
                    active: Some(false),
                    ..Default::default()
                },
            )?;
        }

        let usable = existing.iter().any(|f| f.is_usable(now));
        let submitted = existing.iter().any(|f| f.submitted_at.is_some());
        if usable || (!questionnaire.repeatable() && submitted) {
            return Err(EngineError::DuplicateActiveToken);
        }

        let form = Form {
            id: Uuid::new_v4(),
            client_id: client.id,
            questionnaire,
            token: generate_token(),
            issued_at: now,
            expires_at: now + TOKEN_TTL,
            active: true,
            submitted_at: None,
            revoked_at: None,
            scores: BTreeMap::new(),
        };
        self.store.create_form(&form)?;
        info!(client = %client.id, %questionnaire, form = %form.id, "issued questionnaire link");
        Ok(form)
    }

    /// Issue links for every questionnaire type in one pass, skipping the
    /// blocked ones. Nothing issued at all is a distinct outcome
    /// ([`EngineError::NothingToSend`]), not a generic failure.
    pub fn issue_all(&self, client_id: Uuid) -> Result<Vec<Form>, EngineError> {
        let mut issued = Vec::new();
        for questionnaire in Questionnaire::ALL {
            match self.issue(client_id, questionnaire) {
                Ok(form) => issued.push(form),
                Err(EngineError::DuplicateActiveToken) => {
                    debug!(%questionnaire, "skipping: active link or prior submission");
                }
                Err(err) => return Err(err),
            }
        }
        if issued.is_empty() {
            return Err(EngineError::NothingToSend);
        }
        Ok(issued)
    }

    /// Bulk issue, then hand the links to the notifier. Delivery failure is
    /// logged and swallowed; the issued tokens stand with no compensating
    /// rollback.
    pub fn issue_and_send(
        &self,
        client_id: Uuid,
        notifier: &dyn Notifier,
    ) -> Result<Vec<Form>, EngineError> {
        let client = self
            .store
            .client_by_id(client_id)?
            .ok_or(EngineError::ClientNotFound)?;
        let issued = self.issue_all(client_id)?;
        let links: Vec<IssuedLink> = issued
            .iter()
            .map(|f| IssuedLink {
                questionnaire: f.questionnaire,
                token: f.token.clone(),
            })
            .collect();
        if let Err(err) = notifier.send_links(&client.email, client.name.as_deref(), &links) {
            warn!(client = %client.id, error = %err, "questionnaire link delivery failed");
        }
        Ok(issued)
    }
}
