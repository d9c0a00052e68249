use praxis_core::Form;
use praxis_scoring::Answers;
use praxis_store::{FormFilter, FormPatch, Store};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::EngineError;

/// A completed questionnaire as posted from its page. Name and date of
/// birth ride along so the client record can be completed on first contact.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Submission {
    pub name: Option<String>,
    pub date_of_birth: Option<jiff::civil::Date>,
    pub answers: Answers,
}

impl<S: Store> crate::Engine<S> {
    /// Consume a usable token exactly once: classify the answers, store the
    /// scores, and close the usability window by stamping `submitted_at`
    /// and pulling `expires_at` forward to now. A second attempt against
    /// the same token fails validation like any other consumed token, and
    /// the stored scores stay as the first submission left them.
    pub fn submit(&self, token: &str, submission: &Submission) -> Result<Form, EngineError> {
        let mut form = self.assert_usable(token, Some(submission.answers.questionnaire()))?;
        let scores = praxis_scoring::score(&submission.answers)?;
        let now = self.now();

        let patch = FormPatch {
            active: Some(false),
            submitted_at: Some(now),
            expires_at: Some(now),
            scores: Some(scores),
            ..Default::default()
        };
        self.store.update_forms(
            &FormFilter {
                ids: Some(vec![form.id]),
                ..Default::default()
            },
            &patch,
        )?;
        patch.apply(&mut form);

        self.capture_client_details(form.client_id, submission)?;
        info!(form = %form.id, questionnaire = %form.questionnaire, "questionnaire submitted");
        Ok(form)
    }

    /// Fill in name and date of birth the first time a submission carries
    /// them; never overwrite values already on record.
    fn capture_client_details(
        &self,
        client_id: Uuid,
        submission: &Submission,
    ) -> Result<(), EngineError> {
        let Some(mut client) = self.store.client_by_id(client_id)? else {
            return Ok(());
        };
        let mut changed = false;
        if client.name.is_none()
            && let Some(name) = &submission.name
        {
            let name = name.trim();
            if !name.is_empty() {
                client.name = Some(name.to_string());
                changed = true;
            }
        }
        if client.date_of_birth.is_none()
            && let Some(dob) = submission.date_of_birth
        {
            client.date_of_birth = Some(dob);
            changed = true;
        }
        if changed {
            client.updated_at = self.now();
            self.store.update_client(&client)?;
        }
        Ok(())
    }
}
