use praxis_core::Questionnaire;
use praxis_store::{FormFilter, FormPatch, Store};
use serde::Serialize;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct RevokedInfo {
    pub questionnaire: Questionnaire,
    /// How many active links this call retired.
    pub revoked: usize,
    /// The latest revocation on record for the pair afterward — not
    /// necessarily one written by this call.
    pub last_revoked_at: jiff::Timestamp,
}

impl<S: Store> crate::Engine<S> {
    /// Retire every currently-active link for the (client, questionnaire)
    /// pair before use. Nothing active to retire is a conflict
    /// ([`EngineError::NoActiveToken`]), not a silent success.
    pub fn revoke(
        &self,
        client_id: Uuid,
        questionnaire: Questionnaire,
    ) -> Result<RevokedInfo, EngineError> {
        let client = self
            .store
            .client_by_id(client_id)?
            .ok_or(EngineError::ClientNotFound)?;
        let now = self.now();

        let revoked = self.store.update_forms(
            &FormFilter {
                client_id: Some(client.id),
                questionnaire: Some(questionnaire),
                active: Some(true),
                ..Default::default()
            },
            &FormPatch {
                active: Some(false),
                revoked_at: Some(now),
                ..Default::default()
            },
        )?;
        if revoked == 0 {
            return Err(EngineError::NoActiveToken);
        }

        let last_revoked_at = self
            .store
            .forms_for_client(client.id, Some(questionnaire))?
            .iter()
            .filter_map(|f| f.revoked_at)
            .max()
            .unwrap_or(now);

        info!(client = %client.id, %questionnaire, revoked, "revoked questionnaire links");
        Ok(RevokedInfo {
            questionnaire,
            revoked,
            last_revoked_at,
        })
    }
}
