use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::questionnaire::Questionnaire;
use super::score::ScoreValue;

/// An issued questionnaire link: one time-boxed access token tied to one
/// client and one questionnaire type, carrying eventual score data.
///
/// Terminal states are submission (`submitted_at`), revocation
/// (`revoked_at`), and passive expiry. Once terminal, the record is
/// immutable apart from the `active` flag flipping to false.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Form {
    pub id: Uuid,
    pub client_id: Uuid,
    pub questionnaire: Questionnaire,
    /// Unguessable URL-safe access token, unique across all forms.
    pub token: String,
    pub issued_at: jiff::Timestamp,
    pub expires_at: jiff::Timestamp,
    pub active: bool,
    pub submitted_at: Option<jiff::Timestamp>,
    pub revoked_at: Option<jiff::Timestamp>,
    /// Classified scores keyed by sub-scale code (`total` for the
    /// single-score inventories). Empty until submission.
    #[ts(type = "Record<string, string>")]
    pub scores: BTreeMap<String, ScoreValue>,
}

impl Form {
    /// A form may be consumed only while active, unsubmitted, and unexpired.
    pub fn is_usable(&self, now: jiff::Timestamp) -> bool {
        self.active && self.submitted_at.is_none() && now < self.expires_at
    }

    /// True when the active flag is stale: still set although the form is
    /// already submitted, revoked, or expired.
    pub fn is_stale(&self, now: jiff::Timestamp) -> bool {
        self.active
            && (self.submitted_at.is_some() || self.revoked_at.is_some() || now >= self.expires_at)
    }
}
