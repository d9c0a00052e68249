use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Canonical form for client email addresses: trimmed and lower-cased.
/// Every lookup and every stored row uses this form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClientStatus {
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
        }
    }
}

/// A client of the practice.
///
/// Invariant: `status == Inactive` exactly when `inactivated_at` is set, and
/// `delete_after`, when set, is at or after `inactivated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Client {
    pub id: Uuid,
    /// Unique, normalized (see [`normalize_email`]).
    pub email: String,
    pub name: Option<String>,
    pub date_of_birth: Option<jiff::civil::Date>,
    pub status: ClientStatus,
    pub inactivated_at: Option<jiff::Timestamp>,
    pub delete_after: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Client {
    pub fn new(email: &str, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            name: None,
            date_of_birth: None,
            status: ClientStatus::Active,
            inactivated_at: None,
            delete_after: None,
            created_at: now,
            updated_at: now,
        }
    }
}
