//! praxis-core
//!
//! Shared domain models for the questionnaire token lifecycle. Pure data —
//! no storage or transport dependency.

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::client::{Client, ClientStatus, normalize_email};
pub use models::form::Form;
pub use models::questionnaire::Questionnaire;
pub use models::score::ScoreValue;
