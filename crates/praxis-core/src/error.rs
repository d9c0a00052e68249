use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown questionnaire type: {0}")]
    UnknownQuestionnaire(String),

    #[error("invalid score encoding: {0}")]
    InvalidScoreEncoding(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
