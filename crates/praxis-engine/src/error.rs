use praxis_scoring::ScoringError;
use praxis_store::StoreError;
use thiserror::Error;
use tracing::error;

/// Transport-facing classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    Unauthorized,
    Internal,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("client not found")]
    ClientNotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("an active questionnaire link already exists")]
    DuplicateActiveToken,

    #[error("no active questionnaire link to revoke")]
    NoActiveToken,

    #[error("no questionnaire links left to send")]
    NothingToSend,

    /// One generic message for every unusable-token cause: absent, unknown,
    /// inactive, consumed, expired, or the wrong questionnaire type. A
    /// token holder must not learn which one it was.
    #[error("invalid or expired link")]
    InvalidToken,

    /// Store or scoring-table failure. The cause is logged at the boundary;
    /// callers only see the generic kind.
    #[error("internal error")]
    Internal(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ClientNotFound => ErrorKind::NotFound,
            EngineError::InvalidInput(_) => ErrorKind::InvalidInput,
            EngineError::DuplicateActiveToken
            | EngineError::NoActiveToken
            | EngineError::NothingToSend => ErrorKind::Conflict,
            EngineError::InvalidToken => ErrorKind::Unauthorized,
            EngineError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "store operation failed");
        EngineError::Internal(err.to_string())
    }
}

impl From<ScoringError> for EngineError {
    fn from(err: ScoringError) -> Self {
        error!(error = %err, "score classification failed");
        EngineError::Internal(err.to_string())
    }
}
