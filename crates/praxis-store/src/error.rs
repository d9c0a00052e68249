use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid stored value in column {column}: {value}")]
    InvalidColumn { column: &'static str, value: String },

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("store backend error: {0}")]
    Backend(String),
}
