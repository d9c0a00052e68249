use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// A canonical sub-scale code has no entry in its instrument's boundary
    /// table. There is no shared default; every code needs an explicit
    /// entry, so this is a table-definition bug, not bad input.
    #[error("no score bands defined for {instrument} sub-scale '{scale}'")]
    MissingBands {
        instrument: &'static str,
        scale: String,
    },
}
