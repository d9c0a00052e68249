//! praxis-scoring
//!
//! Deterministic classification of raw questionnaire answers into
//! categorical clinical scores. Pure functions — no storage or transport
//! dependency. One module per supported instrument carries that
//! instrument's boundary tables.

pub mod answers;
pub mod classify;
pub mod error;
pub mod instruments;
pub mod normalize;

use std::collections::BTreeMap;

use praxis_core::ScoreValue;

pub use answers::Answers;
pub use error::ScoringError;

/// Score a full submission for its questionnaire type.
///
/// Returns classified scores keyed by sub-scale code (`total` for the
/// single-score inventories). Sub-scales the submission does not carry are
/// omitted; unknown sub-scale names are skipped, never an error.
pub fn score(answers: &Answers) -> Result<BTreeMap<String, ScoreValue>, ScoringError> {
    match answers {
        Answers::Bdi(items) => Ok(instruments::bdi::score(items)),
        Answers::Bai(items) => Ok(instruments::bai::score(items)),
        Answers::Ysq(scales) => instruments::ysq::score(scales),
        Answers::Smi(scales) => Ok(instruments::smi::score(scales)),
    }
}
