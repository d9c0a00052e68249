use std::collections::BTreeMap;

use praxis_core::ScoreValue;
use serde_json::Value;
use tracing::debug;

use crate::answers;
use crate::classify::ThresholdBands;
use crate::error::ScoringError;

const LABELS: [&str; 4] = ["Low", "Medium", "High", "Very High"];

const fn bands(low: i64, medium: i64, high: i64) -> ThresholdBands {
    ThresholdBands {
        cuts: [low, medium, high],
        labels: LABELS,
    }
}

/// Schema questionnaire: 18 early-maladaptive-schema sub-scales, five items
/// each rated 1–6 and summed per sub-scale. Every canonical code carries an
/// explicit bands entry; there is no shared default.
pub static BANDS: [(&str, ThresholdBands); 18] = [
    ("abandonment", bands(9, 14, 19)),
    ("mistrust_abuse", bands(9, 14, 19)),
    ("emotional_deprivation", bands(9, 14, 19)),
    ("defectiveness_shame", bands(9, 14, 19)),
    ("social_isolation", bands(9, 14, 19)),
    ("failure", bands(9, 14, 19)),
    ("dependence_incompetence", bands(9, 14, 19)),
    ("vulnerability_to_harm", bands(9, 14, 19)),
    ("enmeshment", bands(9, 14, 19)),
    ("subjugation", bands(9, 14, 19)),
    // Elevated in non-clinical samples, so the cuts sit higher.
    ("self_sacrifice", bands(11, 16, 21)),
    ("emotional_inhibition", bands(9, 14, 19)),
    ("unrelenting_standards", bands(12, 18, 24)),
    ("entitlement_grandiosity", bands(12, 18, 24)),
    ("insufficient_self_control", bands(9, 14, 19)),
    ("approval_seeking", bands(9, 14, 19)),
    ("negativity_pessimism", bands(9, 14, 19)),
    ("punitiveness", bands(9, 14, 19)),
];

pub fn is_canonical(code: &str) -> bool {
    BANDS.iter().any(|(c, _)| *c == code)
}

/// The bands for a canonical sub-scale code. A canonical code with no entry
/// is a table-definition bug and fails classification outright.
pub fn bands_for(code: &str) -> Result<&'static ThresholdBands, ScoringError> {
    BANDS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, b)| b)
        .ok_or_else(|| ScoringError::MissingBands {
            instrument: "ysq",
            scale: code.to_string(),
        })
}

/// Score each submitted sub-scale independently. Sub-scales the submission
/// does not carry are simply absent from the result; submitted keys that are
/// not canonical codes are skipped.
pub fn score(
    scales: &BTreeMap<String, Vec<Value>>,
) -> Result<BTreeMap<String, ScoreValue>, ScoringError> {
    let mut out = BTreeMap::new();
    for (code, items) in scales {
        if !is_canonical(code) {
            debug!(scale = %code, "skipping unknown YSQ sub-scale");
            continue;
        }
        let bands = bands_for(code)?;
        let total = answers::sum(items);
        let label = bands.classify(total);
        out.insert(code.clone(), ScoreValue::new(total as f64, label));
    }
    Ok(out)
}
