use std::collections::BTreeMap;

use praxis_core::ScoreValue;
use serde_json::Value;

use crate::answers;
use crate::classify::ThresholdBands;

/// Depression inventory: 21 items rated 0–3, summed. Standard severity
/// bands over the 0–63 range.
pub const BANDS: ThresholdBands = ThresholdBands {
    cuts: [13, 19, 28],
    labels: ["Minimal", "Mild", "Moderate", "Severe"],
};

pub fn score(items: &[Value]) -> BTreeMap<String, ScoreValue> {
    let total = answers::sum(items);
    let label = BANDS.classify(total);
    BTreeMap::from([("total".to_string(), ScoreValue::new(total as f64, label))])
}
