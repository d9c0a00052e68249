use std::collections::BTreeMap;

use praxis_core::ScoreValue;
use serde_json::Value;
use tracing::debug;

use crate::answers;
use crate::classify::classify_nearest;
use crate::normalize::{self, ScaleLookup};

/// Severity labels, parallel to each mode's boundary list regardless of its
/// direction.
pub const LABELS: [&str; 5] = ["Very Low", "Low", "Moderate", "High", "Severe"];

const ASCENDING: [f64; 5] = [0.0, 1.5, 3.0, 4.5, 6.0];
/// Reversed scale for the healthy modes: a low average is the severe end.
const DESCENDING: [f64; 5] = [6.0, 4.5, 3.0, 1.5, 0.0];

/// Schema mode inventory: fourteen modes, each averaged over its 1–6-rated
/// items and classified by nearest boundary. The two healthy modes run on
/// the reversed scale.
pub static BOUNDARIES: [(&str, [f64; 5]); 14] = [
    ("vulnerable_child", ASCENDING),
    ("angry_child", ASCENDING),
    ("enraged_child", ASCENDING),
    ("impulsive_child", ASCENDING),
    ("undisciplined_child", ASCENDING),
    ("happy_child", DESCENDING),
    ("compliant_surrenderer", ASCENDING),
    ("detached_protector", ASCENDING),
    ("detached_self_soother", ASCENDING),
    ("self_aggrandizer", ASCENDING),
    ("bully_and_attack", ASCENDING),
    ("punitive_parent", ASCENDING),
    ("demanding_parent", ASCENDING),
    ("healthy_adult", DESCENDING),
];

/// Free-text scale names as the questionnaire pages have sent them over the
/// years, normalized, mapped to canonical mode keys.
pub static ALIASES: [(&str, &str); 18] = [
    ("vulnerable child", "vulnerable_child"),
    ("angry child", "angry_child"),
    ("enraged child", "enraged_child"),
    ("impulsive child", "impulsive_child"),
    ("undisciplined child", "undisciplined_child"),
    ("happy child", "happy_child"),
    ("contented child", "happy_child"),
    ("compliant surrenderer", "compliant_surrenderer"),
    ("compliant surrender", "compliant_surrenderer"),
    ("detached protector", "detached_protector"),
    ("detached self soother", "detached_self_soother"),
    ("self aggrandizer", "self_aggrandizer"),
    ("self aggrandiser", "self_aggrandizer"),
    ("bully and attack", "bully_and_attack"),
    ("punitive parent", "punitive_parent"),
    ("punishing parent", "punitive_parent"),
    ("demanding parent", "demanding_parent"),
    ("healthy adult", "healthy_adult"),
];

pub fn boundaries_for(key: &str) -> Option<&'static [f64; 5]> {
    BOUNDARIES.iter().find(|(k, _)| *k == key).map(|(_, b)| b)
}

/// Score each submitted mode scale independently. Scale names that resolve
/// to no canonical mode, and canonical modes missing from the boundary
/// table, are skipped — questionnaire pages evolve their field sets faster
/// than this table, and an unknown scale must not fail the submission.
pub fn score(scales: &BTreeMap<String, Vec<Value>>) -> BTreeMap<String, ScoreValue> {
    let mut out = BTreeMap::new();
    for (raw_name, items) in scales {
        let key = match normalize::lookup(raw_name, &ALIASES) {
            ScaleLookup::Mapped(key) => key,
            ScaleLookup::Unmapped => {
                debug!(scale = %raw_name, "skipping unmapped SMI scale");
                continue;
            }
        };
        let Some(boundaries) = boundaries_for(key) else {
            debug!(scale = %raw_name, key, "SMI mode has no boundary entry, skipping");
            continue;
        };
        let avg = answers::average(items);
        if let Some(label) = classify_nearest(avg, boundaries, &LABELS) {
            out.insert(key.to_string(), ScoreValue::new(avg, label));
        }
    }
    out
}
