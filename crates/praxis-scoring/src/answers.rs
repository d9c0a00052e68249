use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use praxis_core::Questionnaire;

/// Raw answers as submitted from a questionnaire page.
///
/// Values arrive as whatever the page sent — numbers or strings — and are
/// coerced leniently by [`coerce_int`]. The sum-scored inventories carry a
/// single answer array; the schema questionnaires carry one array per
/// sub-scale, keyed by sub-scale code (YSQ) or free-text scale name (SMI).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "questionnaire", content = "answers", rename_all = "snake_case")]
#[ts(export)]
pub enum Answers {
    Bdi(Vec<Value>),
    Bai(Vec<Value>),
    Ysq(BTreeMap<String, Vec<Value>>),
    Smi(BTreeMap<String, Vec<Value>>),
}

impl Answers {
    pub fn questionnaire(&self) -> Questionnaire {
        match self {
            Answers::Bdi(_) => Questionnaire::Bdi,
            Answers::Bai(_) => Questionnaire::Bai,
            Answers::Ysq(_) => Questionnaire::Ysq,
            Answers::Smi(_) => Questionnaire::Smi,
        }
    }
}

/// Coerce one raw answer to an integer.
///
/// Numbers truncate toward zero; strings parse their leading integer prefix
/// (after whitespace, optional sign); anything else scores as zero. A
/// malformed answer must never reject a submission — it just contributes
/// nothing to the score.
pub fn coerce_int(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n.as_f64().map(|f| f.trunc() as i64).unwrap_or(0),
        Value::String(s) => leading_int(s),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if i == 0 && (c == '-' || c == '+') {
            end = c.len_utf8();
        } else if c.is_ascii_digit() {
            end = i + 1;
        } else {
            break;
        }
    }
    s[..end].parse().unwrap_or(0)
}

/// Sum an answer array under lenient coercion.
pub fn sum(items: &[Value]) -> i64 {
    items.iter().map(coerce_int).sum()
}

/// Average an answer array under lenient coercion, rounded to two decimals.
/// An empty array averages to zero.
pub fn average(items: &[Value]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let total: i64 = sum(items);
    let avg = total as f64 / items.len() as f64;
    (avg * 100.0).round() / 100.0
}
