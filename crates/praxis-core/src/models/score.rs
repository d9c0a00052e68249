use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A classified score: the numeric value plus its categorical label.
///
/// The wire and storage encoding is the legacy `"<value>-<label>"` string
/// (e.g. `"31-Severe"`, `"2.50-High"`). Whole numbers render without a
/// decimal point; averages render with two decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreValue {
    pub value: f64,
    pub label: String,
}

impl ScoreValue {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.fract() == 0.0 {
            write!(f, "{}-{}", self.value as i64, self.label)
        } else {
            write!(f, "{:.2}-{}", self.value, self.label)
        }
    }
}

impl FromStr for ScoreValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split on the last dash: labels never contain one, but a negative
        // value carries a leading sign.
        let (value, label) = s
            .rsplit_once('-')
            .ok_or_else(|| CoreError::InvalidScoreEncoding(s.to_string()))?;
        let value: f64 = value
            .parse()
            .map_err(|_| CoreError::InvalidScoreEncoding(s.to_string()))?;
        Ok(ScoreValue {
            value,
            label: label.to_string(),
        })
    }
}

impl Serialize for ScoreValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScoreValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
