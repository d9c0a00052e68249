use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The four questionnaire types the practice issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Questionnaire {
    /// Depression inventory. Sum score, threshold bands.
    Bdi,
    /// Anxiety inventory. Sum score, threshold bands.
    Bai,
    /// Schema questionnaire. One sum score per schema sub-scale.
    Ysq,
    /// Schema mode inventory. Per-mode averages, nearest-boundary bands.
    Smi,
}

impl Questionnaire {
    pub const ALL: [Questionnaire; 4] = [
        Questionnaire::Bdi,
        Questionnaire::Bai,
        Questionnaire::Ysq,
        Questionnaire::Smi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Questionnaire::Bdi => "bdi",
            Questionnaire::Bai => "bai",
            Questionnaire::Ysq => "ysq",
            Questionnaire::Smi => "smi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Questionnaire::Bdi => "Depression Inventory (BDI)",
            Questionnaire::Bai => "Burns Anxiety Inventory (BAI)",
            Questionnaire::Ysq => "Young Schema Questionnaire (YSQ)",
            Questionnaire::Smi => "Schema Mode Inventory (SMI)",
        }
    }

    /// The depression inventory is re-administered across a course of
    /// therapy; a prior submission does not block a new link. The other
    /// three are one-shot per client.
    pub fn repeatable(&self) -> bool {
        matches!(self, Questionnaire::Bdi)
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "bdi" => Ok(Questionnaire::Bdi),
            "bai" => Ok(Questionnaire::Bai),
            "ysq" => Ok(Questionnaire::Ysq),
            "smi" => Ok(Questionnaire::Smi),
            other => Err(CoreError::UnknownQuestionnaire(other.to_string())),
        }
    }
}

impl std::fmt::Display for Questionnaire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
