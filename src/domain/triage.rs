use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WaitcastError};

/// Number of triage levels tracked per queue.
pub const TRIAGE_LEVELS: usize = 5;

/// Clinical urgency on a 1..=5 scale (1 = most urgent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTriage", into = "u8")]
pub enum TriageCategory {
    Resuscitation = 1,
    Emergent = 2,
    Urgent = 3,
    LessUrgent = 4,
    NonUrgent = 5,
}

impl TriageCategory {
    pub const ALL: [TriageCategory; TRIAGE_LEVELS] = [
        TriageCategory::Resuscitation,
        TriageCategory::Emergent,
        TriageCategory::Urgent,
        TriageCategory::LessUrgent,
        TriageCategory::NonUrgent,
    ];

    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Zero-based slot in per-level count arrays.
    pub fn index(&self) -> usize {
        self.level() as usize - 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageCategory::Resuscitation => "RESUSCITATION",
            TriageCategory::Emergent => "EMERGENT",
            TriageCategory::Urgent => "URGENT",
            TriageCategory::LessUrgent => "LESS_URGENT",
            TriageCategory::NonUrgent => "NON_URGENT",
        }
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i64> for TriageCategory {
    type Error = WaitcastError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(TriageCategory::Resuscitation),
            2 => Ok(TriageCategory::Emergent),
            3 => Ok(TriageCategory::Urgent),
            4 => Ok(TriageCategory::LessUrgent),
            5 => Ok(TriageCategory::NonUrgent),
            other => Err(WaitcastError::InvalidInput(format!(
                "triage category must be in 1..=5, got {other}"
            ))),
        }
    }
}

impl FromStr for TriageCategory {
    type Err = WaitcastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(RawTriage::Text(s.to_string()))
    }
}

impl From<TriageCategory> for u8 {
    fn from(value: TriageCategory) -> Self {
        value.level()
    }
}

/// Wire form: stored records keep the level as either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawTriage {
    Int(i64),
    Text(String),
}

impl RawTriage {
    /// Numeric level, not yet range-checked.
    pub fn level(&self) -> Result<i64> {
        match self {
            RawTriage::Int(v) => Ok(*v),
            RawTriage::Text(s) => s.trim().parse().map_err(|_| {
                WaitcastError::InvalidInput(format!("triage category is not an integer: {s:?}"))
            }),
        }
    }
}

impl TryFrom<RawTriage> for TriageCategory {
    type Error = WaitcastError;

    fn try_from(value: RawTriage) -> Result<Self> {
        Self::try_from(value.level()?)
    }
}

/// Count of patients at each triage level, indexed by `TriageCategory::index`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageCounts(pub [u32; TRIAGE_LEVELS]);

impl TriageCounts {
    pub fn record(&mut self, triage: TriageCategory) {
        self.0[triage.index()] += 1;
    }

    pub fn get(&self, triage: TriageCategory) -> u32 {
        self.0[triage.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| u64::from(*c)).sum()
    }

    pub fn as_array(&self) -> [u32; TRIAGE_LEVELS] {
        self.0
    }
}

impl FromIterator<TriageCategory> for TriageCounts {
    fn from_iter<I: IntoIterator<Item = TriageCategory>>(iter: I) -> Self {
        let mut counts = TriageCounts::default();
        for triage in iter {
            counts.record(triage);
        }
        counts
    }
}
