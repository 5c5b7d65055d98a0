//! Feature assembly for the wait-time model.
//!
//! Layout (order is part of the trained model's contract):
//! `[queue_position, triage_category, ahead_1, ahead_2, ahead_3, ahead_4, ahead_5]`

use crate::domain::{QueueSnapshot, TriageCategory, TriageCounts, TRIAGE_LEVELS};
use crate::error::{Result, WaitcastError};
use crate::validation::{validate_counts, validate_queue_position, validate_triage};

pub const FEATURE_COUNT: usize = 2 + TRIAGE_LEVELS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    queue_position: u32,
    triage: TriageCategory,
    ahead: TriageCounts,
}

impl FeatureVector {
    /// Build from already-typed queue state.
    ///
    /// `ahead` must hold exactly `queue_position - 1` patients.
    pub fn new(queue_position: u32, triage: TriageCategory, ahead: TriageCounts) -> Result<Self> {
        if queue_position == 0 {
            return Err(WaitcastError::InvalidInput(
                "queue position must be >= 1, got 0".to_string(),
            ));
        }
        if ahead.total() != u64::from(queue_position) - 1 {
            return Err(WaitcastError::InvalidInput(format!(
                "triage counts sum to {} but queue position {} has {} patients ahead",
                ahead.total(),
                queue_position,
                queue_position - 1
            )));
        }
        Ok(Self {
            queue_position,
            triage,
            ahead,
        })
    }

    /// Build from untyped caller input (HTTP body, CLI flags).
    pub fn from_raw(queue_position: i64, triage: i64, counts: &[i64]) -> Result<Self> {
        let queue_position = validate_queue_position(queue_position)?;
        let triage = validate_triage(triage)?;
        let ahead = validate_counts(counts, queue_position)?;
        Ok(Self {
            queue_position,
            triage,
            ahead,
        })
    }

    /// Build by scanning a queue of triage levels in arrival order.
    ///
    /// Only the entries strictly before `queue_position` are tallied.
    pub fn from_arrivals(arrivals: &[TriageCategory], queue_position: u32) -> Result<Self> {
        if queue_position == 0 || queue_position as usize > arrivals.len() {
            return Err(WaitcastError::InvalidInput(format!(
                "queue position {} is outside a queue of {} patients",
                queue_position,
                arrivals.len()
            )));
        }
        let idx = queue_position as usize - 1;
        let ahead: TriageCounts = arrivals[..idx].iter().copied().collect();
        Ok(Self {
            queue_position,
            triage: arrivals[idx],
            ahead,
        })
    }

    pub fn queue_position(&self) -> u32 {
        self.queue_position
    }

    pub fn triage(&self) -> TriageCategory {
        self.triage
    }

    pub fn ahead(&self) -> TriageCounts {
        self.ahead
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        let mut v = [0.0; FEATURE_COUNT];
        v[0] = f64::from(self.queue_position);
        v[1] = f64::from(self.triage.level());
        for (slot, count) in v[2..].iter_mut().zip(self.ahead.as_array()) {
            *slot = f64::from(count);
        }
        v
    }
}

impl From<&QueueSnapshot> for FeatureVector {
    fn from(snapshot: &QueueSnapshot) -> Self {
        Self {
            queue_position: snapshot.queue_position,
            triage: snapshot.triage_category,
            ahead: snapshot.ahead,
        }
    }
}
