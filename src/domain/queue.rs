//! Facility queue ordered by arrival time.
//!
//! The queue is the only place queue position and the per-level counts of
//! patients ahead are derived from raw patient records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::triage::{TriageCategory, TriageCounts};
use crate::error::{Result, WaitcastError};

/// One patient waiting at a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub patient_id: i64,
    pub arrival_time: DateTime<Utc>,
    pub triage_category: TriageCategory,
}

/// Queue state as seen by a single patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub patient_id: i64,
    /// 1-indexed rank by arrival time.
    pub queue_position: u32,
    pub triage_category: TriageCategory,
    /// Triage levels of everyone strictly ahead.
    pub ahead: TriageCounts,
    pub total_patients: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PatientQueue {
    entries: Vec<QueueEntry>,
}

impl PatientQueue {
    /// Build a queue from unordered records.
    ///
    /// Entries are ordered by arrival time; simultaneous arrivals are ordered
    /// by patient id so the ranking never depends on input order.
    pub fn new(mut entries: Vec<QueueEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.patient_id) {
                return Err(WaitcastError::InvalidInput(format!(
                    "patient {} appears more than once in the queue",
                    entry.patient_id
                )));
            }
        }
        if entries.len() > u32::MAX as usize {
            return Err(WaitcastError::InvalidInput(format!(
                "queue of {} patients is too large",
                entries.len()
            )));
        }

        entries.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then(a.patient_id.cmp(&b.patient_id))
        });
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn snapshot_for(&self, patient_id: i64) -> Result<QueueSnapshot> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.patient_id == patient_id)
            .ok_or_else(|| {
                WaitcastError::InvalidInput(format!("patient {patient_id} is not in the queue"))
            })?;

        let ahead: TriageCounts = self.entries[..idx]
            .iter()
            .map(|e| e.triage_category)
            .collect();

        Ok(QueueSnapshot {
            patient_id,
            queue_position: idx as u32 + 1,
            triage_category: self.entries[idx].triage_category,
            ahead,
            total_patients: self.entries.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(patient_id: i64, minutes: i64, triage: TriageCategory) -> QueueEntry {
        let base = Utc.with_ymd_and_hms(2025, 1, 26, 0, 0, 0).unwrap();
        QueueEntry {
            patient_id,
            arrival_time: base + Duration::minutes(minutes),
            triage_category: triage,
        }
    }

    #[test]
    fn orders_by_arrival_and_counts_strictly_ahead() {
        use TriageCategory::*;
        let queue = PatientQueue::new(vec![
            entry(50, 40, Urgent),
            entry(10, 0, Resuscitation),
            entry(30, 20, Urgent),
            entry(20, 10, Emergent),
            entry(40, 30, Urgent),
        ])
        .unwrap();

        let snap = queue.snapshot_for(50).unwrap();
        assert_eq!(snap.queue_position, 5);
        assert_eq!(snap.triage_category, Urgent);
        assert_eq!(snap.ahead.as_array(), [1, 1, 2, 0, 0]);
        assert_eq!(snap.ahead.total(), u64::from(snap.queue_position - 1));
        assert_eq!(snap.total_patients, 5);
    }

    #[test]
    fn first_in_queue_has_nobody_ahead() {
        let queue = PatientQueue::new(vec![
            entry(2, 5, TriageCategory::NonUrgent),
            entry(1, 0, TriageCategory::LessUrgent),
        ])
        .unwrap();

        let snap = queue.snapshot_for(1).unwrap();
        assert_eq!(snap.queue_position, 1);
        assert_eq!(snap.ahead, TriageCounts::default());
    }

    #[test]
    fn simultaneous_arrivals_rank_by_patient_id() {
        let queue = PatientQueue::new(vec![
            entry(9, 0, TriageCategory::Urgent),
            entry(3, 0, TriageCategory::Emergent),
        ])
        .unwrap();

        assert_eq!(queue.entries()[0].patient_id, 3);
        assert_eq!(queue.snapshot_for(9).unwrap().queue_position, 2);
    }

    #[test]
    fn rejects_unknown_and_duplicate_patients() {
        let queue = PatientQueue::new(vec![entry(1, 0, TriageCategory::Urgent)]).unwrap();
        assert!(queue.snapshot_for(2).unwrap_err().is_input_error());

        let dup = PatientQueue::new(vec![
            entry(1, 0, TriageCategory::Urgent),
            entry(1, 5, TriageCategory::Urgent),
        ]);
        assert!(dup.unwrap_err().is_input_error());
    }
}
