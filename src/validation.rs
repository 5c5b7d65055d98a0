/// Input validation for queue data supplied by callers
///
/// Queue state arrives from outside the estimator (HTTP bodies, CLI flags,
/// records from the admission system). Every check here produces
/// `WaitcastError::InvalidInput` so callers can tell a bad request apart
/// from a broken deployment.
use crate::domain::{TriageCategory, TriageCounts, TRIAGE_LEVELS};
use crate::error::{Result, WaitcastError};

/// Validate a 1-indexed queue position
///
/// # Arguments
/// * `position` - Raw position as received from the caller
///
/// # Returns
/// * `Ok(position)` narrowed to `u32` if valid
/// * `Err` if zero, negative, or out of range
pub fn validate_queue_position(position: i64) -> Result<u32> {
    if position <= 0 {
        return Err(WaitcastError::InvalidInput(format!(
            "queue position must be >= 1, got {}",
            position
        )));
    }

    u32::try_from(position).map_err(|_| {
        WaitcastError::InvalidInput(format!("queue position {} is out of range", position))
    })
}

/// Validate a raw triage level
pub fn validate_triage(level: i64) -> Result<TriageCategory> {
    TriageCategory::try_from(level)
}

/// Validate the per-level counts of patients ahead
///
/// # Arguments
/// * `counts` - Raw counts, one per triage level 1..=5
/// * `queue_position` - Already-validated position of the patient
///
/// # Returns
/// * `Ok(TriageCounts)` if there are exactly five non-negative counts summing
///   to `queue_position - 1`
/// * `Err` otherwise
pub fn validate_counts(counts: &[i64], queue_position: u32) -> Result<TriageCounts> {
    if counts.len() != TRIAGE_LEVELS {
        return Err(WaitcastError::InvalidInput(format!(
            "expected {} triage counts, got {}",
            TRIAGE_LEVELS,
            counts.len()
        )));
    }

    let mut out = [0_u32; TRIAGE_LEVELS];
    for (i, &c) in counts.iter().enumerate() {
        if c < 0 {
            return Err(WaitcastError::InvalidInput(format!(
                "count for triage level {} cannot be negative: {}",
                i + 1,
                c
            )));
        }
        out[i] = u32::try_from(c).map_err(|_| {
            WaitcastError::InvalidInput(format!(
                "count for triage level {} is out of range: {}",
                i + 1,
                c
            ))
        })?;
    }

    let counts = TriageCounts(out);
    let expected = u64::from(queue_position) - 1;
    if counts.total() != expected {
        return Err(WaitcastError::InvalidInput(format!(
            "triage counts sum to {} but queue position {} has {} patients ahead",
            counts.total(),
            queue_position,
            expected
        )));
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_queue_position() {
        assert_eq!(validate_queue_position(1).unwrap(), 1);
        assert_eq!(validate_queue_position(42).unwrap(), 42);
        assert!(validate_queue_position(0).is_err());
        assert!(validate_queue_position(-3).is_err());
        assert!(validate_queue_position(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_triage() {
        assert_eq!(validate_triage(3).unwrap(), TriageCategory::Urgent);
        let err = validate_triage(6).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_validate_counts() {
        let counts = validate_counts(&[1, 1, 2, 0, 0], 5).unwrap();
        assert_eq!(counts.as_array(), [1, 1, 2, 0, 0]);

        assert!(validate_counts(&[0, 0, 0, 0, 0], 1).is_ok());

        // Wrong sum
        assert!(validate_counts(&[1, 1, 2, 0, 1], 5).is_err());
        // Wrong length
        assert!(validate_counts(&[1, 1, 2], 5).is_err());
        // Negative
        assert!(validate_counts(&[-1, 1, 2, 1, 1], 5).is_err());
    }
}
