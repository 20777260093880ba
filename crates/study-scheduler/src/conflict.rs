//! Detect overlap between a candidate session and existing busy time.
//!
//! Adjacent intervals (where one ends exactly when another starts) are NOT
//! conflicts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::interval::{BusyTimeSet, TimeInterval};

/// Outcome of checking a candidate against a busy set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResult {
    pub has_conflict: bool,
    /// Busy intervals overlapping the candidate, in start order.
    pub conflicting_intervals: Vec<TimeInterval>,
}

impl ConflictResult {
    /// Total minutes of `candidate` that fall inside conflicting busy time.
    pub fn overlap_minutes(&self, candidate: &TimeInterval) -> i64 {
        self.conflicting_intervals
            .iter()
            .filter_map(|busy| busy.intersection(candidate))
            .map(|overlap| overlap.duration_minutes())
            .sum()
    }
}

/// Check `candidate` against every interval in `busy`.
///
/// Two intervals overlap iff `candidate.start < busy.end && candidate.end > busy.start`.
pub fn check_conflicts(candidate: &TimeInterval, busy: &BusyTimeSet) -> ConflictResult {
    let conflicting = conflicting_slice(candidate, busy).to_vec();

    debug!(
        start = %candidate.start(),
        end = %candidate.end(),
        conflicts = conflicting.len(),
        "checked candidate for conflicts"
    );

    ConflictResult {
        has_conflict: !conflicting.is_empty(),
        conflicting_intervals: conflicting,
    }
}

/// The contiguous run of busy intervals overlapping `candidate`.
///
/// Binary-searches to the first interval ending after the candidate starts,
/// then takes intervals until one starts at or after the candidate's end.
pub(crate) fn conflicting_slice<'a>(
    candidate: &TimeInterval,
    busy: &'a BusyTimeSet,
) -> &'a [TimeInterval] {
    let intervals = busy.as_slice();
    let first = busy.first_ending_after(candidate.start());
    let count = intervals[first..]
        .iter()
        .take_while(|interval| interval.start() < candidate.end())
        .count();
    &intervals[first..first + count]
}
