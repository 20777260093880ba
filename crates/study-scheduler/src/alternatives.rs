//! Suggest nearby slots for a request that conflicts with busy time.
//!
//! Probes outward from the requested start in fixed steps, trying both
//! directions at each distance (later first by default). Candidates keep the
//! requested duration; the first `max_results` clear ones are returned sorted
//! by start time.

use chrono::Duration;
use tracing::debug;

use crate::conflict::conflicting_slice;
use crate::interval::{BusyTimeSet, TimeInterval};
use crate::policy::SchedulingPolicy;
use crate::slots::AvailableSlot;

/// Propose up to `max_results` conflict-free slots of the same length as
/// `requested`, no further than `search_horizon_minutes` from its start.
///
/// Candidates are ranked by distance from the request, then by the policy's
/// tie-break direction. Finding fewer than `max_results` (or none) is not an
/// error.
pub fn suggest_alternatives(
    requested: &TimeInterval,
    busy: &BusyTimeSet,
    max_results: usize,
    search_horizon_minutes: i64,
    policy: &SchedulingPolicy,
) -> Vec<AvailableSlot> {
    let step = policy.probe_step_minutes;
    let mut found: Vec<AvailableSlot> = Vec::with_capacity(max_results);

    if max_results == 0 || step <= 0 {
        return found;
    }

    let length = requested.duration();
    let mut offset = step;

    'probe: while offset <= search_horizon_minutes {
        let mut in_range = false;
        for sign in policy.tie_break.directions() {
            let Some(candidate) = shifted(requested, length, sign * offset) else {
                continue;
            };
            in_range = true;

            if conflicting_slice(&candidate, busy).is_empty() {
                found.push(AvailableSlot::from(candidate));
                if found.len() == max_results {
                    break 'probe;
                }
            }
        }

        // Both directions ran off the date range; larger offsets will too.
        if !in_range {
            break;
        }
        match offset.checked_add(step) {
            Some(next) => offset = next,
            None => break,
        }
    }

    found.sort_by_key(|slot| slot.start);

    debug!(
        start = %requested.start(),
        end = %requested.end(),
        max_results,
        search_horizon_minutes,
        found = found.len(),
        "suggested alternative slots"
    );

    found
}

/// `requested` moved by `minutes`, keeping `length`, if it stays in the date range.
fn shifted(requested: &TimeInterval, length: Duration, minutes: i64) -> Option<TimeInterval> {
    let start = requested
        .start()
        .checked_add_signed(Duration::try_minutes(minutes)?)?;
    let end = start.checked_add_signed(length)?;
    TimeInterval::new(start, end).ok()
}
