//! Earliest opening within a bounded horizon.

use tracing::debug;

use crate::freebusy::find_gaps;
use crate::interval::BusyTimeSet;
use crate::policy::SchedulingPolicy;
use crate::slots::{generate_slots, AvailableSlot, SlotQuery};

/// Return the first slot satisfying `query`, or `None` if nothing fits before
/// the end of the search window.
///
/// Gaps and slots are produced lazily, so the search stops at the first hit.
pub fn find_next_free_slot(
    busy: &BusyTimeSet,
    query: &SlotQuery,
    policy: &SchedulingPolicy,
) -> Option<AvailableSlot> {
    let slot = generate_slots(
        find_gaps(&query.window(), busy),
        query.duration_minutes(),
        query.break_minutes(),
        policy.buffer_policy,
    )
    .next();

    debug!(
        search_start = %query.search_start(),
        search_end = %query.search_end(),
        found = slot.is_some(),
        "searched for next free slot"
    );

    slot
}
