//! Accept a requested session or explain why not.
//!
//! This is the composition an API layer needs: a clear request comes back as
//! a slot, a conflicting one comes back with the overlapping busy time and
//! nearby alternatives.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alternatives::suggest_alternatives;
use crate::conflict::{check_conflicts, ConflictResult};
use crate::error::Result;
use crate::interval::{BusyTimeSet, TimeInterval};
use crate::policy::SchedulingPolicy;
use crate::slots::AvailableSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionPlan {
    /// The requested time is free.
    Available { slot: AvailableSlot },
    /// The requested time overlaps busy time.
    Conflict {
        conflicts: ConflictResult,
        alternatives: Vec<AvailableSlot>,
    },
}

impl SessionPlan {
    pub fn is_available(&self) -> bool {
        matches!(self, SessionPlan::Available { .. })
    }
}

/// Check `requested` against `busy` and, on conflict, attach up to
/// `policy.max_alternatives` suggestions within `policy.search_horizon_minutes`.
///
/// # Errors
/// Returns `ScheduleError::InvalidPolicy` if `policy` fails validation.
pub fn plan_session(
    requested: &TimeInterval,
    busy: &BusyTimeSet,
    policy: &SchedulingPolicy,
) -> Result<SessionPlan> {
    policy.validate()?;

    let conflicts = check_conflicts(requested, busy);
    if !conflicts.has_conflict {
        return Ok(SessionPlan::Available {
            slot: AvailableSlot::from(*requested),
        });
    }

    let alternatives = suggest_alternatives(
        requested,
        busy,
        policy.max_alternatives,
        policy.search_horizon_minutes,
        policy,
    );

    info!(
        start = %requested.start(),
        end = %requested.end(),
        conflicts = conflicts.conflicting_intervals.len(),
        overlap_minutes = conflicts.overlap_minutes(requested),
        alternatives = alternatives.len(),
        "requested session conflicts with busy time"
    );

    Ok(SessionPlan::Conflict {
        conflicts,
        alternatives,
    })
}
