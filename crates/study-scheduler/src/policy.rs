//! Tunable scheduling policy.
//!
//! Defaults reproduce the standard behaviour: break padding only against real
//! busy time, later alternatives preferred over earlier ones at equal distance,
//! and a 15-minute probe step.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::freebusy::GapEdge;

/// Where break padding is required around a generated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// Pad only edges that touch busy time; window boundaries need no padding.
    #[default]
    PadBusyEdgesOnly,
    /// Pad every gap edge, including the search window boundaries.
    PadAllEdges,
}

impl BufferPolicy {
    /// Whether a gap edge of this kind must be padded by the break duration.
    pub fn pads(self, edge: GapEdge) -> bool {
        match self {
            BufferPolicy::PadBusyEdgesOnly => edge == GapEdge::Busy,
            BufferPolicy::PadAllEdges => true,
        }
    }
}

/// Which direction wins when two alternatives are equally far from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    PreferLater,
    PreferEarlier,
}

impl TieBreak {
    /// Probe directions in order, as signs applied to the probe offset.
    pub(crate) fn directions(self) -> [i64; 2] {
        match self {
            TieBreak::PreferLater => [1, -1],
            TieBreak::PreferEarlier => [-1, 1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingPolicy {
    pub buffer_policy: BufferPolicy,
    pub tie_break: TieBreak,
    /// Increment between alternative-slot probes.
    pub probe_step_minutes: i64,
    /// Alternatives proposed by [`crate::plan_session`] on conflict.
    pub max_alternatives: usize,
    /// How far [`crate::plan_session`] probes in each direction.
    pub search_horizon_minutes: i64,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            buffer_policy: BufferPolicy::default(),
            tie_break: TieBreak::default(),
            probe_step_minutes: 15,
            max_alternatives: 3,
            search_horizon_minutes: 240,
        }
    }
}

impl SchedulingPolicy {
    /// # Errors
    /// Returns `ScheduleError::InvalidPolicy` for a non-positive probe step,
    /// zero alternatives, a negative horizon, or a step or horizon too large to
    /// express as a duration.
    pub fn validate(&self) -> Result<()> {
        if self.probe_step_minutes <= 0 {
            return Err(ScheduleError::InvalidPolicy(format!(
                "probe_step_minutes must be positive, got {}",
                self.probe_step_minutes
            )));
        }
        if self.max_alternatives == 0 {
            return Err(ScheduleError::InvalidPolicy(
                "max_alternatives must be at least 1".to_string(),
            ));
        }
        if self.search_horizon_minutes < 0 {
            return Err(ScheduleError::InvalidPolicy(format!(
                "search_horizon_minutes must not be negative, got {}",
                self.search_horizon_minutes
            )));
        }
        for (name, minutes) in [
            ("probe_step_minutes", self.probe_step_minutes),
            ("search_horizon_minutes", self.search_horizon_minutes),
        ] {
            if Duration::try_minutes(minutes).is_none() {
                return Err(ScheduleError::InvalidPolicy(format!(
                    "{name} is out of range, got {minutes}"
                )));
            }
        }
        Ok(())
    }
}
