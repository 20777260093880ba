//! # study-scheduler
//!
//! Calendar availability and scheduling engine for study sessions.
//!
//! Given busy intervals already fetched from a calendar provider, the engine
//! detects conflicts, enumerates available slots under duration and break
//! constraints, suggests alternatives for a conflicting request, and finds the
//! next free opening. Every operation is a synchronous, side-effect-free
//! function over in-memory intervals: fetching busy time is the caller's job.
//!
//! ## Modules
//!
//! - [`interval`]: `TimeInterval`, raw `BusyEvent`s, and merging into a `BusyTimeSet`
//! - [`conflict`]: Overlap detection for a candidate interval
//! - [`freebusy`]: Free gaps inside a search window
//! - [`slots`]: Greedy slot packing with break padding
//! - [`alternatives`]: Nearby conflict-free suggestions
//! - [`next_slot`]: Earliest opening within a horizon
//! - [`planner`]: Accept-or-suggest composition for a requested session
//! - [`policy`]: Tunable buffer and tie-break policy
//! - [`error`]: Error types

pub mod alternatives;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod next_slot;
pub mod planner;
pub mod policy;
pub mod slots;

pub use alternatives::suggest_alternatives;
pub use conflict::{check_conflicts, ConflictResult};
pub use error::ScheduleError;
pub use freebusy::{find_gaps, FreeGap, GapEdge};
pub use interval::{merge, BusyEvent, BusyTimeSet, TimeInterval};
pub use next_slot::find_next_free_slot;
pub use planner::{plan_session, SessionPlan};
pub use policy::{BufferPolicy, SchedulingPolicy, TieBreak};
pub use slots::{find_available_slots, generate_slots, AvailableSlot, SlotQuery};
