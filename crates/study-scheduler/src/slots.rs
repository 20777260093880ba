//! Pack fixed-length study slots into free gaps.
//!
//! Each gap is first trimmed by the break duration on every edge the
//! [`BufferPolicy`] pads. Slots are then packed greedily from the trimmed
//! start, separated by the break, for as long as a full slot still fits.
//! For a trimmed gap of length `L` this yields
//! `floor((L + break) / (duration + break))` slots.

use std::iter::FusedIterator;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::freebusy::{find_gaps, FreeGap};
use crate::interval::{BusyTimeSet, TimeInterval};
use crate::policy::{BufferPolicy, SchedulingPolicy};

/// A validated request for study slots inside a search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuery {
    window: TimeInterval,
    duration_minutes: i64,
    break_minutes: i64,
}

impl SlotQuery {
    /// # Errors
    /// Returns `ScheduleError::InvalidQuery` if `search_start >= search_end`,
    /// `duration_minutes <= 0`, `break_minutes < 0`, or either length is too
    /// large to express as a duration.
    pub fn new(
        search_start: DateTime<Utc>,
        search_end: DateTime<Utc>,
        duration_minutes: i64,
        break_minutes: i64,
    ) -> Result<Self> {
        let window = TimeInterval::new(search_start, search_end).map_err(|_| {
            ScheduleError::InvalidQuery(format!(
                "search start {search_start} must be before search end {search_end}"
            ))
        })?;
        if duration_minutes <= 0 {
            return Err(ScheduleError::InvalidQuery(format!(
                "duration must be positive, got {duration_minutes} minutes"
            )));
        }
        if break_minutes < 0 {
            return Err(ScheduleError::InvalidQuery(format!(
                "break must not be negative, got {break_minutes} minutes"
            )));
        }
        for (name, minutes) in [("duration", duration_minutes), ("break", break_minutes)] {
            if Duration::try_minutes(minutes).is_none() {
                return Err(ScheduleError::InvalidQuery(format!(
                    "{name} of {minutes} minutes is out of range"
                )));
            }
        }
        Ok(Self {
            window,
            duration_minutes,
            break_minutes,
        })
    }

    pub fn window(&self) -> TimeInterval {
        self.window
    }

    pub fn search_start(&self) -> DateTime<Utc> {
        self.window.start()
    }

    pub fn search_end(&self) -> DateTime<Utc> {
        self.window.end()
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }

    pub fn break_minutes(&self) -> i64 {
        self.break_minutes
    }
}

/// A concrete proposed study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl From<TimeInterval> for AvailableSlot {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: interval.start(),
            end: interval.end(),
            duration_minutes: interval.duration_minutes(),
        }
    }
}

/// Lazy iterator over slots packed into a sequence of gaps.
///
/// Created by [`generate_slots`].
#[derive(Debug)]
pub struct AvailableSlots<I> {
    gaps: I,
    duration: Duration,
    spacing: Duration,
    buffer: BufferPolicy,
    /// Next candidate start and the usable end of the gap being packed.
    current: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl<I> AvailableSlots<I> {
    /// The gap after break padding, or `None` if padding runs past the
    /// representable date range.
    fn usable_range(&self, gap: &FreeGap) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = if self.buffer.pads(gap.start_edge) {
            gap.start.checked_add_signed(self.spacing)?
        } else {
            gap.start
        };
        let end = if self.buffer.pads(gap.end_edge) {
            gap.end.checked_sub_signed(self.spacing)?
        } else {
            gap.end
        };
        Some((start, end))
    }
}

impl<I: Iterator<Item = FreeGap>> Iterator for AvailableSlots<I> {
    type Item = AvailableSlot;

    fn next(&mut self) -> Option<AvailableSlot> {
        if self.duration <= Duration::zero() {
            return None;
        }

        loop {
            if let Some((start, usable_end)) = self.current.take() {
                let fits = start
                    .checked_add_signed(self.duration)
                    .filter(|end| *end <= usable_end);
                if let Some(end) = fits {
                    self.current = end
                        .checked_add_signed(self.spacing)
                        .map(|next_start| (next_start, usable_end));
                    return Some(AvailableSlot {
                        start,
                        end,
                        duration_minutes: self.duration.num_minutes(),
                    });
                }
            }

            let gap = self.gaps.next()?;
            self.current = self.usable_range(&gap);
        }
    }
}

impl<I: FusedIterator<Item = FreeGap>> FusedIterator for AvailableSlots<I> {}

/// Greedily pack `duration_minutes` slots separated by `break_minutes` into
/// each gap.
///
/// A non-positive duration yields nothing; a negative break is treated as zero.
/// Lengths beyond the representable range are saturated, so they never fit.
pub fn generate_slots<I>(
    gaps: I,
    duration_minutes: i64,
    break_minutes: i64,
    buffer: BufferPolicy,
) -> AvailableSlots<I::IntoIter>
where
    I: IntoIterator<Item = FreeGap>,
{
    AvailableSlots {
        gaps: gaps.into_iter(),
        duration: Duration::try_minutes(duration_minutes).unwrap_or(Duration::MAX),
        spacing: Duration::try_minutes(break_minutes.max(0)).unwrap_or(Duration::MAX),
        buffer,
        current: None,
    }
}

/// Every slot satisfying `query` inside its search window.
///
/// An empty result is a normal outcome, not an error.
pub fn find_available_slots(
    busy: &BusyTimeSet,
    query: &SlotQuery,
    policy: &SchedulingPolicy,
) -> Vec<AvailableSlot> {
    let slots: Vec<AvailableSlot> = generate_slots(
        find_gaps(&query.window(), busy),
        query.duration_minutes(),
        query.break_minutes(),
        policy.buffer_policy,
    )
    .collect();

    debug!(
        search_start = %query.search_start(),
        search_end = %query.search_end(),
        duration_minutes = query.duration_minutes(),
        break_minutes = query.break_minutes(),
        slots = slots.len(),
        "generated available slots"
    );

    slots
}
