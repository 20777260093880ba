//! Time intervals and the merged busy-time set.
//!
//! Busy periods arrive from the calendar provider unsorted and possibly
//! overlapping. [`merge`] validates them and folds them into a [`BusyTimeSet`]:
//! sorted by start, with touching or overlapping intervals fused into one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ScheduleError};

/// A busy period as reported by a calendar provider, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A non-empty time range. `start < end` always holds.
///
/// Ordering is by start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BusyEvent", into = "BusyEvent")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Build an interval, rejecting zero or negative lengths.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` if `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(ScheduleError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval of `minutes` length beginning at `start`.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` if `minutes <= 0`, or
    /// `ScheduleError::InvalidQuery` if the end falls outside the representable
    /// date range.
    pub fn from_minutes(start: DateTime<Utc>, minutes: i64) -> Result<Self> {
        let end = Duration::try_minutes(minutes)
            .and_then(|length| start.checked_add_signed(length))
            .ok_or_else(|| {
                ScheduleError::InvalidQuery(format!(
                    "{minutes} minutes from {start} is out of range"
                ))
            })?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Strict overlap: intervals that only touch at a boundary do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The overlapping part of two intervals, if they overlap at all.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        self.overlaps(other).then(|| TimeInterval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

impl TryFrom<BusyEvent> for TimeInterval {
    type Error = ScheduleError;

    fn try_from(event: BusyEvent) -> Result<Self> {
        Self::new(event.start, event.end)
    }
}

impl From<TimeInterval> for BusyEvent {
    fn from(interval: TimeInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
        }
    }
}

/// A canonical set of busy time: sorted by start, pairwise disjoint, and with
/// no two intervals touching (touching intervals are fused on construction).
///
/// Sets are never mutated in place; every transformation returns a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimeInterval>", into = "Vec<TimeInterval>")]
pub struct BusyTimeSet {
    intervals: Vec<TimeInterval>,
}

impl BusyTimeSet {
    /// Sort and fuse already-valid intervals into a canonical set.
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = TimeInterval>,
    {
        let mut sorted: Vec<TimeInterval> = intervals.into_iter().collect();
        sorted.sort_unstable();

        let mut merged: Vec<TimeInterval> = Vec::with_capacity(sorted.len());
        for interval in sorted {
            if let Some(last) = merged.last_mut() {
                // Touching counts: [09:00, 10:00] and [10:00, 11:00] fuse.
                if interval.start <= last.end {
                    last.end = last.end.max(interval.end);
                    continue;
                }
            }
            merged.push(interval);
        }

        Self { intervals: merged }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeInterval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[TimeInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The set as provider-shaped events, e.g. for re-serialization.
    pub fn to_events(&self) -> Vec<BusyEvent> {
        self.intervals.iter().copied().map(BusyEvent::from).collect()
    }

    /// Point-set union with another busy set (e.g. a second calendar).
    pub fn union(&self, other: &BusyTimeSet) -> BusyTimeSet {
        BusyTimeSet::from_intervals(self.iter().chain(other.iter()).copied())
    }

    /// Restrict the set to `window`, truncating intervals that straddle its
    /// bounds and dropping those entirely outside it.
    pub fn clip(&self, window: &TimeInterval) -> BusyTimeSet {
        let first = self.first_ending_after(window.start);
        let intervals = self.intervals[first..]
            .iter()
            .take_while(|interval| interval.start < window.end)
            .filter_map(|interval| interval.intersection(window))
            .collect();
        BusyTimeSet { intervals }
    }

    pub fn total_busy_minutes(&self) -> i64 {
        self.intervals.iter().map(TimeInterval::duration_minutes).sum()
    }

    /// Index of the first interval whose end lies strictly after `instant`.
    ///
    /// Ends are sorted because intervals are sorted and disjoint.
    pub(crate) fn first_ending_after(&self, instant: DateTime<Utc>) -> usize {
        self.intervals.partition_point(|interval| interval.end <= instant)
    }
}

impl From<Vec<TimeInterval>> for BusyTimeSet {
    fn from(intervals: Vec<TimeInterval>) -> Self {
        BusyTimeSet::from_intervals(intervals)
    }
}

impl From<BusyTimeSet> for Vec<TimeInterval> {
    fn from(set: BusyTimeSet) -> Self {
        set.intervals
    }
}

impl<'a> IntoIterator for &'a BusyTimeSet {
    type Item = &'a TimeInterval;
    type IntoIter = std::slice::Iter<'a, TimeInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// Merge raw busy events into a canonical [`BusyTimeSet`].
///
/// Events with `start >= end` are dropped with a warning; they never abort the
/// merge. Merging an already-merged set's events returns an equal set.
pub fn merge(raw: &[BusyEvent]) -> BusyTimeSet {
    let valid = raw
        .iter()
        .filter_map(|event| match TimeInterval::new(event.start, event.end) {
            Ok(interval) => Some(interval),
            Err(err) => {
                warn!(start = %event.start, end = %event.end, error = %err, "dropping invalid busy interval");
                None
            }
        });

    let set = BusyTimeSet::from_intervals(valid);
    debug!(raw = raw.len(), merged = set.len(), "merged busy intervals");
    set
}
