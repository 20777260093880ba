//! Compute free gaps between merged busy periods within a search window.
//!
//! Gaps are produced lazily, left to right. Each gap records whether its edges
//! come from the window boundary or from real busy time, which the slot
//! generator needs to decide where break padding applies.

use std::iter::FusedIterator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{BusyTimeSet, TimeInterval};

/// What bounds one side of a free gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapEdge {
    /// The search window boundary.
    Window,
    /// A busy interval.
    Busy,
}

/// A maximal free range inside the search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeGap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_edge: GapEdge,
    pub end_edge: GapEdge,
}

impl FreeGap {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Lazy iterator over the free gaps of a busy set inside a window.
///
/// Created by [`find_gaps`]. Not restartable; compute a new one per query.
#[derive(Debug)]
pub struct FreeGaps<'a> {
    window: TimeInterval,
    busy: std::slice::Iter<'a, TimeInterval>,
    cursor: DateTime<Utc>,
    cursor_edge: GapEdge,
    finished: bool,
}

impl Iterator for FreeGaps<'_> {
    type Item = FreeGap;

    fn next(&mut self) -> Option<FreeGap> {
        if self.finished {
            return None;
        }

        for interval in self.busy.by_ref() {
            if interval.start() >= self.window.end() {
                break;
            }

            // Clip to the window before comparing against the cursor.
            let busy_start = interval.start().max(self.window.start());
            let busy_end = interval.end().min(self.window.end());

            let gap = (self.cursor < busy_start).then_some(FreeGap {
                start: self.cursor,
                end: busy_start,
                start_edge: self.cursor_edge,
                end_edge: GapEdge::Busy,
            });

            self.cursor = self.cursor.max(busy_end);
            self.cursor_edge = GapEdge::Busy;

            if gap.is_some() {
                return gap;
            }
        }

        // Trailing gap after the last busy period.
        self.finished = true;
        (self.cursor < self.window.end()).then_some(FreeGap {
            start: self.cursor,
            end: self.window.end(),
            start_edge: self.cursor_edge,
            end_edge: GapEdge::Window,
        })
    }
}

impl FusedIterator for FreeGaps<'_> {}

/// Find the free gaps of `busy` inside `window`.
///
/// Busy intervals entirely outside the window are ignored and those straddling
/// its bounds are truncated to it.
pub fn find_gaps<'a>(window: &TimeInterval, busy: &'a BusyTimeSet) -> FreeGaps<'a> {
    let first = busy.first_ending_after(window.start());
    FreeGaps {
        window: *window,
        busy: busy.as_slice()[first..].iter(),
        cursor: window.start(),
        cursor_edge: GapEdge::Window,
        finished: false,
    }
}
