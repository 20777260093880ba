//! WASM bindings for study-scheduler.
//!
//! Exposes busy-time merging, conflict checks, free gaps, slot search,
//! alternative suggestions and session planning to JavaScript via
//! `wasm-bindgen`. All complex types cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p study-scheduler-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/study_scheduler_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use study_scheduler::{
    BusyEvent, BusyTimeSet, FreeGap, SchedulingPolicy, SlotQuery, TimeInterval,
};
use wasm_bindgen::prelude::*;

/// Errors are plain strings until the export boundary turns them into `JsValue`s.
type BindingResult<T> = Result<T, String>;

/// Input format for intervals passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-03-02T09:00:00+00:00")
/// and naive local time (e.g., "2026-03-02T09:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> BindingResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

/// Parse a JSON array of `{start, end}` objects and merge it into a busy set.
///
/// Intervals with `start >= end` are dropped by the merge, not rejected.
fn parse_busy_json(json: &str) -> BindingResult<BusyTimeSet> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;

    let events = inputs
        .into_iter()
        .map(|input| {
            Ok(BusyEvent {
                start: parse_datetime(&input.start)?,
                end: parse_datetime(&input.end)?,
            })
        })
        .collect::<BindingResult<Vec<BusyEvent>>>()?;

    Ok(study_scheduler::merge(&events))
}

fn parse_interval(start: &str, end: &str) -> BindingResult<TimeInterval> {
    TimeInterval::new(parse_datetime(start)?, parse_datetime(end)?).map_err(|e| e.to_string())
}

/// Parse an optional policy object; missing fields take their defaults.
fn parse_policy(json: Option<&str>) -> BindingResult<SchedulingPolicy> {
    let policy: SchedulingPolicy = match json {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("Invalid policy JSON: {}", e))?
        }
        None => SchedulingPolicy::default(),
    };
    policy.validate().map_err(|e| e.to_string())?;
    Ok(policy)
}

fn to_json<T: Serialize>(value: &T) -> BindingResult<String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Bindings, independent of the JS runtime
// ---------------------------------------------------------------------------

fn merge_busy_impl(events_json: &str) -> BindingResult<String> {
    to_json(&parse_busy_json(events_json)?)
}

fn check_conflicts_impl(events_json: &str, start: &str, end: &str) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let candidate = parse_interval(start, end)?;
    to_json(&study_scheduler::check_conflicts(&candidate, &busy))
}

fn find_free_gaps_impl(
    events_json: &str,
    window_start: &str,
    window_end: &str,
) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let window = parse_interval(window_start, window_end)?;
    let gaps: Vec<FreeGap> = study_scheduler::find_gaps(&window, &busy).collect();
    to_json(&gaps)
}

fn parse_query(
    window_start: &str,
    window_end: &str,
    duration_minutes: i64,
    break_minutes: i64,
) -> BindingResult<SlotQuery> {
    SlotQuery::new(
        parse_datetime(window_start)?,
        parse_datetime(window_end)?,
        duration_minutes,
        break_minutes,
    )
    .map_err(|e| e.to_string())
}

fn find_available_slots_impl(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: i64,
    break_minutes: i64,
    policy_json: Option<&str>,
) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let query = parse_query(window_start, window_end, duration_minutes, break_minutes)?;
    let policy = parse_policy(policy_json)?;
    to_json(&study_scheduler::find_available_slots(&busy, &query, &policy))
}

fn find_next_free_slot_impl(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: i64,
    break_minutes: i64,
    policy_json: Option<&str>,
) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let query = parse_query(window_start, window_end, duration_minutes, break_minutes)?;
    let policy = parse_policy(policy_json)?;
    to_json(&study_scheduler::find_next_free_slot(&busy, &query, &policy))
}

fn suggest_alternatives_impl(
    events_json: &str,
    start: &str,
    end: &str,
    max_results: usize,
    search_horizon_minutes: i64,
    policy_json: Option<&str>,
) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let requested = parse_interval(start, end)?;
    let policy = parse_policy(policy_json)?;
    to_json(&study_scheduler::suggest_alternatives(
        &requested,
        &busy,
        max_results,
        search_horizon_minutes,
        &policy,
    ))
}

fn plan_session_impl(
    events_json: &str,
    start: &str,
    end: &str,
    policy_json: Option<&str>,
) -> BindingResult<String> {
    let busy = parse_busy_json(events_json)?;
    let requested = parse_interval(start, end)?;
    let policy = parse_policy(policy_json)?;
    let plan = study_scheduler::plan_session(&requested, &busy, &policy).map_err(|e| e.to_string())?;
    to_json(&plan)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Merge a JSON array of `{start, end}` busy intervals.
///
/// Returns a JSON array of sorted, disjoint `{start, end}` intervals.
#[wasm_bindgen(js_name = "mergeBusy")]
pub fn merge_busy(events_json: &str) -> Result<String, JsValue> {
    merge_busy_impl(events_json).map_err(|e| JsValue::from_str(&e))
}

/// Check a candidate `[start, end)` against busy intervals.
///
/// Returns `{has_conflict, conflicting_intervals}`.
#[wasm_bindgen(js_name = "checkConflicts")]
pub fn check_conflicts(events_json: &str, start: &str, end: &str) -> Result<String, JsValue> {
    check_conflicts_impl(events_json, start, end).map_err(|e| JsValue::from_str(&e))
}

/// Free gaps of the busy intervals inside a window.
///
/// Returns a JSON array of `{start, end, start_edge, end_edge}` objects.
#[wasm_bindgen(js_name = "findFreeGaps")]
pub fn find_free_gaps(
    events_json: &str,
    window_start: &str,
    window_end: &str,
) -> Result<String, JsValue> {
    find_free_gaps_impl(events_json, window_start, window_end).map_err(|e| JsValue::from_str(&e))
}

/// All slots of `duration_minutes` with `break_minutes` padding inside a window.
///
/// `policy_json` is an optional scheduling policy object.
#[wasm_bindgen(js_name = "findAvailableSlots")]
pub fn find_available_slots(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: i32,
    break_minutes: i32,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    find_available_slots_impl(
        events_json,
        window_start,
        window_end,
        i64::from(duration_minutes),
        i64::from(break_minutes),
        policy_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// The earliest slot inside a window, as a JSON object or `null`.
#[wasm_bindgen(js_name = "findNextFreeSlot")]
pub fn find_next_free_slot(
    events_json: &str,
    window_start: &str,
    window_end: &str,
    duration_minutes: i32,
    break_minutes: i32,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    find_next_free_slot_impl(
        events_json,
        window_start,
        window_end,
        i64::from(duration_minutes),
        i64::from(break_minutes),
        policy_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Conflict-free alternatives near a requested `[start, end)`.
#[wasm_bindgen(js_name = "suggestAlternatives")]
pub fn suggest_alternatives(
    events_json: &str,
    start: &str,
    end: &str,
    max_results: u32,
    search_horizon_minutes: i32,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    suggest_alternatives_impl(
        events_json,
        start,
        end,
        max_results as usize,
        i64::from(search_horizon_minutes),
        policy_json.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Accept a requested session or return its conflicts plus alternatives.
///
/// Returns `{"status": "available", ...}` or `{"status": "conflict", ...}`.
#[wasm_bindgen(js_name = "planSession")]
pub fn plan_session(
    events_json: &str,
    start: &str,
    end: &str,
    policy_json: Option<String>,
) -> Result<String, JsValue> {
    plan_session_impl(events_json, start, end, policy_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}
