use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::domain::models::blocked::BlockedSlot;
use crate::domain::models::schedule::{ScheduleConfig, SpecialSchedule};

/// A misconfigured schedule. Callers log it and degrade to "no slots";
/// it must never loop or crash the availability path.
#[derive(Error, Debug, PartialEq)]
pub enum ScheduleConfigError {
    #[error("interval_minutes must be positive, got {0}")]
    NonPositiveInterval(i32),
    #[error("start_time {start} is not before end_time {end}")]
    EmptyWindow { start: NaiveTime, end: NaiveTime },
}

/// The slot-generation parameters that apply to one date, resolved once
/// so precedence logic is not scattered across query sites.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlan {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub interval_minutes: i32,
    pub slots_per_interval: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeneratedSlot {
    pub time: NaiveTime,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlot {
    pub time: NaiveTime,
    pub capacity: i32,
    pub available: i32,
}

/// Resolves which schedule governs a date. An active special schedule fully
/// overrides the weekly config; a restricted special with an unauthorized
/// requester yields no plan at all rather than falling back to the weekly
/// config. An inactive special is treated as absent.
pub fn resolve_plan(
    weekly: Option<&ScheduleConfig>,
    special: Option<&SpecialSchedule>,
    requester_authorized: bool,
) -> Option<SlotPlan> {
    if let Some(special) = special.filter(|s| s.is_active) {
        if special.restricted_access && !requester_authorized {
            return None;
        }
        return Some(SlotPlan {
            start_time: special.start_time,
            end_time: special.end_time,
            interval_minutes: special.interval_minutes,
            slots_per_interval: special.slots_per_interval,
        });
    }

    weekly.filter(|w| w.is_active).map(|w| SlotPlan {
        start_time: w.start_time,
        end_time: w.end_time,
        interval_minutes: w.interval_minutes,
        slots_per_interval: w.slots_per_interval,
    })
}

/// Generates the ordered slot starts for a plan: start, start + interval, …
/// over the half-open window [start_time, end_time).
pub fn generate_slots(plan: &SlotPlan) -> Result<Vec<GeneratedSlot>, ScheduleConfigError> {
    if plan.interval_minutes <= 0 {
        return Err(ScheduleConfigError::NonPositiveInterval(plan.interval_minutes));
    }
    if plan.start_time >= plan.end_time {
        return Err(ScheduleConfigError::EmptyWindow {
            start: plan.start_time,
            end: plan.end_time,
        });
    }

    let step = Duration::minutes(plan.interval_minutes as i64);
    let mut slots = Vec::new();
    let mut cursor = plan.start_time;

    while cursor < plan.end_time {
        slots.push(GeneratedSlot {
            time: cursor,
            capacity: plan.slots_per_interval,
        });

        // NaiveTime arithmetic wraps at midnight; a wrapped cursor would
        // otherwise restart the loop from the small hours.
        let next = cursor.overflowing_add_signed(step).0;
        if next <= cursor {
            break;
        }
        cursor = next;
    }

    Ok(slots)
}

/// Candidate slots a request may target on `date`: generated slots minus
/// blocked ranges, minus already-passed times when `date` is today.
/// Capacity accounting is layered on separately.
pub fn bookable_slots(
    plan: &SlotPlan,
    blocked_slots: &[BlockedSlot],
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<Vec<GeneratedSlot>, ScheduleConfigError> {
    let generated = generate_slots(plan)?;

    let slots = generated
        .into_iter()
        .filter(|slot| {
            !blocked_slots
                .iter()
                .any(|b| b.applies_on(date) && b.covers(slot.time))
        })
        .filter(|slot| date != now.date() || slot.time >= now.time())
        .collect();

    Ok(slots)
}

/// Subtracts reserved counts (summed `slots_reserved` of active reservations,
/// keyed by minute-normalized time) and drops exhausted slots. Available
/// capacity never goes negative.
pub fn apply_reserved(
    slots: Vec<GeneratedSlot>,
    reserved: &[(NaiveTime, i64)],
) -> Vec<AvailableSlot> {
    slots
        .into_iter()
        .map(|slot| {
            let taken = reserved
                .iter()
                .filter(|(time, _)| *time == slot.time)
                .map(|(_, count)| *count)
                .sum::<i64>() as i32;
            AvailableSlot {
                time: slot.time,
                capacity: slot.capacity,
                available: (slot.capacity - taken).max(0),
            }
        })
        .filter(|slot| slot.available > 0)
        .collect()
}
