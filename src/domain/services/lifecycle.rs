use chrono::{Days, Duration, NaiveDateTime, NaiveTime};

/// Bind parameters for the two lifecycle sweeps, derived once from the
/// facility-local clock so both repositories and both sweeps agree on
/// row ownership.
///
/// The expire sweep owns active reservations whose date is more than one
/// day in the past, or dated today and more than two hours past. The
/// complete sweep owns everything else strictly before "now"; it excludes
/// expire-owned rows so a stale row is only ever claimed by one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepWindow {
    pub today: chrono::NaiveDate,
    pub now_time: NaiveTime,
    /// Dates strictly before this are expire-owned.
    pub expire_date_cutoff: chrono::NaiveDate,
    /// Today's times strictly before this are expire-owned.
    pub expire_time_cutoff: NaiveTime,
}

pub fn sweep_window(now: NaiveDateTime) -> SweepWindow {
    let today = now.date();
    let two_hours_ago = now - Duration::hours(2);

    // Near midnight the two-hour mark lands on the previous day; no
    // same-day time can be past it, so the cutoff collapses to 00:00.
    let expire_time_cutoff = if two_hours_ago.date() == today {
        two_hours_ago.time()
    } else {
        NaiveTime::MIN
    };

    SweepWindow {
        today,
        now_time: now.time(),
        expire_date_cutoff: today.checked_sub_days(Days::new(1)).unwrap_or(today),
        expire_time_cutoff,
    }
}
