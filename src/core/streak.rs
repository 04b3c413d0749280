//! Incremental streak computation.
//!
//! Streak counters are maintained incrementally rather than recomputed from
//! history: edited days are not retained once a week freezes, so the full
//! logging history is not available to rebuild from. Two pure functions
//! cover the whole lifecycle: `update` on every observation log, and
//! `validate_on_load` once at startup.

use chrono::NaiveDate;

use crate::core::state::StreakData;
use crate::util::day_diff;

/// Days of silence after which a streak expires at load time.
const STREAK_GRACE_DAYS: i64 = 1;

/// Apply one observation log to the streak counters.
///
/// Re-logging an already-logged date (`is_new_log == false`) changes
/// nothing. A new log increments `total_days_logged` and applies the
/// continuation rule: a day difference of 0 or 1 from `last_log_date`
/// extends the streak, anything else starts over at 1. `last_log_date`
/// only ever moves forward, so logging a past day after a newer one never
/// rewinds it.
pub fn update(streak: &StreakData, date: NaiveDate, is_new_log: bool) -> StreakData {
    if !is_new_log {
        return streak.clone();
    }

    let current = match streak.last_log_date {
        None => 1,
        Some(last) => match day_diff(last, date) {
            0 | 1 => streak.current_streak + 1,
            _ => 1,
        },
    };

    StreakData {
        current_streak: current,
        longest_streak: streak.longest_streak.max(current),
        last_log_date: Some(match streak.last_log_date {
            Some(last) => last.max(date),
            None => date,
        }),
        total_days_logged: streak.total_days_logged + 1,
        perfect_weeks: streak.perfect_weeks,
    }
}

/// Detect a silently expired streak at load time.
///
/// Returns the corrected counters when more than `STREAK_GRACE_DAYS` have
/// passed since the last log while a streak was still counted; `None`
/// means the stored counters stand. This is the only staleness check in
/// the engine; there is no background timer.
pub fn validate_on_load(streak: &StreakData, today: NaiveDate) -> Option<StreakData> {
    let last = streak.last_log_date?;
    if streak.current_streak > 0 && day_diff(last, today) > STREAK_GRACE_DAYS {
        let mut corrected = streak.clone();
        corrected.current_streak = 0;
        return Some(corrected);
    }
    None
}
