//! Milestone facts derived from practice progress.
//!
//! The engine never schedules notifications or prompts for anything; it
//! only reports what happened. Callers (the CLI today, a notification
//! layer elsewhere) decide what to do with the facts.

use serde::Serialize;

use crate::catalog::CYCLE_LENGTH;
use crate::core::state::{StreakData, WeekRecord};

/// Day counts at which a logging streak becomes a milestone.
pub const STREAK_MILESTONES: [u32; 4] = [7, 30, 50, 100];

/// A recurring milestone fires on every nth perfect week.
const PERFECT_WEEK_INTERVAL: u32 = 3;

/// A noteworthy fact about the practice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Milestone {
    /// The completed week had all seven days logged and no faults.
    PerfectWeek,
    /// The logging streak reached a milestone length.
    StreakMilestone { days: u32 },
    /// Every virtue in the cycle has been practiced once more.
    CycleComplete { cycle: u32 },
    /// The practice has accumulated another batch of perfect weeks.
    RecurringPerfectWeeks { count: u32 },
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerfectWeek => write!(f, "Perfect week: seven days observed, zero faults"),
            Self::StreakMilestone { days } => write!(f, "{}-day logging streak", days),
            Self::CycleComplete { cycle } => {
                write!(f, "Cycle {} complete: all thirteen virtues practiced", cycle)
            }
            Self::RecurringPerfectWeeks { count } => {
                write!(f, "{} perfect weeks in the practice", count)
            }
        }
    }
}

/// True when a streak of `days` is one of the milestone lengths.
pub fn is_streak_milestone(days: u32) -> bool {
    STREAK_MILESTONES.contains(&days)
}

/// Derive the milestones earned by a just-completed week.
///
/// `streak` and `total_weeks` are the values as they stand after the
/// record was appended: the perfect-week counter already incremented, the
/// record already in the store.
pub fn for_completed_week(
    record: &WeekRecord,
    streak: &StreakData,
    total_weeks: usize,
) -> Vec<Milestone> {
    let mut milestones = Vec::new();

    if record.is_perfect() {
        milestones.push(Milestone::PerfectWeek);
    }

    if is_streak_milestone(streak.current_streak) {
        milestones.push(Milestone::StreakMilestone {
            days: streak.current_streak,
        });
    }

    if total_weeks > 0 && total_weeks % CYCLE_LENGTH == 0 {
        milestones.push(Milestone::CycleComplete {
            cycle: (total_weeks / CYCLE_LENGTH) as u32,
        });
    }

    if streak.perfect_weeks > 0 && streak.perfect_weeks % PERFECT_WEEK_INTERVAL == 0 {
        milestones.push(Milestone::RecurringPerfectWeeks {
            count: streak.perfect_weeks,
        });
    }

    milestones
}
