//! Status command for almanack.
//!
//! The at-a-glance view: the active week and its ledger so far, streaks,
//! cycle position, the next queued virtue, and the day's epigraph.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog;
use crate::core::{CycleProgress, PracticeEngine, WEEK_LENGTH_DAYS};
use crate::util;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// The active week as shown by status.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveWeekStatus {
    /// The virtue under practice.
    pub virtue_id: String,
    /// Its display name.
    pub virtue_name: String,
    /// Its one-line precept.
    pub description: String,
    /// First day of the week.
    pub start_date: NaiveDate,
    /// 1-based day of the week, from the start date.
    pub day_number: i64,
    /// Days left before the week can close.
    pub days_remaining: i64,
    /// Days logged so far.
    pub observation_count: usize,
    /// Fault days so far.
    pub fault_count: usize,
    /// Whether today has been logged.
    pub today_logged: bool,
    /// Today's verdict, when logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_fault: Option<bool>,
    /// Whether seven days have elapsed.
    pub ready_to_complete: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Always true; status has no failure path.
    pub success: bool,
    /// The practitioner's name, if set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// The active week, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<ActiveWeekStatus>,
    /// Consecutive days logged.
    pub current_streak: u32,
    /// Longest streak ever reached.
    pub longest_streak: u32,
    /// Position in the 13-week cycle.
    pub cycle: CycleProgress,
    /// Display name of the next queued virtue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_queued: Option<String>,
    /// Canonical virtues not yet practiced, when no week is active.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unattempted: Vec<&'static str>,
    /// The day's epigraph.
    pub quote: &'static str,
}

/// The status command implementation.
pub struct StatusCommand {
    engine: PracticeEngine,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the status command against today.
    pub fn run(&self, options: &StatusOptions) -> StatusOutput {
        self.run_on(util::today(), options)
    }

    /// Run the status command against an explicit day.
    pub fn run_on(&self, today: NaiveDate, _options: &StatusOptions) -> StatusOutput {
        let state = self.engine.state();

        let week = state.current_week_start.and_then(|start| {
            let virtue_id = state.current_virtue_id.clone()?;
            let (virtue_name, description) = match catalog::virtue_by_id(&virtue_id) {
                Some(v) => (v.name.to_string(), v.description.to_string()),
                None => state
                    .custom_virtue(&virtue_id)
                    .map(|c| (c.name.clone(), c.description.clone()))
                    .unwrap_or_else(|| (virtue_id.clone(), String::new())),
            };
            let today_entry = state.observation_for(today);
            Some(ActiveWeekStatus {
                virtue_id,
                virtue_name,
                description,
                start_date: start,
                day_number: util::day_diff(start, today) + 1,
                days_remaining: self.engine.days_remaining_in_week_on(today).unwrap_or(0),
                observation_count: state.current_week_observations.len(),
                fault_count: state
                    .current_week_observations
                    .iter()
                    .filter(|o| o.has_fault)
                    .count(),
                today_logged: today_entry.is_some(),
                today_fault: today_entry.map(|o| o.has_fault),
                ready_to_complete: self.engine.is_week_complete_on(today),
            })
        });

        let unattempted = if week.is_some() {
            Vec::new()
        } else {
            self.engine.never_attempted_virtues()
        };

        StatusOutput {
            success: true,
            user_name: state.user_name.clone(),
            week,
            current_streak: state.streak.current_streak,
            longest_streak: state.streak.longest_streak,
            cycle: self.engine.cycle_progress(),
            next_queued: self
                .engine
                .next_queued_virtue()
                .and_then(|id| state.virtue_name(id)),
            unattempted,
            quote: catalog::quote_for_day(today),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let mut text = String::new();

        if let Some(name) = &output.user_name {
            text.push_str(&format!("Good day, {}.\n", name));
        }
        text.push_str(&format!("\"{}\"\n\n", output.quote));

        match &output.week {
            Some(week) => {
                text.push_str(&format!(
                    "Practicing {}: \"{}\"\n",
                    week.virtue_name, week.description
                ));
                if week.ready_to_complete {
                    text.push_str(&format!(
                        "The week that began {} is ready to close: 'almanack complete'.\n",
                        util::format_long(week.start_date)
                    ));
                } else {
                    text.push_str(&format!(
                        "Day {} of {}, started {}. {} {} remaining.\n",
                        week.day_number,
                        WEEK_LENGTH_DAYS,
                        util::format_long(week.start_date),
                        week.days_remaining,
                        if week.days_remaining == 1 {
                            "day"
                        } else {
                            "days"
                        }
                    ));
                }
                text.push_str(&format!(
                    "{} logged, {} {}.",
                    week.observation_count,
                    week.fault_count,
                    if week.fault_count == 1 {
                        "fault"
                    } else {
                        "faults"
                    }
                ));
                match week.today_fault {
                    Some(true) => text.push_str(" Today: fault.\n"),
                    Some(false) => text.push_str(" Today: clean.\n"),
                    None => text.push_str(" Today is not logged yet.\n"),
                }
            }
            None => {
                text.push_str("No active practice week.\n");
                match output.unattempted.first() {
                    Some(id) => {
                        text.push_str(&format!("Start one with 'almanack begin {}'.\n", id))
                    }
                    None => text.push_str("Start one with 'almanack begin <virtue>'.\n"),
                }
            }
        }

        text.push_str(&format!(
            "Streak: {} {} (longest {}).\n",
            output.current_streak,
            if output.current_streak == 1 {
                "day"
            } else {
                "days"
            },
            output.longest_streak
        ));
        text.push_str(&format!(
            "Cycle {}: week {} of {}.\n",
            output.cycle.cycle_number, output.cycle.current, output.cycle.total
        ));
        if let Some(next) = &output.next_queued {
            text.push_str(&format!("Next in queue: {}.\n", next));
        }

        text
    }
}
