//! Log command for almanack.
//!
//! Records one day's observation against the active week: fault or
//! clean, with an optional short note. Re-logging a day replaces its
//! entry. A fresh log can be undone for five seconds.

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::PracticeEngine;
use crate::milestones::{is_streak_milestone, Milestone};
use crate::util;

/// Options for the log command.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the log command.
#[derive(Debug, Clone, Serialize)]
pub struct LogOutput {
    /// Whether the observation was recorded.
    pub success: bool,
    /// The day recorded.
    pub date: Option<NaiveDate>,
    /// Whether the day was a fault.
    pub has_fault: bool,
    /// The attached note, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Consecutive days logged.
    pub current_streak: u32,
    /// Longest streak ever reached.
    pub longest_streak: u32,
    /// A streak milestone reached by this log, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Milestone>,
    /// Error message if the log was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogOutput {
    /// Create a successful output.
    pub fn success(
        date: NaiveDate,
        has_fault: bool,
        note: Option<String>,
        current_streak: u32,
        longest_streak: u32,
        milestone: Option<Milestone>,
    ) -> Self {
        Self {
            success: true,
            date: Some(date),
            has_fault,
            note,
            current_streak,
            longest_streak,
            milestone,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            date: None,
            has_fault: false,
            note: None,
            current_streak: 0,
            longest_streak: 0,
            milestone: None,
            error: Some(error.into()),
        }
    }
}

/// The log command implementation.
pub struct LogCommand {
    engine: PracticeEngine,
}

impl LogCommand {
    /// Create a new log command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the log command.
    pub fn run(
        &mut self,
        date: Option<NaiveDate>,
        has_fault: bool,
        note: Option<String>,
        _options: &LogOptions,
    ) -> LogOutput {
        let date = date.unwrap_or_else(util::today);

        // An unchanged streak means this replaced an already-logged day,
        // so a milestone never fires twice for it.
        let streak_before = self.engine.streak().current_streak;

        if let Err(e) = self.engine.log_observation(date, has_fault, note.clone()) {
            return LogOutput::failure(e.to_string());
        }

        if let Some(err) = drain_writes(&self.engine) {
            return LogOutput::failure(err);
        }

        let streak = self.engine.streak();
        let milestone = (streak.current_streak != streak_before
            && is_streak_milestone(streak.current_streak))
        .then(|| Milestone::StreakMilestone {
            days: streak.current_streak,
        });

        LogOutput::success(
            date,
            has_fault,
            note,
            streak.current_streak,
            streak.longest_streak,
            milestone,
        )
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LogOutput, options: &LogOptions) -> String {
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
    fn format_human_readable(&self, output: &LogOutput) -> String {
        if !output.success {
            return format!(
                "Could not log: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let verdict = if output.has_fault {
            "Fault"
        } else {
            "Clean day"
        };
        let date = output
            .date
            .map(util::format_long)
            .unwrap_or_else(|| "today".to_string());

        let mut text = format!("{} recorded for {}.\n", verdict, date);
        if let Some(note) = &output.note {
            text.push_str(&format!("Note: {}\n", note));
        }
        text.push_str(&format!(
            "Current streak: {} {} (longest {}).\n",
            output.current_streak,
            if output.current_streak == 1 {
                "day"
            } else {
                "days"
            },
            output.longest_streak
        ));
        if let Some(milestone) = &output.milestone {
            text.push_str(&format!("{}!\n", milestone));
        }
        text.push_str("Change of heart? 'almanack undo' within 5 seconds.\n");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> LogCommand {
        let mut engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        engine.start_new_week("temperance").unwrap();
        LogCommand::new(engine)
    }

    #[test]
    fn test_log_clean_day() {
        let mut cmd = setup();
        let options = LogOptions::default();

        let output = cmd.run(Some(day(2026, 1, 5)), false, None, &options);

        assert!(output.success);
        assert_eq!(output.date, Some(day(2026, 1, 5)));
        assert!(!output.has_fault);
        assert_eq!(output.current_streak, 1);
        assert_eq!(cmd.engine.current_week_observations().len(), 1);
    }

    #[test]
    fn test_log_fault_with_note() {
        let mut cmd = setup();

        let output = cmd.run(
            Some(day(2026, 1, 5)),
            true,
            Some("spoke out of turn".to_string()),
            &LogOptions::default(),
        );

        assert!(output.success);
        assert!(output.has_fault);
        assert_eq!(output.note.as_deref(), Some("spoke out of turn"));
    }

    #[test]
    fn test_relog_replaces_entry() {
        let mut cmd = setup();
        let options = LogOptions::default();

        cmd.run(Some(day(2026, 1, 5)), true, None, &options);
        let output = cmd.run(Some(day(2026, 1, 5)), false, None, &options);

        assert!(output.success);
        assert_eq!(cmd.engine.current_week_observations().len(), 1);
        assert!(!cmd.engine.current_week_observations()[0].has_fault);
    }

    #[test]
    fn test_log_without_active_week_fails() {
        let engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        let mut cmd = LogCommand::new(engine);

        let output = cmd.run(Some(day(2026, 1, 5)), false, None, &LogOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("no active week"));
    }

    #[test]
    fn test_log_oversized_note_fails() {
        let mut cmd = setup();

        let output = cmd.run(
            Some(day(2026, 1, 5)),
            true,
            Some("x".repeat(141)),
            &LogOptions::default(),
        );

        assert!(!output.success);
        assert!(output.error.unwrap().contains("141 characters"));
    }

    #[test]
    fn test_streak_milestone_fires_on_seventh_day() {
        let mut cmd = setup();
        let options = LogOptions::default();
        let start = day(2026, 1, 5);

        for i in 0..6 {
            let output = cmd.run(Some(start + Duration::days(i)), false, None, &options);
            assert!(output.milestone.is_none());
        }

        let output = cmd.run(Some(start + Duration::days(6)), false, None, &options);
        assert_eq!(output.current_streak, 7);
        assert_eq!(output.milestone, Some(Milestone::StreakMilestone { days: 7 }));
    }

    #[test]
    fn test_relog_does_not_refire_milestone() {
        let mut cmd = setup();
        let options = LogOptions::default();
        let start = day(2026, 1, 5);

        for i in 0..7 {
            cmd.run(Some(start + Duration::days(i)), false, None, &options);
        }

        let output = cmd.run(Some(start + Duration::days(6)), true, None, &options);
        assert_eq!(output.current_streak, 7);
        assert!(output.milestone.is_none());
    }

    #[test]
    fn test_format_output_human() {
        let mut cmd = setup();
        let options = LogOptions::default();
        let output = cmd.run(
            Some(day(2026, 1, 5)),
            true,
            Some("late start".to_string()),
            &options,
        );

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("Fault recorded for January 5, 2026."));
        assert!(formatted.contains("Note: late start"));
        assert!(formatted.contains("Current streak: 1 day (longest 1)."));
    }

    #[test]
    fn test_format_output_json() {
        let mut cmd = setup();
        let options = LogOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(Some(day(2026, 1, 5)), false, None, &options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
        assert!(formatted.contains("\"has_fault\": false"));
    }

    #[test]
    fn test_format_output_quiet() {
        let mut cmd = setup();
        let options = LogOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(Some(day(2026, 1, 5)), false, None, &options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }
}
