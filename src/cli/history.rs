//! History command for almanack.
//!
//! Lists completed practice weeks in chronological order, optionally
//! filtered to one virtue or limited to the most recent few.

use serde::Serialize;

use chrono::NaiveDate;

use crate::core::PracticeEngine;
use crate::util;

/// Options for the history command.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Only show weeks for this virtue id.
    pub virtue: Option<String>,
    /// Only show the most recent N weeks.
    pub limit: Option<usize>,
}

/// One completed week in the listing.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    /// 1-based position in the full record, oldest first.
    pub index: usize,
    /// Virtue id practiced that week.
    pub virtue_id: String,
    /// Display name for the virtue.
    pub virtue_name: String,
    /// First day of the week.
    pub start_date: NaiveDate,
    /// Last day of the week.
    pub end_date: NaiveDate,
    /// Days logged during the week.
    pub observation_count: usize,
    /// Faults marked during the week.
    pub fault_count: usize,
    /// Whether the week had full observation and zero faults.
    pub perfect: bool,
}

/// Output format for the history command.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    /// Always true; an empty history is not a failure.
    pub success: bool,
    /// Matching weeks, oldest first.
    pub records: Vec<HistoryRecord>,
    /// Total completed weeks before filtering.
    pub total: usize,
}

/// The history command implementation.
pub struct HistoryCommand {
    engine: PracticeEngine,
}

impl HistoryCommand {
    /// Create a new history command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the history command.
    pub fn run(&self, options: &HistoryOptions) -> HistoryOutput {
        let state = self.engine.state();
        let total = state.week_records.len();

        let mut records: Vec<HistoryRecord> = state
            .week_records
            .iter()
            .enumerate()
            .filter(|(_, r)| match &options.virtue {
                Some(virtue) => r.virtue_id == *virtue,
                None => true,
            })
            .map(|(i, r)| HistoryRecord {
                index: i + 1,
                virtue_id: r.virtue_id.clone(),
                virtue_name: state
                    .virtue_name(&r.virtue_id)
                    .unwrap_or_else(|| r.virtue_id.clone()),
                start_date: r.start_date,
                end_date: r.end_date,
                observation_count: r.observations.len(),
                fault_count: r.fault_count(),
                perfect: r.is_perfect(),
            })
            .collect();

        // Limit keeps the most recent weeks, order stays oldest first.
        if let Some(limit) = options.limit {
            let len = records.len();
            records.drain(..len.saturating_sub(limit));
        }

        HistoryOutput {
            success: true,
            records,
            total,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HistoryOutput, options: &HistoryOptions) -> String {
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
    fn format_human_readable(&self, output: &HistoryOutput) -> String {
        if output.records.is_empty() {
            return String::from("No weeks recorded yet. Complete one with 'almanack complete'.\n");
        }

        let mut text = format!(
            "Showing {} of {} completed {}:\n",
            output.records.len(),
            output.total,
            if output.total == 1 { "week" } else { "weeks" }
        );
        for record in &output.records {
            let marker = if record.perfect { " *" } else { "" };
            text.push_str(&format!(
                "  {:>3}. {}: {} to {}, {} {} logged, {} {}{}\n",
                record.index,
                record.virtue_name,
                util::format_long(record.start_date),
                util::format_long(record.end_date),
                record.observation_count,
                if record.observation_count == 1 {
                    "day"
                } else {
                    "days"
                },
                record.fault_count,
                if record.fault_count == 1 {
                    "fault"
                } else {
                    "faults"
                },
                marker
            ));
        }
        text.push_str("\n* perfect week\n");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;
    use chrono::{Duration, NaiveDate};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> HistoryCommand {
        let engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        HistoryCommand::new(engine)
    }

    fn practice_week(cmd: &mut HistoryCommand, virtue: &str, start: NaiveDate, faults: usize) {
        cmd.engine.start_new_week_on(start, virtue).unwrap();
        for i in 0..7 {
            cmd.engine
                .log_observation(start + Duration::days(i as i64), i < faults, None)
                .unwrap();
        }
        cmd.engine.complete_week().unwrap();
    }

    #[test]
    fn test_history_empty() {
        let cmd = setup();

        let output = cmd.run(&HistoryOptions::default());

        assert!(output.success);
        assert!(output.records.is_empty());
        assert_eq!(output.total, 0);
    }

    #[test]
    fn test_history_lists_weeks_oldest_first() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 1);
        practice_week(&mut cmd, "silence", day(2026, 1, 12), 0);

        let output = cmd.run(&HistoryOptions::default());

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.total, 2);
        assert_eq!(output.records[0].virtue_id, "temperance");
        assert_eq!(output.records[0].index, 1);
        assert_eq!(output.records[0].fault_count, 1);
        assert!(!output.records[0].perfect);
        assert_eq!(output.records[1].virtue_id, "silence");
        assert_eq!(output.records[1].index, 2);
        assert!(output.records[1].perfect);
    }

    #[test]
    fn test_history_virtue_filter() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 1);
        practice_week(&mut cmd, "silence", day(2026, 1, 12), 0);
        practice_week(&mut cmd, "temperance", day(2026, 1, 19), 2);

        let options = HistoryOptions {
            virtue: Some("temperance".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.total, 3);
        assert_eq!(output.records[0].index, 1);
        assert_eq!(output.records[1].index, 3);
    }

    #[test]
    fn test_history_unknown_virtue_is_empty_not_failure() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 0);

        let options = HistoryOptions {
            virtue: Some("no-such-virtue".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(output.success);
        assert!(output.records.is_empty());
        assert_eq!(output.total, 1);
    }

    #[test]
    fn test_history_limit_keeps_most_recent() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 0);
        practice_week(&mut cmd, "silence", day(2026, 1, 12), 1);
        practice_week(&mut cmd, "order", day(2026, 1, 19), 2);

        let options = HistoryOptions {
            limit: Some(2),
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].virtue_id, "silence");
        assert_eq!(output.records[1].virtue_id, "order");
        assert_eq!(output.records[1].index, 3);
    }

    #[test]
    fn test_format_output_human() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 0);

        let options = HistoryOptions::default();
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("Showing 1 of 1 completed week:"));
        assert!(formatted.contains("Temperance: January 5, 2026 to January 11, 2026"));
        assert!(formatted.contains("7 days logged, 0 faults *"));
        assert!(formatted.contains("* perfect week"));
    }

    #[test]
    fn test_format_output_human_empty() {
        let cmd = setup();

        let options = HistoryOptions::default();
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("No weeks recorded yet"));
    }

    #[test]
    fn test_format_output_json() {
        let mut cmd = setup();
        practice_week(&mut cmd, "temperance", day(2026, 1, 5), 1);

        let options = HistoryOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"virtue_id\": \"temperance\""));
        assert!(formatted.contains("\"total\": 1"));
    }

    #[test]
    fn test_format_output_quiet() {
        let cmd = setup();

        let options = HistoryOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }
}
