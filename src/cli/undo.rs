//! Undo command for almanack.
//!
//! Reverts the most recent observation within its five-second grace
//! window, restoring the ledger and streak counters to their pre-log
//! values.

use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::PracticeEngine;

/// Options for the undo command.
#[derive(Debug, Clone, Default)]
pub struct UndoOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the undo command.
#[derive(Debug, Clone, Serialize)]
pub struct UndoOutput {
    /// Whether an observation was undone.
    pub success: bool,
    /// Streak length after the undo.
    pub current_streak: u32,
    /// Error message if nothing was undone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UndoOutput {
    /// Create a successful output.
    pub fn success(current_streak: u32) -> Self {
        Self {
            success: true,
            current_streak,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            current_streak: 0,
            error: Some(error.into()),
        }
    }
}

/// The undo command implementation.
pub struct UndoCommand {
    engine: PracticeEngine,
}

impl UndoCommand {
    /// Create a new undo command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the undo command.
    pub fn run(&mut self, _options: &UndoOptions) -> UndoOutput {
        if !self.engine.undo_last_observation() {
            return UndoOutput::failure(
                "nothing to undo; the 5-second window may have passed",
            );
        }

        if let Some(err) = drain_writes(&self.engine) {
            return UndoOutput::failure(err);
        }

        UndoOutput::success(self.engine.streak().current_streak)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &UndoOutput, options: &UndoOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!(
                "Observation undone. Current streak: {} {}.\n",
                output.current_streak,
                if output.current_streak == 1 {
                    "day"
                } else {
                    "days"
                }
            )
        } else {
            format!(
                "Nothing undone: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> UndoCommand {
        let mut engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        engine.start_new_week("temperance").unwrap();
        UndoCommand::new(engine)
    }

    #[test]
    fn test_undo_fresh_log() {
        let mut cmd = setup();
        cmd.engine
            .log_observation(day(2026, 1, 5), true, None)
            .unwrap();

        let output = cmd.run(&UndoOptions::default());

        assert!(output.success);
        assert_eq!(output.current_streak, 0);
        assert!(cmd.engine.current_week_observations().is_empty());
    }

    #[test]
    fn test_undo_with_nothing_logged_fails() {
        let mut cmd = setup();

        let output = cmd.run(&UndoOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("nothing to undo"));
    }

    #[test]
    fn test_undo_is_single_level() {
        let mut cmd = setup();
        cmd.engine
            .log_observation(day(2026, 1, 5), true, None)
            .unwrap();

        assert!(cmd.run(&UndoOptions::default()).success);
        assert!(!cmd.run(&UndoOptions::default()).success);
    }

    #[test]
    fn test_format_output_human() {
        let mut cmd = setup();
        cmd.engine
            .log_observation(day(2026, 1, 5), false, None)
            .unwrap();

        let options = UndoOptions::default();
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("Observation undone."));
    }

    #[test]
    fn test_format_output_json_failure() {
        let mut cmd = setup();
        let options = UndoOptions {
            json: true,
            ..Default::default()
        };

        let output = cmd.run(&options);
        let formatted = cmd.format_output(&output, &options);

        assert!(formatted.contains("\"success\": false"));
        assert!(formatted.contains("nothing to undo"));
    }
}
