//! Reset command for almanack.
//!
//! Erases the entire practice snapshot. Requires `--force`; there is no
//! recovery once the blank snapshot is persisted.

use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::PracticeEngine;

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Confirm the erase.
    pub force: bool,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutput {
    /// Whether the reset happened.
    pub success: bool,
    /// Error message if the reset was refused or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResetOutput {
    fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// The reset command implementation.
pub struct ResetCommand {
    engine: PracticeEngine,
}

impl ResetCommand {
    /// Create a new reset command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the reset command.
    pub fn run(&mut self, options: &ResetOptions) -> ResetOutput {
        if !options.force {
            return ResetOutput::failure(
                "this erases all practice data; re-run with --force to confirm",
            );
        }

        self.engine.reset_data();
        if let Some(error) = drain_writes(&self.engine) {
            return ResetOutput::failure(error);
        }
        ResetOutput::success()
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            String::from("All practice data erased. The almanack is blank.\n")
        } else {
            format!(
                "Nothing erased: {}\n",
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

    fn setup_with_data() -> ResetCommand {
        let mut engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        engine.start_new_week_on(day(2026, 1, 5), "temperance").unwrap();
        engine.log_observation(day(2026, 1, 5), false, None).unwrap();
        ResetCommand::new(engine)
    }

    #[test]
    fn test_reset_requires_force() {
        let mut cmd = setup_with_data();

        let output = cmd.run(&ResetOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("--force"));
        assert!(cmd.engine.state().has_active_week());
    }

    #[test]
    fn test_reset_with_force_erases_everything() {
        let mut cmd = setup_with_data();

        let options = ResetOptions {
            force: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(output.success);
        let state = cmd.engine.state();
        assert!(!state.has_active_week());
        assert!(state.week_records.is_empty());
        assert_eq!(state.streak.current_streak, 0);
    }

    #[test]
    fn test_format_output_human() {
        let mut cmd = setup_with_data();

        let options = ResetOptions {
            force: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("All practice data erased"));
    }

    #[test]
    fn test_format_output_human_refused() {
        let mut cmd = setup_with_data();

        let options = ResetOptions::default();
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("Nothing erased"));
    }

    #[test]
    fn test_format_output_json() {
        let mut cmd = setup_with_data();

        let options = ResetOptions {
            force: true,
            json: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
    }

    #[test]
    fn test_format_output_quiet() {
        let mut cmd = setup_with_data();

        let options = ResetOptions {
            quiet: true,
            force: true,
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }
}
