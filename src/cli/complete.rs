//! Complete command for almanack.
//!
//! Closes the active week into a frozen record and reports the
//! milestones it earned. Can immediately begin the same virtue again
//! (`--repeat`) or the next queued one (`--next`).

use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::{PracticeEngine, WeekRecord};
use crate::milestones::{self, Milestone};
use crate::util;

/// Options for the complete command.
#[derive(Debug, Clone, Default)]
pub struct CompleteOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Start the same virtue again after completing.
    pub repeat: bool,
    /// Start the next queued virtue after completing.
    pub next: bool,
}

/// The frozen week as reported by complete.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedWeekSummary {
    /// The virtue that was practiced.
    pub virtue_id: String,
    /// Its display name.
    pub virtue_name: String,
    /// First day of the week.
    pub start_date: NaiveDate,
    /// Last day of the week.
    pub end_date: NaiveDate,
    /// Days logged.
    pub observation_count: usize,
    /// Fault days.
    pub fault_count: usize,
    /// All seven days logged, none faulted.
    pub perfect: bool,
}

/// Output format for the complete command.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteOutput {
    /// Whether the week was completed.
    pub success: bool,
    /// The frozen record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<CompletedWeekSummary>,
    /// Milestones earned by this completion.
    pub milestones: Vec<Milestone>,
    /// Virtue id begun right after, with `--repeat` or `--next`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_virtue: Option<String>,
    /// Error message if the week could not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompleteOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            week: None,
            milestones: Vec::new(),
            next_virtue: None,
            error: Some(error.into()),
        }
    }
}

/// The complete command implementation.
pub struct CompleteCommand {
    engine: PracticeEngine,
}

impl CompleteCommand {
    /// Create a new complete command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the complete command.
    pub fn run(&mut self, options: &CompleteOptions) -> CompleteOutput {
        if options.repeat && options.next {
            return CompleteOutput::failure("pass at most one of --repeat and --next");
        }

        let record = match self.engine.complete_week() {
            Ok(record) => record,
            Err(e) => return CompleteOutput::failure(e.to_string()),
        };

        let milestones = milestones::for_completed_week(
            &record,
            self.engine.streak(),
            self.engine.state().week_records.len(),
        );

        let next_virtue = if options.repeat {
            Some(record.virtue_id.clone())
        } else if options.next {
            self.engine.next_queued_virtue().map(str::to_string)
        } else {
            None
        };
        if let Some(id) = &next_virtue {
            if let Err(e) = self.engine.start_new_week(id) {
                return CompleteOutput {
                    success: false,
                    week: Some(self.summarize(&record)),
                    milestones,
                    next_virtue: None,
                    error: Some(format!(
                        "week completed, but the next could not start: {}",
                        e
                    )),
                };
            }
            if options.next {
                self.engine.remove_from_queue(id);
            }
        }

        if let Some(err) = drain_writes(&self.engine) {
            return CompleteOutput::failure(err);
        }

        CompleteOutput {
            success: true,
            week: Some(self.summarize(&record)),
            milestones,
            next_virtue,
            error: None,
        }
    }

    fn summarize(&self, record: &WeekRecord) -> CompletedWeekSummary {
        CompletedWeekSummary {
            virtue_id: record.virtue_id.clone(),
            virtue_name: self
                .engine
                .state()
                .virtue_name(&record.virtue_id)
                .unwrap_or_else(|| record.virtue_id.clone()),
            start_date: record.start_date,
            end_date: record.end_date,
            observation_count: record.observation_count(),
            fault_count: record.fault_count(),
            perfect: record.is_perfect(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CompleteOutput, options: &CompleteOptions) -> String {
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
    fn format_human_readable(&self, output: &CompleteOutput) -> String {
        let mut text = String::new();

        match &output.week {
            Some(week) => {
                text.push_str(&format!(
                    "Completed {}: {} — {}.\n",
                    week.virtue_name,
                    util::format_long(week.start_date),
                    util::format_long(week.end_date)
                ));
                text.push_str(&format!(
                    "Observed {} {}, {} {}.\n",
                    week.observation_count,
                    if week.observation_count == 1 {
                        "day"
                    } else {
                        "days"
                    },
                    week.fault_count,
                    if week.fault_count == 1 {
                        "fault"
                    } else {
                        "faults"
                    }
                ));
            }
            None => {
                return format!(
                    "Could not complete the week: {}\n",
                    output.error.as_deref().unwrap_or("unknown error")
                )
            }
        }

        for milestone in &output.milestones {
            text.push_str(&format!("{}!\n", milestone));
        }

        if let Some(error) = &output.error {
            text.push_str(&format!("{}\n", error));
        } else if let Some(id) = &output.next_virtue {
            let name = self
                .engine
                .state()
                .virtue_name(id)
                .unwrap_or_else(|| id.clone());
            text.push_str(&format!("Now practicing {}.\n", name));
        }

        text
    }
}
