//! Begin command for almanack.
//!
//! Starts a practice week. With no virtue named, the head of the queue
//! is used and consumed on success.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog;
use crate::cli::drain_writes;
use crate::core::{CycleProgress, PracticeEngine};

/// Options for the begin command.
#[derive(Debug, Clone, Default)]
pub struct BeginOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the begin command.
#[derive(Debug, Clone, Serialize)]
pub struct BeginOutput {
    /// Whether the week was started.
    pub success: bool,
    /// The virtue now under practice.
    pub virtue_id: String,
    /// Its display name.
    pub virtue_name: String,
    /// Its one-line precept.
    pub description: String,
    /// First day of the week.
    pub start_date: Option<NaiveDate>,
    /// Position in the 13-week cycle.
    pub cycle: Option<CycleProgress>,
    /// Whether the virtue came off the queue.
    pub from_queue: bool,
    /// Error message if the week could not start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BeginOutput {
    /// Create a successful output.
    pub fn success(
        virtue_id: impl Into<String>,
        virtue_name: impl Into<String>,
        description: impl Into<String>,
        start_date: Option<NaiveDate>,
        cycle: CycleProgress,
        from_queue: bool,
    ) -> Self {
        Self {
            success: true,
            virtue_id: virtue_id.into(),
            virtue_name: virtue_name.into(),
            description: description.into(),
            start_date,
            cycle: Some(cycle),
            from_queue,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            virtue_id: String::new(),
            virtue_name: String::new(),
            description: String::new(),
            start_date: None,
            cycle: None,
            from_queue: false,
            error: Some(error.into()),
        }
    }
}

/// The begin command implementation.
pub struct BeginCommand {
    engine: PracticeEngine,
}

impl BeginCommand {
    /// Create a new begin command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the begin command.
    pub fn run(&mut self, virtue_id: Option<&str>, _options: &BeginOptions) -> BeginOutput {
        // Peek rather than pop: a failed start must leave the queue whole.
        let (id, from_queue) = match virtue_id {
            Some(id) => (id.to_string(), false),
            None => match self.engine.next_queued_virtue() {
                Some(id) => (id.to_string(), true),
                None => {
                    return BeginOutput::failure(
                        "no virtue named and the queue is empty; list choices with 'almanack virtues'",
                    )
                }
            },
        };

        if let Err(e) = self.engine.start_new_week(&id) {
            return BeginOutput::failure(e.to_string());
        }
        if from_queue {
            self.engine.remove_from_queue(&id);
        }

        if let Some(err) = drain_writes(&self.engine) {
            return BeginOutput::failure(err);
        }

        let (name, description) = self.virtue_display(&id);
        let cycle = self.engine.cycle_progress();
        BeginOutput::success(
            id,
            name,
            description,
            self.engine.state().current_week_start,
            cycle,
            from_queue,
        )
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &BeginOutput, options: &BeginOptions) -> String {
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
    fn format_human_readable(&self, output: &BeginOutput) -> String {
        if !output.success {
            return format!(
                "Could not start the week: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut text = format!(
            "Now practicing {}: \"{}\"\n",
            output.virtue_name, output.description
        );
        if let Some(cycle) = &output.cycle {
            text.push_str(&format!("Week {} of {}", cycle.current, cycle.total));
            if cycle.cycle_number > 1 {
                text.push_str(&format!(" (cycle {})", cycle.cycle_number));
            }
            text.push_str(".\n");
        }
        if output.from_queue {
            text.push_str("Taken from the queue.\n");
        }
        text.push_str("Record each evening with 'almanack log fault' or 'almanack log clean'.\n");
        text
    }

    fn virtue_display(&self, id: &str) -> (String, String) {
        if let Some(virtue) = catalog::virtue_by_id(id) {
            return (virtue.name.to_string(), virtue.description.to_string());
        }
        match self.engine.state().custom_virtue(id) {
            Some(custom) => (custom.name.clone(), custom.description.clone()),
            None => (id.to_string(), String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;

    fn setup() -> BeginCommand {
        let engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        BeginCommand::new(engine)
    }

    #[test]
    fn test_begin_named_virtue() {
        let mut cmd = setup();
        let options = BeginOptions::default();

        let output = cmd.run(Some("temperance"), &options);

        assert!(output.success);
        assert_eq!(output.virtue_id, "temperance");
        assert_eq!(output.virtue_name, "Temperance");
        assert!(output.start_date.is_some());
        assert!(!output.from_queue);
        assert_eq!(output.cycle.unwrap().current, 1);
    }

    #[test]
    fn test_begin_consumes_queue_head() {
        let mut cmd = setup();
        cmd.engine.add_to_queue("silence").unwrap();
        cmd.engine.add_to_queue("order").unwrap();

        let output = cmd.run(None, &BeginOptions::default());

        assert!(output.success);
        assert_eq!(output.virtue_id, "silence");
        assert!(output.from_queue);
        assert_eq!(cmd.engine.state().virtue_queue, vec!["order".to_string()]);
    }

    #[test]
    fn test_begin_without_virtue_or_queue_fails() {
        let mut cmd = setup();

        let output = cmd.run(None, &BeginOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("queue is empty"));
    }

    #[test]
    fn test_begin_over_active_week_fails_and_keeps_queue() {
        let mut cmd = setup();
        cmd.engine.start_new_week("temperance").unwrap();
        cmd.engine.add_to_queue("silence").unwrap();

        let output = cmd.run(None, &BeginOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("already active"));
        assert_eq!(cmd.engine.state().virtue_queue, vec!["silence".to_string()]);
    }

    #[test]
    fn test_begin_unknown_virtue_fails() {
        let mut cmd = setup();

        let output = cmd.run(Some("patience"), &BeginOptions::default());

        assert!(!output.success);
        assert!(output.error.unwrap().contains("unknown virtue"));
    }

    #[test]
    fn test_begin_custom_virtue_uses_its_name() {
        let mut cmd = setup();
        let id = cmd
            .engine
            .add_custom_virtue("Punctuality", "Arrive when you said you would.", "")
            .id
            .clone();

        let output = cmd.run(Some(&id), &BeginOptions::default());

        assert!(output.success);
        assert_eq!(output.virtue_name, "Punctuality");
    }

    #[test]
    fn test_format_output_human() {
        let mut cmd = setup();
        let options = BeginOptions::default();
        let output = cmd.run(Some("temperance"), &options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("Now practicing Temperance"));
        assert!(formatted.contains("Week 1 of 13"));
    }

    #[test]
    fn test_format_output_json() {
        let mut cmd = setup();
        let options = BeginOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(Some("temperance"), &options);

        let formatted = cmd.format_output(&output, &options);
        assert!(formatted.contains("\"success\": true"));
        assert!(formatted.contains("\"virtue_id\": \"temperance\""));
    }

    #[test]
    fn test_format_output_quiet() {
        let mut cmd = setup();
        let options = BeginOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(Some("temperance"), &options);

        assert!(cmd.format_output(&output, &options).is_empty());
    }
}
