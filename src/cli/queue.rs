//! Queue command for almanack.
//!
//! Manages the FIFO plan of future virtues: show, add, remove, and
//! wholesale reorder. The engine trusts reorder input, so the reorder
//! action verifies the new order is a permutation before applying it.

use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::PracticeEngine;

/// Options for the queue command.
#[derive(Debug, Clone, Default)]
pub struct QueueOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// What the queue command should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueAction {
    /// Print the queue.
    Show,
    /// Append a virtue.
    Add { virtue_id: String },
    /// Remove a virtue.
    Remove { virtue_id: String },
    /// Replace the order with the given permutation.
    Reorder { virtue_ids: Vec<String> },
}

/// One queued virtue.
#[derive(Debug, Clone, Serialize)]
pub struct QueueItem {
    /// The virtue id.
    pub virtue_id: String,
    /// Its display name.
    pub name: String,
}

/// Output format for the queue command.
#[derive(Debug, Clone, Serialize)]
pub struct QueueOutput {
    /// Whether the action succeeded.
    pub success: bool,
    /// The queue after the action, front first.
    pub queue: Vec<QueueItem>,
    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueueOutput {
    /// Create a successful output.
    pub fn success(queue: Vec<QueueItem>) -> Self {
        Self {
            success: true,
            queue,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            queue: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The queue command implementation.
pub struct QueueCommand {
    engine: PracticeEngine,
}

impl QueueCommand {
    /// Create a new queue command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the queue command.
    pub fn run(&mut self, action: &QueueAction, _options: &QueueOptions) -> QueueOutput {
        match action {
            QueueAction::Show => {}
            QueueAction::Add { virtue_id } => {
                if let Err(e) = self.engine.add_to_queue(virtue_id) {
                    return QueueOutput::failure(e.to_string());
                }
            }
            QueueAction::Remove { virtue_id } => {
                if !self.engine.state().virtue_queue.iter().any(|q| q == virtue_id) {
                    return QueueOutput::failure(format!("'{}' is not in the queue", virtue_id));
                }
                self.engine.remove_from_queue(virtue_id);
            }
            QueueAction::Reorder { virtue_ids } => {
                let mut current = self.engine.state().virtue_queue.clone();
                let mut proposed = virtue_ids.clone();
                current.sort();
                proposed.sort();
                if current != proposed {
                    return QueueOutput::failure(
                        "reorder must name exactly the queued virtues, once each",
                    );
                }
                self.engine.reorder_queue(virtue_ids.clone());
            }
        }

        if *action != QueueAction::Show {
            if let Some(err) = drain_writes(&self.engine) {
                return QueueOutput::failure(err);
            }
        }

        QueueOutput::success(self.items())
    }

    fn items(&self) -> Vec<QueueItem> {
        let state = self.engine.state();
        state
            .virtue_queue
            .iter()
            .map(|id| QueueItem {
                virtue_id: id.clone(),
                name: state.virtue_name(id).unwrap_or_else(|| id.clone()),
            })
            .collect()
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &QueueOutput, options: &QueueOptions) -> String {
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
    fn format_human_readable(&self, output: &QueueOutput) -> String {
        if !output.success {
            return format!(
                "Queue unchanged: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.queue.is_empty() {
            return "The queue is empty.\n".to_string();
        }

        let mut text = String::from("Virtue queue:\n");
        for (index, item) in output.queue.iter().enumerate() {
            text.push_str(&format!("  {}. {}\n", index + 1, item.name));
        }
        text.push_str(&format!("Next up: {}.\n", output.queue[0].name));
        text
    }
}
