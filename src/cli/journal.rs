//! Journal command for almanack.
//!
//! Free-form reflections alongside the practice record. Entries carry an
//! optional mood and tags; editing replaces content, mood, and tags
//! wholesale.

use serde::Serialize;

use crate::cli::drain_writes;
use crate::core::{JournalEntry, Mood, PracticeEngine};
use crate::util;

/// Options for the journal command.
#[derive(Debug, Clone, Default)]
pub struct JournalOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// What the journal command should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalAction {
    /// Write a new entry.
    Add {
        /// The reflection text.
        content: String,
        /// Optional mood.
        mood: Option<Mood>,
        /// Free-form tags.
        tags: Vec<String>,
    },
    /// List entries, newest first.
    List {
        /// Only show the most recent N entries.
        limit: Option<usize>,
    },
    /// Replace an entry's content, mood, and tags.
    Edit {
        /// The entry to edit.
        id: String,
        /// New reflection text.
        content: String,
        /// New mood.
        mood: Option<Mood>,
        /// New tags.
        tags: Vec<String>,
    },
    /// Delete an entry.
    Remove {
        /// The entry to delete.
        id: String,
    },
}

/// Output format for the journal command.
#[derive(Debug, Clone, Serialize)]
pub struct JournalOutput {
    /// Whether the action succeeded.
    pub success: bool,
    /// The entries affected or listed, newest first.
    pub entries: Vec<JournalEntry>,
    /// Error message if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JournalOutput {
    fn success(entries: Vec<JournalEntry>) -> Self {
        Self {
            success: true,
            entries,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            entries: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The journal command implementation.
pub struct JournalCommand {
    engine: PracticeEngine,
}

impl JournalCommand {
    /// Create a new journal command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the journal command.
    pub fn run(&mut self, action: &JournalAction, _options: &JournalOptions) -> JournalOutput {
        match action {
            JournalAction::Add {
                content,
                mood,
                tags,
            } => {
                let entry = self
                    .engine
                    .add_journal_entry(content.clone(), *mood, tags.clone())
                    .clone();
                if let Some(error) = drain_writes(&self.engine) {
                    return JournalOutput::failure(error);
                }
                JournalOutput::success(vec![entry])
            }
            JournalAction::List { limit } => {
                let entries = self.engine.journal_entries();
                let shown = limit.unwrap_or(entries.len()).min(entries.len());
                JournalOutput::success(entries[..shown].to_vec())
            }
            JournalAction::Edit {
                id,
                content,
                mood,
                tags,
            } => {
                if !self
                    .engine
                    .update_journal_entry(id, content.clone(), *mood, tags.clone())
                {
                    return JournalOutput::failure(format!("no journal entry with id '{}'", id));
                }
                if let Some(error) = drain_writes(&self.engine) {
                    return JournalOutput::failure(error);
                }
                let entry = self
                    .engine
                    .state()
                    .journal_entries
                    .iter()
                    .find(|e| e.id == *id)
                    .cloned();
                JournalOutput::success(entry.into_iter().collect())
            }
            JournalAction::Remove { id } => {
                if !self.engine.remove_journal_entry(id) {
                    return JournalOutput::failure(format!("no journal entry with id '{}'", id));
                }
                if let Some(error) = drain_writes(&self.engine) {
                    return JournalOutput::failure(error);
                }
                JournalOutput::success(Vec::new())
            }
        }
    }

    /// Format output based on options.
    pub fn format_output(
        &self,
        output: &JournalOutput,
        action: &JournalAction,
        options: &JournalOptions,
    ) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, action)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &JournalOutput, action: &JournalAction) -> String {
        if !output.success {
            return format!(
                "Journal unchanged: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match action {
            JournalAction::Add { .. } => {
                let id = output.entries.first().map(|e| e.id.as_str()).unwrap_or("");
                format!("Journal entry recorded: {}\n", id)
            }
            JournalAction::List { .. } => self.format_entries(&output.entries),
            JournalAction::Edit { id, .. } => format!("Journal entry {} updated.\n", id),
            JournalAction::Remove { id } => format!("Journal entry {} removed.\n", id),
        }
    }

    fn format_entries(&self, entries: &[JournalEntry]) -> String {
        if entries.is_empty() {
            return String::from(
                "The journal is empty. Write with 'almanack journal add \"...\"'.\n",
            );
        }

        let mut text = String::new();
        for entry in entries {
            text.push_str(&format!(
                "{} ({})",
                util::format_long(entry.created_at.date_naive()),
                entry.id
            ));
            if let Some(mood) = entry.mood {
                text.push_str(&format!(" [{}]", mood));
            }
            text.push('\n');
            text.push_str(&format!("  {}\n", entry.content));
            if !entry.tags.is_empty() {
                text.push_str(&format!("  tags: {}\n", entry.tags.join(", ")));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStateStore;

    fn setup() -> JournalCommand {
        let engine = PracticeEngine::load_or_default(MemoryStateStore::new()).unwrap();
        JournalCommand::new(engine)
    }

    fn add(cmd: &mut JournalCommand, content: &str) -> String {
        let action = JournalAction::Add {
            content: content.to_string(),
            mood: None,
            tags: Vec::new(),
        };
        let output = cmd.run(&action, &JournalOptions::default());
        output.entries[0].id.clone()
    }

    #[test]
    fn test_add_entry() {
        let mut cmd = setup();

        let action = JournalAction::Add {
            content: "A quiet morning.".to_string(),
            mood: Some(Mood::Peaceful),
            tags: vec!["morning".to_string()],
        };
        let output = cmd.run(&action, &JournalOptions::default());

        assert!(output.success);
        assert_eq!(output.entries.len(), 1);
        assert!(output.entries[0].id.starts_with("journal-"));
        assert_eq!(output.entries[0].mood, Some(Mood::Peaceful));
        assert_eq!(cmd.engine.state().journal_entries.len(), 1);
    }

    #[test]
    fn test_list_newest_first() {
        let mut cmd = setup();
        let first = add(&mut cmd, "first");
        let second = add(&mut cmd, "second");

        let output = cmd.run(&JournalAction::List { limit: None }, &JournalOptions::default());

        assert_eq!(output.entries.len(), 2);
        assert_eq!(output.entries[0].id, second);
        assert_eq!(output.entries[1].id, first);
    }

    #[test]
    fn test_list_limit() {
        let mut cmd = setup();
        add(&mut cmd, "first");
        add(&mut cmd, "second");
        let third = add(&mut cmd, "third");

        let output = cmd.run(
            &JournalAction::List { limit: Some(1) },
            &JournalOptions::default(),
        );

        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].id, third);
    }

    #[test]
    fn test_edit_replaces_content_mood_tags() {
        let mut cmd = setup();
        let id = add(&mut cmd, "draft");

        let action = JournalAction::Edit {
            id: id.clone(),
            content: "revised".to_string(),
            mood: Some(Mood::Grateful),
            tags: vec!["rewrite".to_string()],
        };
        let output = cmd.run(&action, &JournalOptions::default());

        assert!(output.success);
        assert_eq!(output.entries[0].content, "revised");
        assert_eq!(output.entries[0].mood, Some(Mood::Grateful));
        assert_eq!(output.entries[0].tags, vec!["rewrite".to_string()]);
    }

    #[test]
    fn test_edit_unknown_id_fails() {
        let mut cmd = setup();

        let action = JournalAction::Edit {
            id: "journal-nope".to_string(),
            content: "revised".to_string(),
            mood: None,
            tags: Vec::new(),
        };
        let output = cmd.run(&action, &JournalOptions::default());

        assert!(!output.success);
        assert!(output
            .error
            .unwrap()
            .contains("no journal entry with id 'journal-nope'"));
    }

    #[test]
    fn test_remove_entry() {
        let mut cmd = setup();
        let id = add(&mut cmd, "temporary");

        let output = cmd.run(
            &JournalAction::Remove { id: id.clone() },
            &JournalOptions::default(),
        );

        assert!(output.success);
        assert!(cmd.engine.state().journal_entries.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_fails() {
        let mut cmd = setup();

        let output = cmd.run(
            &JournalAction::Remove {
                id: "journal-nope".to_string(),
            },
            &JournalOptions::default(),
        );

        assert!(!output.success);
    }

    #[test]
    fn test_format_output_human_list() {
        let mut cmd = setup();
        let action = JournalAction::Add {
            content: "A quiet morning.".to_string(),
            mood: Some(Mood::Reflective),
            tags: vec!["morning".to_string(), "walk".to_string()],
        };
        cmd.run(&action, &JournalOptions::default());

        let list = JournalAction::List { limit: None };
        let options = JournalOptions::default();
        let output = cmd.run(&list, &options);

        let formatted = cmd.format_output(&output, &list, &options);
        assert!(formatted.contains("[reflective]"));
        assert!(formatted.contains("A quiet morning."));
        assert!(formatted.contains("tags: morning, walk"));
    }

    #[test]
    fn test_format_output_human_empty_list() {
        let mut cmd = setup();

        let list = JournalAction::List { limit: None };
        let options = JournalOptions::default();
        let output = cmd.run(&list, &options);

        let formatted = cmd.format_output(&output, &list, &options);
        assert!(formatted.contains("The journal is empty"));
    }

    #[test]
    fn test_format_output_json() {
        let mut cmd = setup();
        add(&mut cmd, "serialize me");

        let list = JournalAction::List { limit: None };
        let options = JournalOptions {
            json: true,
            ..Default::default()
        };
        let output = cmd.run(&list, &options);

        let formatted = cmd.format_output(&output, &list, &options);
        assert!(formatted.contains("\"content\": \"serialize me\""));
    }

    #[test]
    fn test_format_output_quiet() {
        let mut cmd = setup();

        let list = JournalAction::List { limit: None };
        let options = JournalOptions {
            quiet: true,
            ..Default::default()
        };
        let output = cmd.run(&list, &options);

        assert!(cmd.format_output(&output, &list, &options).is_empty());
    }
}
