//! Export command for almanack.
//!
//! Renders the full practice record as a plain-text document and writes
//! it to a file, or to stdout with `--stdout`.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::PracticeEngine;
use crate::export;
use crate::util;

/// Options for the export command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Where to write the document. Defaults to a dated file name in the
    /// current directory.
    pub output: Option<PathBuf>,
    /// Print the document instead of writing a file.
    pub stdout: bool,
}

/// Output format for the export command.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    /// Whether the export succeeded.
    pub success: bool,
    /// Path the document was written to, absent with `--stdout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Size of the rendered document.
    pub bytes: usize,
    /// The document itself, only with `--stdout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Error message if the export failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            path: None,
            bytes: 0,
            document: None,
            error: Some(error.into()),
        }
    }
}

/// The export command implementation.
pub struct ExportCommand {
    engine: PracticeEngine,
}

impl ExportCommand {
    /// Create a new export command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the export command.
    pub fn run(&self, options: &ExportOptions) -> ExportOutput {
        let today = util::today();
        let document = export::character_record(self.engine.state(), today);
        let bytes = document.len();

        if options.stdout {
            return ExportOutput {
                success: true,
                path: None,
                bytes,
                document: Some(document),
                error: None,
            };
        }

        let path = options
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(export::default_filename(today)));
        if let Err(e) = std::fs::write(&path, &document) {
            return ExportOutput::failure(format!("could not write {}: {}", path.display(), e));
        }

        ExportOutput {
            success: true,
            path: Some(path.display().to_string()),
            bytes,
            document: None,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ExportOutput, options: &ExportOptions) -> String {
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
    fn format_human_readable(&self, output: &ExportOutput) -> String {
        if !output.success {
            return format!(
                "Export failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match (&output.document, &output.path) {
            (Some(document), _) => document.clone(),
            (None, Some(path)) => {
                format!("Character record written to {} ({} bytes).\n", path, output.bytes)
            }
            (None, None) => String::new(),
        }
    }
}
