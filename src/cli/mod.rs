//! CLI commands for almanack.
//!
//! One module per subcommand, all following the same shape: an `Options`
//! struct carrying output flags, a serializable `Output` with
//! `success()`/`failure()` constructors, and a `Command` that owns the
//! engine, `run()`s, and `format_output()`s for quiet/JSON/human modes.

// Practice commands
pub mod begin;
pub mod complete;
pub mod log;
pub mod status;
pub mod undo;

// Planning commands
pub mod queue;
pub mod virtues;

// Record commands
pub mod export_cmd;
pub mod history;
pub mod journal;
pub mod stats;

// Maintenance commands
pub mod reset;

pub use begin::BeginCommand;
pub use complete::CompleteCommand;
pub use export_cmd::ExportCommand;
pub use history::HistoryCommand;
pub use journal::JournalCommand;
pub use log::LogCommand;
pub use queue::QueueCommand;
pub use reset::ResetCommand;
pub use stats::StatsCommand;
pub use status::StatusCommand;
pub use undo::UndoCommand;
pub use virtues::VirtuesCommand;

use std::time::Duration;

use crate::core::PracticeEngine;

/// How long a mutating command waits for queued writes to land.
pub(crate) const SAVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Drain queued snapshot writes, reporting any persistence problem.
pub(crate) fn drain_writes(engine: &PracticeEngine) -> Option<String> {
    if !engine.flush(SAVE_TIMEOUT) {
        return Some("timed out waiting for practice data to save".to_string());
    }
    engine
        .last_save_error()
        .map(|e| format!("could not save practice data: {}", e))
}
