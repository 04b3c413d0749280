//! Almanack - Franklin-method character practice in the terminal.
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use almanack::config::{almanack_home, Config};
use almanack::core::{Mood, PracticeEngine};
use almanack::error::exit_codes;
use almanack::storage::FileStateStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Almanack - Franklin-method character practice in the terminal
#[derive(Parser)]
#[command(name = "almanack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Begin a practice week on a virtue
    Begin {
        /// Virtue id to practice; defaults to the head of the queue
        virtue: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Record a daily observation, fault or clean
    Log {
        /// How the day went
        #[arg(value_enum)]
        verdict: Verdict,
        /// Short note on what happened
        #[arg(long, short)]
        note: Option<String>,
        /// Day to record, YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Take back the last observation within the undo window
    Undo {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the active week, streaks, and cycle position
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Close the active week and file its record
    Complete {
        /// Start another week on the same virtue
        #[arg(long, conflicts_with = "next")]
        repeat: bool,
        /// Start the next queued virtue
        #[arg(long)]
        next: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Manage the queue of virtues to practice next
    Queue {
        /// Action to perform; defaults to showing the queue
        #[command(subcommand)]
        action: Option<QueueCliAction>,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Show practice statistics
    Stats {
        /// Show the per-virtue breakdown and trend
        #[arg(long, short)]
        detailed: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List completed weeks
    History {
        /// Only weeks practicing this virtue id
        #[arg(long)]
        virtue: Option<String>,
        /// Only the most recent N weeks
        #[arg(long, short)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List, inspect, add, or remove virtues
    Virtues {
        /// Action to perform; defaults to listing every virtue
        #[command(subcommand)]
        action: Option<VirtuesCliAction>,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Keep a journal alongside the practice
    Journal {
        /// Action to perform
        #[command(subcommand)]
        action: JournalCliAction,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Write the practice record as a plain-text document
    Export {
        /// Where to write the document; defaults to a dated file name
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Print the document instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Erase all practice data
    Reset {
        /// Confirm the erase
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Verdict {
    /// The day had a fault
    Fault,
    /// The day was clean
    Clean,
}

#[derive(Clone, Copy, ValueEnum)]
enum MoodArg {
    Reflective,
    Grateful,
    Challenged,
    Inspired,
    Peaceful,
}

impl From<MoodArg> for Mood {
    fn from(mood: MoodArg) -> Self {
        match mood {
            MoodArg::Reflective => Mood::Reflective,
            MoodArg::Grateful => Mood::Grateful,
            MoodArg::Challenged => Mood::Challenged,
            MoodArg::Inspired => Mood::Inspired,
            MoodArg::Peaceful => Mood::Peaceful,
        }
    }
}

#[derive(Subcommand)]
enum QueueCliAction {
    /// Show the queue
    Show,
    /// Append a virtue to the queue
    Add {
        /// Virtue id
        virtue: String,
    },
    /// Remove a virtue from the queue
    Remove {
        /// Virtue id
        virtue: String,
    },
    /// Reorder the queue; name every queued virtue once
    Reorder {
        /// Virtue ids in the new order
        #[arg(required = true)]
        virtues: Vec<String>,
    },
}

#[derive(Subcommand)]
enum VirtuesCliAction {
    /// List every virtue
    List,
    /// Show one virtue in full
    Show {
        /// Virtue id
        virtue: String,
    },
    /// Add a custom virtue (requires Almanack Pro)
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// The precept, one sentence
        #[arg(long)]
        description: String,
        /// Longer background text
        #[arg(long)]
        context: Option<String>,
    },
    /// Remove a custom virtue
    Remove {
        /// Virtue id
        virtue: String,
    },
}

#[derive(Subcommand)]
enum JournalCliAction {
    /// Write a new entry
    Add {
        /// The reflection text
        content: String,
        /// Mood to attach
        #[arg(long, value_enum)]
        mood: Option<MoodArg>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List entries, newest first
    List {
        /// Only the most recent N entries
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Replace an entry's content, mood, and tags
    Edit {
        /// Entry id
        id: String,
        /// New reflection text
        #[arg(long)]
        content: String,
        /// New mood
        #[arg(long, value_enum)]
        mood: Option<MoodArg>,
        /// New comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Delete an entry
    Remove {
        /// Entry id
        id: String,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("almanack error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.almanack/crash.log and exits with the crash code.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        // Log to stderr
        eprintln!("almanack panic: {}", info);

        // Try to log to crash file
        if let Some(home) = almanack_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Begin {
            virtue,
            json,
            quiet,
        } => run_begin(virtue, json, quiet),
        Commands::Log {
            verdict,
            note,
            date,
            json,
            quiet,
        } => run_log(verdict, note, date, json, quiet),
        Commands::Undo { json, quiet } => run_undo(json, quiet),
        Commands::Status { json, quiet } => run_status(json, quiet),
        Commands::Complete {
            repeat,
            next,
            json,
            quiet,
        } => run_complete(repeat, next, json, quiet),
        Commands::Queue {
            action,
            json,
            quiet,
        } => run_queue(action, json, quiet),
        Commands::Stats {
            detailed,
            json,
            quiet,
        } => run_stats(detailed, json, quiet),
        Commands::History {
            virtue,
            limit,
            json,
            quiet,
        } => run_history(virtue, limit, json, quiet),
        Commands::Virtues {
            action,
            json,
            quiet,
        } => run_virtues(action, json, quiet),
        Commands::Journal {
            action,
            json,
            quiet,
        } => run_journal(action, json, quiet),
        Commands::Export {
            output,
            stdout,
            json,
            quiet,
        } => run_export(output, stdout, json, quiet),
        Commands::Reset { force, json, quiet } => run_reset(force, json, quiet),
    }
}

/// Load the practice engine over the default file store.
fn load_engine() -> Result<PracticeEngine, Box<dyn std::error::Error>> {
    let store = FileStateStore::new()?;
    Ok(PracticeEngine::load_or_default(store)?)
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn run_begin(
    virtue: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::begin::{BeginCommand, BeginOptions};

    let mut cmd = BeginCommand::new(load_engine()?);
    let options = BeginOptions { json, quiet };

    let output = cmd.run(virtue.as_deref(), &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_log(
    verdict: Verdict,
    note: Option<String>,
    date: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::log::{LogCommand, LogOptions};
    use almanack::util;

    let date = date.map(|d| util::parse_day(&d)).transpose()?;
    let has_fault = matches!(verdict, Verdict::Fault);

    let mut cmd = LogCommand::new(load_engine()?);
    let options = LogOptions { json, quiet };

    let output = cmd.run(date, has_fault, note, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_undo(json: bool, quiet: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::undo::{UndoCommand, UndoOptions};

    let mut cmd = UndoCommand::new(load_engine()?);
    let options = UndoOptions { json, quiet };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_status(json: bool, quiet: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::status::{StatusCommand, StatusOptions};

    let cmd = StatusCommand::new(load_engine()?);
    let options = StatusOptions { json, quiet };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_complete(
    repeat: bool,
    next: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::complete::{CompleteCommand, CompleteOptions};

    let mut cmd = CompleteCommand::new(load_engine()?);
    let options = CompleteOptions {
        json,
        quiet,
        repeat,
        next,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_queue(
    action: Option<QueueCliAction>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::queue::{QueueAction, QueueCommand, QueueOptions};

    let action = match action.unwrap_or(QueueCliAction::Show) {
        QueueCliAction::Show => QueueAction::Show,
        QueueCliAction::Add { virtue } => QueueAction::Add { virtue_id: virtue },
        QueueCliAction::Remove { virtue } => QueueAction::Remove { virtue_id: virtue },
        QueueCliAction::Reorder { virtues } => QueueAction::Reorder {
            virtue_ids: virtues,
        },
    };

    let mut cmd = QueueCommand::new(load_engine()?);
    let options = QueueOptions { json, quiet };

    let output = cmd.run(&action, &options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_stats(
    detailed: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::stats::{StatsCommand, StatsOptions};

    let cmd = StatsCommand::new(load_engine()?);
    let options = StatsOptions {
        json,
        quiet,
        detailed,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_history(
    virtue: Option<String>,
    limit: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::history::{HistoryCommand, HistoryOptions};

    let cmd = HistoryCommand::new(load_engine()?);
    let options = HistoryOptions {
        json,
        quiet,
        virtue,
        limit,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_virtues(
    action: Option<VirtuesCliAction>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::virtues::{VirtuesAction, VirtuesCommand, VirtuesOptions};

    let action = match action.unwrap_or(VirtuesCliAction::List) {
        VirtuesCliAction::List => VirtuesAction::List,
        VirtuesCliAction::Show { virtue } => VirtuesAction::Show { virtue_id: virtue },
        VirtuesCliAction::Add {
            name,
            description,
            context,
        } => VirtuesAction::Add {
            name,
            description,
            context,
        },
        VirtuesCliAction::Remove { virtue } => VirtuesAction::Remove { virtue_id: virtue },
    };

    let config = Config::load();
    let mut cmd = VirtuesCommand::new(load_engine()?, config);
    let options = VirtuesOptions { json, quiet };

    let output = cmd.run(&action, &options);
    let formatted = cmd.format_output(&output, &action, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_journal(
    action: JournalCliAction,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::journal::{JournalAction, JournalCommand, JournalOptions};

    let action = match action {
        JournalCliAction::Add {
            content,
            mood,
            tags,
        } => JournalAction::Add {
            content,
            mood: mood.map(Mood::from),
            tags,
        },
        JournalCliAction::List { limit } => JournalAction::List { limit },
        JournalCliAction::Edit {
            id,
            content,
            mood,
            tags,
        } => JournalAction::Edit {
            id,
            content,
            mood: mood.map(Mood::from),
            tags,
        },
        JournalCliAction::Remove { id } => JournalAction::Remove { id },
    };

    let mut cmd = JournalCommand::new(load_engine()?);
    let options = JournalOptions { json, quiet };

    let output = cmd.run(&action, &options);
    let formatted = cmd.format_output(&output, &action, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_export(
    output_path: Option<PathBuf>,
    stdout: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::export_cmd::{ExportCommand, ExportOptions};

    let cmd = ExportCommand::new(load_engine()?);
    let options = ExportOptions {
        json,
        quiet,
        output: output_path,
        stdout,
    };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

fn run_reset(
    force: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use almanack::cli::reset::{ResetCommand, ResetOptions};

    let mut cmd = ResetCommand::new(load_engine()?);
    let options = ResetOptions { json, quiet, force };

    let output = cmd.run(&options);
    let formatted = cmd.format_output(&output, &options);

    if !formatted.is_empty() {
        println!("{}", formatted);
    }

    Ok(success_to_exit_code(output.success))
}

// =============================================================================
// Tests
// =============================================================================
