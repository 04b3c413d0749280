//! Almanack - Franklin-method character practice in the terminal
//!
//! Almanack tracks the thirteen-virtue weekly practice: one virtue at a
//! time, a daily fault ledger, and streaks and analytics derived from the
//! completed weeks. State lives in a single JSON snapshot under the user's
//! home directory.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod milestones;
pub mod stats;
pub mod storage;
pub mod util;

pub use catalog::{Virtue, CYCLE_LENGTH, VIRTUES};
pub use config::Config;
pub use core::{
    CustomVirtue, CycleProgress, DailyObservation, JournalEntry, Mood, PracticeEngine,
    PracticeState, StreakData, WeekRecord,
};
pub use error::{AlmanackError, Result};
pub use export::{character_record, default_filename};
pub use milestones::{for_completed_week, is_streak_milestone, Milestone, STREAK_MILESTONES};
pub use stats::{
    completed_cycles, detailed_analytics, most_practiced, needs_improvement, strongest_virtue,
    success_rate, virtue_statistics, weakest_virtue, weekly_fault_trend, DetailedAnalytics,
    VirtueStats, WeekTrendPoint,
};
pub use storage::{FileStateStore, MemoryStateStore, SnapshotWriter, StateStore};

// CLI commands
pub use cli::{
    BeginCommand, CompleteCommand, ExportCommand, HistoryCommand, JournalCommand, LogCommand,
    QueueCommand, ResetCommand, StatsCommand, StatusCommand, UndoCommand, VirtuesCommand,
};
