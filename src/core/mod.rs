//! Core types and logic for almanack.
//!
//! This module contains the practice snapshot types, the engine that
//! mutates them, and the pure streak and cycle derivations.

pub mod cycle;
pub mod engine;
pub mod state;
pub mod streak;

pub use cycle::CycleProgress;
pub use engine::{PracticeEngine, UNDO_WINDOW_MS};
pub use state::{
    CustomVirtue, DailyObservation, JournalEntry, Mood, PracticeState, StreakData, WeekRecord,
    NOTE_MAX_CHARS, WEEK_LENGTH_DAYS,
};
