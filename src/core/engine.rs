//! Practice engine for almanack.
//!
//! The engine owns the authoritative in-memory snapshot and is the only
//! mutation path. Every mutation executes synchronously against the
//! snapshot, then hands a clone to the background snapshot writer; callers
//! never wait on durable storage. Reads are plain accessors over the
//! snapshot.
//!
//! Week lifecycle is a two-state machine: no virtue selected, or one week
//! active. `start_new_week` and `complete_week` are the only transitions,
//! and both reject calls from the wrong state.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};

use crate::catalog;
use crate::core::cycle::{self, CycleProgress};
use crate::core::state::{
    CustomVirtue, DailyObservation, JournalEntry, Mood, PracticeState, StreakData, WeekRecord,
    NOTE_MAX_CHARS, WEEK_LENGTH_DAYS,
};
use crate::core::streak;
use crate::error::{AlmanackError, Result};
use crate::storage::{SnapshotWriter, StateStore};
use crate::util;

/// Wall-clock window within which the most recent log can be undone.
pub const UNDO_WINDOW_MS: i64 = 5_000;

/// One retained level of undo for the most recent log operation.
///
/// Ephemeral engine state: never serialized, cleared by the next log,
/// by week transitions, and by a reset.
#[derive(Debug, Clone)]
struct UndoBuffer {
    /// The date the log wrote to.
    date: NaiveDate,
    /// The entry the log replaced, `None` if the date was previously unlogged.
    previous: Option<DailyObservation>,
    /// Streak counters as they stood before the log.
    streak_before: StreakData,
    /// When the log happened.
    recorded_at: DateTime<Utc>,
}

/// The practice state engine.
///
/// Construct via [`PracticeEngine::load_or_default`], which reads the
/// stored snapshot (or initializes the documented default), revalidates
/// the streak, and takes ownership of the store for background writes.
#[derive(Debug)]
pub struct PracticeEngine {
    /// The authoritative snapshot.
    state: PracticeState,
    /// Background durable-write queue.
    writer: SnapshotWriter,
    /// Single-level undo buffer for the most recent log.
    undo: Option<UndoBuffer>,
}

impl PracticeEngine {
    /// Load the snapshot from the store, or initialize the default one.
    ///
    /// Applies load-time streak revalidation against today's date and
    /// persists the corrected snapshot immediately if the streak expired.
    pub fn load_or_default<S: StateStore + 'static>(store: S) -> Result<Self> {
        Self::load_or_default_on(store, util::today())
    }

    /// Load with an explicit "today", so revalidation is testable.
    pub fn load_or_default_on<S: StateStore + 'static>(
        store: S,
        today: NaiveDate,
    ) -> Result<Self> {
        let mut state = store.load()?.unwrap_or_default();

        let mut expired = false;
        if let Some(corrected) = streak::validate_on_load(&state.streak, today) {
            tracing::warn!(
                last_log_date = ?state.streak.last_log_date,
                "streak expired since last launch, resetting current streak"
            );
            state.streak = corrected;
            expired = true;
        }

        let engine = Self {
            state,
            writer: SnapshotWriter::spawn(store),
            undo: None,
        };
        if expired {
            engine.persist();
        }
        Ok(engine)
    }

    /// The current snapshot.
    pub fn state(&self) -> &PracticeState {
        &self.state
    }

    /// The current streak counters.
    pub fn streak(&self) -> &StreakData {
        &self.state.streak
    }

    // =========================================================================
    // Observation ledger
    // =========================================================================

    /// Log (or re-log) the observation for a date in the active week.
    ///
    /// Upserts by date: an existing entry for the date is fully replaced,
    /// and the replacement does not count as a new streak day. Membership
    /// of the date in the active week's span is the caller's contract and
    /// is not checked here.
    pub fn log_observation(
        &mut self,
        date: NaiveDate,
        has_fault: bool,
        note: Option<String>,
    ) -> Result<()> {
        self.log_observation_at(Utc::now(), date, has_fault, note)
    }

    /// Log with an explicit wall-clock instant, so the undo window is
    /// testable.
    pub fn log_observation_at(
        &mut self,
        now: DateTime<Utc>,
        date: NaiveDate,
        has_fault: bool,
        note: Option<String>,
    ) -> Result<()> {
        if !self.state.has_active_week() {
            return Err(AlmanackError::invalid_state(
                "cannot log an observation with no active week",
            ));
        }
        if let Some(text) = &note {
            let chars = text.chars().count();
            if chars > NOTE_MAX_CHARS {
                return Err(AlmanackError::validation(format!(
                    "note is {} characters, the maximum is {}",
                    chars, NOTE_MAX_CHARS
                )));
            }
        }

        let entry = DailyObservation::new(date, has_fault, note);
        let previous = match self
            .state
            .current_week_observations
            .iter_mut()
            .find(|o| o.date == date)
        {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.state.current_week_observations.push(entry);
                None
            }
        };

        let is_new_log = previous.is_none();
        let streak_before = self.state.streak.clone();
        self.state.streak = streak::update(&self.state.streak, date, is_new_log);

        self.undo = Some(UndoBuffer {
            date,
            previous,
            streak_before,
            recorded_at: now,
        });
        self.persist();
        Ok(())
    }

    /// Revert the most recent log operation.
    ///
    /// Succeeds only within the grace window after the log; restores both
    /// the ledger entry and the pre-log streak counters. Returns `false`
    /// (no state change) when the window has passed or nothing is undoable.
    /// The buffer holds one level and is consumed by the attempt.
    pub fn undo_last_observation(&mut self) -> bool {
        self.undo_last_observation_at(Utc::now())
    }

    /// Undo with an explicit wall-clock instant.
    pub fn undo_last_observation_at(&mut self, now: DateTime<Utc>) -> bool {
        let Some(buffer) = self.undo.take() else {
            return false;
        };
        // Elapsed may be negative if the clock stepped back; that still
        // counts as inside the window.
        let elapsed = now.signed_duration_since(buffer.recorded_at);
        if elapsed.num_milliseconds() > UNDO_WINDOW_MS {
            return false;
        }

        match buffer.previous {
            Some(previous) => {
                if let Some(existing) = self
                    .state
                    .current_week_observations
                    .iter_mut()
                    .find(|o| o.date == buffer.date)
                {
                    *existing = previous;
                }
            }
            None => {
                self.state
                    .current_week_observations
                    .retain(|o| o.date != buffer.date);
            }
        }
        self.state.streak = buffer.streak_before;
        self.persist();
        true
    }

    /// The active week's ledger, in insertion order.
    pub fn current_week_observations(&self) -> &[DailyObservation] {
        &self.state.current_week_observations
    }

    // =========================================================================
    // Week lifecycle
    // =========================================================================

    /// Transition: no virtue selected → week active.
    ///
    /// Sets the active virtue and week start, clears the ledger and the
    /// undo buffer. Repeating a previously practiced virtue is allowed.
    /// The very first week also initializes the practice start date and
    /// marks onboarding complete.
    pub fn start_new_week(&mut self, virtue_id: &str) -> Result<()> {
        self.start_new_week_on(util::today(), virtue_id)
    }

    /// Start a week with an explicit start date.
    pub fn start_new_week_on(&mut self, today: NaiveDate, virtue_id: &str) -> Result<()> {
        if self.state.has_active_week() {
            return Err(AlmanackError::invalid_state(
                "a practice week is already active; complete it first",
            ));
        }
        if !self.is_known_virtue(virtue_id) {
            return Err(AlmanackError::validation(format!(
                "unknown virtue id '{}'",
                virtue_id
            )));
        }

        self.state.current_virtue_id = Some(virtue_id.to_string());
        self.state.current_week_start = Some(today);
        self.state.current_week_observations.clear();
        self.undo = None;

        if self.state.start_date.is_none() {
            self.state.start_date = Some(today);
            self.state.has_completed_onboarding = true;
        }

        self.persist();
        Ok(())
    }

    /// Transition: week active → no virtue selected.
    ///
    /// Freezes the in-progress ledger into a new immutable record appended
    /// to the store, clears the active-week fields, and counts the week
    /// toward `perfect_weeks` iff all seven days were logged fault-free.
    /// Returns the frozen record.
    pub fn complete_week(&mut self) -> Result<WeekRecord> {
        let observations = self.state.current_week_observations.clone();
        self.complete_week_with(observations)
    }

    /// Complete the week with a reviewed observation set.
    ///
    /// The review flow may adjust entries before freezing; the supplied
    /// list replaces the in-progress ledger entirely.
    pub fn complete_week_with(&mut self, observations: Vec<DailyObservation>) -> Result<WeekRecord> {
        let (virtue_id, start) = self.active_week()?;

        let record = WeekRecord::new(virtue_id, start, observations);
        if record.is_perfect() {
            self.state.streak.perfect_weeks += 1;
        }
        self.state.week_records.push(record.clone());

        self.state.current_virtue_id = None;
        self.state.current_week_start = None;
        self.state.current_week_observations.clear();
        self.undo = None;

        self.persist();
        Ok(record)
    }

    /// Whether seven calendar days have passed since the week started.
    ///
    /// A time-based signal only: it does not require all seven days to be
    /// logged, and the caller may complete earlier. `false` with no active
    /// week.
    pub fn is_week_complete(&self) -> bool {
        self.is_week_complete_on(util::today())
    }

    /// Week-complete check against an explicit date.
    pub fn is_week_complete_on(&self, today: NaiveDate) -> bool {
        match self.state.current_week_start {
            Some(start) => util::day_diff(start, today) >= WEEK_LENGTH_DAYS,
            None => false,
        }
    }

    /// Days left before the active week's span is over, `None` when idle.
    pub fn days_remaining_in_week(&self) -> Option<i64> {
        self.days_remaining_in_week_on(util::today())
    }

    /// Days-remaining computation against an explicit date.
    pub fn days_remaining_in_week_on(&self, today: NaiveDate) -> Option<i64> {
        let start = self.state.current_week_start?;
        Some((WEEK_LENGTH_DAYS - util::day_diff(start, today)).max(0))
    }

    /// All completed records for a virtue, in store (chronological) order.
    pub fn virtue_history(&self, virtue_id: &str) -> Vec<&WeekRecord> {
        self.state
            .week_records
            .iter()
            .filter(|r| r.virtue_id == virtue_id)
            .collect()
    }

    // =========================================================================
    // Cycle planner
    // =========================================================================

    /// Queue a virtue for a future week. Duplicates are ignored.
    pub fn add_to_queue(&mut self, virtue_id: &str) -> Result<()> {
        if !self.is_known_virtue(virtue_id) {
            return Err(AlmanackError::validation(format!(
                "unknown virtue id '{}'",
                virtue_id
            )));
        }
        if self.state.virtue_queue.iter().any(|q| q == virtue_id) {
            return Ok(());
        }
        self.state.virtue_queue.push(virtue_id.to_string());
        self.persist();
        Ok(())
    }

    /// Drop a virtue from the queue. Absent ids are a no-op.
    pub fn remove_from_queue(&mut self, virtue_id: &str) {
        let before = self.state.virtue_queue.len();
        self.state.virtue_queue.retain(|q| q != virtue_id);
        if self.state.virtue_queue.len() != before {
            self.persist();
        }
    }

    /// Replace the queue wholesale.
    ///
    /// No check that the new order is a permutation of the old; that is
    /// the caller's contract.
    pub fn reorder_queue(&mut self, new_order: Vec<String>) {
        self.state.virtue_queue = new_order;
        self.persist();
    }

    /// Peek at the next planned virtue.
    pub fn next_queued_virtue(&self) -> Option<&str> {
        self.state.virtue_queue.first().map(String::as_str)
    }

    /// Pop the next planned virtue so it is not offered again.
    pub fn consume_queued_virtue(&mut self) -> Option<String> {
        if self.state.virtue_queue.is_empty() {
            return None;
        }
        let head = self.state.virtue_queue.remove(0);
        self.persist();
        Some(head)
    }

    /// Derived position within the 13-week cycle.
    pub fn cycle_progress(&self) -> CycleProgress {
        cycle::progress(self.state.week_records.len(), self.state.has_active_week())
    }

    /// Canonical virtues never yet practiced, skipping the active one.
    pub fn never_attempted_virtues(&self) -> Vec<&'static str> {
        cycle::never_attempted(
            &self.state.week_records,
            self.state.current_virtue_id.as_deref(),
        )
    }

    // =========================================================================
    // Journal
    // =========================================================================

    /// Add a journal entry. New entries are prepended (newest first).
    pub fn add_journal_entry(
        &mut self,
        content: impl Into<String>,
        mood: Option<Mood>,
        tags: Vec<String>,
    ) -> &JournalEntry {
        let entry = JournalEntry::new(content, mood, tags);
        self.state.journal_entries.insert(0, entry);
        self.persist();
        &self.state.journal_entries[0]
    }

    /// Replace a journal entry's content, mood, and tags.
    ///
    /// Refreshes the edit timestamp. Returns `false` for an unknown id.
    pub fn update_journal_entry(
        &mut self,
        id: &str,
        content: impl Into<String>,
        mood: Option<Mood>,
        tags: Vec<String>,
    ) -> bool {
        let Some(entry) = self.state.journal_entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.content = content.into();
        entry.mood = mood;
        entry.tags = tags;
        entry.touch();
        self.persist();
        true
    }

    /// Delete a journal entry. Returns `false` for an unknown id.
    pub fn remove_journal_entry(&mut self, id: &str) -> bool {
        let before = self.state.journal_entries.len();
        self.state.journal_entries.retain(|e| e.id != id);
        if self.state.journal_entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// All journal entries, newest first.
    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.state.journal_entries
    }

    // =========================================================================
    // Custom virtues
    // =========================================================================

    /// Create a user-defined virtue.
    ///
    /// No entitlement check here: gating is the caller's responsibility,
    /// an explicit trust boundary.
    pub fn add_custom_virtue(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
    ) -> &CustomVirtue {
        let virtue = CustomVirtue::new(name, description, context);
        self.state.custom_virtues.push(virtue);
        self.persist();
        self.state
            .custom_virtues
            .last()
            .expect("virtue was just pushed")
    }

    /// Delete a user-defined virtue, dropping it from the queue as well.
    /// Returns `false` for an unknown id. Completed records keep the id.
    pub fn remove_custom_virtue(&mut self, id: &str) -> bool {
        let before = self.state.custom_virtues.len();
        self.state.custom_virtues.retain(|v| v.id != id);
        if self.state.custom_virtues.len() == before {
            return false;
        }
        self.state.virtue_queue.retain(|q| q != id);
        self.persist();
        true
    }

    // =========================================================================
    // Practice metadata and reset
    // =========================================================================

    /// Set or clear the practitioner's display name.
    pub fn set_user_name(&mut self, name: Option<String>) {
        self.state.user_name = name;
        self.persist();
    }

    /// Wipe everything back to the default snapshot.
    pub fn reset_data(&mut self) {
        self.state = PracticeState::default();
        self.undo = None;
        self.persist();
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Whether a durable write is still in flight.
    pub fn is_saving(&self) -> bool {
        self.writer.is_saving()
    }

    /// Block until queued writes drain or the timeout passes.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.writer.flush(timeout)
    }

    /// The most recent durable-write failure, if any.
    pub fn last_save_error(&self) -> Option<String> {
        self.writer.last_error()
    }

    /// Hand the current snapshot to the background writer.
    fn persist(&self) {
        self.writer.queue(self.state.clone());
    }

    fn is_known_virtue(&self, id: &str) -> bool {
        catalog::is_canonical(id) || self.state.custom_virtue(id).is_some()
    }

    fn active_week(&self) -> Result<(String, NaiveDate)> {
        match (&self.state.current_virtue_id, self.state.current_week_start) {
            (Some(id), Some(start)) => Ok((id.clone(), start)),
            _ => Err(AlmanackError::invalid_state("no active week to complete")),
        }
    }
}
