//! Practice state types for almanack.
//!
//! These types form the single owned snapshot that every mutation produces
//! anew and hands to persistence: the active week's ledger, the append-only
//! week-record store, streak counters, the virtue queue, journal entries,
//! and user-defined virtues.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days in one practice week.
pub const WEEK_LENGTH_DAYS: i64 = 7;

/// Maximum length of an observation note, in characters.
pub const NOTE_MAX_CHARS: usize = 140;

/// The full practice snapshot.
///
/// A single owned aggregate: no shared mutable sub-objects. Unknown or
/// missing fields deserialize to their defaults so older snapshots keep
/// loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PracticeState {
    /// Whether the practitioner has finished first-run setup.
    pub has_completed_onboarding: bool,
    /// Optional display name for the practitioner.
    pub user_name: Option<String>,
    /// The day practice began (set on the first week ever started).
    pub start_date: Option<NaiveDate>,
    /// The virtue under practice this week. Set iff `current_week_start` is.
    pub current_virtue_id: Option<String>,
    /// First day of the active week. Set iff `current_virtue_id` is.
    pub current_week_start: Option<NaiveDate>,
    /// Completed weeks, append-only, chronological.
    pub week_records: Vec<WeekRecord>,
    /// The active week's ledger, insertion order.
    pub current_week_observations: Vec<DailyObservation>,
    /// Planned future virtues, FIFO.
    pub virtue_queue: Vec<String>,
    /// Incremental streak counters.
    pub streak: StreakData,
    /// Personal reflections, newest first.
    pub journal_entries: Vec<JournalEntry>,
    /// User-defined virtues.
    pub custom_virtues: Vec<CustomVirtue>,
    /// Whether rendered weeks begin on Monday.
    pub week_starts_monday: bool,
    /// Dark theme toggle, effective when not following the system.
    pub dark_mode: bool,
    /// Whether the theme follows the system setting.
    pub follow_system_theme: bool,
}

impl Default for PracticeState {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            user_name: None,
            start_date: None,
            current_virtue_id: None,
            current_week_start: None,
            week_records: Vec::new(),
            current_week_observations: Vec::new(),
            virtue_queue: Vec::new(),
            streak: StreakData::default(),
            journal_entries: Vec::new(),
            custom_virtues: Vec::new(),
            week_starts_monday: true,
            dark_mode: false,
            follow_system_theme: true,
        }
    }
}

impl PracticeState {
    /// Whether a virtue and week are currently active.
    pub fn has_active_week(&self) -> bool {
        self.current_virtue_id.is_some() && self.current_week_start.is_some()
    }

    /// The active week's entry for a date, if logged.
    pub fn observation_for(&self, date: NaiveDate) -> Option<&DailyObservation> {
        self.current_week_observations
            .iter()
            .find(|o| o.date == date)
    }

    /// Find a custom virtue by id.
    pub fn custom_virtue(&self, id: &str) -> Option<&CustomVirtue> {
        self.custom_virtues.iter().find(|v| v.id == id)
    }

    /// Resolve the display name for any virtue id, canonical or custom.
    pub fn virtue_name(&self, id: &str) -> Option<String> {
        if let Some(v) = crate::catalog::virtue_by_id(id) {
            return Some(v.name.to_string());
        }
        self.custom_virtue(id).map(|v| v.name.clone())
    }
}

/// One day's pass/fault judgment against the active virtue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyObservation {
    /// The calendar day observed.
    pub date: NaiveDate,
    /// Whether a fault was marked for the day.
    pub has_fault: bool,
    /// Optional note, at most `NOTE_MAX_CHARS` characters.
    pub note: Option<String>,
}

impl DailyObservation {
    /// Create an observation.
    pub fn new(date: NaiveDate, has_fault: bool, note: Option<String>) -> Self {
        Self {
            date,
            has_fault,
            note,
        }
    }
}

/// The frozen, immutable result of one completed practice week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekRecord {
    /// The virtue practiced.
    pub virtue_id: String,
    /// First day of the week.
    pub start_date: NaiveDate,
    /// Last day of the week, always `start_date + 6`.
    pub end_date: NaiveDate,
    /// Observations sorted by date. Missed days are absent, not zero-filled.
    pub observations: Vec<DailyObservation>,
}

impl WeekRecord {
    /// Freeze a week. Observations are sorted by date; the end date is
    /// derived from the start.
    pub fn new(
        virtue_id: impl Into<String>,
        start_date: NaiveDate,
        mut observations: Vec<DailyObservation>,
    ) -> Self {
        observations.sort_by_key(|o| o.date);
        Self {
            virtue_id: virtue_id.into(),
            start_date,
            end_date: start_date + Duration::days(WEEK_LENGTH_DAYS - 1),
            observations,
        }
    }

    /// Number of days logged in the week.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Number of fault days in the week.
    pub fn fault_count(&self) -> usize {
        self.observations.iter().filter(|o| o.has_fault).count()
    }

    /// A perfect week has all seven days logged and zero faults. Six clean
    /// days are not perfect.
    pub fn is_perfect(&self) -> bool {
        self.observations.len() == WEEK_LENGTH_DAYS as usize && self.fault_count() == 0
    }
}

/// Incremental streak counters.
///
/// Updated on every new observation log and week completion, revalidated
/// once at load time. `perfect_weeks` is additive only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StreakData {
    /// Consecutive calendar days with at least one logged observation.
    pub current_streak: u32,
    /// Highest `current_streak` ever reached.
    pub longest_streak: u32,
    /// The most recent day ever logged.
    pub last_log_date: Option<NaiveDate>,
    /// Total distinct days logged across all weeks.
    pub total_days_logged: u32,
    /// Completed weeks with all seven days logged and no faults.
    pub perfect_weeks: u32,
}

/// Mood attached to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Reflective,
    Grateful,
    Challenged,
    Inspired,
    Peaceful,
}

impl Mood {
    /// Get the mood name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reflective => "reflective",
            Self::Grateful => "grateful",
            Self::Challenged => "challenged",
            Self::Inspired => "inspired",
            Self::Peaceful => "peaceful",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A free-form personal reflection, independent of the practice cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    /// Stable identifier, `journal-<uuid>`.
    pub id: String,
    /// The reflection text.
    pub content: String,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was last edited.
    pub updated_at: DateTime<Utc>,
    /// Optional mood.
    pub mood: Option<Mood>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Create a new entry with a fresh id and matching timestamps.
    pub fn new(content: impl Into<String>, mood: Option<Mood>, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("journal-{}", Uuid::new_v4()),
            content: content.into(),
            created_at: now,
            updated_at: now,
            mood,
            tags,
        }
    }

    /// Refresh the edit timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A user-defined virtue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomVirtue {
    /// Stable identifier, `custom-<uuid>`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short precept, shown where catalog descriptions are.
    pub description: String,
    /// Longer background note.
    pub context: String,
    /// When the virtue was created.
    pub created_at: DateTime<Utc>,
}

impl CustomVirtue {
    /// Create a new custom virtue with a fresh id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("custom-{}", Uuid::new_v4()),
            name: name.into(),
            description: description.into(),
            context: context.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_snapshot() {
        let state = PracticeState::default();

        assert!(!state.has_completed_onboarding);
        assert!(state.user_name.is_none());
        assert!(state.start_date.is_none());
        assert!(state.current_virtue_id.is_none());
        assert!(state.current_week_start.is_none());
        assert!(state.week_records.is_empty());
        assert!(state.current_week_observations.is_empty());
        assert!(state.virtue_queue.is_empty());
        assert_eq!(state.streak, StreakData::default());
        assert!(state.journal_entries.is_empty());
        assert!(state.custom_virtues.is_empty());
        assert!(state.week_starts_monday);
        assert!(!state.dark_mode);
        assert!(state.follow_system_theme);
    }

    #[test]
    fn test_has_active_week() {
        let mut state = PracticeState::default();
        assert!(!state.has_active_week());

        state.current_virtue_id = Some("order".to_string());
        state.current_week_start = Some(day(2026, 1, 5));
        assert!(state.has_active_week());
    }

    #[test]
    fn test_observation_for() {
        let mut state = PracticeState::default();
        state
            .current_week_observations
            .push(DailyObservation::new(day(2026, 1, 5), false, None));

        assert!(state.observation_for(day(2026, 1, 5)).is_some());
        assert!(state.observation_for(day(2026, 1, 6)).is_none());
    }

    #[test]
    fn test_virtue_name_resolves_canonical_and_custom() {
        let mut state = PracticeState::default();
        state
            .custom_virtues
            .push(CustomVirtue::new("Punctuality", "Be on time.", ""));
        let custom_id = state.custom_virtues[0].id.clone();

        assert_eq!(state.virtue_name("justice"), Some("Justice".to_string()));
        assert_eq!(state.virtue_name(&custom_id), Some("Punctuality".to_string()));
        assert_eq!(state.virtue_name("nope"), None);
    }

    #[test]
    fn test_week_record_derives_end_date() {
        let record = WeekRecord::new("order", day(2026, 1, 5), Vec::new());
        assert_eq!(record.end_date, day(2026, 1, 11));
    }

    #[test]
    fn test_week_record_sorts_observations_at_freeze() {
        let record = WeekRecord::new(
            "order",
            day(2026, 1, 5),
            vec![
                DailyObservation::new(day(2026, 1, 7), true, None),
                DailyObservation::new(day(2026, 1, 5), false, None),
                DailyObservation::new(day(2026, 1, 6), false, None),
            ],
        );

        let dates: Vec<NaiveDate> = record.observations.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![day(2026, 1, 5), day(2026, 1, 6), day(2026, 1, 7)]
        );
    }

    #[test]
    fn test_week_record_fault_count() {
        let record = WeekRecord::new(
            "order",
            day(2026, 1, 5),
            vec![
                DailyObservation::new(day(2026, 1, 5), true, None),
                DailyObservation::new(day(2026, 1, 6), false, None),
                DailyObservation::new(day(2026, 1, 7), true, None),
            ],
        );
        assert_eq!(record.fault_count(), 2);
        assert_eq!(record.observation_count(), 3);
    }

    #[test]
    fn test_is_perfect_requires_seven_clean_days() {
        let start = day(2026, 1, 5);
        let clean = |count: i64| -> Vec<DailyObservation> {
            (0..count)
                .map(|i| DailyObservation::new(start + Duration::days(i), false, None))
                .collect()
        };

        assert!(WeekRecord::new("order", start, clean(7)).is_perfect());
        assert!(!WeekRecord::new("order", start, clean(6)).is_perfect());

        let mut with_fault = clean(7);
        with_fault[3].has_fault = true;
        assert!(!WeekRecord::new("order", start, with_fault).is_perfect());
    }

    #[test]
    fn test_journal_entry_new() {
        let entry = JournalEntry::new(
            "Held silence through a hard meeting.",
            Some(Mood::Challenged),
            vec!["work".to_string()],
        );

        assert!(entry.id.starts_with("journal-"));
        assert_eq!(entry.created_at, entry.updated_at);
        assert_eq!(entry.mood, Some(Mood::Challenged));
        assert_eq!(entry.tags, vec!["work".to_string()]);
    }

    #[test]
    fn test_journal_entry_touch_advances_updated_at() {
        let mut entry = JournalEntry::new("note", None, Vec::new());
        let created = entry.created_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        entry.touch();

        assert!(entry.updated_at > created);
        assert_eq!(entry.created_at, created);
    }

    #[test]
    fn test_custom_virtue_new() {
        let virtue = CustomVirtue::new("Punctuality", "Be on time.", "Added for work habits.");

        assert!(virtue.id.starts_with("custom-"));
        assert_eq!(virtue.name, "Punctuality");
    }

    #[test]
    fn test_mood_serializes_snake_case() {
        let json = serde_json::to_string(&Mood::Reflective).unwrap();
        assert_eq!(json, "\"reflective\"");

        let back: Mood = serde_json::from_str("\"grateful\"").unwrap();
        assert_eq!(back, Mood::Grateful);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = PracticeState::default();
        state.current_virtue_id = Some("temperance".to_string());
        state.current_week_start = Some(day(2026, 2, 2));
        state.current_week_observations.push(DailyObservation::new(
            day(2026, 2, 2),
            true,
            Some("second helping at dinner".to_string()),
        ));
        state.week_records.push(WeekRecord::new(
            "silence",
            day(2026, 1, 26),
            vec![DailyObservation::new(day(2026, 1, 26), false, None)],
        ));
        state.virtue_queue.push("order".to_string());
        state.streak.current_streak = 2;
        state.streak.longest_streak = 5;
        state.streak.last_log_date = Some(day(2026, 2, 2));

        let json = serde_json::to_string(&state).unwrap();
        let back: PracticeState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let state: PracticeState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, PracticeState::default());
    }
}
