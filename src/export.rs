//! Plain-text export of the practice record.
//!
//! Renders the full history as a ledger document in the style of the
//! paper book Franklin kept: a title block, one section per virtue with
//! its weeks and fault notes, a year summary once the practice spans
//! more than one year, and his closing line.

use chrono::{Datelike, NaiveDate};

use crate::catalog;
use crate::core::state::{PracticeState, WeekRecord};
use crate::util;

const HEAVY_RULE: &str =
    "═══════════════════════════════════════════════════════════";
const LIGHT_RULE: &str =
    "───────────────────────────────────────────────────────────";

/// Default filename for a record exported on `today`.
pub fn default_filename(today: NaiveDate) -> String {
    format!("almanack-record-{}.txt", today.format(util::DAY_FORMAT))
}

/// Render the complete character record as plain text.
pub fn character_record(state: &PracticeState, today: NaiveDate) -> String {
    let start_year = state.start_date.map_or(today.year(), |d| d.year());
    let current_year = today.year();

    let mut out = String::new();
    out.push_str(HEAVY_RULE);
    out.push('\n');
    out.push_str("                   ALMANACK\n");
    out.push_str("            Character Formation Record\n");
    out.push_str(HEAVY_RULE);
    out.push_str("\n\n");

    out.push_str("Based on Benjamin Franklin's method of moral perfection.\n\n");
    out.push_str(LIGHT_RULE);
    out.push_str("\n\n");

    if let Some(start) = state.start_date {
        out.push_str(&format!("Practicing since: {}\n", util::format_long(start)));
    }
    out.push_str(&format!(
        "Total weeks practiced: {}\n\n",
        state.week_records.len()
    ));

    out.push_str(HEAVY_RULE);
    out.push('\n');
    out.push_str("                  VIRTUE LEDGER\n");
    out.push_str(HEAVY_RULE);
    out.push_str("\n\n");

    for (id, name, description) in virtue_order(state) {
        let records: Vec<&WeekRecord> = state
            .week_records
            .iter()
            .filter(|r| r.virtue_id == id)
            .collect();
        if records.is_empty() {
            continue;
        }

        out.push_str(&format!("{}\n", name.to_uppercase()));
        out.push_str(&format!("\"{}\"\n\n", description));

        for (index, record) in records.iter().enumerate() {
            out.push_str(&format!(
                "  Week {}: {} — {}\n",
                index + 1,
                util::format_long(record.start_date),
                util::format_long(record.end_date)
            ));
            out.push_str(&format!("  Faults observed: {}\n", record.fault_count()));

            let noted: Vec<(NaiveDate, &str)> = record
                .observations
                .iter()
                .filter_map(|o| match o.note.as_deref() {
                    Some(note) if o.has_fault && !note.is_empty() => Some((o.date, note)),
                    _ => None,
                })
                .collect();
            if !noted.is_empty() {
                out.push_str("  Notes:\n");
                for (date, note) in noted {
                    out.push_str(&format!("    • {}: {}\n", util::format_short(date), note));
                }
            }
            out.push('\n');
        }

        out.push_str(LIGHT_RULE);
        out.push_str("\n\n");
    }

    if current_year > start_year {
        out.push_str(HEAVY_RULE);
        out.push('\n');
        out.push_str(&format!("              {} SUMMARY\n", current_year));
        out.push_str(HEAVY_RULE);
        out.push_str("\n\n");

        let year_records: Vec<&WeekRecord> = state
            .week_records
            .iter()
            .filter(|r| r.start_date.year() == current_year)
            .collect();
        out.push_str(&format!(
            "Weeks practiced this year: {}\n\n",
            year_records.len()
        ));

        for (id, name, _) in virtue_order(state) {
            let weeks = year_records.iter().filter(|r| r.virtue_id == id).count();
            if weeks == 0 {
                continue;
            }
            let faults: usize = year_records
                .iter()
                .filter(|r| r.virtue_id == id)
                .map(|r| r.fault_count())
                .sum();
            out.push_str(&format!(
                "{}: {} {} ({} {})\n",
                name,
                weeks,
                plural(weeks, "week", "weeks"),
                faults,
                plural(faults, "fault", "faults")
            ));
        }

        out.push('\n');
        out.push_str(LIGHT_RULE);
        out.push_str("\n\n");
    }

    out.push_str(HEAVY_RULE);
    out.push_str("\n\n");
    out.push_str("\"I did not aim for perfection, but for fewer faults.\"\n");
    out.push_str("                              — Benjamin Franklin\n\n");
    out.push_str(HEAVY_RULE);
    out.push('\n');

    out
}

/// All virtues in ledger order: the canonical thirteen, then custom ones.
fn virtue_order(state: &PracticeState) -> Vec<(&str, &str, &str)> {
    let mut order: Vec<(&str, &str, &str)> = catalog::VIRTUES
        .iter()
        .map(|v| (v.id, v.name, v.description))
        .collect();
    for custom in &state.custom_virtues {
        order.push((
            custom.id.as_str(),
            custom.name.as_str(),
            custom.description.as_str(),
        ));
    }
    order
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{CustomVirtue, DailyObservation};
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record_with_notes(
        virtue_id: &str,
        start: NaiveDate,
        entries: &[(i64, bool, Option<&str>)],
    ) -> WeekRecord {
        let observations = entries
            .iter()
            .map(|(offset, has_fault, note)| {
                DailyObservation::new(
                    start + Duration::days(*offset),
                    *has_fault,
                    note.map(str::to_string),
                )
            })
            .collect();
        WeekRecord::new(virtue_id, start, observations)
    }

    #[test]
    fn test_empty_record_still_renders_frame() {
        let state = PracticeState::default();
        let text = character_record(&state, day(2026, 3, 1));

        assert!(text.contains("ALMANACK"));
        assert!(text.contains("Character Formation Record"));
        assert!(text.contains("Total weeks practiced: 0"));
        assert!(text.contains("VIRTUE LEDGER"));
        assert!(text.contains("I did not aim for perfection, but for fewer faults."));
        assert!(!text.contains("Practicing since:"));
        assert!(!text.contains("SUMMARY"));
    }

    #[test]
    fn test_practicing_since_uses_long_dates() {
        let state = PracticeState {
            start_date: Some(day(2026, 1, 5)),
            ..Default::default()
        };
        let text = character_record(&state, day(2026, 3, 1));
        assert!(text.contains("Practicing since: January 5, 2026"));
    }

    #[test]
    fn test_ledger_follows_catalog_order() {
        // Stored silence-first, rendered temperance-first.
        let state = PracticeState {
            week_records: vec![
                record_with_notes("silence", day(2026, 1, 12), &[(0, false, None)]),
                record_with_notes("temperance", day(2026, 1, 5), &[(0, false, None)]),
            ],
            ..Default::default()
        };
        let text = character_record(&state, day(2026, 3, 1));

        let temperance = text.find("TEMPERANCE").unwrap();
        let silence = text.find("SILENCE").unwrap();
        assert!(temperance < silence);
        assert!(text.contains("Week 1: January 5, 2026 — January 11, 2026"));
    }

    #[test]
    fn test_only_faults_with_notes_are_listed() {
        let state = PracticeState {
            week_records: vec![record_with_notes(
                "order",
                day(2026, 1, 5),
                &[
                    (0, true, Some("papers everywhere")),
                    (1, true, None),
                    (2, false, Some("clean desk")),
                    (3, true, Some("")),
                ],
            )],
            ..Default::default()
        };
        let text = character_record(&state, day(2026, 3, 1));

        assert!(text.contains("Faults observed: 3"));
        assert!(text.contains("    • Jan 5: papers everywhere"));
        assert!(!text.contains("clean desk"));
        // One noted fault, so the Notes block appears exactly once.
        assert_eq!(text.matches("  Notes:\n").count(), 1);
        assert_eq!(text.matches("    • ").count(), 1);
    }

    #[test]
    fn test_custom_virtues_render_after_catalog() {
        let custom = CustomVirtue::new("Punctuality", "Arrive when you said you would.", "");
        let state = PracticeState {
            week_records: vec![
                record_with_notes(&custom.id, day(2026, 1, 12), &[(0, false, None)]),
                record_with_notes("humility", day(2026, 1, 5), &[(0, false, None)]),
            ],
            custom_virtues: vec![custom],
            ..Default::default()
        };
        let text = character_record(&state, day(2026, 3, 1));

        assert!(text.contains("PUNCTUALITY"));
        assert!(text.contains("\"Arrive when you said you would.\""));
        let humility = text.find("HUMILITY").unwrap();
        let punctuality = text.find("PUNCTUALITY").unwrap();
        assert!(humility < punctuality);
    }

    #[test]
    fn test_year_summary_appears_after_first_year() {
        let state = PracticeState {
            start_date: Some(day(2025, 12, 22)),
            week_records: vec![
                record_with_notes("temperance", day(2025, 12, 22), &[(0, true, None)]),
                record_with_notes(
                    "silence",
                    day(2026, 1, 5),
                    &[(0, true, None), (1, true, None)],
                ),
            ],
            ..Default::default()
        };

        // Same year as the start: no summary.
        let first_year = character_record(&state, day(2025, 12, 29));
        assert!(!first_year.contains("SUMMARY"));

        let text = character_record(&state, day(2026, 2, 1));
        assert!(text.contains("2026 SUMMARY"));
        assert!(text.contains("Weeks practiced this year: 1"));
        // Only the current-year week is summarized.
        assert!(text.contains("Silence: 1 week (2 faults)"));
        assert!(!text.contains("Temperance: 1 week"));
    }

    #[test]
    fn test_default_filename_embeds_date() {
        assert_eq!(
            default_filename(day(2026, 3, 1)),
            "almanack-record-2026-03-01.txt"
        );
    }
}
