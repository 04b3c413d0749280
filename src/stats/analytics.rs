//! Analytics over completed practice weeks.
//!
//! Pure, stateless aggregation: nothing here is persisted, and every
//! function derives its result from the append-only week-record store
//! (plus the in-progress ledger count where noted).
//!
//! Tie-break rule, applied everywhere a single "best" virtue is picked:
//! candidates are ranked in first-practiced order (order of first
//! appearance in the store) and compared strictly, so the earlier virtue
//! wins ties. Repeated calls over the same records always agree.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::CYCLE_LENGTH;
use crate::core::state::WeekRecord;

/// Number of records reported by `weekly_fault_trend`.
pub const TREND_WINDOW_WEEKS: usize = 8;

/// Number of virtues reported by `needs_improvement`.
pub const NEEDS_IMPROVEMENT_LIMIT: usize = 3;

/// Aggregated statistics for one virtue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtueStats {
    /// The virtue the records belong to.
    pub virtue_id: String,
    /// Completed weeks practicing the virtue.
    pub attempts: u32,
    /// Faults across all attempts.
    pub total_faults: u32,
    /// `total_faults / attempts`.
    pub avg_faults: f64,
    /// End date of the latest attempt.
    pub last_attempt_date: NaiveDate,
}

/// One point of the weekly fault trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekTrendPoint {
    /// First day of the recorded week.
    pub week_start: NaiveDate,
    /// The virtue practiced.
    pub virtue_id: String,
    /// Fault days in the week.
    pub fault_count: usize,
    /// Days logged in the week.
    pub observation_count: usize,
}

/// The full analytics overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedAnalytics {
    /// Completed weeks.
    pub total_weeks: usize,
    /// Faults across completed weeks.
    pub total_faults: usize,
    /// Observations across completed weeks plus the in-progress ledger.
    pub total_observations: usize,
    /// Perfect weeks, recomputed from the records.
    pub perfect_weeks: usize,
    /// Full 13-week cycles completed.
    pub completed_cycles: usize,
    /// Virtue with the most attempts.
    pub most_practiced_virtue: Option<String>,
    /// Virtue with the lowest average faults.
    pub strongest_virtue: Option<String>,
    /// Virtue with the highest average faults.
    pub weakest_virtue: Option<String>,
    /// The most recent weeks, reduced to trend points.
    pub weekly_fault_trend: Vec<WeekTrendPoint>,
    /// `total_faults / total_weeks`.
    pub avg_faults_per_week: f64,
    /// Whole-percentage success rate.
    pub success_rate: u32,
}

/// Aggregate records into per-virtue statistics, in first-practiced order.
pub fn virtue_statistics(records: &[WeekRecord]) -> Vec<VirtueStats> {
    let mut stats: Vec<VirtueStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let fault_count = record.fault_count() as u32;
        match index.get(record.virtue_id.as_str()) {
            Some(&slot) => {
                let entry = &mut stats[slot];
                entry.attempts += 1;
                entry.total_faults += fault_count;
                entry.avg_faults = f64::from(entry.total_faults) / f64::from(entry.attempts);
                if record.end_date > entry.last_attempt_date {
                    entry.last_attempt_date = record.end_date;
                }
            }
            None => {
                index.insert(record.virtue_id.as_str(), stats.len());
                stats.push(VirtueStats {
                    virtue_id: record.virtue_id.clone(),
                    attempts: 1,
                    total_faults: fault_count,
                    avg_faults: f64::from(fault_count),
                    last_attempt_date: record.end_date,
                });
            }
        }
    }

    stats
}

/// The virtue with the lowest average faults, earliest-practiced on ties.
pub fn strongest_virtue(stats: &[VirtueStats]) -> Option<&VirtueStats> {
    let mut best: Option<&VirtueStats> = None;
    for entry in stats {
        match best {
            Some(current) if entry.avg_faults < current.avg_faults => best = Some(entry),
            None => best = Some(entry),
            _ => {}
        }
    }
    best
}

/// The virtue with the highest average faults, earliest-practiced on ties.
pub fn weakest_virtue(stats: &[VirtueStats]) -> Option<&VirtueStats> {
    let mut worst: Option<&VirtueStats> = None;
    for entry in stats {
        match worst {
            Some(current) if entry.avg_faults > current.avg_faults => worst = Some(entry),
            None => worst = Some(entry),
            _ => {}
        }
    }
    worst
}

/// The virtue with the most attempts, earliest-practiced on ties.
pub fn most_practiced(stats: &[VirtueStats]) -> Option<&VirtueStats> {
    let mut top: Option<&VirtueStats> = None;
    for entry in stats {
        match top {
            Some(current) if entry.attempts > current.attempts => top = Some(entry),
            None => top = Some(entry),
            _ => {}
        }
    }
    top
}

/// The virtues most in need of work: highest average faults first, at most
/// three, skipping the virtue under practice right now.
///
/// The sort is stable over first-practiced order, so equal averages keep it.
pub fn needs_improvement<'a>(
    stats: &'a [VirtueStats],
    current_virtue_id: Option<&str>,
) -> Vec<&'a VirtueStats> {
    let mut ranked: Vec<&VirtueStats> = stats
        .iter()
        .filter(|s| Some(s.virtue_id.as_str()) != current_virtue_id)
        .collect();
    ranked.sort_by(|a, b| b.avg_faults.total_cmp(&a.avg_faults));
    ranked.truncate(NEEDS_IMPROVEMENT_LIMIT);
    ranked
}

/// Whole-percentage success rate across the practice.
///
/// The denominator counts completed-week observations plus the in-progress
/// ledger; faults come from completed weeks only. Zero observations is a
/// vacuous 100.
pub fn success_rate(records: &[WeekRecord], current_observation_count: usize) -> u32 {
    let completed: usize = records.iter().map(WeekRecord::observation_count).sum();
    let total_observations = completed + current_observation_count;
    if total_observations == 0 {
        return 100;
    }

    let total_faults: usize = records.iter().map(WeekRecord::fault_count).sum();
    let successes = (total_observations - total_faults) as f64;
    ((successes / total_observations as f64) * 100.0).round() as u32
}

/// The most recent completed weeks, in store order, reduced to trend points.
///
/// Store order is authoritative: the store is append-only and
/// chronological, and the trend follows it rather than re-sorting by date.
pub fn weekly_fault_trend(records: &[WeekRecord]) -> Vec<WeekTrendPoint> {
    let skip = records.len().saturating_sub(TREND_WINDOW_WEEKS);
    records[skip..]
        .iter()
        .map(|record| WeekTrendPoint {
            week_start: record.start_date,
            virtue_id: record.virtue_id.clone(),
            fault_count: record.fault_count(),
            observation_count: record.observation_count(),
        })
        .collect()
}

/// Full 13-week cycles completed.
pub fn completed_cycles(total_weeks: usize) -> usize {
    total_weeks / CYCLE_LENGTH
}

/// Compute the full analytics overview.
pub fn detailed_analytics(
    records: &[WeekRecord],
    current_observation_count: usize,
) -> DetailedAnalytics {
    let total_weeks = records.len();
    let total_faults: usize = records.iter().map(WeekRecord::fault_count).sum();
    let total_observations: usize = records.iter().map(WeekRecord::observation_count).sum::<usize>()
        + current_observation_count;
    let perfect_weeks = records.iter().filter(|r| r.is_perfect()).count();

    let stats = virtue_statistics(records);

    DetailedAnalytics {
        total_weeks,
        total_faults,
        total_observations,
        perfect_weeks,
        completed_cycles: completed_cycles(total_weeks),
        most_practiced_virtue: most_practiced(&stats).map(|s| s.virtue_id.clone()),
        strongest_virtue: strongest_virtue(&stats).map(|s| s.virtue_id.clone()),
        weakest_virtue: weakest_virtue(&stats).map(|s| s.virtue_id.clone()),
        weekly_fault_trend: weekly_fault_trend(records),
        avg_faults_per_week: if total_weeks > 0 {
            total_faults as f64 / total_weeks as f64
        } else {
            0.0
        },
        success_rate: success_rate(records, current_observation_count),
    }
}
