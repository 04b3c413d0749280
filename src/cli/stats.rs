//! Stats command for almanack.
//!
//! Reports derived analytics over the completed weeks: totals, streaks,
//! success rate, cycle position, and with `--detailed` the per-virtue
//! table, fault trend, and the virtues needing attention.

use serde::Serialize;

use crate::core::{CycleProgress, PracticeEngine, StreakData};
use crate::stats::{
    detailed_analytics, needs_improvement, virtue_statistics, DetailedAnalytics, VirtueStats,
};
use crate::util;

/// Options for the stats command.
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Show the per-virtue breakdown and trend.
    pub detailed: bool,
}

/// Output format for the stats command.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    /// Always true; stats has no failure path.
    pub success: bool,
    /// Streak counters.
    pub streak: StreakData,
    /// Position in the 13-week cycle.
    pub cycle: CycleProgress,
    /// The analytics overview.
    pub analytics: DetailedAnalytics,
    /// Per-virtue statistics, first-practiced order.
    pub virtue_stats: Vec<VirtueStats>,
    /// Virtue ids most in need of work.
    pub needs_improvement: Vec<String>,
}

/// The stats command implementation.
pub struct StatsCommand {
    engine: PracticeEngine,
}

impl StatsCommand {
    /// Create a new stats command.
    pub fn new(engine: PracticeEngine) -> Self {
        Self { engine }
    }

    /// Run the stats command.
    pub fn run(&self, _options: &StatsOptions) -> StatsOutput {
        let state = self.engine.state();
        let records = &state.week_records;
        let stats = virtue_statistics(records);
        let needs = needs_improvement(&stats, state.current_virtue_id.as_deref())
            .iter()
            .map(|s| s.virtue_id.clone())
            .collect();

        StatsOutput {
            success: true,
            streak: state.streak.clone(),
            cycle: self.engine.cycle_progress(),
            analytics: detailed_analytics(records, state.current_week_observations.len()),
            virtue_stats: stats,
            needs_improvement: needs,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatsOutput, options: &StatsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, options.detailed)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatsOutput, detailed: bool) -> String {
        let analytics = &output.analytics;
        let mut text = String::from("Practice statistics\n");
        text.push_str(&format!(
            "  Weeks completed: {} ({} {})\n",
            analytics.total_weeks,
            analytics.completed_cycles,
            if analytics.completed_cycles == 1 {
                "full cycle"
            } else {
                "full cycles"
            }
        ));
        text.push_str(&format!("  Perfect weeks: {}\n", analytics.perfect_weeks));
        text.push_str(&format!("  Success rate: {}%\n", analytics.success_rate));
        text.push_str(&format!(
            "  Average faults per week: {:.1}\n",
            analytics.avg_faults_per_week
        ));
        text.push_str(&format!(
            "  Streak: {} {} (longest {})\n",
            output.streak.current_streak,
            if output.streak.current_streak == 1 {
                "day"
            } else {
                "days"
            },
            output.streak.longest_streak
        ));
        text.push_str(&format!(
            "  Cycle {}: week {} of {}\n",
            output.cycle.cycle_number, output.cycle.current, output.cycle.total
        ));

        if !detailed {
            return text;
        }

        if let Some(strongest) = &analytics.strongest_virtue {
            text.push_str(&format!("  Strongest virtue: {}\n", strongest));
        }
        if let Some(weakest) = &analytics.weakest_virtue {
            text.push_str(&format!("  Weakest virtue: {}\n", weakest));
        }

        if !output.virtue_stats.is_empty() {
            text.push_str("\nBy virtue:\n");
            for stat in &output.virtue_stats {
                let name = self
                    .engine
                    .state()
                    .virtue_name(&stat.virtue_id)
                    .unwrap_or_else(|| stat.virtue_id.clone());
                text.push_str(&format!(
                    "  {}: {} {}, avg {:.1} faults, last {}\n",
                    name,
                    stat.attempts,
                    if stat.attempts == 1 { "week" } else { "weeks" },
                    stat.avg_faults,
                    util::format_long(stat.last_attempt_date)
                ));
            }
        }

        if !output.needs_improvement.is_empty() {
            text.push_str(&format!(
                "\nNeeds attention: {}\n",
                output.needs_improvement.join(", ")
            ));
        }

        if !analytics.weekly_fault_trend.is_empty() {
            let counts: Vec<String> = analytics
                .weekly_fault_trend
                .iter()
                .map(|p| p.fault_count.to_string())
                .collect();
            text.push_str(&format!(
                "Fault trend (last {} weeks): {}\n",
                analytics.weekly_fault_trend.len(),
                counts.join(" ")
            ));
        }

        text
    }
}
