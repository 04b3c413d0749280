//! Statistics for almanack.
//!
//! Everything here is derived on demand from the completed week records;
//! nothing is cached or persisted. The week-record store is the single
//! source of truth for all analytics.

pub mod analytics;

pub use analytics::{
    completed_cycles, detailed_analytics, most_practiced, needs_improvement, strongest_virtue,
    success_rate, virtue_statistics, weakest_virtue, weekly_fault_trend, DetailedAnalytics,
    VirtueStats, WeekTrendPoint, NEEDS_IMPROVEMENT_LIMIT, TREND_WINDOW_WEEKS,
};
