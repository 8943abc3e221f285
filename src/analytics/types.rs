//! Data types produced by the aggregation pass.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Global counters and rates over the full window, not per-route.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_searches: usize,
    pub searches_without_results: usize,
    pub converted_searches: usize,
    /// Distinct non-null user ids. Anonymous searches count toward the
    /// other totals but never toward this one.
    pub unique_users: usize,
    pub without_results_rate: f64,
    pub conversion_rate: f64,
}

/// Per-route search volume and quality for one `(origin_city, dest_city)`
/// pair. Keys are matched literally; differently cased or spaced city
/// strings form distinct routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAggregate {
    pub origin_city: String,
    pub dest_city: String,
    pub search_count: usize,
    /// Percentage of searches on this route that found at least one ride,
    /// rounded to 2 decimals.
    pub results_rate: f64,
    /// Percentage of searches on this route that led to a ride request,
    /// rounded to 2 decimals.
    pub conversion_rate: f64,
    /// Mean requested seats, rounded to 1 decimal.
    pub avg_passengers: f64,
}

/// A route whose searches returned zero rides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsatisfiedDemandAggregate {
    pub origin_city: String,
    pub dest_city: String,
    pub failed_searches: usize,
    /// Most recent failed search on this route.
    pub last_search_date: DateTime<Utc>,
    pub avg_passengers: f64,
}

/// Search volume per requested travel date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySearchCounts {
    pub search_date: NaiveDate,
    pub total_searches: usize,
    pub with_results: usize,
    pub converted: usize,
}

/// Complete analytics result for one window, returned to the caller as a
/// single object per invocation. Recomputed from scratch on every call;
/// nothing here is cached or persisted.
#[derive(Debug, Serialize)]
pub struct SearchAnalytics {
    pub generated_at: DateTime<Utc>,
    pub window_days: u32,
    pub kpis: KpiSummary,
    pub top_routes: Vec<RouteAggregate>,
    pub unsatisfied_demand: Vec<UnsatisfiedDemandAggregate>,
    pub by_day: Vec<DailySearchCounts>,
}
