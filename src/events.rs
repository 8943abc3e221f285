//! Search-event rows as logged by the ride platform.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged attempt to find a ride between two locations.
///
/// Rows are immutable once written by the platform; this crate only ever
/// reads a time-windowed set of them. `has_results` is true iff
/// `results_found > 0`, and `did_convert` implies both `converted_at` and
/// `converted_to_request_id` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEvent {
    pub id: String,
    /// Absent for anonymous searches.
    pub user_id: Option<String>,

    pub origin_city: String,
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub origin_text: String,

    pub dest_city: String,
    pub dest_lat: f64,
    pub dest_lng: f64,
    pub dest_text: String,

    /// Desired travel date, as requested by the searcher.
    pub search_date: NaiveDate,
    pub passengers: u32,

    pub results_found: u32,
    pub has_results: bool,
    pub converted_to_request_id: Option<String>,
    pub did_convert: bool,
    pub converted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}
