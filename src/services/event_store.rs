//! Trait for the search-event store the analytics view reads from.

use anyhow::Result;
use ride_search_analytics::events::SearchEvent;

/// Abstraction over the store holding logged searches.
///
/// Implementations fetch an already-filtered window; the aggregator itself
/// never performs I/O. A failed fetch surfaces here as an error and the
/// aggregation is simply not run for that request.
#[async_trait::async_trait]
pub trait SearchLogStore {
    /// Returns all search events created in the last `days` days, newest
    /// first.
    async fn fetch_window(&self, days: u32) -> Result<Vec<SearchEvent>>;
}
