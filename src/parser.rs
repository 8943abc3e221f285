//! JSON parser for search-event exports.

use anyhow::Result;

use crate::events::SearchEvent;

/// Decodes a JSON array of [`SearchEvent`] rows from raw bytes.
///
/// This is the shape returned by the event store's REST surface and by
/// local JSON dumps of the `search_logs` table.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid JSON array of events.
pub fn parse_events(bytes: &[u8]) -> Result<Vec<SearchEvent>> {
    Ok(serde_json::from_slice(bytes)?)
}
