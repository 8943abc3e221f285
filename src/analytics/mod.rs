//! Search-demand aggregation.
//!
//! This module turns a time-windowed batch of search events into the three
//! derived views the backoffice renders: global KPIs, the most-searched
//! routes, and routes with unsatisfied demand. Everything here is a pure
//! computation over an already-fetched in-memory batch; fetching lives in
//! `fetch` and the event-store client.

pub mod aggregate;
pub mod types;
pub mod utility;
