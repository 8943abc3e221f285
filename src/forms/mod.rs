//! Google Forms response normalization and per-question statistics.
//!
//! The forms API itself is an external collaborator; this module only works
//! on already-exported JSON. Raw responses key their answers by opaque
//! question ids, so the first step maps those back to question titles via
//! the form structure, and the second classifies each question as
//! categorical or free-text and computes counts or common words.

pub mod analytics;
pub mod normalize;
pub mod types;
