//! Serde envelopes matching the quran.com API response bodies.
//!
//! The API wraps every payload in a single-key object; these types peel the
//! wrapper off before the domain records are handed to callers.

use serde::Deserialize;

use super::types::{ChapterSummary, Verse};

/// Response body of `GET /chapters`.
#[derive(Debug, Deserialize)]
pub struct ApiChaptersResponse {
  #[serde(default)]
  pub chapters: Vec<ChapterSummary>,
}

/// Response body of `GET /chapters/{id}`.
#[derive(Debug, Deserialize)]
pub struct ApiChapterResponse {
  pub chapter: ChapterSummary,
}

/// Response body of `GET /chapters/{id}/verses`.
#[derive(Debug, Deserialize)]
pub struct ApiVersesResponse {
  #[serde(default)]
  pub verses: Vec<Verse>,
}
