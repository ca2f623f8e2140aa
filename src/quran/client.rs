//! HTTP client for the quran.com REST API.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;

use super::api_types::{ApiChapterResponse, ApiChaptersResponse, ApiVersesResponse};
use super::types::{ChapterSummary, Verse};

/// Maximum number of verses the API returns in one page.
pub const VERSES_PAGE_LIMIT: usize = 50;

/// Remote source of chapter and verse records.
#[async_trait]
pub trait RemoteSource: Send + Sync {
  /// Fetch summary metadata for every chapter in the canon.
  async fn fetch_summaries(&self) -> Result<Vec<ChapterSummary>>;

  /// Fetch summary metadata for a single chapter.
  async fn fetch_chapter_meta(&self, id: u32) -> Result<ChapterSummary>;

  /// Fetch one page of a chapter's verses.
  async fn fetch_verses_page(
    &self,
    chapter_id: u32,
    page: u32,
    offset: usize,
    limit: usize,
  ) -> Result<Vec<Verse>>;
}

/// quran.com API client wrapper
#[derive(Clone)]
pub struct QuranClient {
  http: reqwest::Client,
  base_url: Url,
}

impl QuranClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    let base_url = Url::parse(config.base_url.trim_end_matches('/'))
      .map_err(|e| eyre!("Invalid API base URL {}: {}", config.base_url, e))?;

    Ok(Self { http, base_url })
  }

  /// Issue a GET request against the base endpoint and decode the JSON body.
  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
    let url = format!("{}/{}", self.base_url, path);

    let response = self
      .http
      .get(&url)
      .query(query)
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(eyre!("Unexpected status {} from {}", status, url));
    }

    response
      .json()
      .await
      .map_err(|e| eyre!("Invalid response body from {}: {}", url, e))
  }
}

#[async_trait]
impl RemoteSource for QuranClient {
  async fn fetch_summaries(&self) -> Result<Vec<ChapterSummary>> {
    let response: ApiChaptersResponse = self.get_json("chapters", &[]).await?;

    Ok(response.chapters)
  }

  async fn fetch_chapter_meta(&self, id: u32) -> Result<ChapterSummary> {
    let response: ApiChapterResponse = self.get_json(&format!("chapters/{}", id), &[]).await?;

    Ok(response.chapter)
  }

  async fn fetch_verses_page(
    &self,
    chapter_id: u32,
    page: u32,
    offset: usize,
    limit: usize,
  ) -> Result<Vec<Verse>> {
    let response: ApiVersesResponse = self
      .get_json(
        &format!("chapters/{}/verses", chapter_id),
        &[
          ("page", page.to_string()),
          ("offset", offset.to_string()),
          ("limit", limit.to_string()),
        ],
      )
      .await?;

    Ok(response.verses)
  }
}
