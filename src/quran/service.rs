//! Cache-aside orchestration over the persistent store and the remote API.

use color_eyre::Result;
use tracing::{debug, warn};

use crate::cache::{codec, SqliteStore, BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY};

use super::client::{RemoteSource, VERSES_PAGE_LIMIT};
use super::types::{Chapter, ChapterSummary, Verse};

/// Number of chapters in the canon. A cached summary collection with any
/// other length is treated as absent.
pub const CHAPTER_COUNT: usize = 114;

/// Cache-aside access to chapter summaries and full chapters.
///
/// Reads consult the store first and fall back to the remote source on a
/// miss or an undecodable entry; fetched records are written back
/// best-effort, so a failing cache never fails a read.
pub struct QuranService<S> {
  source: S,
  store: SqliteStore,
}

impl<S: RemoteSource> QuranService<S> {
  pub fn new(source: S, store: SqliteStore) -> Self {
    Self { source, store }
  }

  /// Get the summary collection for all chapters, cache first.
  pub async fn get_chapter_summaries(&self) -> Result<Vec<ChapterSummary>> {
    if let Some(summaries) = self.cached_summaries() {
      return Ok(summaries);
    }

    let summaries = self.source.fetch_summaries().await?;

    if let Err(e) = self.store_summaries(&summaries) {
      warn!("Failed to cache chapter summaries: {e}");
    }

    Ok(summaries)
  }

  /// Get a full chapter, cache first.
  ///
  /// On a miss the chapter is assembled from its summary metadata and the
  /// paginated verse listing, then written back.
  pub async fn get_chapter(&self, id: u32) -> Result<Chapter> {
    if let Some(chapter) = self.cached_chapter(id) {
      return Ok(chapter);
    }

    let summary = self.resolve_summary(id).await?;
    let verses = self.fetch_all_verses(id, summary.verse_count as usize).await?;
    let chapter = Chapter::from_summary(summary, verses);

    if let Err(e) = self.store_chapter(&chapter) {
      warn!("Failed to cache chapter {id}: {e}");
    }

    Ok(chapter)
  }

  /// Evict a single chapter from the cache, forcing the next read to refetch.
  pub fn delete_chapter(&self, id: u32) -> Result<()> {
    self.store.delete(BUCKET_CHAPTERS, &id.to_string())
  }

  /// Read the cached summary collection, if present and complete.
  ///
  /// The collection shares one unversioned key, so a complete count is the
  /// only integrity check available; anything else is treated as a miss.
  fn cached_summaries(&self) -> Option<Vec<ChapterSummary>> {
    let bytes = match self.store.get(BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY) {
      Ok(Some(bytes)) => bytes,
      Ok(None) => return None,
      Err(e) => {
        debug!("Summary cache read failed: {e}");
        return None;
      }
    };

    let summaries: Vec<ChapterSummary> = match codec::decode(&bytes) {
      Ok(summaries) => summaries,
      Err(e) => {
        debug!("Discarding undecodable summary cache entry: {e}");
        return None;
      }
    };

    if summaries.len() != CHAPTER_COUNT {
      debug!(
        count = summaries.len(),
        "Discarding incomplete summary cache entry"
      );
      return None;
    }

    Some(summaries)
  }

  /// Read a cached chapter. Any decodable entry is trusted as-is.
  fn cached_chapter(&self, id: u32) -> Option<Chapter> {
    let bytes = match self.store.get(BUCKET_CHAPTERS, &id.to_string()) {
      Ok(Some(bytes)) => bytes,
      Ok(None) => return None,
      Err(e) => {
        debug!("Cache read for chapter {id} failed: {e}");
        return None;
      }
    };

    match codec::decode(&bytes) {
      Ok(chapter) => Some(chapter),
      Err(e) => {
        debug!("Discarding undecodable cache entry for chapter {id}: {e}");
        None
      }
    }
  }

  /// Resolve the summary for one chapter.
  ///
  /// A valid cached collection is dense and ordered by ascending id, so
  /// chapter `id` sits at index `id - 1`; without one, the single-chapter
  /// metadata endpoint is consulted.
  async fn resolve_summary(&self, id: u32) -> Result<ChapterSummary> {
    if let Some(summaries) = self.cached_summaries() {
      if let Some(summary) = id.checked_sub(1).and_then(|i| summaries.get(i as usize)) {
        return Ok(summary.clone());
      }
    }

    self.source.fetch_chapter_meta(id).await
  }

  /// Page through a chapter's verses until the source returns a short page.
  ///
  /// The upstream API takes both a page counter and a running offset without
  /// documenting which is authoritative, so the two are advanced in lockstep
  /// on every request. `verse_count` is only a capacity hint.
  async fn fetch_all_verses(&self, chapter_id: u32, verse_count: usize) -> Result<Vec<Verse>> {
    let mut verses = Vec::with_capacity(verse_count);
    let mut page = 0;
    let mut offset = 0;

    loop {
      let batch = self
        .source
        .fetch_verses_page(chapter_id, page, offset, VERSES_PAGE_LIMIT)
        .await?;
      let received = batch.len();
      verses.extend(batch);

      if received < VERSES_PAGE_LIMIT {
        break;
      }
      page += 1;
      offset += received;
    }

    Ok(verses)
  }

  fn store_summaries(&self, summaries: &[ChapterSummary]) -> Result<()> {
    let blob = codec::encode(summaries)?;
    self.store.put(BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY, &blob)
  }

  fn store_chapter(&self, chapter: &Chapter) -> Result<()> {
    let blob = codec::encode(chapter)?;
    self.store.put(BUCKET_CHAPTERS, &chapter.id.to_string(), &blob)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// Scripted remote source serving a fixed canon and verse pages.
  #[derive(Default)]
  struct MockSource {
    summaries: Vec<ChapterSummary>,
    pages: Vec<Vec<Verse>>,
    summary_calls: AtomicUsize,
    meta_calls: AtomicUsize,
    page_calls: AtomicUsize,
  }

  #[async_trait]
  impl RemoteSource for MockSource {
    async fn fetch_summaries(&self) -> Result<Vec<ChapterSummary>> {
      self.summary_calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.summaries.clone())
    }

    async fn fetch_chapter_meta(&self, id: u32) -> Result<ChapterSummary> {
      self.meta_calls.fetch_add(1, Ordering::SeqCst);
      Ok(
        self
          .summaries
          .iter()
          .find(|s| s.id == id)
          .cloned()
          .unwrap_or_else(|| test_summary(id, 7)),
      )
    }

    async fn fetch_verses_page(
      &self,
      _chapter_id: u32,
      page: u32,
      _offset: usize,
      _limit: usize,
    ) -> Result<Vec<Verse>> {
      self.page_calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.pages.get(page as usize).cloned().unwrap_or_default())
    }
  }

  fn test_summary(id: u32, verse_count: u32) -> ChapterSummary {
    ChapterSummary {
      id,
      number: id,
      verse_count,
      name_simple: format!("Chapter {id}"),
      pages: [1, 2],
      ..ChapterSummary::default()
    }
  }

  fn test_verse(chapter_id: u32, verse_number: u32) -> Verse {
    Verse {
      id: chapter_id * 1000 + verse_number,
      verse_number,
      chapter_id,
      verse_key: format!("{chapter_id}:{verse_number}"),
      ..Verse::default()
    }
  }

  fn verse_page(chapter_id: u32, numbers: std::ops::RangeInclusive<u32>) -> Vec<Verse> {
    numbers.map(|n| test_verse(chapter_id, n)).collect()
  }

  fn full_canon() -> Vec<ChapterSummary> {
    (1..=CHAPTER_COUNT as u32).map(|id| test_summary(id, 7)).collect()
  }

  fn service_with(source: MockSource) -> QuranService<MockSource> {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    QuranService::new(source, store)
  }

  #[tokio::test]
  async fn test_summaries_fetched_once_then_served_from_cache() {
    let service = service_with(MockSource {
      summaries: full_canon(),
      ..Default::default()
    });

    let first = service.get_chapter_summaries().await.unwrap();
    let second = service.get_chapter_summaries().await.unwrap();

    assert_eq!(first.len(), CHAPTER_COUNT);
    assert_eq!(first, second);
    assert_eq!(service.source.summary_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_incomplete_summary_cache_is_refetched() {
    let service = service_with(MockSource {
      summaries: full_canon(),
      ..Default::default()
    });

    // Simulate a partial write: one entry short of the full canon.
    let partial: Vec<ChapterSummary> =
      (1..CHAPTER_COUNT as u32).map(|id| test_summary(id, 7)).collect();
    assert_eq!(partial.len(), CHAPTER_COUNT - 1);
    let blob = codec::encode(&partial).unwrap();
    service
      .store
      .put(BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY, &blob)
      .unwrap();

    let summaries = service.get_chapter_summaries().await.unwrap();

    assert_eq!(summaries.len(), CHAPTER_COUNT);
    assert_eq!(service.source.summary_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_corrupt_summary_cache_is_refetched() {
    let service = service_with(MockSource {
      summaries: full_canon(),
      ..Default::default()
    });

    service
      .store
      .put(BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY, b"garbage")
      .unwrap();

    let summaries = service.get_chapter_summaries().await.unwrap();

    assert_eq!(summaries.len(), CHAPTER_COUNT);
    assert_eq!(service.source.summary_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_chapter_pagination_assembles_all_pages() {
    let pages = vec![
      verse_page(1, 1..=50),
      verse_page(1, 51..=100),
      verse_page(1, 101..=123),
    ];
    let service = service_with(MockSource {
      pages,
      ..Default::default()
    });

    let chapter = service.get_chapter(1).await.unwrap();

    assert_eq!(chapter.verses.len(), 123);
    assert_eq!(service.source.page_calls.load(Ordering::SeqCst), 3);
    assert!(chapter
      .verses
      .windows(2)
      .all(|pair| pair[0].verse_number < pair[1].verse_number));
  }

  #[tokio::test]
  async fn test_pagination_stops_on_empty_final_page() {
    // A full page followed by nothing: the loop must issue one more request
    // and stop on the zero-size page.
    let pages = vec![verse_page(2, 1..=50)];
    let service = service_with(MockSource {
      pages,
      ..Default::default()
    });

    let chapter = service.get_chapter(2).await.unwrap();

    assert_eq!(chapter.verses.len(), 50);
    assert_eq!(service.source.page_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_chapter_served_from_cache_after_first_fetch() {
    let pages = vec![verse_page(3, 1..=7)];
    let service = service_with(MockSource {
      pages,
      ..Default::default()
    });

    let first = service.get_chapter(3).await.unwrap();
    let second = service.get_chapter(3).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(service.source.meta_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.source.page_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_corrupt_chapter_blob_falls_through_and_is_rewritten() {
    let pages = vec![verse_page(4, 1..=7)];
    let service = service_with(MockSource {
      pages,
      ..Default::default()
    });

    service.store.put(BUCKET_CHAPTERS, "4", b"not a chapter").unwrap();

    let chapter = service.get_chapter(4).await.unwrap();
    assert_eq!(chapter.verses.len(), 7);

    let blob = service
      .store
      .get(BUCKET_CHAPTERS, "4")
      .unwrap()
      .expect("chapter rewritten after fallback");
    let cached: Chapter = codec::decode(&blob).unwrap();
    assert_eq!(cached, chapter);
  }

  #[tokio::test]
  async fn test_delete_chapter_evicts_cache_entry() {
    let pages = vec![verse_page(5, 1..=7)];
    let service = service_with(MockSource {
      pages,
      ..Default::default()
    });

    service.get_chapter(5).await.unwrap();
    assert_eq!(service.source.meta_calls.load(Ordering::SeqCst), 1);

    service.delete_chapter(5).unwrap();

    service.get_chapter(5).await.unwrap();
    assert_eq!(service.source.meta_calls.load(Ordering::SeqCst), 2);
    assert_eq!(service.source.page_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_chapter_metadata_resolved_from_cached_summaries() {
    // With a valid summary collection cached, assembling a chapter needs no
    // metadata request.
    let pages = vec![verse_page(9, 1..=7)];
    let service = service_with(MockSource {
      summaries: full_canon(),
      pages,
      ..Default::default()
    });

    service.get_chapter_summaries().await.unwrap();
    let chapter = service.get_chapter(9).await.unwrap();

    assert_eq!(chapter.id, 9);
    assert_eq!(chapter.number, 9);
    assert_eq!(service.source.meta_calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_out_of_range_id_falls_back_to_metadata_fetch() {
    let pages = vec![verse_page(115, 1..=7)];
    let service = service_with(MockSource {
      summaries: full_canon(),
      pages,
      ..Default::default()
    });

    service.get_chapter_summaries().await.unwrap();
    service.get_chapter(115).await.unwrap();

    assert_eq!(service.source.meta_calls.load(Ordering::SeqCst), 1);
  }
}
