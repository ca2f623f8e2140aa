//! quran.com API client and cache-aside orchestration.

mod api_types;
mod client;
mod service;
mod types;

pub use client::{QuranClient, RemoteSource};
pub use service::{QuranService, CHAPTER_COUNT};
pub use types::{
  Chapter, ChapterSummary, MediaContent, Pages, TranslatedName, Translation, Verse, VerseAudio,
  Word, WordAudio,
};
