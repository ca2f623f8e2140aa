//! Domain records for chapters, verses, and words.
//!
//! These map one-to-one onto the quran.com API payloads and are cached
//! verbatim, so every field must survive an encode/decode round trip.

use serde::{Deserialize, Serialize};

/// Lightweight chapter metadata served by the summary listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
  pub id: u32,
  #[serde(rename = "chapter_number")]
  pub number: u32,
  pub bismillah_pre: bool,
  pub revelation_order: u32,
  pub revelation_place: String,
  #[serde(rename = "name_complex")]
  pub name_transliteration: String,
  pub name_arabic: String,
  pub name_simple: String,
  #[serde(rename = "verses_count")]
  pub verse_count: u32,
  /// First and last page of the chapter, `[start, end]`.
  pub pages: [u32; 2],
  pub translated_name: TranslatedName,
}

impl ChapterSummary {
  /// First page of the chapter in the standard mushaf layout.
  pub fn start_page(&self) -> u32 {
    self.pages[0]
  }

  /// Last page of the chapter in the standard mushaf layout.
  pub fn end_page(&self) -> u32 {
    self.pages[1]
  }
}

/// Chapter name translated into another language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslatedName {
  pub language_name: String,
  pub name: String,
}

/// Full chapter record, the unit of per-chapter caching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
  pub id: u32,
  #[serde(rename = "chapter_number")]
  pub number: u32,
  pub bismillah_pre: bool,
  pub revelation_order: u32,
  pub revelation_place: String,
  #[serde(rename = "name_complex")]
  pub name_transliteration: String,
  pub name_arabic: String,
  pub name_simple: String,
  pub pages: Pages,
  pub translated_name: TranslatedName,
  pub verses: Vec<Verse>,
}

impl Chapter {
  /// Assemble a full chapter record from its summary metadata and verses.
  pub fn from_summary(summary: ChapterSummary, verses: Vec<Verse>) -> Self {
    let pages = Pages {
      start: summary.start_page(),
      end: summary.end_page(),
    };

    Self {
      id: summary.id,
      number: summary.number,
      bismillah_pre: summary.bismillah_pre,
      revelation_order: summary.revelation_order,
      revelation_place: summary.revelation_place,
      name_transliteration: summary.name_transliteration,
      name_arabic: summary.name_arabic,
      name_simple: summary.name_simple,
      pages,
      translated_name: summary.translated_name,
      verses,
    }
  }
}

/// Page span of a chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pages {
  pub start: u32,
  pub end: u32,
}

/// A single verse with its renderings, structure, and word breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verse {
  pub id: u32,
  pub verse_number: u32,
  pub chapter_id: u32,
  pub verse_key: String,
  pub text_madani: String,
  pub text_indopak: String,
  pub text_simple: String,
  pub juz_number: u32,
  pub hizb_number: u32,
  pub rub_number: u32,
  /// Prostration kind, when the verse carries a sajdah marker.
  pub sajdah: Option<String>,
  pub sajdah_number: Option<u32>,
  pub page_number: u32,
  pub audio: VerseAudio,
  #[serde(default)]
  pub translations: Vec<Translation>,
  #[serde(default)]
  pub media_contents: Vec<MediaContent>,
  #[serde(default)]
  pub words: Vec<Word>,
}

/// Recitation audio for one verse, with timed segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerseAudio {
  pub url: String,
  pub duration: u32,
  #[serde(default)]
  pub segments: Vec<Vec<String>>,
  pub format: String,
}

/// A verse or word translation from one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
  pub id: u32,
  pub language_name: String,
  pub text: String,
  pub resource_name: String,
  pub resource_id: u32,
}

/// External media attached to a verse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaContent {
  pub url: String,
  pub embed_text: String,
  pub provider: String,
  pub author_name: String,
}

/// One word of a verse with its typography metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
  pub id: u32,
  pub position: u32,
  pub text_madani: String,
  pub text_indopak: String,
  pub text_simple: String,
  pub verse_key: String,
  pub class_name: String,
  pub line_number: u32,
  pub page_number: u32,
  pub code: String,
  pub code_v3: String,
  pub char_type: String,
  pub audio: WordAudio,
  pub translation: Translation,
}

/// Pronunciation audio for one word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordAudio {
  pub url: String,
}
