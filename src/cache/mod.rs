//! Persistent cache for fetched records.
//!
//! A durable blob store over SQLite plus the codec that turns domain records
//! into the stored bytes. All keys live in a single namespace: one well-known
//! key for the chapter summary collection and one key per chapter id.

pub mod codec;
mod store;

pub use store::{SqliteStore, BUCKET_CHAPTERS, KEY_CHAPTERS_SUMMARY};
