//! "Viewed" checkbox state backed by a content hash.
//!
//! The hash is djb2 over UTF-16 code units. It is an approximate equality
//! check: a collision keeps a changed file marked as viewed.

use crate::model::DiffFile;
use serde::{Deserialize, Serialize};

const DJB2_SEED: u32 = 5381;

/// Incremental djb2 hasher (`hash = hash * 33 + unit`).
#[derive(Debug, Clone, Copy)]
pub struct Djb2(u32);

impl Default for Djb2 {
    fn default() -> Self {
        Self(DJB2_SEED)
    }
}

impl Djb2 {
    pub fn write_str(&mut self, text: &str) {
        for unit in text.encode_utf16() {
            self.0 = self.0.wrapping_mul(33).wrapping_add(u32::from(unit));
        }
    }

    pub fn finish(&self) -> u32 {
        self.0
    }
}

/// djb2 of a single string.
pub fn djb2(text: &str) -> u32 {
    let mut hasher = Djb2::default();
    hasher.write_str(text);
    hasher.finish()
}

/// Hash identifying the reviewed content of a file.
///
/// Diff mode hashes the concatenated hunk line content; a file without
/// diff content (full-file mode) hashes its path.
pub fn content_hash(file: &DiffFile) -> u32 {
    if !file.has_content_changes() {
        return djb2(&file.new_path);
    }
    let mut hasher = Djb2::default();
    for line in file.hunks.iter().flat_map(|h| &h.lines) {
        hasher.write_str(&line.content);
    }
    hasher.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewedStatus {
    NotViewed,
    Viewed,
    /// Marked viewed, but the content changed since.
    Updated,
}

/// Compare a stored hash against the freshly computed one.
pub fn viewed_status(stored: Option<u32>, current: u32) -> ViewedStatus {
    match stored {
        None => ViewedStatus::NotViewed,
        Some(hash) if hash == current => ViewedStatus::Viewed,
        Some(_) => ViewedStatus::Updated,
    }
}
