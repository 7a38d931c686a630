//! Accumulated results of a sorting run.

use crate::file_category::Category;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// An archive whose contents were not extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArchive {
    /// Original file name of the archive.
    pub name: String,
    /// Why extraction was skipped.
    pub reason: String,
}

/// Everything a run observed, in the order it was observed.
///
/// File names are the original, untransliterated names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SortReport {
    pub images: Vec<String>,
    pub video: Vec<String>,
    pub documents: Vec<String>,
    pub audio: Vec<String>,
    pub archives: Vec<String>,
    pub others: Vec<String>,
    /// Source folders that were recursed into.
    pub folders: Vec<String>,
    pub known_extensions: BTreeSet<String>,
    pub unknown_extensions: BTreeSet<String>,
    pub skipped_archives: Vec<SkippedArchive>,
    /// Reserved-name folders found inside the source tree and deleted.
    pub removed_reserved_dirs: Vec<PathBuf>,
    /// Files left in place because a filter excluded them.
    pub excluded: Vec<PathBuf>,
    /// Empty directories removed after sorting.
    pub pruned_dirs: Vec<PathBuf>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
}

impl SortReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a classified file under its category.
    ///
    /// The extension goes to the unknown set for [`Category::Other`] and to
    /// the known set for everything else.
    pub fn record(&mut self, category: Category, name: &str, extension: &str) {
        if category == Category::Other {
            self.unknown_extensions.insert(extension.to_string());
        } else {
            self.known_extensions.insert(extension.to_string());
        }
        self.files_mut(category).push(name.to_string());
    }

    /// Names recorded for a category.
    pub fn files(&self, category: Category) -> &[String] {
        match category {
            Category::Image => &self.images,
            Category::Video => &self.video,
            Category::Document => &self.documents,
            Category::Audio => &self.audio,
            Category::Archive => &self.archives,
            Category::Other => &self.others,
        }
    }

    fn files_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Image => &mut self.images,
            Category::Video => &mut self.video,
            Category::Document => &mut self.documents,
            Category::Audio => &mut self.audio,
            Category::Archive => &mut self.archives,
            Category::Other => &mut self.others,
        }
    }

    /// Total number of files classified across all categories.
    pub fn total_files(&self) -> usize {
        Category::ALL.iter().map(|c| self.files(*c).len()).sum()
    }

    pub(crate) fn mark_started(&mut self) {
        self.started_at = Some(chrono::Utc::now().to_rfc3339());
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
