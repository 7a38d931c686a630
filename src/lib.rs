//! sortdir - sort a directory tree into category folders
//!
//! This library classifies files by extension, transliterates Cyrillic file
//! names into Latin script, moves files into `images/`, `video/`,
//! `documents/`, `audio/` and `others/`, unpacks zip archives under
//! `archives/`, and removes the empty folders left behind.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod pruner;
pub mod report;
pub mod transliterate;

pub use config::{ConfigError, ConflictPolicy, SortConfig};
pub use file_category::{Category, FileMapper};
pub use file_organizer::{FileOrganizer, OrganizeError, SortOptions, sort_folder};
pub use report::SortReport;
pub use transliterate::{Transliterator, normalize};

pub use cli::{Args, run_cli};
