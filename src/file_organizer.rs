/// Recursive sorting of a directory tree into category folders.
///
/// [`FileOrganizer`] walks a source directory, transliterates every file
/// name, moves known files into their category folder, unpacks zip archives
/// under `archives/`, and deletes stray folders that carry a reserved
/// category name. Results accumulate in a [`SortReport`].
use crate::archive::{self, ArchiveError};
use crate::config::{CompiledFilters, ConfigError, ConflictPolicy, SortConfig};
use crate::file_category::{Category, FileMapper, extension_of};
use crate::pruner;
use crate::report::{SkippedArchive, SortReport};
use crate::transliterate::{Transliterator, split_name};
use indicatif::ProgressBar;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while sorting a directory tree.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source directory is missing or not a directory.
    InvalidBasePath { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to list a directory or inspect one of its entries.
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The destination is taken and the conflict policy is `error`.
    DestinationExists { source: PathBuf, destination: PathBuf },
    /// Failed to delete an archive or a reserved-name folder.
    RemoveFailed { path: PathBuf, source: io::Error },
    /// A zip archive could not be extracted.
    ArchiveFailed(ArchiveError),
    /// Failed while removing empty directories.
    PruneFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid source directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::DestinationExists {
                source,
                destination,
            } => {
                write!(
                    f,
                    "Cannot move {}: {} already exists",
                    source.display(),
                    destination.display()
                )
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "Failed to remove {}: {}", path.display(), source)
            }
            Self::ArchiveFailed(e) => write!(f, "{}", e),
            Self::PruneFailed { path, source } => {
                write!(
                    f,
                    "Failed to remove empty folders under {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::ReadDirFailed { source, .. }
            | Self::RemoveFailed { source, .. }
            | Self::PruneFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::ArchiveFailed(e) => Some(e),
            Self::DestinationExists { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Everything that shapes a sorting run.
#[derive(Debug)]
pub struct SortOptions {
    /// Root under which the six category folders live.
    pub destination: PathBuf,
    pub on_conflict: ConflictPolicy,
    pub transliterator: Transliterator,
    pub mapper: FileMapper,
    pub filters: CompiledFilters,
}

impl SortOptions {
    /// Default options writing category folders under `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            on_conflict: ConflictPolicy::default(),
            transliterator: Transliterator::default(),
            mapper: FileMapper::default(),
            filters: CompiledFilters::default(),
        }
    }

    /// Builds options from a loaded configuration.
    ///
    /// Without a configured destination the current directory is used.
    pub fn from_config(config: &SortConfig) -> Result<Self, ConfigError> {
        let destination = config
            .sorting
            .destination
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            destination,
            on_conflict: config.sorting.on_conflict,
            transliterator: Transliterator::new().with_trailing_dot(config.sorting.trailing_dot),
            mapper: config.categories.build_mapper(),
            filters: config.filters.compile()?,
        })
    }

    /// Path of a category folder.
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.destination.join(category.dir_name())
    }
}

/// Sorts `source` according to `options` and returns what was done.
///
/// Creates the category folders, sorts the tree, then removes the empty
/// folders left behind under `source`.
///
/// # Examples
///
/// ```no_run
/// use sortdir::file_organizer::{SortOptions, sort_folder};
/// use std::path::Path;
///
/// let report = sort_folder(Path::new("Downloads"), &SortOptions::new("."))?;
/// println!("{} images sorted", report.images.len());
/// # Ok::<(), sortdir::file_organizer::OrganizeError>(())
/// ```
pub fn sort_folder(source: &Path, options: &SortOptions) -> OrganizeResult<SortReport> {
    FileOrganizer::new(source, options)?.run()
}

/// Walks a source tree and distributes its files.
pub struct FileOrganizer<'a> {
    source_root: PathBuf,
    options: &'a SortOptions,
    /// Canonical paths of the category folders, so they are never treated as source content.
    destination_dirs: Vec<PathBuf>,
    progress: Option<ProgressBar>,
}

impl<'a> FileOrganizer<'a> {
    /// Validates `source_root` and creates the category folders.
    pub fn new(source_root: &Path, options: &'a SortOptions) -> OrganizeResult<Self> {
        let metadata = fs::metadata(source_root).map_err(|e| OrganizeError::InvalidBasePath {
            path: source_root.to_path_buf(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: source_root.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }

        let mut destination_dirs = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let path = options.category_dir(category);
            fs::create_dir_all(&path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: path.clone(),
                source: e,
            })?;
            let canonical =
                fs::canonicalize(&path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                    path: path.clone(),
                    source: e,
                })?;
            destination_dirs.push(canonical);
        }

        Ok(Self {
            source_root: source_root.to_path_buf(),
            options,
            destination_dirs,
            progress: None,
        })
    }

    /// Ticks `progress` once per file handled.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sorts the whole tree, prunes empty folders and returns the report.
    pub fn run(self) -> OrganizeResult<SortReport> {
        let mut report = SortReport::new();
        report.mark_started();

        self.process(&self.source_root, &mut report)?;

        report.pruned_dirs = pruner::remove_empty_dirs(&self.source_root).map_err(|e| {
            OrganizeError::PruneFailed {
                path: self.source_root.clone(),
                source: e,
            }
        })?;

        report.mark_finished();
        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
        Ok(report)
    }

    /// Handles every entry of `dir`, recursing into ordinary subfolders.
    ///
    /// The listing is collected up front because archives and reserved-name
    /// folders are deleted from `dir` while it is being handled.
    pub fn process(&self, dir: &Path, report: &mut SortReport) -> OrganizeResult<()> {
        let read_err = |e: io::Error| OrganizeError::ReadDirFailed {
            path: dir.to_path_buf(),
            source: e,
        };
        let entries = fs::read_dir(dir)
            .map_err(read_err)?
            .collect::<io::Result<Vec<_>>>()
            .map_err(read_err)?;

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .map_err(|e| OrganizeError::ReadDirFailed {
                    path: path.clone(),
                    source: e,
                })?;

            if file_type.is_file() {
                self.handle_file(&path, &name, report)?;
            } else if file_type.is_dir() {
                self.handle_dir(&path, &name, report)?;
            } else {
                tracing::debug!(path = %path.display(), "ignoring special file");
            }
        }

        Ok(())
    }

    fn handle_file(&self, path: &Path, name: &str, report: &mut SortReport) -> OrganizeResult<()> {
        let rel_path = path.strip_prefix(&self.source_root).unwrap_or(path);
        if !self.options.filters.should_include(rel_path) {
            tracing::debug!(path = %rel_path.display(), "excluded by filters");
            report.excluded.push(rel_path.to_path_buf());
            return Ok(());
        }

        if let Some(progress) = &self.progress {
            progress.set_message(name.to_string());
            progress.inc(1);
        }

        let normalized = self.options.transliterator.normalize(name);
        let extension = extension_of(name);
        let category = self.options.mapper.categorize(&extension);
        report.record(category, name, &extension);

        match category {
            Category::Archive => self.unpack_archive(path, name, &normalized, report),
            _ => self
                .move_to_category(path, category, &normalized)
                .map(|_| ()),
        }
    }

    fn handle_dir(&self, path: &Path, name: &str, report: &mut SortReport) -> OrganizeResult<()> {
        if !Category::is_reserved_dir_name(name) {
            self.process(path, report)?;
            report.folders.push(name.to_string());
            return Ok(());
        }

        if self.is_destination(path) {
            tracing::debug!(path = %path.display(), "skipping destination folder");
            return Ok(());
        }

        fs::remove_dir_all(path).map_err(|e| OrganizeError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::warn!(path = %path.display(), "deleted folder with reserved name");
        report.removed_reserved_dirs.push(path.to_path_buf());
        Ok(())
    }

    fn is_destination(&self, path: &Path) -> bool {
        fs::canonicalize(path)
            .map(|canonical| self.destination_dirs.contains(&canonical))
            .unwrap_or(false)
    }

    /// Moves a file into its category folder under its normalized name.
    ///
    /// Returns the path the file ended up at, which differs from the
    /// normalized name when the conflict policy had to pick a free one.
    pub fn move_to_category(
        &self,
        path: &Path,
        category: Category,
        normalized: &str,
    ) -> OrganizeResult<PathBuf> {
        let category_path = self.options.category_dir(category);
        let destination = self.resolve_conflict(path, &category_path, normalized)?;

        move_file(path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
            source: path.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;
        tracing::debug!(
            from = %path.display(),
            to = %destination.display(),
            "moved file"
        );

        Ok(destination)
    }

    /// Applies the conflict policy to `dir/<normalized>`.
    ///
    /// Returns the path to write to: the plain one when it is free, a
    /// numbered sibling under `rename`, or the taken one under `overwrite`.
    fn resolve_conflict(
        &self,
        path: &Path,
        dir: &Path,
        normalized: &str,
    ) -> OrganizeResult<PathBuf> {
        let destination = dir.join(normalized);
        if destination.symlink_metadata().is_err() {
            return Ok(destination);
        }

        match self.options.on_conflict {
            ConflictPolicy::Error => Err(OrganizeError::DestinationExists {
                source: path.to_path_buf(),
                destination,
            }),
            ConflictPolicy::Rename => Ok(free_path(dir, normalized)),
            ConflictPolicy::Overwrite => Ok(destination),
        }
    }

    /// Extracts a zip archive to `archives/<stem>` and deletes the original.
    ///
    /// An existing `archives/<stem>` is handled by the conflict policy, so a
    /// second `data.zip` lands in `archives/data_1`. Files that are not zip
    /// containers are deleted without extraction and noted in the report.
    /// The archive is kept when extraction fails.
    fn unpack_archive(
        &self,
        path: &Path,
        name: &str,
        normalized: &str,
        report: &mut SortReport,
    ) -> OrganizeResult<()> {
        let stem = normalized
            .rsplit_once('.')
            .map_or(normalized, |(stem, _)| stem);

        match archive::open_zip(path) {
            Ok(zip) => {
                let archives_dir = self.options.category_dir(Category::Archive);
                let target = self.resolve_conflict(path, &archives_dir, stem)?;
                let written = archive::extract_entries(zip, path, &target)
                    .map_err(OrganizeError::ArchiveFailed)?;
                tracing::debug!(
                    archive = %path.display(),
                    to = %target.display(),
                    files = written,
                    "extracted archive"
                );
            }
            Err(ArchiveError::InvalidArchive { .. }) => {
                let reason = match archive::sniff_content(path) {
                    Some(mime) => format!("Not a valid zip file (content is {})", mime),
                    None => "Not a valid zip file".to_string(),
                };
                tracing::warn!("Skipping {}: {}", name, reason);
                report.skipped_archives.push(SkippedArchive {
                    name: name.to_string(),
                    reason,
                });
            }
            Err(e) => return Err(OrganizeError::ArchiveFailed(e)),
        }

        fs::remove_file(path).map_err(|e| OrganizeError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Picks the first `<base>_<n>.<chain>` that does not exist yet.
fn free_path(dir: &Path, normalized: &str) -> PathBuf {
    let (base, chain) = split_name(normalized);
    (1u64..)
        .map(|n| match chain {
            Some(chain) => dir.join(format!("{}_{}.{}", base, n, chain)),
            None => dir.join(format!("{}_{}", base, n)),
        })
        .find(|candidate| candidate.symlink_metadata().is_err())
        .unwrap_or_else(|| dir.join(normalized))
}

/// Renames a file, copying across filesystems when a plain rename cannot.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}
