/// Zip archive validation and extraction.
///
/// Only zip containers are unpacked. Anything else that arrives here is
/// reported as [`ArchiveError::InvalidArchive`] and left for the caller to
/// decide on.
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Errors that can occur while extracting an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The archive file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// The file is not a readable zip container.
    InvalidArchive { path: PathBuf, reason: String },
    /// The archive is a zip container but an entry could not be written out.
    Extract {
        path: PathBuf,
        entry: String,
        reason: String,
    },
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "Failed to open archive {}: {}", path.display(), source)
            }
            Self::InvalidArchive { path, reason } => {
                write!(f, "{} is not a valid zip file: {}", path.display(), reason)
            }
            Self::Extract {
                path,
                entry,
                reason,
            } => {
                write!(
                    f,
                    "Failed to extract '{}' from {}: {}",
                    entry,
                    path.display(),
                    reason
                )
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Opens `archive_path` and checks that it is a zip container.
pub fn open_zip(archive_path: &Path) -> Result<ZipArchive<File>, ArchiveError> {
    let file = File::open(archive_path).map_err(|e| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    ZipArchive::new(file).map_err(|e| ArchiveError::InvalidArchive {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Extracts every entry of a zip archive into `dest_dir`.
///
/// `dest_dir` is created only once the archive has been recognized as a zip
/// container. Entries whose names would escape `dest_dir` are skipped.
/// Returns the number of files written.
///
/// # Examples
///
/// ```no_run
/// use sortdir::archive::extract_zip;
/// use std::path::Path;
///
/// let written = extract_zip(Path::new("data.zip"), Path::new("archives/data"))?;
/// println!("{} files extracted", written);
/// # Ok::<(), sortdir::archive::ArchiveError>(())
/// ```
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize, ArchiveError> {
    let archive = open_zip(archive_path)?;
    extract_entries(archive, archive_path, dest_dir)
}

/// Writes the entries of an already opened zip into `dest_dir`.
///
/// `archive_path` only labels errors.
pub fn extract_entries(
    mut archive: ZipArchive<File>,
    archive_path: &Path,
    dest_dir: &Path,
) -> Result<usize, ArchiveError> {
    let extract_err = |entry: &str, reason: String| ArchiveError::Extract {
        path: archive_path.to_path_buf(),
        entry: entry.to_string(),
        reason,
    };

    fs::create_dir_all(dest_dir).map_err(|e| extract_err("", e.to_string()))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extract_err(&format!("#{}", i), e.to_string()))?;
        let name = entry.name().to_string();

        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                tracing::warn!(entry = %name, archive = %archive_path.display(), "skipping unsafe zip entry");
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| extract_err(&name, e.to_string()))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| extract_err(&name, e.to_string()))?;
        }
        let mut outfile = File::create(&outpath).map_err(|e| extract_err(&name, e.to_string()))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| extract_err(&name, e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).ok();
            }
        }

        written += 1;
    }

    Ok(written)
}

/// Describes what a file looks like from its leading bytes.
///
/// Used to make "not a valid zip file" diagnostics more useful, e.g. for a
/// `.gz` file this yields `application/gzip`.
pub fn sniff_content(path: &Path) -> Option<&'static str> {
    infer::get_from_path(path)
        .ok()
        .flatten()
        .map(|kind| kind.mime_type())
}
