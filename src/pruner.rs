//! Removal of empty directories left behind after sorting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Removes every empty directory below `root`, deepest first.
///
/// Because children are visited before their parent, a directory that only
/// contained empty directories is removed in the same pass. `root` itself
/// and all files are left alone, and symbolic links are not followed.
///
/// Returns the removed directories in removal order.
///
/// # Examples
///
/// ```no_run
/// use sortdir::pruner::remove_empty_dirs;
/// use std::path::Path;
///
/// let removed = remove_empty_dirs(Path::new("Downloads"))?;
/// println!("removed {} empty folders", removed.len());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn remove_empty_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        if fs::read_dir(path)?.next().is_none() {
            fs::remove_dir(path)?;
            tracing::debug!(dir = %path.display(), "removed empty directory");
            removed.push(path.to_path_buf());
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_nested_empty_dirs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("d")).unwrap();

        let removed = remove_empty_dirs(root).expect("Failed to prune");

        assert_eq!(removed.len(), 4);
        assert!(!root.join("a").exists());
        assert!(!root.join("d").exists());
        assert!(root.exists());
    }

    #[test]
    fn test_children_removed_before_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();

        let removed = remove_empty_dirs(root).unwrap();

        assert_eq!(removed, vec![root.join("a/b"), root.join("a")]);
    }

    #[test]
    fn test_keeps_dirs_with_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("keep/empty")).unwrap();
        fs::write(root.join("keep/file.txt"), "x").unwrap();

        let removed = remove_empty_dirs(root).unwrap();

        assert_eq!(removed, vec![root.join("keep/empty")]);
        assert!(root.join("keep/file.txt").exists());
    }

    #[test]
    fn test_empty_root_is_kept() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let removed = remove_empty_dirs(temp_dir.path()).unwrap();

        assert!(removed.is_empty());
        assert!(temp_dir.path().exists());
    }
}
