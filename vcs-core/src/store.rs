use crate::config::IgnoreRules;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Files handled by one [`ContentStore::snapshot`] call, both lists sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub copied: Vec<PathBuf>,
    /// Files left out because their content is not valid UTF-8 text.
    pub skipped: Vec<PathBuf>,
}

/// Copies text files of a working directory into a snapshot directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    rules: IgnoreRules,
}

impl ContentStore {
    pub fn new(rules: IgnoreRules) -> Self {
        Self { rules }
    }

    pub fn snapshot(&self, source: &Path, destination: &Path) -> Result<SnapshotReport> {
        let source = fs::canonicalize(source).map_err(|e| Error::SourceUnavailable {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !source.is_dir() {
            return Err(Error::SourceUnavailable {
                path: source,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        fs::create_dir_all(destination).map_err(|e| Error::StorageWrite {
            path: destination.to_path_buf(),
            source: e,
        })?;
        let destination = fs::canonicalize(destination).map_err(|e| Error::StorageWrite {
            path: destination.to_path_buf(),
            source: e,
        })?;

        let mut report = SnapshotReport::default();

        let walker = WalkDir::new(&source)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let path = entry.path();
                if path.starts_with(&destination) {
                    return false;
                }
                match path.strip_prefix(&source) {
                    Ok(relative) => !self.rules.is_ignored(relative, path),
                    Err(_) => false,
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(Error::SourceUnavailable {
                        path: source.clone(),
                        source: err.into(),
                    });
                }
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&source) else {
                continue;
            };
            if relative.to_str().is_none() {
                warn!("Skipping file with non UTF-8 name: {:?}", relative);
                continue;
            }

            let bytes = fs::read(entry.path()).map_err(|e| Error::SourceUnavailable {
                path: entry.path().to_path_buf(),
                source: e,
            })?;

            if std::str::from_utf8(&bytes).is_err() {
                warn!("Skipping binary or non-text file: {:?}", relative);
                report.skipped.push(relative.to_path_buf());
                continue;
            }

            let target = destination.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::StorageWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            fs::write(&target, &bytes).map_err(|e| Error::StorageWrite {
                path: target.clone(),
                source: e,
            })?;

            debug!("Copied {:?}", relative);
            report.copied.push(relative.to_path_buf());
        }

        report.copied.sort();
        report.skipped.sort();
        Ok(report)
    }

    /// Lists every regular file under `root` as sorted relative paths.
    pub fn files_in(root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoConfig;
    use tempfile::TempDir;

    fn default_store() -> ContentStore {
        ContentStore::new(RepoConfig::default().ignore_rules().unwrap())
    }

    #[test]
    fn test_snapshot_copies_text_files() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("src/nested")).unwrap();
        fs::write(source.path().join("README.md"), "# readme\n").unwrap();
        fs::write(source.path().join("src/nested/lib.py"), "x = 1\r\ny = 2").unwrap();

        let report = default_store().snapshot(source.path(), dest.path()).unwrap();

        assert_eq!(
            report.copied,
            vec![PathBuf::from("README.md"), PathBuf::from("src/nested/lib.py")]
        );
        assert!(report.skipped.is_empty());
        assert_eq!(
            fs::read(dest.path().join("src/nested/lib.py")).unwrap(),
            b"x = 1\r\ny = 2"
        );
    }

    #[test]
    fn test_snapshot_skips_binary_files() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("notes.txt"), "hello").unwrap();
        fs::write(source.path().join("image.png"), [0x89, 0x50, 0xff, 0xfe, 0x00]).unwrap();

        let report = default_store().snapshot(source.path(), dest.path()).unwrap();

        assert_eq!(report.copied, vec![PathBuf::from("notes.txt")]);
        assert_eq!(report.skipped, vec![PathBuf::from("image.png")]);
        assert!(!dest.path().join("image.png").exists());
    }

    #[test]
    fn test_snapshot_honours_ignore_rules() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join(".vcs/commits/0001")).unwrap();
        fs::create_dir_all(source.path().join(".venv/lib")).unwrap();
        fs::write(source.path().join(".vcs/log.json"), "{}").unwrap();
        fs::write(source.path().join(".vcs/commits/0001/a.txt"), "old").unwrap();
        fs::write(source.path().join(".venv/lib/site.py"), "pass").unwrap();
        fs::write(source.path().join("a.txt"), "new").unwrap();

        let report = default_store().snapshot(source.path(), dest.path()).unwrap();

        assert_eq!(report.copied, vec![PathBuf::from("a.txt")]);
    }

    #[test]
    fn test_snapshot_skips_destination_inside_source() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();
        let dest = source.path().join("snapshots/one");

        let store = ContentStore::new(IgnoreRules::default());
        let first = store.snapshot(source.path(), &dest).unwrap();
        let second = store.snapshot(source.path(), &dest).unwrap();

        assert_eq!(first.copied, vec![PathBuf::from("a.txt")]);
        assert_eq!(second.copied, vec![PathBuf::from("a.txt")]);
    }

    #[test]
    fn test_snapshot_missing_source() {
        let dest = TempDir::new().unwrap();
        let missing = dest.path().join("does-not-exist");

        let err = default_store().snapshot(&missing, &dest.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_snapshot_unwritable_destination() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("a.txt"), "a").unwrap();
        let blocker = source.path().join("blocker");
        fs::write(&blocker, "file in the way").unwrap();

        let store = ContentStore::new(IgnoreRules::default());
        let err = store.snapshot(source.path(), &blocker.join("dest")).unwrap_err();
        assert!(matches!(err, Error::StorageWrite { .. }));
    }

    #[test]
    fn test_files_in_lists_sorted_relative_paths() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("b")).unwrap();
        fs::write(root.path().join("b/z.txt"), "").unwrap();
        fs::write(root.path().join("a.txt"), "").unwrap();

        let files = ContentStore::files_in(root.path()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b/z.txt")]);
    }
}
