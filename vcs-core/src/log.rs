use crate::error::{Error, Result};
use crate::models::{Commit, CommitId, CommitLogDocument};
use crate::repository::Repository;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only commit history persisted as a single JSON document.
///
/// Every append rewrites the whole document; callers serialize writers
/// through [`Repository::lock`].
#[derive(Debug, Clone)]
pub struct CommitLog {
    path: PathBuf,
}

impl CommitLog {
    pub fn new(repo: &Repository) -> Self {
        Self::at(repo.log_path())
    }

    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the document. A missing or empty file is an empty log.
    pub fn load(&self) -> Result<CommitLogDocument> {
        if !self.path.exists() {
            return Ok(CommitLogDocument::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(CommitLogDocument::default());
        }

        serde_json::from_str(&raw).map_err(|e| Error::CorruptLog {
            path: self.path.clone(),
            source: e,
        })
    }

    pub fn write(&self, document: &CommitLogDocument) -> Result<()> {
        let raw = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, raw).map_err(|e| Error::StorageWrite {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| Error::StorageWrite {
            path: self.path.clone(),
            source: e,
        })?;

        debug!("Wrote {} commit(s) to {:?}", document.commits.len(), self.path);
        Ok(())
    }

    pub fn all_commits(&self) -> Result<Vec<Commit>> {
        Ok(self.load()?.commits)
    }

    /// History of the repository rooted at `root`; empty when the directory
    /// was never initialized.
    pub fn history<P: AsRef<Path>>(root: P) -> Result<Vec<Commit>> {
        match Repository::open(root) {
            Ok(repo) => CommitLog::new(&repo).all_commits(),
            Err(Error::NotInitialized(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub fn find(&self, id: &CommitId) -> Result<Commit> {
        self.load()?
            .commits
            .into_iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| Error::CommitNotFound(id.to_string()))
    }

    /// Appends a new record stamped with the current local time.
    pub fn append(&self, id: CommitId, message: &str, files: Vec<PathBuf>) -> Result<Commit> {
        let mut document = self.load()?;

        if let Some(last) = document.commits.last() {
            if last.id >= id {
                return Err(Error::InvalidCommitId(format!(
                    "{} does not follow the last logged commit {}",
                    id, last.id
                )));
            }
        }

        let commit = Commit::new(id, message.to_string(), files);
        document.commits.push(commit.clone());
        self.write(&document)?;

        Ok(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_log() -> (TempDir, CommitLog) {
        let temp_dir = TempDir::new().unwrap();
        let log = CommitLog::at(temp_dir.path().join("log.json"));
        (temp_dir, log)
    }

    #[test]
    fn test_missing_log_is_empty() {
        let (_dir, log) = temp_log();
        assert!(!log.exists());
        assert!(log.all_commits().unwrap().is_empty());
    }

    #[test]
    fn test_history_of_uninitialized_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        assert!(CommitLog::history(temp_dir.path()).unwrap().is_empty());
        assert!(!temp_dir.path().join(".vcs").exists());
    }

    #[test]
    fn test_history_of_initialized_repository() {
        let temp_dir = TempDir::new().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        let repo = Repository::open(temp_dir.path()).unwrap();
        CommitLog::new(&repo)
            .append(CommitId::FIRST, "one", vec![])
            .unwrap();

        let history = CommitLog::history(temp_dir.path()).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "one");
    }

    #[test]
    fn test_empty_file_is_empty_log() {
        let (_dir, log) = temp_log();
        fs::write(log.path(), "").unwrap();

        assert!(log.all_commits().unwrap().is_empty());

        log.append(CommitId::FIRST, "first", vec![]).unwrap();
        assert_eq!(log.all_commits().unwrap().len(), 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let (_dir, log) = temp_log();
        let first = CommitId::FIRST;

        log.append(first, "one", vec![PathBuf::from("a.txt")]).unwrap();
        log.append(first.next(), "two", vec![PathBuf::from("b.txt")]).unwrap();

        let commits = log.all_commits().unwrap();
        let ids: Vec<String> = commits.iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["0001", "0002"]);
        assert_eq!(commits[1].message, "two");
        assert_eq!(commits[1].files, vec![PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_append_rejects_non_increasing_ids() {
        let (_dir, log) = temp_log();
        log.append(CommitId::FIRST, "one", vec![]).unwrap();

        let err = log.append(CommitId::FIRST, "again", vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidCommitId(_)));
        assert_eq!(log.all_commits().unwrap().len(), 1);
    }

    #[test]
    fn test_find() {
        let (_dir, log) = temp_log();
        log.append(CommitId::FIRST, "one", vec![]).unwrap();

        assert_eq!(log.find(&CommitId::FIRST).unwrap().message, "one");
        assert!(matches!(
            log.find(&CommitId::FIRST.next()),
            Err(Error::CommitNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_log() {
        let (_dir, log) = temp_log();
        fs::write(log.path(), "{ not json").unwrap();

        assert!(matches!(log.all_commits(), Err(Error::CorruptLog { .. })));
    }

    #[test]
    fn test_document_layout() {
        let (_dir, log) = temp_log();
        log.append(CommitId::FIRST, "msg", vec![PathBuf::from("x.txt")])
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(log.path()).unwrap()).unwrap();
        let entry = &value["commits"][0];
        assert_eq!(entry["id"], "0001");
        assert_eq!(entry["message"], "msg");
        assert_eq!(entry["files"][0], "x.txt");
        assert!(entry["timestamp"].is_string());
    }
}
