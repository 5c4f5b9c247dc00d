use crate::diff::UnifiedDiff;
use crate::error::{Error, Result};
use crate::log::CommitLog;
use crate::models::{Commit, CommitId};
use crate::repository::Repository;
use crate::store::ContentStore;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Decides, file by file, whether checkout may overwrite the working copy.
pub trait Confirm {
    fn confirm(&mut self, relative_path: &Path, commit: &CommitId) -> Result<bool>;
}

/// Approves every replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

/// Rejects every replacement, turning checkout into a dry run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDeny;

impl Confirm for AutoApprove {
    fn confirm(&mut self, _relative_path: &Path, _commit: &CommitId) -> Result<bool> {
        Ok(true)
    }
}

impl Confirm for AutoDeny {
    fn confirm(&mut self, _relative_path: &Path, _commit: &CommitId) -> Result<bool> {
        Ok(false)
    }
}

impl<F> Confirm for F
where
    F: FnMut(&Path, &CommitId) -> bool,
{
    fn confirm(&mut self, relative_path: &Path, commit: &CommitId) -> Result<bool> {
        Ok(self(relative_path, commit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Replaced,
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl CheckoutReport {
    pub fn replaced(&self) -> usize {
        self.files
            .iter()
            .filter(|(_, outcome)| *outcome == FileOutcome::Replaced)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct CommitSummary {
    pub commit: Commit,
    /// Non-text files left out of the snapshot.
    pub skipped: Vec<PathBuf>,
}

/// Creates commits and reads them back for checkout and diff.
pub struct CommitManager {
    repo: Repository,
    store: ContentStore,
    log: CommitLog,
}

impl CommitManager {
    pub fn new(repo: Repository) -> Result<Self> {
        let store = ContentStore::new(repo.ignore_rules()?);
        Ok(Self::with_store(repo, store))
    }

    /// Uses a caller-built store, e.g. one with extra excluded paths.
    pub fn with_store(repo: Repository, store: ContentStore) -> Self {
        let log = CommitLog::new(&repo);
        Self { repo, store, log }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    pub fn commits(&self) -> Result<Vec<Commit>> {
        self.log.all_commits()
    }

    pub fn find(&self, id: &CommitId) -> Result<Commit> {
        self.log.find(id)
    }

    /// Snapshots `source` and records it in the log under the next id.
    ///
    /// The id follows the number of logged commits. If a snapshot directory
    /// already holds that id, the log and the commit tree disagree and the
    /// commit is refused; existing snapshots are never touched.
    pub fn commit(&self, source: &Path, message: &str) -> Result<CommitSummary> {
        let _lock = self.repo.lock()?;

        let id = CommitId::after_count(self.log.all_commits()?.len());
        let commit_dir = self.repo.commit_dir(&id);
        debug!("Allocated commit id {}", id);

        if commit_dir.exists() {
            warn!("Snapshot directory {:?} has no log entry", commit_dir);
            return Err(Error::OrphanedSnapshot {
                id: id.to_string(),
                path: commit_dir,
            });
        }

        let report = self.store.snapshot(source, &commit_dir)?;
        let commit = self.log.append(id, message, report.copied)?;

        info!("Created commit {} with {} file(s)", commit.id, commit.files.len());
        Ok(CommitSummary {
            commit,
            skipped: report.skipped,
        })
    }

    /// Restores files of commit `id` into the working directory, asking
    /// `confirm` before each overwrite.
    pub fn checkout<C>(&self, id: &CommitId, confirm: &mut C) -> Result<CheckoutReport>
    where
        C: Confirm + ?Sized,
    {
        let snapshot_dir = self.repo.commit_dir(id);
        if !snapshot_dir.is_dir() {
            return Err(Error::CommitNotFound(id.to_string()));
        }

        let mut report = CheckoutReport::default();
        for relative in ContentStore::files_in(&snapshot_dir)? {
            let outcome = if confirm.confirm(&relative, id)? {
                let destination = self.repo.root().join(&relative);
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(snapshot_dir.join(&relative), &destination)?;
                debug!("Restored {:?} from commit {}", relative, id);
                FileOutcome::Replaced
            } else {
                FileOutcome::Unchanged
            };
            report.files.push((relative, outcome));
        }

        info!(
            "Checked out commit {}: {}/{} file(s) replaced",
            id,
            report.replaced(),
            report.files.len()
        );
        Ok(report)
    }

    /// Diffs the committed version of `file` (from) against the working copy (to).
    pub fn diff(&self, file: &Path, id: &CommitId, context_lines: usize) -> Result<UnifiedDiff> {
        let snapshot_dir = self.repo.commit_dir(id);
        if !snapshot_dir.is_dir() {
            return Err(Error::CommitNotFound(id.to_string()));
        }

        let relative = self
            .relative_to_root(file)
            .ok_or_else(|| Error::FileNotInCommit {
                file: file.to_path_buf(),
                commit: id.to_string(),
            })?;

        let committed_path = snapshot_dir.join(&relative);
        if !committed_path.is_file() {
            return Err(Error::FileNotInCommit {
                file: relative,
                commit: id.to_string(),
            });
        }

        let working_path = self.repo.root().join(&relative);
        if !working_path.is_file() {
            return Err(Error::FileNotInWorkingDirectory(relative));
        }

        let committed = fs::read_to_string(&committed_path)?;
        let working = fs::read_to_string(&working_path)?;

        Ok(UnifiedDiff::compute(
            "committed",
            "working",
            &committed,
            &working,
            context_lines,
        ))
    }

    /// Resolves `file` to a path inside the repository, or `None` when it
    /// points outside of it.
    fn relative_to_root(&self, file: &Path) -> Option<PathBuf> {
        let file = if file.is_absolute() {
            file.strip_prefix(self.repo.root()).ok()?
        } else {
            file
        };

        let mut relative = PathBuf::new();
        for component in file.components() {
            match component {
                Component::Normal(name) => relative.push(name),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        (!relative.as_os_str().is_empty()).then_some(relative)
    }
}
