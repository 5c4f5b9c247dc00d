use crate::config::{IgnoreRules, RepoConfig};
use crate::error::{Error, Result};
use crate::log::CommitLog;
use crate::models::{CommitId, CommitLogDocument};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const STORAGE_DIR: &str = ".vcs";
const COMMITS_DIR: &str = "commits";
const LOG_FILE: &str = "log.json";
const CONFIG_FILE: &str = "config.toml";
const LOCK_FILE: &str = "lock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyInitialized,
}

/// A repository rooted at a working directory, with its storage under `.vcs/`.
///
/// ```text
/// <root>/.vcs/
///   config.toml       # ignore patterns
///   log.json          # { "commits": [ ... ] }
///   lock              # advisory lock held while committing
///   commits/
///     0001/<relative paths>
///     0002/...
/// ```
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    config: RepoConfig,
}

impl Repository {
    /// Creates the storage layout under `root`. Safe to call repeatedly; an
    /// existing log is never touched.
    pub fn init<P: AsRef<Path>>(root: P) -> Result<InitOutcome> {
        let root = fs::canonicalize(root.as_ref()).map_err(|e| Error::SourceUnavailable {
            path: root.as_ref().to_path_buf(),
            source: e,
        })?;
        let repo = Self {
            root,
            config: RepoConfig::default(),
        };

        let commits_dir = repo.commits_dir();
        fs::create_dir_all(&commits_dir).map_err(|e| Error::StorageWrite {
            path: commits_dir.clone(),
            source: e,
        })?;

        let config_path = repo.config_path();
        if !config_path.exists() {
            repo.config.save(&config_path)?;
            debug!("Wrote default config to {:?}", config_path);
        }

        let log = CommitLog::new(&repo);
        if log.exists() {
            debug!("Log already present at {:?}", log.path());
            return Ok(InitOutcome::AlreadyInitialized);
        }

        log.write(&CommitLogDocument::default())?;
        info!("Initialized empty repository in {:?}", repo.storage_dir());
        Ok(InitOutcome::Created)
    }

    /// Opens an initialized repository rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let storage = root.as_ref().join(STORAGE_DIR);
        if !storage.join(COMMITS_DIR).is_dir() {
            return Err(Error::NotInitialized(storage));
        }

        let root = fs::canonicalize(root.as_ref())?;
        let config = RepoConfig::load(&root.join(STORAGE_DIR).join(CONFIG_FILE))?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.root.join(STORAGE_DIR)
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.storage_dir().join(COMMITS_DIR)
    }

    pub fn commit_dir(&self, id: &CommitId) -> PathBuf {
        self.commits_dir().join(id.to_string())
    }

    pub fn log_path(&self) -> PathBuf {
        self.storage_dir().join(LOG_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.storage_dir().join(CONFIG_FILE)
    }

    /// Ignore rules from the config, with the storage directory always excluded.
    pub fn ignore_rules(&self) -> Result<IgnoreRules> {
        Ok(self.config.ignore_rules()?.with_excluded_path(self.storage_dir()))
    }

    /// Takes the repository-wide exclusive lock, blocking until it is free.
    pub fn lock(&self) -> Result<RepositoryLock> {
        let path = self.storage_dir().join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::Lock(format!("{}: {}", path.display(), e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::Lock(format!("{}: {}", path.display(), e)))?;
        debug!("Acquired repository lock {:?}", path);

        Ok(RepositoryLock { file })
    }
}

/// Guard for [`Repository::lock`]; the lock is released on drop.
#[derive(Debug)]
pub struct RepositoryLock {
    file: File,
}

impl Drop for RepositoryLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
