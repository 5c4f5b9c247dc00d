pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod show;

use anyhow::{Context, Result};
use std::path::Path;
use vcs_core::{CommitId, CommitManager, ContentStore, Repository};

pub fn open_manager(repo: &Path) -> Result<CommitManager> {
    let repository = Repository::open(repo)?;

    let mut rules = repository.ignore_rules()?;
    // Never snapshot our own binary when it lives inside the working tree.
    if let Ok(exe) = std::env::current_exe().and_then(std::fs::canonicalize) {
        rules.exclude_path(exe);
    }

    Ok(CommitManager::with_store(repository, ContentStore::new(rules)))
}

pub fn parse_commit_id(raw: &str) -> Result<CommitId> {
    raw.parse::<CommitId>()
        .with_context(|| format!("'{}' is not a commit id", raw))
}
