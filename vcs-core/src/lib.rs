//! # vcs-core
//!
//! Core library for vcs - a minimal snapshot version control engine.
//!
//! Every commit is a full copy of the working directory's text files stored
//! under `.vcs/commits/<id>/`, and `.vcs/log.json` keeps the ordered list of
//! commit records. This crate provides the repository layout, the snapshot
//! store, the commit log, and the checkout and diff operations on top of them.

pub mod config;
pub mod diff;
pub mod error;
pub mod log;
pub mod manager;
pub mod models;
pub mod repository;
pub mod store;

pub use config::{IgnoreRules, RepoConfig};
pub use diff::{DiffLine, DiffLineType, Hunk, UnifiedDiff};
pub use error::{Error, Result};
pub use log::CommitLog;
pub use manager::{
    AutoApprove, AutoDeny, CheckoutReport, CommitManager, CommitSummary, Confirm, FileOutcome,
};
pub use models::{Commit, CommitId, CommitLogDocument};
pub use repository::{InitOutcome, Repository, RepositoryLock};
pub use store::{ContentStore, SnapshotReport};
