use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source directory unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write to storage at {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {path} for commit {id} has no log entry")]
    OrphanedSnapshot { id: String, path: PathBuf },

    #[error("Commit {0} does not exist")]
    CommitNotFound(String),

    #[error("File {file} does not exist in commit {commit}")]
    FileNotInCommit { file: PathBuf, commit: String },

    #[error("File {0} does not exist in the working directory")]
    FileNotInWorkingDirectory(PathBuf),

    #[error("Commit log at {path} is corrupt: {source}")]
    CorruptLog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not a vcs repository (no {0}). Run 'vcs init' first.")]
    NotInitialized(PathBuf),

    #[error("Invalid commit id: {0}")]
    InvalidCommitId(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to lock repository: {0}")]
    Lock(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
