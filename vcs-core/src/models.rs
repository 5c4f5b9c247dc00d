use crate::error::Error;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Number of digits commit ids are zero-padded to.
pub const ID_WIDTH: usize = 4;

/// Sequential commit identifier, rendered zero-padded (`0001`, `0002`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(u32);

impl CommitId {
    pub const FIRST: CommitId = CommitId(1);

    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Id that follows a log holding `count` commits.
    pub fn after_count(count: usize) -> Self {
        Self(count as u32 + 1)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = ID_WIDTH)
    }
}

impl FromStr for CommitId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCommitId(s.to_string()));
        }
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(CommitId::new)
            .ok_or_else(|| Error::InvalidCommitId(s.to_string()))
    }
}

impl TryFrom<String> for CommitId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub files: Vec<PathBuf>,
}

impl Commit {
    pub fn new(id: CommitId, message: String, files: Vec<PathBuf>) -> Self {
        Self {
            id,
            timestamp: chrono::Local::now().naive_local(),
            message,
            files,
        }
    }
}

/// On-disk shape of `log.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitLogDocument {
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_id_formatting() {
        assert_eq!(CommitId::FIRST.to_string(), "0001");
        assert_eq!(CommitId::after_count(41).to_string(), "0042");
        assert_eq!(CommitId::new(12345).unwrap().to_string(), "12345");
    }

    #[test]
    fn test_commit_id_parsing() {
        assert_eq!("0003".parse::<CommitId>().unwrap(), CommitId::new(3).unwrap());
        assert_eq!("3".parse::<CommitId>().unwrap(), CommitId::new(3).unwrap());
        assert!("0000".parse::<CommitId>().is_err());
        assert!("abc".parse::<CommitId>().is_err());
        assert!("-1".parse::<CommitId>().is_err());
        assert!("".parse::<CommitId>().is_err());
    }

    #[test]
    fn test_commit_serialization() {
        let commit = Commit::new(
            CommitId::FIRST,
            "Initial commit".to_string(),
            vec![PathBuf::from("src/main.py")],
        );

        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["id"], "0001");
        assert_eq!(json["message"], "Initial commit");
        assert_eq!(json["files"][0], "src/main.py");

        let back: Commit = serde_json::from_value(json).unwrap();
        assert_eq!(back, commit);
    }

    #[test]
    fn test_reads_python_style_timestamps() {
        let raw = r#"{"commits": [{"id": "0001", "timestamp": "2024-03-05T14:07:09.123456",
                      "message": "first", "files": ["a.txt"]}]}"#;
        let doc: CommitLogDocument = serde_json::from_str(raw).unwrap();

        assert_eq!(doc.commits.len(), 1);
        assert_eq!(
            doc.commits[0].timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-05 14:07:09"
        );
    }
}
