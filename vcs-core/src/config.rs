use crate::error::{Error, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Repository settings stored in `.vcs/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Glob patterns for paths that are never snapshotted.
    #[serde(default = "default_ignore_patterns")]
    pub ignore: Vec<String>,
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".vcs".to_string(),
        ".venv".to_string(),
        ".idea".to_string(),
        ".git".to_string(),
        "target".to_string(),
    ]
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore_patterns(),
        }
    }
}

impl RepoConfig {
    /// Loads the config at `path`, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn ignore_rules(&self) -> Result<IgnoreRules> {
        IgnoreRules::from_patterns(self.ignore.as_slice())
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore = patterns;
        self
    }
}

/// Compiled ignore list, evaluated once per walked path.
///
/// A path is ignored when a pattern matches the whole relative path or any
/// single component of it, or when its absolute location lies under one of
/// the explicitly excluded paths.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Pattern>,
    excluded: Vec<PathBuf>,
}

impl IgnoreRules {
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    Error::InvalidConfig(format!("bad ignore pattern {:?}: {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            excluded: Vec::new(),
        })
    }

    /// Excludes an absolute path (file or directory) from every walk.
    pub fn exclude_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.excluded.contains(&path) {
            self.excluded.push(path);
        }
    }

    pub fn with_excluded_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude_path(path);
        self
    }

    pub fn is_ignored(&self, relative: &Path, absolute: &Path) -> bool {
        if self.excluded.iter().any(|ex| absolute.starts_with(ex)) {
            return true;
        }

        if self.patterns.iter().any(|p| p.matches_path(relative)) {
            return true;
        }

        relative.components().any(|component| match component {
            Component::Normal(name) => match name.to_str() {
                Some(name) => self.patterns.iter().any(|p| p.matches(name)),
                None => false,
            },
            _ => false,
        })
    }
}
