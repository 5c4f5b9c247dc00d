use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use vcs_core::CommitLog;

pub fn run(repo: PathBuf, limit: Option<usize>) -> Result<()> {
    let commits = CommitLog::history(&repo)?;

    if commits.is_empty() {
        println!("{}", "No commits yet.".yellow());
        return Ok(());
    }

    let to_show = limit.unwrap_or(commits.len()).min(commits.len());

    for commit in commits.iter().take(to_show) {
        println!(
            "{} - {} - \"{}\"",
            commit.id.to_string().yellow(),
            commit.timestamp.format("%Y-%m-%d %H:%M:%S"),
            commit.message
        );
    }

    if commits.len() > to_show {
        println!(
            "{}",
            format!("... and {} more commits", commits.len() - to_show).dimmed()
        );
    }

    Ok(())
}
