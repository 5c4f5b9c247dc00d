use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(repo: PathBuf, commit_id: String) -> Result<()> {
    let manager = super::open_manager(&repo)?;
    let id = super::parse_commit_id(&commit_id)?;
    let commit = manager.find(&id)?;

    println!(
        "{} {}",
        "commit".yellow().bold(),
        commit.id.to_string().yellow()
    );
    println!(
        "{}: {}",
        "Date".bold(),
        commit.timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!("    {}", commit.message);
    println!();
    println!(
        "    {} file(s)",
        commit.files.len().to_string().cyan()
    );
    for path in &commit.files {
        println!("      • {}", path.display().to_string().dimmed());
    }

    Ok(())
}
