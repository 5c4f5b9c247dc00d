use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(repo: PathBuf, message: String) -> Result<()> {
    let manager = super::open_manager(&repo)?;
    let source = manager.repository().root().to_path_buf();

    let summary = manager.commit(&source, &message)?;

    for path in &summary.skipped {
        println!(
            "{} {}",
            "Skipping binary or non-text file:".yellow(),
            path.display()
        );
    }

    println!(
        "{} ({} file(s))",
        format!("Commit {} created", summary.commit.id).green().bold(),
        summary.commit.files.len().to_string().cyan()
    );

    Ok(())
}
