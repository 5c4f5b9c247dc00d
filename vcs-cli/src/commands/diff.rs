use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use vcs_core::DiffLineType;

pub fn run(repo: PathBuf, file: PathBuf, commit_id: String, context: usize) -> Result<()> {
    let manager = super::open_manager(&repo)?;
    let id = super::parse_commit_id(&commit_id)?;

    let diff = manager.diff(&file, &id, context)?;

    if diff.is_empty() {
        println!("{}", "No differences.".green());
        return Ok(());
    }

    println!("{}", format!("--- {}", diff.from_label).bold());
    println!("{}", format!("+++ {}", diff.to_label).bold());

    for hunk in &diff.hunks {
        println!("{}", hunk.header().cyan());
        for line in &hunk.lines {
            let text = line.to_string();
            match line.line_type {
                DiffLineType::Addition => println!("{}", text.green()),
                DiffLineType::Deletion => println!("{}", text.red()),
                DiffLineType::Context => println!("{}", text),
            }
        }
    }

    Ok(())
}
