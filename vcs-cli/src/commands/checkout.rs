use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io;
use std::path::{Path, PathBuf};
use vcs_core::{AutoApprove, AutoDeny, CommitId, FileOutcome};

/// Asks on the terminal before each file is replaced.
struct PromptConfirm {
    theme: ColorfulTheme,
}

impl vcs_core::Confirm for PromptConfirm {
    fn confirm(&mut self, relative_path: &Path, commit: &CommitId) -> vcs_core::Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(format!(
                "Replace {} in working directory with version from commit {}?",
                relative_path.display(),
                commit
            ))
            .default(false)
            .interact()
            .map_err(|e| vcs_core::Error::Io(io::Error::other(e)))?;

        Ok(answer)
    }
}

pub fn run(repo: PathBuf, commit_id: String, yes: bool, no: bool) -> Result<()> {
    let manager = super::open_manager(&repo)?;
    let id = super::parse_commit_id(&commit_id)?;

    let report = if yes {
        manager.checkout(&id, &mut AutoApprove)?
    } else if no {
        manager.checkout(&id, &mut AutoDeny)?
    } else {
        let mut prompt = PromptConfirm {
            theme: ColorfulTheme::default(),
        };
        manager.checkout(&id, &mut prompt)?
    };

    for (path, outcome) in &report.files {
        match outcome {
            FileOutcome::Replaced => {
                println!("  {} {} replaced.", "✓".green(), path.display());
            }
            FileOutcome::Unchanged => {
                println!("  {} {} was not modified.", "-".dimmed(), path.display());
            }
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "Restored {}/{} file(s) from commit {}",
            report.replaced(),
            report.files.len(),
            id
        )
        .bold()
    );

    Ok(())
}
