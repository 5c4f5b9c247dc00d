use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use vcs_core::{InitOutcome, Repository};

pub fn run(repo: PathBuf) -> Result<()> {
    match Repository::init(&repo)? {
        InitOutcome::Created => {
            println!("{}", "Initialized empty VCS repository in .vcs/".green());
        }
        InitOutcome::AlreadyInitialized => {
            println!("{}", "VCS repository already initialized.".yellow());
        }
    }

    Ok(())
}
