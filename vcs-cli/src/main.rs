use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{checkout, commit, diff, init, log, show};

#[derive(Parser)]
#[command(name = "vcs")]
#[command(version, about = "A simple version control system", long_about = None)]
struct Cli {
    /// Repository root (defaults to current directory)
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    repo: PathBuf,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialise version control storage
    Init,

    /// Create a new commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show commit history
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show a single commit and its files
    Show {
        /// The commit ID to show
        commit_id: String,
    },

    /// Restore files from a commit
    Checkout {
        /// The commit ID to restore
        commit_id: String,

        /// Replace every file without asking
        #[arg(short, long, conflicts_with = "no")]
        yes: bool,

        /// Answer no to every prompt (preview only)
        #[arg(long)]
        no: bool,
    },

    /// Compare file with a commit
    Diff {
        /// The file to compare
        file: PathBuf,

        /// The commit ID to compare against
        commit_id: String,

        /// Lines of context around each change
        #[arg(short = 'U', long, default_value_t = vcs_core::diff::DEFAULT_CONTEXT)]
        context: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let repo = cli.repo;

    match cli.command {
        Commands::Init => init::run(repo)?,
        Commands::Commit { message } => commit::run(repo, message)?,
        Commands::Log { limit } => log::run(repo, limit)?,
        Commands::Show { commit_id } => show::run(repo, commit_id)?,
        Commands::Checkout { commit_id, yes, no } => checkout::run(repo, commit_id, yes, no)?,
        Commands::Diff {
            file,
            commit_id,
            context,
        } => diff::run(repo, file, commit_id, context)?,
    }

    Ok(())
}
