use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use docgit_core::Settings;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    commit, diff, doctor, files, init, log, projects, reset, restore, revert, serve, status,
    Context,
};

#[derive(Parser)]
#[command(name = "docgit")]
#[command(version, about = "Version history for word-processor documents", long_about = None)]
struct Cli {
    /// Repository root (defaults to the current directory)
    #[arg(short, long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project registry used by `serve` and `projects`
    #[arg(long, global = true, default_value = "projects.json")]
    projects: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the repository and configure the document diff driver
    Init,

    /// Show uncommitted changes to documents
    Status {
        /// Documents to check (defaults to every document in the root)
        files: Vec<String>,
    },

    /// Show a text diff of uncommitted document changes
    Diff {
        /// Documents to diff (defaults to every document in the root)
        files: Vec<String>,
    },

    /// Show commit history
    Log {
        /// Documents to show history for (defaults to every document)
        files: Vec<String>,

        /// Number of commits to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Commit document changes with a message
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,

        /// Documents to commit (defaults to every document in the root)
        files: Vec<String>,
    },

    /// Write a historical version of a document beside the working copy
    Restore {
        /// Commit to restore from
        commit_id: String,

        /// Document to restore
        file: String,
    },

    /// Discard all uncommitted work and move back to a commit
    Reset {
        /// Commit to reset to
        commit_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Undo a commit by recording a new commit
    Revert {
        /// Commit to undo
        commit_id: String,
    },

    /// List tracked documents in the repository root
    Files,

    /// Check that git and the document converter are installed
    Doctor,

    /// Start the HTTP API server
    Serve {
        /// Port for the API server
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage the registered project list
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
}

#[derive(Subcommand)]
enum ProjectsCommand {
    /// List registered projects
    List,

    /// Initialize a directory and register it
    Add { path: PathBuf },

    /// Unregister a project (its files are left alone)
    Remove { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(cli.config.as_deref())?;
    let ctx = Context::new(cli.repo, settings);

    match cli.command {
        Commands::Init => init::run(&ctx)?,
        Commands::Status { files } => status::run(&ctx, &files)?,
        Commands::Diff { files } => diff::run(&ctx, &files)?,
        Commands::Log { files, limit } => log::run(&ctx, &files, limit)?,
        Commands::Commit { message, files } => commit::run(&ctx, &message, &files)?,
        Commands::Restore { commit_id, file } => restore::run(&ctx, &commit_id, &file)?,
        Commands::Reset { commit_id, yes } => reset::run(&ctx, &commit_id, yes)?,
        Commands::Revert { commit_id } => revert::run(&ctx, &commit_id)?,
        Commands::Files => files::run(&ctx)?,
        Commands::Doctor => doctor::run(&ctx)?,
        Commands::Serve { port } => serve::run(ctx, cli.projects, port).await?,
        Commands::Projects { command } => match command {
            ProjectsCommand::List => projects::list(&cli.projects)?,
            ProjectsCommand::Add { path } => projects::add(&ctx, &cli.projects, &path)?,
            ProjectsCommand::Remove { path } => projects::remove(&cli.projects, &path)?,
        },
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    Settings::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load settings from {}", path.display()),
        None => "Failed to load default settings".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docgit", "commit", "-m", "Signed copy", "lease.docx", "--repo", "/srv/contracts",
        ])
        .unwrap();

        assert_eq!(cli.repo, PathBuf::from("/srv/contracts"));
        assert_eq!(cli.projects, PathBuf::from("projects.json"));
        match cli.command {
            Commands::Commit { message, files } => {
                assert_eq!(message, "Signed copy");
                assert_eq!(files, vec!["lease.docx".to_string()]);
            }
            _ => panic!("expected commit"),
        }
    }

    #[test]
    fn test_missing_settings_file_names_the_path() {
        let err = load_settings(Some(Path::new("/nonexistent/docgit.toml"))).unwrap_err();
        let rendered = format!("{err:#}");

        assert!(
            rendered.starts_with("Failed to load settings from /nonexistent/docgit.toml: "),
            "{rendered}"
        );
        assert!(rendered.contains("Path not found"), "{rendered}");
        assert!(load_settings(None).is_ok());
    }

    #[test]
    fn test_reset_requires_commit() {
        assert!(Cli::try_parse_from(["docgit", "reset"]).is_err());
        let cli = Cli::try_parse_from(["docgit", "reset", "abc1234", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: true, .. }));
    }
}
