pub mod commit;
pub mod diff;
pub mod doctor;
pub mod files;
pub mod init;
pub mod log;
pub mod projects;
pub mod reset;
pub mod restore;
pub mod revert;
pub mod serve;
pub mod status;

use anyhow::{bail, Result};
use colored::Colorize;
use docgit_core::{Error, Repository, Settings};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// What every subcommand needs: the explicit repository root and settings.
pub struct Context {
    pub root: PathBuf,
    pub settings: Settings,
}

impl Context {
    pub fn new(root: PathBuf, settings: Settings) -> Self {
        Self { root, settings }
    }

    pub fn open(&self) -> Result<Repository> {
        match Repository::open(&self.root, self.settings.clone()) {
            Err(Error::RepositoryNotInitialized(root)) => bail!(
                "{} is not a docgit repository. Run '{}' first.",
                root.display(),
                "docgit init".cyan()
            ),
            other => Ok(other?),
        }
    }
}

/// Spinner for engine calls that can take a while on large documents.
pub fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
