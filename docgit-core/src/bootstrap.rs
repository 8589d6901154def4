//! Bringing a directory to a ready state.
//!
//! Each step is idempotent on its own: the store is created only if absent,
//! rule lines are appended only if the exact line is missing, engine
//! configuration is a plain overwrite, and the configuration commit is made
//! only when the rule files have pending changes. Calling [`Repository::bootstrap`]
//! again on a ready repository changes nothing.

use crate::error::{Error, Result};
use crate::models::BootstrapReport;
use crate::repository::Repository;
use crate::runner::ExitOutcome;
use crate::settings::Settings;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::info;

pub const ATTRIBUTES_FILE: &str = ".gitattributes";
pub const IGNORE_FILE: &str = ".gitignore";

impl Repository {
    /// Initializes and configures `root`, creating the directory if needed.
    pub fn bootstrap<P: AsRef<Path>>(root: P, settings: Settings) -> Result<(Self, BootstrapReport)> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        let repo = Repository::new_unchecked(root, settings);
        let mut report = BootstrapReport {
            root: repo.root().to_path_buf(),
            ..Default::default()
        };

        report.created_store = repo.ensure_store()?;
        let _lock = repo.lock()?;

        let attributes = [repo.settings().attributes_line()];
        if append_missing_lines(&repo.root().join(ATTRIBUTES_FILE), &attributes)? {
            report.updated_files.push(ATTRIBUTES_FILE.to_string());
        }

        repo.configure_converter()?;

        let patterns = repo.settings().ignore_patterns.clone();
        if append_missing_lines(&repo.root().join(IGNORE_FILE), &patterns)? {
            report.updated_files.push(IGNORE_FILE.to_string());
        }

        report.commit_message = repo.commit_configuration()?;

        info!(
            root = %repo.root().display(),
            created_store = report.created_store,
            updated = ?report.updated_files,
            committed = report.commit_message.is_some(),
            "repository ready"
        );
        Ok((repo, report))
    }

    fn ensure_store(&self) -> Result<bool> {
        if self.git_dir().is_dir() {
            return Ok(false);
        }
        self.git()
            .run(&["init"])
            .map_err(|e| Error::StoreInitFailed(Box::new(e)))?;
        info!(root = %self.root().display(), "initialized repository store");
        Ok(true)
    }

    fn configure_converter(&self) -> Result<()> {
        let settings = self.settings();
        let textconv_key = format!("diff.{}.textconv", settings.diff_driver);

        let configure = || -> Result<()> {
            self.git()
                .run(&["config", textconv_key.as_str(), settings.textconv.as_str()])?;
            // Keep non-ASCII document names readable in status and log output.
            self.git().run(&["config", "core.quotePath", "false"])?;
            Ok(())
        };
        configure().map_err(|e| Error::ConverterMisconfigured(Box::new(e)))
    }

    /// Commits rule files with pending changes. Returns the commit message used.
    fn commit_configuration(&self) -> Result<Option<String>> {
        let mut pending = Vec::new();
        for file in [ATTRIBUTES_FILE, IGNORE_FILE] {
            let status = match self.git().probe(&["status", "--porcelain", "--", file])? {
                ExitOutcome::Clean(output) => output.stdout,
                other => return Err(other.into_output().into_error()),
            };
            if !status.trim().is_empty() {
                pending.push(file.to_string());
            }
        }

        if pending.is_empty() {
            return Ok(None);
        }

        let message = if self.git().has_head()? {
            format!("Update docgit configuration ({} diff)", self.settings().diff_driver)
        } else {
            format!("Initial commit: configure docgit ({} diff)", self.settings().diff_driver)
        };

        self.git().run_on(&["add"], &pending)?;
        self.git().run_on(&["commit", "-m", message.as_str()], &pending)?;
        info!(files = ?pending, %message, "committed configuration");
        Ok(Some(message))
    }
}

/// Appends each line not already present (exact match after trimming).
/// Returns whether the file changed.
fn append_missing_lines(path: &Path, lines: &[String]) -> Result<bool> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let mut present: HashSet<String> = existing.lines().map(|l| l.trim().to_string()).collect();
    let mut addition = String::new();
    for line in lines {
        if present.insert(line.clone()) {
            addition.push_str(line);
            addition.push('\n');
        }
    }

    if addition.is_empty() {
        return Ok(false);
    }
    if !existing.is_empty() && !existing.ends_with('\n') {
        addition.insert(0, '\n');
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(addition.as_bytes())?;
    Ok(true)
}
