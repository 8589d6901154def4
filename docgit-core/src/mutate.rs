//! State-changing operations.
//!
//! Every operation here holds the repository lock for its whole command
//! sequence. Restore and revert have cleanup phases that run on every exit
//! path and never replace the primary error with their own.

use crate::conflict::{classify_revert_failure, RevertFailureKind};
use crate::error::{Error, Result};
use crate::models::{CommitOutcome, RevertOutcome};
use crate::repository::Repository;
use crate::runner::{ExitOutcome, Git};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SHORT_ID_LEN: usize = 7;

impl Repository {
    /// Stages the documents and commits them if they differ from HEAD.
    pub fn commit(&self, message: &str, files: &[String]) -> Result<CommitOutcome> {
        let _lock = self.lock()?;
        let files = self.resolve_files(files)?;
        if files.is_empty() {
            return Err(Error::NothingToCommit);
        }

        self.git().run_on(&["add"], &files)?;

        match self.git().probe_on(&["diff", "--staged", "--quiet"], &files)? {
            ExitOutcome::Clean(_) => {
                info!(files = ?files, "nothing changed; no commit made");
                Ok(CommitOutcome::NothingChanged)
            }
            ExitOutcome::Differs(_) => {
                self.git().run_on(&["commit", "-m", message], &files)?;
                let id = self.git().head_short_id()?;
                info!(%id, files = ?files, "committed documents");
                Ok(CommitOutcome::Committed { id })
            }
            ExitOutcome::Failed(output) => Err(Error::DiffProbeFailed {
                code: output.code,
                stderr: output.stderr,
            }),
        }
    }

    /// Writes the version of `file` from `commit_id` to a new sibling file
    /// and returns its path. The working copy of `file` is left as it was.
    pub fn restore(&self, commit_id: &str, file: &str) -> Result<PathBuf> {
        if !self.settings().is_document_name(file) {
            return Err(Error::InvalidFileKind(file.to_string()));
        }
        check_revision(commit_id)?;
        let _lock = self.lock()?;

        let source = self.root().join(file);
        let target = self.restored_artifact_path(commit_id, file);

        let guard = WorkingCopyGuard::acquire(self.git(), file, &source)?;
        let result = self.checkout_as(commit_id, file, &source, &target);
        drop(guard);

        match result {
            Ok(()) => {
                info!(commit = commit_id, file, restored = %target.display(), "restored document");
                Ok(target)
            }
            Err(e) => Err(Error::RestoreFailed {
                file: file.to_string(),
                source: Box::new(e),
            }),
        }
    }

    /// `<stem>.<first 7 chars of commit>.<marker>.<extension>` beside the source.
    pub fn restored_artifact_path(&self, commit_id: &str, file: &str) -> PathBuf {
        let source = Path::new(file);
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let short: String = commit_id.chars().take(SHORT_ID_LEN).collect();
        let name = format!(
            "{stem}.{short}.{}.{}",
            self.settings().restored_marker,
            self.settings().extension
        );

        match source.parent() {
            Some(parent) => self.root().join(parent).join(name),
            None => self.root().join(name),
        }
    }

    fn checkout_as(&self, commit_id: &str, file: &str, source: &Path, target: &Path) -> Result<()> {
        self.git().run(&["checkout", commit_id, "--", file])?;
        if !source.exists() {
            return Err(Error::PathNotFound(source.to_path_buf()));
        }
        std::fs::rename(source, target)?;
        Ok(())
    }

    /// Hard reset of the whole repository. Destroys uncommitted work and
    /// every snapshot after `commit_id`; callers confirm with the user first.
    pub fn reset(&self, commit_id: &str) -> Result<()> {
        check_revision(commit_id)?;
        let _lock = self.lock()?;
        self.git()
            .run(&["reset", "--hard", commit_id])
            .map_err(|e| Error::ResetFailed {
                target: commit_id.to_string(),
                source: Box::new(e),
            })?;
        warn!(target = commit_id, "repository hard reset");
        Ok(())
    }

    /// Records a new snapshot undoing `commit_id`. On failure any partial
    /// revert is aborted before the error is returned.
    pub fn revert(&self, commit_id: &str) -> Result<RevertOutcome> {
        check_revision(commit_id)?;
        let _lock = self.lock()?;

        match self.git().run(&["revert", "--no-edit", commit_id]) {
            Ok(_) => {
                let id = self.git().head_short_id()?;
                info!(reverted = commit_id, %id, "reverted snapshot");
                Ok(RevertOutcome {
                    reverted: commit_id.to_string(),
                    id,
                })
            }
            Err(Error::ToolExecutionFailed {
                command,
                code,
                stdout,
                stderr,
            }) => {
                self.abort_revert();
                match classify_revert_failure(&stdout, &stderr) {
                    RevertFailureKind::BinaryConflict => Err(Error::BinaryConflict {
                        commit: commit_id.to_string(),
                        detail: format!("{}\n{}", stdout.trim_end(), stderr.trim_end())
                            .trim()
                            .to_string(),
                    }),
                    RevertFailureKind::Other => Err(Error::RevertFailed {
                        commit: commit_id.to_string(),
                        source: Box::new(Error::ToolExecutionFailed {
                            command,
                            code,
                            stdout,
                            stderr,
                        }),
                    }),
                }
            }
            Err(e) => Err(Error::RevertFailed {
                commit: commit_id.to_string(),
                source: Box::new(e),
            }),
        }
    }

    fn abort_revert(&self) {
        match self.git().probe(&["revert", "--abort"]) {
            Ok(ExitOutcome::Clean(_)) => info!("aborted partial revert"),
            Ok(other) => {
                let output = other.into_output();
                warn!(code = ?output.code, stderr = %output.stderr.trim(), "revert --abort did not succeed")
            }
            Err(e) => warn!(error = %e, "revert --abort could not run"),
        }
    }
}

/// Commit ids go into engine argument lists before `--`, so one that looks
/// like an option would be parsed as one.
fn check_revision(commit_id: &str) -> Result<()> {
    if commit_id.is_empty() || commit_id.starts_with('-') || commit_id.contains(char::is_whitespace) {
        return Err(Error::InvalidRevision(commit_id.to_string()));
    }
    Ok(())
}

/// Holds the pre-operation bytes of one working-copy file and puts them
/// back when dropped.
///
/// Release first re-checks-out the file from HEAD, which also resets its
/// index entry, then rewrites the captured bytes if the file on disk still
/// differs (uncommitted edits, or a file HEAD does not know). Release never
/// fails; problems are logged.
struct WorkingCopyGuard<'a> {
    git: &'a Git,
    file: &'a str,
    path: &'a Path,
    original: Option<Vec<u8>>,
}

impl<'a> WorkingCopyGuard<'a> {
    fn acquire(git: &'a Git, file: &'a str, path: &'a Path) -> Result<Self> {
        let original = match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            git,
            file,
            path,
            original,
        })
    }

    fn release(&mut self) {
        let checked_out = matches!(
            self.git.probe(&["checkout", "HEAD", "--", self.file]),
            Ok(ExitOutcome::Clean(_))
        );
        if !checked_out {
            // HEAD has no such path; drop whatever the historical checkout staged.
            if let Err(e) = self.git.probe(&["reset", "--quiet", "--", self.file]) {
                warn!(file = self.file, error = %e, "could not unstage restored path");
            }
        }

        let current = std::fs::read(self.path).ok();
        if current == self.original {
            return;
        }
        let result = match &self.original {
            Some(bytes) => std::fs::write(self.path, bytes),
            None => std::fs::remove_file(self.path),
        };
        if let Err(e) = result {
            warn!(file = self.file, error = %e, "could not put working copy back");
        }
    }
}

impl Drop for WorkingCopyGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
