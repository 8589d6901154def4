use crate::discovery::discover_documents;
use crate::error::{Error, Result};
use crate::lock::RepoLock;
use crate::runner::Git;
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// A bootstrapped document repository.
///
/// The root is carried explicitly; nothing here consults the process
/// working directory. Holds no cached state: every operation re-reads the
/// engine.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    settings: Settings,
    git: Git,
}

impl Repository {
    /// Opens an existing repository, failing if bootstrap has not run.
    pub fn open<P: AsRef<Path>>(root: P, settings: Settings) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            return Err(Error::PathNotFound(root));
        }
        if !root.join(".git").is_dir() {
            return Err(Error::RepositoryNotInitialized(root));
        }
        Ok(Self::new_unchecked(root, settings))
    }

    pub(crate) fn new_unchecked(root: PathBuf, settings: Settings) -> Self {
        let git = Git::new(settings.git_program.clone(), root.clone());
        Self {
            root,
            settings,
            git,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn git(&self) -> &Git {
        &self.git
    }

    pub(crate) fn git_dir(&self) -> PathBuf {
        self.root.join(".git")
    }

    pub(crate) fn lock(&self) -> Result<RepoLock> {
        RepoLock::acquire(&self.git_dir())
    }

    /// Tracked documents in the repository root, sorted.
    pub fn documents(&self) -> Result<Vec<String>> {
        discover_documents(&self.root, &self.settings)
    }

    /// Explicit names win; otherwise every discovered document.
    pub(crate) fn resolve_files(&self, files: &[String]) -> Result<Vec<String>> {
        if files.is_empty() {
            self.documents()
        } else {
            Ok(files.to_vec())
        }
    }
}
