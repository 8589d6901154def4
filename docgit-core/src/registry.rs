use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// The list of managed project roots, kept as a JSON array of paths.
///
/// The file is read and written whole on every change.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    path: PathBuf,
}

impl ProjectRegistry {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registered roots in insertion order. A missing file is an empty list.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Registers an existing directory by its canonical path. Returns the
    /// canonical path and whether it was newly added.
    pub fn add<P: AsRef<Path>>(&self, root: P) -> Result<(PathBuf, bool)> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }
        let root = std::fs::canonicalize(root)?;

        let mut projects = self.list()?;
        if projects.contains(&root) {
            return Ok((root, false));
        }
        projects.push(root.clone());
        self.save(&projects)?;
        info!(project = %root.display(), "registered project");
        Ok((root, true))
    }

    /// Removes a root if present. Returns whether anything was removed.
    pub fn remove<P: AsRef<Path>>(&self, root: P) -> Result<bool> {
        let root = root.as_ref();
        let mut projects = self.list()?;
        let before = projects.len();
        projects.retain(|p| p != root);
        if projects.len() == before {
            return Ok(false);
        }
        self.save(&projects)?;
        info!(project = %root.display(), "unregistered project");
        Ok(true)
    }

    fn save(&self, projects: &[PathBuf]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(projects)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
