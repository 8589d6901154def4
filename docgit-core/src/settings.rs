use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for how documents are tracked and diffed.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Version-control engine binary.
    pub git_program: String,
    /// Tracked document extension, without the dot. Matched case-sensitively.
    pub extension: String,
    /// File name prefixes of lock and temporary-save files left by editors.
    pub lock_prefixes: Vec<String>,
    /// Name of the diff driver registered in `.gitattributes`.
    pub diff_driver: String,
    /// Command the engine runs to render a document as text for diffs.
    pub textconv: String,
    /// Patterns appended to `.gitignore`.
    pub ignore_patterns: Vec<String>,
    /// Marker inserted into restored artifact names.
    pub restored_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            git_program: "git".to_string(),
            extension: "docx".to_string(),
            lock_prefixes: vec!["~$".to_string(), ".~".to_string()],
            diff_driver: "pandoc".to_string(),
            textconv: "pandoc -t markdown".to_string(),
            ignore_patterns: vec!["*.doc".to_string(), ".DS_Store".to_string()],
            restored_marker: "restored".to_string(),
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_textconv(mut self, textconv: impl Into<String>) -> Self {
        self.textconv = textconv.into();
        self
    }

    /// The `.gitattributes` line routing tracked documents through the driver.
    pub fn attributes_line(&self) -> String {
        format!("*.{} diff={}", self.extension, self.diff_driver)
    }

    /// True if `name` ends in `.<extension>`.
    pub fn is_document_name(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .map(|ext| ext == self.extension.as_str())
            .unwrap_or(false)
    }

    pub fn is_lock_file_name(&self, name: &str) -> bool {
        self.lock_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Program portion of the converter command, used for dependency checks.
    pub fn converter_program(&self) -> Option<&str> {
        self.textconv.split_whitespace().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.attributes_line(), "*.docx diff=pandoc");
        assert_eq!(settings.converter_program(), Some("pandoc"));
        assert!(settings.is_document_name("report.docx"));
        assert!(!settings.is_document_name("report.DOCX"));
        assert!(!settings.is_document_name("report.doc"));
        assert!(settings.is_lock_file_name("~$report.docx"));
        assert!(settings.is_lock_file_name(".~lock.report.docx#"));
        assert!(!settings.is_lock_file_name("report.docx"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "textconv = \"cat\"").unwrap();
        writeln!(file, "ignore_patterns = [\"*.tmp\"]").unwrap();

        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.textconv, "cat");
        assert_eq!(settings.ignore_patterns, vec!["*.tmp".to_string()]);
        assert_eq!(settings.extension, "docx");
        assert_eq!(settings.git_program, "git");
    }

    #[test]
    fn test_missing_file_is_path_not_found() {
        let err = Settings::load("/definitely/not/here/docgit.toml").unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "extension = [").unwrap();

        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
