use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Required program not found: {program}. Make sure git and the document converter are on PATH")]
    DependencyMissing { program: String },

    #[error("Not a docgit repository (no .git directory in {0}). Run init first")]
    RepositoryNotInitialized(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a tracked document: {0}")]
    InvalidFileKind(String),

    #[error("Command failed (code: {}): {command}{}", display_code(.code), render_streams(.stdout, .stderr))]
    ToolExecutionFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Diff probe failed (code: {}); the diff converter may be misconfigured{}", display_code(.code), render_streams("", .stderr))]
    DiffProbeFailed { code: Option<i32>, stderr: String },

    #[error("Revert of {commit} failed: binary documents could not be merged automatically. Use reset to return to an older version, or restore the file manually{}", render_streams("", .detail))]
    BinaryConflict { commit: String, detail: String },

    #[error("Not a commit id: {0:?}")]
    InvalidRevision(String),

    #[error("Nothing to commit: no tracked files")]
    NothingToCommit,

    #[error("Failed to configure the diff converter: {0}")]
    ConverterMisconfigured(#[source] Box<Error>),

    #[error("Failed to initialize repository store: {0}")]
    StoreInitFailed(#[source] Box<Error>),

    #[error("Restore of {file} failed: {source}")]
    RestoreFailed {
        file: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Reset to {target} failed: {source}")]
    ResetFailed {
        target: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Revert of {commit} failed: {source}")]
    RevertFailed {
        commit: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Repository is busy: another docgit operation holds {0}")]
    RepositoryBusy(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Stable identifier for the error class, used in API bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DependencyMissing { .. } => "dependency_missing",
            Error::RepositoryNotInitialized(_) => "repository_not_initialized",
            Error::PathNotFound(_) => "path_not_found",
            Error::InvalidFileKind(_) => "invalid_file_kind",
            Error::ToolExecutionFailed { .. } => "tool_execution_failed",
            Error::DiffProbeFailed { .. } => "diff_probe_failed",
            Error::BinaryConflict { .. } => "binary_conflict",
            Error::InvalidRevision(_) => "invalid_revision",
            Error::NothingToCommit => "nothing_to_commit",
            Error::ConverterMisconfigured(_) => "converter_misconfigured",
            Error::StoreInitFailed(_) => "store_init_failed",
            Error::RestoreFailed { .. } => "restore_failed",
            Error::ResetFailed { .. } => "reset_failed",
            Error::RevertFailed { .. } => "revert_failed",
            Error::RepositoryBusy(_) => "repository_busy",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

fn render_streams(stdout: &str, stderr: &str) -> String {
    let mut rendered = String::new();
    if !stderr.trim().is_empty() {
        rendered.push_str("\nStderr:\n");
        rendered.push_str(stderr.trim_end());
    }
    if !stdout.trim().is_empty() {
        rendered.push_str("\nStdout:\n");
        rendered.push_str(stdout.trim_end());
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_renders_streams() {
        let err = Error::ToolExecutionFailed {
            command: "git checkout deadbee -- a.docx".to_string(),
            code: Some(128),
            stdout: String::new(),
            stderr: "fatal: invalid reference: deadbee\n".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("code: 128"));
        assert!(message.contains("git checkout deadbee -- a.docx"));
        assert!(message.contains("Stderr:\nfatal: invalid reference: deadbee"));
        assert!(!message.contains("Stdout:"));
    }

    #[test]
    fn test_wrapped_errors_keep_kind_of_outer() {
        let inner = Error::DependencyMissing {
            program: "git".to_string(),
        };
        let err = Error::ResetFailed {
            target: "abc1234".to_string(),
            source: Box::new(inner),
        };

        assert_eq!(err.kind(), "reset_failed");
        assert!(err.to_string().contains("Required program not found: git"));
    }
}
