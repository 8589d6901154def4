//! External process execution.
//!
//! Every engine or converter invocation goes through [`run`], which
//! normalizes failures into [`Error`]. Strict calls turn a nonzero exit into
//! [`Error::ToolExecutionFailed`]; tolerant calls hand the exit back as an
//! [`ExitOutcome`] so the caller can branch on "no differences",
//! "differences" and "tool error" explicitly.

use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Whether a nonzero exit is an error or data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    Strict,
    Tolerant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub command: String,
    /// `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Tri-state reading of an exit code: 0, 1, anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Clean(CommandOutput),
    Differs(CommandOutput),
    Failed(CommandOutput),
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn outcome(self) -> ExitOutcome {
        match self.code {
            Some(0) => ExitOutcome::Clean(self),
            Some(1) => ExitOutcome::Differs(self),
            _ => ExitOutcome::Failed(self),
        }
    }

    pub fn into_error(self) -> Error {
        Error::ToolExecutionFailed {
            command: self.command,
            code: self.code,
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

impl ExitOutcome {
    pub fn output(&self) -> &CommandOutput {
        match self {
            ExitOutcome::Clean(output)
            | ExitOutcome::Differs(output)
            | ExitOutcome::Failed(output) => output,
        }
    }

    pub fn into_output(self) -> CommandOutput {
        match self {
            ExitOutcome::Clean(output)
            | ExitOutcome::Differs(output)
            | ExitOutcome::Failed(output) => output,
        }
    }
}

/// Runs `program args..` to completion, capturing both streams.
///
/// Children run with `LC_ALL=C` so messages the caller inspects are not
/// translated.
pub fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    tolerance: Tolerance,
) -> Result<CommandOutput> {
    let rendered = render_command(program, args);
    debug!(command = %rendered, cwd = ?cwd, "running");

    let mut command = Command::new(program);
    command.args(args).env("LC_ALL", "C");
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    let output = command.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::DependencyMissing {
            program: program.to_string(),
        },
        _ => Error::Io(e),
    })?;

    let output = CommandOutput {
        command: rendered,
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(command = %output.command, code = ?output.code, "finished");

    if tolerance == Tolerance::Strict && !output.success() {
        return Err(output.into_error());
    }
    Ok(output)
}

fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push('"');
            rendered.push_str(arg);
            rendered.push('"');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

/// The version-control engine bound to one working directory.
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    root: PathBuf,
}

impl Git {
    pub fn new(program: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs a subcommand; a nonzero exit is an error.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        run(&self.program, args, Some(&self.root), Tolerance::Strict)
    }

    /// Runs a subcommand and returns its exit as data.
    pub fn probe(&self, args: &[&str]) -> Result<ExitOutcome> {
        run(&self.program, args, Some(&self.root), Tolerance::Tolerant).map(CommandOutput::outcome)
    }

    /// Runs `args` followed by `--` and `paths`.
    pub fn run_on(&self, args: &[&str], paths: &[String]) -> Result<CommandOutput> {
        self.run(&with_pathspec(args, paths))
    }

    pub fn probe_on(&self, args: &[&str], paths: &[String]) -> Result<ExitOutcome> {
        self.probe(&with_pathspec(args, paths))
    }

    /// Short identifier of HEAD.
    pub fn head_short_id(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--short", "HEAD"])?;
        Ok(output.stdout.trim().to_string())
    }

    pub fn has_head(&self) -> Result<bool> {
        Ok(self.probe(&["rev-parse", "--verify", "--quiet", "HEAD"])?.output().success())
    }
}

fn with_pathspec<'a>(args: &[&'a str], paths: &'a [String]) -> Vec<&'a str> {
    let mut full: Vec<&str> = Vec::with_capacity(args.len() + paths.len() + 1);
    full.extend_from_slice(args);
    full.push("--");
    full.extend(paths.iter().map(String::as_str));
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_dependency_missing() {
        let err = run(
            "docgit-surely-not-installed",
            &["--version"],
            None,
            Tolerance::Tolerant,
        )
        .unwrap_err();

        match err {
            Error::DependencyMissing { program } => {
                assert_eq!(program, "docgit-surely-not-installed")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_strict_failure_carries_code_and_streams() {
        let err = run(
            "sh",
            &["-c", "echo out; echo err >&2; exit 3"],
            None,
            Tolerance::Strict,
        )
        .unwrap_err();

        match err {
            Error::ToolExecutionFailed {
                code,
                stdout,
                stderr,
                command,
            } => {
                assert_eq!(code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
                assert!(command.starts_with("sh -c "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tolerant_exit_codes_map_to_outcomes() {
        let outcome = |code: i32| {
            let script = format!("exit {code}");
            run("sh", &["-c", script.as_str()], None, Tolerance::Tolerant)
                .unwrap()
                .outcome()
        };

        assert!(matches!(outcome(0), ExitOutcome::Clean(_)));
        assert!(matches!(outcome(1), ExitOutcome::Differs(_)));
        assert!(matches!(outcome(2), ExitOutcome::Failed(_)));
        assert!(matches!(outcome(128), ExitOutcome::Failed(_)));
    }

    #[test]
    fn test_render_quotes_arguments_with_spaces() {
        assert_eq!(
            render_command("git", &["config", "diff.pandoc.textconv", "pandoc -t markdown"]),
            "git config diff.pandoc.textconv \"pandoc -t markdown\""
        );
    }
}
