use crate::error::{Error, Result};
use crate::models::DependencyStatus;
use crate::runner::{run, Tolerance};
use crate::settings::Settings;

/// Probes the engine and the converter with `--version`.
///
/// A missing program is reported as unavailable rather than raised; only
/// unexpected I/O failures propagate.
pub fn check_dependencies(settings: &Settings) -> Result<Vec<DependencyStatus>> {
    let mut programs = vec![settings.git_program.as_str()];
    if let Some(converter) = settings.converter_program() {
        programs.push(converter);
    }

    programs.into_iter().map(probe_version).collect()
}

fn probe_version(program: &str) -> Result<DependencyStatus> {
    match run(program, &["--version"], None, Tolerance::Tolerant) {
        Ok(output) => Ok(DependencyStatus {
            program: program.to_string(),
            available: output.success(),
            version: output
                .stdout
                .lines()
                .next()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
        }),
        Err(Error::DependencyMissing { .. }) => Ok(DependencyStatus {
            program: program.to_string(),
            available: false,
            version: None,
        }),
        Err(e) => Err(e),
    }
}
