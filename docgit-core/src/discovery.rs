use crate::error::{Error, Result};
use crate::settings::Settings;
use std::path::Path;

/// Lists tracked documents directly inside `dir`.
///
/// Only regular files carrying the tracked extension are returned, minus
/// editor lock and temporary-save files. Names are returned sorted.
pub fn discover_documents(dir: &Path, settings: &Settings) -> Result<Vec<String>> {
    if !dir.exists() {
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        // Names that are not valid UTF-8 cannot be passed through as pathspecs.
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if settings.is_document_name(&name) && !settings.is_lock_file_name(&name) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}
