use super::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use docgit_core::{ProjectRegistry, Repository};
use std::path::Path;

pub fn list(projects_file: &Path) -> Result<()> {
    let projects = ProjectRegistry::new(projects_file)
        .list()
        .with_context(|| format!("Failed to read {}", projects_file.display()))?;

    if projects.is_empty() {
        println!("{}", "No projects registered".yellow());
        return Ok(());
    }

    for project in projects {
        let marker = if project.join(".git").is_dir() {
            "●".green()
        } else {
            "○".red()
        };
        println!("{} {}", marker, project.display());
    }

    Ok(())
}

pub fn add(ctx: &Context, projects_file: &Path, path: &Path) -> Result<()> {
    let (repo, _) = Repository::bootstrap(path, ctx.settings.clone())
        .with_context(|| format!("Failed to initialize {}", path.display()))?;
    let (root, added) = ProjectRegistry::new(projects_file).add(repo.root())?;

    if added {
        println!("{} {}", "✓ Project added:".green().bold(), root.display());
    } else {
        println!("{} {}", "Already registered:".yellow(), root.display());
    }

    Ok(())
}

pub fn remove(projects_file: &Path, path: &Path) -> Result<()> {
    let root = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if ProjectRegistry::new(projects_file).remove(&root)? {
        println!("{} {}", "✓ Project removed:".green().bold(), path.display());
    } else {
        println!("{} {}", "Not registered:".yellow(), path.display());
    }

    Ok(())
}
