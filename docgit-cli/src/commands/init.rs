use super::Context;
use anyhow::{Context as _, Result};
use colored::Colorize;
use docgit_core::Repository;

pub fn run(ctx: &Context) -> Result<()> {
    let pb = super::spinner("Configuring repository...")?;
    let result = Repository::bootstrap(&ctx.root, ctx.settings.clone());
    pb.finish_and_clear();
    let (repo, report) =
        result.with_context(|| format!("Failed to initialize {}", ctx.root.display()))?;

    println!("{}", "✓ Repository ready".green().bold());
    println!("  {}: {}", "Root".bold(), repo.root().display());
    println!(
        "  {}: {}",
        "Diff driver".bold(),
        repo.settings().attributes_line()
    );

    if report.created_store {
        println!("  {}", "Created a new git repository".dimmed());
    }
    for file in &report.updated_files {
        println!("  {} {}", "updated".yellow(), file);
    }
    match &report.commit_message {
        Some(message) => println!("  {}: {}", "Committed".bold(), message),
        None => println!("  {}", "Configuration already up to date".dimmed()),
    }

    Ok(())
}
