use super::Context;
use anyhow::Result;
use colored::Colorize;
use docgit_core::ChangeKind;

pub fn run(ctx: &Context, files: &[String]) -> Result<()> {
    let repo = ctx.open()?;
    let changes = repo.status(files)?;

    println!("{}", "Repository Status".bold().cyan());
    println!("  {}: {}", "Root".bold(), repo.root().display());
    println!();

    if changes.is_empty() {
        println!("{}", "No uncommitted changes".green());
        return Ok(());
    }

    println!(
        "{} {}",
        "Uncommitted changes:".bold(),
        format!("({})", changes.len()).yellow()
    );
    println!();

    for change in &changes {
        let icon = match change.kind {
            ChangeKind::Untracked => "+".green(),
            ChangeKind::Modified | ChangeKind::Staged => "~".yellow(),
            ChangeKind::Deleted => "-".red(),
            ChangeKind::Renamed => "→".blue(),
            ChangeKind::Conflicted => "!".red().bold(),
            ChangeKind::Other => "?".normal(),
        };

        match &change.original_path {
            Some(original) => println!("  {} {} {} {}", icon, original, "→".dimmed(), change.path),
            None => println!("  {} {}", icon, change.path),
        }
    }

    println!();
    println!(
        "Run {} to commit these changes",
        "docgit commit -m \"message\"".cyan()
    );

    Ok(())
}
