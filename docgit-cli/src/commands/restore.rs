use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn run(ctx: &Context, commit_id: &str, file: &str) -> Result<()> {
    let repo = ctx.open()?;
    let restored = repo.restore(commit_id, file)?;

    println!("{}", "✓ Version restored".green().bold());
    println!("  {}: {}", "From commit".bold(), commit_id);
    println!("  {}: {}", "Written to".bold(), restored.display());
    println!("  {}", format!("{file} was left untouched").dimmed());

    Ok(())
}
