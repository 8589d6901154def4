use super::Context;
use anyhow::Result;
use colored::Colorize;
use docgit_core::CommitOutcome;

pub fn run(ctx: &Context, message: &str, files: &[String]) -> Result<()> {
    let repo = ctx.open()?;

    let pb = super::spinner("Creating commit...")?;
    let result = repo.commit(message, files);
    pb.finish_and_clear();

    match result? {
        CommitOutcome::Committed { id } => {
            println!("{}", "✓ Commit created successfully!".green().bold());
            println!("  {}: {}", "Commit ID".bold(), id);
            println!("  {}: {}", "Message".bold(), message);
        }
        CommitOutcome::NothingChanged => {
            println!("{}", "No changes to commit".yellow());
        }
    }

    Ok(())
}
