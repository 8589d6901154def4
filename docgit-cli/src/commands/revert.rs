use super::Context;
use anyhow::Result;
use colored::Colorize;
use docgit_core::Error;

pub fn run(ctx: &Context, commit_id: &str) -> Result<()> {
    let repo = ctx.open()?;

    let pb = super::spinner("Reverting commit...")?;
    let result = repo.revert(commit_id);
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("{}", "✓ Commit reverted".green().bold());
            println!("  {}: {}", "Reverted".bold(), outcome.reverted);
            println!("  {}: {}", "New commit".bold(), outcome.id);
            Ok(())
        }
        Err(e @ Error::BinaryConflict { .. }) => {
            println!(
                "{}",
                "✗ Later commits changed the same document; it cannot be merged automatically."
                    .red()
            );
            println!(
                "Use {} to pull the old version out and edit it by hand",
                "docgit restore <commit> <file>".cyan()
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
