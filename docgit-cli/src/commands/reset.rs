use super::Context;
use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use docgit_core::{ChangeKind, ChangeRecord};

pub fn run(ctx: &Context, commit_id: &str, yes: bool) -> Result<()> {
    let repo = ctx.open()?;
    let pending = repo.status(&[])?;
    let lost = discarded(&pending);

    println!("{}", "Reset Preview".bold().cyan());
    println!("  {}: {}", "Target Commit".bold(), commit_id);
    println!();

    if !lost.is_empty() {
        println!("{}", "Uncommitted changes that will be lost:".bold());
        for change in &lost {
            println!("  {} {}", change.path, "will be discarded".red());
        }
        println!();
    }
    let kept = pending.len() - lost.len();
    if kept > 0 {
        println!(
            "{}",
            format!("{kept} untracked document(s) will be left in place").dimmed()
        );
        println!();
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Reset every file to {commit_id}? This action cannot be undone."
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Reset cancelled".yellow());
            return Ok(());
        }
    }

    repo.reset(commit_id)?;
    println!(
        "{}",
        format!("✓ Repository reset to {commit_id}").green().bold()
    );

    Ok(())
}

/// A hard reset rewrites tracked files only; untracked documents survive it.
fn discarded(changes: &[ChangeRecord]) -> Vec<&ChangeRecord> {
    changes
        .iter()
        .filter(|change| change.kind != ChangeKind::Untracked)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docgit_core::inspect::parse_short_status;

    #[test]
    fn test_untracked_documents_are_not_discarded() {
        let changes = parse_short_status(" M report.docx\n?? draft.docx\nA  added.docx\n D gone.docx\n");

        let lost: Vec<&str> = discarded(&changes)
            .iter()
            .map(|change| change.path.as_str())
            .collect();

        assert_eq!(lost, vec!["report.docx", "added.docx", "gone.docx"]);
    }
}
