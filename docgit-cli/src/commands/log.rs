use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn run(ctx: &Context, files: &[String], limit: Option<usize>) -> Result<()> {
    let repo = ctx.open()?;
    let history = repo.log(files)?;

    if history.is_empty() {
        println!("{}", "No commits yet".yellow());
        return Ok(());
    }

    println!("{}", "Commit History".bold().cyan());
    println!();

    let to_show = limit.unwrap_or(history.len()).min(history.len());

    for entry in history.iter().take(to_show) {
        println!("{} {}", "commit".yellow().bold(), entry.id.yellow());
        println!("{}: {}", "Author".bold(), entry.author);
        println!("{}: {}", "Date".bold(), entry.date);
        println!();
        println!("    {}", entry.message);
        println!();
    }

    if history.len() > to_show {
        println!(
            "{}",
            format!("... and {} more commits", history.len() - to_show).dimmed()
        );
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
