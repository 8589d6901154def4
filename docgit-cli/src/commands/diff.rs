use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn run(ctx: &Context, files: &[String]) -> Result<()> {
    let repo = ctx.open()?;

    let pb = super::spinner("Converting documents...")?;
    let result = repo.diff(files);
    pb.finish_and_clear();
    let diff = result?;

    if diff == repo.no_files_message() {
        println!("{}", diff.yellow());
        return Ok(());
    }
    if diff.trim().is_empty() {
        println!("{}", "No uncommitted changes".green());
        return Ok(());
    }

    for line in diff.lines() {
        let line = if line.starts_with("diff --git") {
            line.white().bold()
        } else if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        println!("{line}");
    }

    Ok(())
}
