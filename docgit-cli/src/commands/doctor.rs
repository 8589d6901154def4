use super::Context;
use anyhow::{bail, Result};
use colored::Colorize;
use docgit_core::check_dependencies;

pub fn run(ctx: &Context) -> Result<()> {
    let report = check_dependencies(&ctx.settings)?;

    for dependency in &report {
        if dependency.available {
            println!(
                "{} {} {}",
                "✓".green(),
                dependency.program.bold(),
                dependency.version.as_deref().unwrap_or_default().dimmed()
            );
        } else {
            println!("{} {} {}", "✗".red(), dependency.program.bold(), "not found".red());
        }
    }

    let missing = report.iter().filter(|d| !d.available).count();
    if missing > 0 {
        bail!("{missing} required program(s) missing");
    }

    Ok(())
}
