use super::Context;
use anyhow::Result;
use colored::Colorize;

pub fn run(ctx: &Context) -> Result<()> {
    let repo = ctx.open()?;
    let documents = repo.documents()?;

    if documents.is_empty() {
        println!("{}", repo.no_files_message().yellow());
        return Ok(());
    }

    for name in documents {
        println!("{name}");
    }

    Ok(())
}
