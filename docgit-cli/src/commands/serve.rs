use super::Context;
use anyhow::Result;
use colored::Colorize;
use docgit_server::DocgitServer;
use std::net::SocketAddr;
use std::path::PathBuf;

pub async fn run(ctx: Context, projects_file: PathBuf, port: u16) -> Result<()> {
    println!("{}", "Starting docgit server...".bold().cyan());
    println!("   {}: {}", "Projects".bold(), projects_file.display());
    println!(
        "   {}: {}",
        "API Server".bold(),
        format!("http://localhost:{port}").green()
    );
    println!();
    println!("{}", "Press Ctrl+C to stop".dimmed());
    println!();

    let server = DocgitServer::new(ctx.settings, projects_file);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    server.serve(addr).await?;

    Ok(())
}
