use docgit::sdk::DocgitClient;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("📄 docgit client walkthrough\n");

    // Connect to docgit server
    let client = DocgitClient::new("http://localhost:8000");

    if !client.health_check()? {
        eprintln!("Error: docgit server is not running!");
        eprintln!("Start it with: docgit serve");
        return Ok(());
    }

    println!("✓ Connected to docgit server");
    for dependency in client.doctor()? {
        let mark = if dependency.available { "✓" } else { "✗" };
        println!("  {} {}", mark, dependency.program);
    }
    println!();

    println!("📁 Registering project: {}", project.display());
    let root = client.add_project(&project)?;
    let repo = client.project(&root);
    println!("✓ Project ready at {}", root.display());
    println!();

    let documents = repo.documents()?;
    println!("📊 {} document(s) tracked", documents.len());
    for change in repo.status(&[])? {
        println!("  {} {}", change.status, change.path);
    }
    println!();

    if let Some(first) = documents.first() {
        println!("📝 Pending changes in {first}:");
        println!("{}", repo.diff(first)?);
    }

    println!("💾 Committing documents...");
    match repo.commit("Snapshot from client walkthrough", &[])? {
        Some(id) => println!("✓ Commit created: {id}"),
        None => println!("✓ Nothing changed since the last commit"),
    }
    println!();

    println!("📜 Fetching history...");
    let history = repo.log(&[])?;
    println!("✓ Found {} commit(s)", history.len());
    for entry in history.iter().take(5) {
        println!("  {} {} ({}, {})", entry.id, entry.message, entry.author, entry.date);
    }

    if let (Some(oldest), Some(first)) = (history.last(), documents.first()) {
        let restored = repo.restore(&oldest.id, first)?;
        println!();
        println!("⏪ Oldest version of {first} written to {}", restored.display());
    }

    println!();
    println!("Try these commands:");
    println!("  docgit status    - View pending document changes");
    println!("  docgit log       - View commit history");
    println!("  docgit diff      - See what changed, as text");

    Ok(())
}
