//! Init command - write an example config file

use anyhow::{Context, Result};
use console::style;
use docscore::config::EXAMPLE_CONFIG;
use std::path::Path;

pub fn run(path: &Path, force: bool) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join("docscore.toml");
    if config_path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!(
        "  {} Score one file",
        style("docscore evaluate <SOURCE> <DOC>").cyan()
    );
    println!(
        "  {} Score a project",
        style("docscore batch <SRC_DIR> <DOCS_DIR>").cyan()
    );
    println!(
        "  {} Enable semantic accuracy",
        style("export OPENAI_API_KEY=... && docscore --semantic ...").cyan()
    );

    Ok(())
}
