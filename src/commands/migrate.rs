use colored::*;
use eyre::Result;
use std::path::Path;

use crate::migrate;

pub fn run(dry_run: bool, root: &Path) -> Result<()> {
    if !root.exists() {
        println!("{} No storage at {}", "→".blue(), root.display());
        return Ok(());
    }

    let applied = migrate::run_migrations(root, dry_run);
    if applied.is_empty() {
        println!("{} Nothing to migrate in {}", "✓".green(), root.display());
        return Ok(());
    }

    for line in applied {
        println!("  {} {}", "→".blue(), line);
    }
    Ok(())
}
