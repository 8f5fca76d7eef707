//! BLNT init command
//!
//! Writes a project-level `.blnt/config.json`.

use blnt_foundation::{BlntConfig, JsonStore, BLNT_CONFIG_FILE};

/// Initialize BLNT configuration in the current directory
pub fn init_project(force: bool) -> anyhow::Result<()> {
    let store = JsonStore::current_project()?;

    // Check if already initialized
    if store.exists(BLNT_CONFIG_FILE) && !force {
        println!("✓ BLNT already initialized in this directory.");
        println!("  Use --force to reinitialize.");
        return Ok(());
    }

    println!("Initializing BLNT...");

    BlntConfig::default().save_to(&store)?;
    println!("  Created {}", store.file_path(BLNT_CONFIG_FILE).display());

    println!("\n✓ BLNT initialized. Edit values with 'blnt config set --project <key> <value>'.");
    Ok(())
}
