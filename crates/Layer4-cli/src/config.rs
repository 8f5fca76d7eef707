//! `blnt config` subcommands

use crate::ConfigAction;
use blnt_foundation::{BlntConfig, JsonStore};

pub fn run(action: ConfigAction, effective: &BlntConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(effective)?);
        }
        ConfigAction::Get { key } => match effective.get(&key)? {
            Some(value) => println!("{}", value),
            None => anyhow::bail!("Unknown configuration key: {}", key),
        },
        ConfigAction::Set {
            key,
            value,
            project,
        } => {
            let store = target_store(project)?;
            let stored = BlntConfig::set_in(&store, &key, &value)?;
            println!("✓ {} = {}", key, stored);
        }
        ConfigAction::Reset { project } => {
            let store = target_store(project)?;
            BlntConfig::clear_in(&store)?;
            println!("✓ Configuration reset ({})", store.base_dir().display());
        }
    }

    Ok(())
}

fn target_store(project: bool) -> blnt_foundation::Result<JsonStore> {
    if project {
        JsonStore::current_project()
    } else {
        JsonStore::global()
    }
}
