use colored::Colorize;

use vk_roster::{RosterStore, SessionConfig};

pub fn run(config: &SessionConfig, name: &str) -> Result<(), String> {
    let store = RosterStore::new(&config.data_dir);
    let summary = store.load_roster_summary().map_err(|e| e.to_string())?;

    let entry = summary
        .roster
        .find_by_name(name)
        .ok_or_else(|| format!("No character named {name} found."))?;
    let loaded = store.load(entry.id).map_err(|e| e.to_string())?;

    for violation in loaded.report.violations() {
        println!("{}", violation.to_string().yellow());
    }
    println!("{}", loaded.character);

    Ok(())
}
