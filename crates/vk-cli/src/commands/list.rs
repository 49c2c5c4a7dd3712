use comfy_table::{ContentArrangement, Table};

use vk_roster::{RosterStore, SessionConfig, StoreError};

pub fn run(config: &SessionConfig) -> Result<(), String> {
    let store = RosterStore::new(&config.data_dir);
    let summary = match store.load_roster_summary() {
        Ok(summary) => summary,
        Err(StoreError::Missing(_)) => {
            println!("  No characters found.");
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    if summary.roster.is_empty() {
        println!("  No characters found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Exp", "Momentum", "Health", "Spirit", "Supply", "Activity"]);

    for entry in summary.roster.entries() {
        let character = match store.load(entry.id) {
            Ok(loaded) => loaded.character,
            Err(e) => {
                tracing::warn!(id = %entry.id, error = %e, "cannot load character");
                continue;
            }
        };

        let mut name = character.name.clone();
        if summary.resume == Some(entry.id) {
            name.push_str(" *");
        }
        if character.dead {
            name.push_str(" [DECEASED]");
        }
        let activity = match (character.activity.kind(), character.activity.track()) {
            (Some(kind), Some(track)) => format!("{kind} {}/10", track.progress_label()),
            _ => "—".to_string(),
        };

        table.add_row(vec![
            name,
            format!("{}/30", character.exp),
            format!("{}/{}", character.momentum, character.max_momentum()),
            format!("{}/5", character.health),
            format!("{}/5", character.spirit),
            format!("{}/5", character.supply),
            activity,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", summary.roster.len());

    Ok(())
}
