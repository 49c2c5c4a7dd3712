//! Progress track files: `journeys.json`, `fights.json` and `delves.json`.
//!
//! Each file holds one array of tracks keyed by character id. A character
//! has at most one entry across all three files, in the file of its
//! running activity.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use vk_core::validate::{ValidationReport, validate_double, validate_int};
use vk_core::{
    Activity, ActivityKind, Character, CharacterId, Difficulty, FightTrack, ProgressTrack,
};

use crate::error::{StoreError, StoreResult};

/// Reads and writes the three progress track files.
#[derive(Debug, Clone)]
pub struct TrackerStore {
    dir: PathBuf,
}

impl TrackerStore {
    /// Tracker files live in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file for one kind of activity.
    pub fn path(&self, kind: ActivityKind) -> PathBuf {
        self.dir.join(file_name(kind))
    }

    /// Write the character's running track and drop its entries for the
    /// other kinds.
    pub fn save(&self, character: &Character) -> StoreResult<()> {
        for kind in ActivityKind::PRECEDENCE {
            let entry = if character.activity.is(kind) {
                entry_for(character)
            } else {
                None
            };
            self.upsert(kind, character.id, entry)?;
        }
        Ok(())
    }

    /// Load the track of kind `kind` for character `id`.
    ///
    /// A record that claims an activity without a matching track starts a
    /// fresh troublesome track.
    pub fn load(
        &self,
        id: CharacterId,
        kind: ActivityKind,
        report: &mut ValidationReport,
    ) -> StoreResult<Activity> {
        let path = self.path(kind);
        let doc = match read_json(&path) {
            Ok(doc) => doc,
            Err(StoreError::Missing(_)) => Map::new(),
            Err(e) => return Err(e),
        };

        let found = doc
            .get(array_key(kind))
            .and_then(Value::as_array)
            .and_then(|entries| {
                entries
                    .iter()
                    .rev()
                    .find(|e| matches_id(e, id))
                    .and_then(Value::as_object)
            });

        let Some(entry) = found else {
            tracing::warn!(%id, %kind, "active flag set but no track saved, starting fresh");
            return Ok(Activity::start(kind, Difficulty::Troublesome));
        };

        let level = validate_int(entry, "difficulty", 1, 5, 1, report);
        let difficulty = Difficulty::from_level(level).unwrap_or(Difficulty::Troublesome);
        let progress = validate_double(entry, "progress", 0.0, 10.0, 0.0, report);
        let track = ProgressTrack::with_progress(difficulty, progress);

        Ok(match kind {
            ActivityKind::Journey => Activity::Journey(track),
            ActivityKind::Delve => Activity::Delve(track),
            ActivityKind::Fight => Activity::Fight(FightTrack {
                track,
                initiative: validate_int(entry, "initiative", 0, 1, 0, report) == 1,
            }),
        })
    }

    /// Remove every track belonging to character `id`.
    pub fn delete(&self, id: CharacterId) -> StoreResult<()> {
        for kind in ActivityKind::PRECEDENCE {
            self.upsert(kind, id, None)?;
        }
        Ok(())
    }

    fn upsert(
        &self,
        kind: ActivityKind,
        id: CharacterId,
        entry: Option<Value>,
    ) -> StoreResult<()> {
        let path = self.path(kind);
        let mut doc = match read_json(&path) {
            Ok(doc) => doc,
            // nothing to remove from a file that does not exist
            Err(StoreError::Missing(_)) if entry.is_none() => return Ok(()),
            Err(StoreError::Missing(_)) => Map::new(),
            Err(e) => return Err(e),
        };

        let key = array_key(kind);
        let mut entries = match doc.remove(key) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };
        let before = entries.len();
        entries.retain(|e| !matches_id(e, id));
        let removed = entries.len() < before;

        let changed = removed || entry.is_some();
        if let Some(entry) = entry {
            entries.push(entry);
        }
        doc.insert(key.to_string(), Value::Array(entries));

        if changed {
            write_json(&path, &doc)?;
        }
        Ok(())
    }
}

fn file_name(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Journey => "journeys.json",
        ActivityKind::Fight => "fights.json",
        ActivityKind::Delve => "delves.json",
    }
}

fn array_key(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Journey => "journeys",
        ActivityKind::Fight => "fights",
        ActivityKind::Delve => "delves",
    }
}

fn matches_id(entry: &Value, id: CharacterId) -> bool {
    entry.get("id").and_then(Value::as_i64) == Some(i64::from(id.get()))
}

fn entry_for(character: &Character) -> Option<Value> {
    let track = character.activity.track()?;
    let mut entry = json!({
        "id": character.id.get(),
        "difficulty": track.difficulty.level(),
        "progress": track.progress,
    });
    if let (Some(fight), Some(obj)) = (character.activity.fight(), entry.as_object_mut()) {
        obj.insert("initiative".into(), json!(u8::from(fight.initiative)));
    }
    Some(entry)
}

/// Read a JSON object from `path`.
pub(crate) fn read_json(path: &Path) -> StoreResult<Map<String, Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Malformed(path.to_path_buf())),
    }
}

/// Write a JSON object to `path`, creating the directory if needed.
pub(crate) fn write_json(path: &Path, doc: &Map<String, Value>) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(doc)?;
    fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vk_core::Direction;

    fn kira() -> Character {
        Character::new(CharacterId::new(3).unwrap(), "Kira")
    }

    #[test]
    fn saves_and_loads_a_fight() {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::new(dir.path());
        let mut c = kira();
        c.start_activity(ActivityKind::Fight, Difficulty::Dangerous);
        c.mark_progress(Direction::Increase).unwrap();
        c.toggle_initiative();
        store.save(&c).unwrap();

        let mut report = ValidationReport::new();
        let activity = store.load(c.id, ActivityKind::Fight, &mut report).unwrap();
        assert!(report.is_empty());
        assert_eq!(activity, c.activity);
        assert!(activity.fight().unwrap().initiative);
    }

    #[test]
    fn switching_activity_moves_the_entry() {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::new(dir.path());
        let mut c = kira();
        c.start_activity(ActivityKind::Journey, Difficulty::Formidable);
        store.save(&c).unwrap();
        c.start_activity(ActivityKind::Delve, Difficulty::Epic);
        store.save(&c).unwrap();

        let journeys = read_json(&store.path(ActivityKind::Journey)).unwrap();
        assert_eq!(journeys["journeys"].as_array().unwrap().len(), 0);
        let delves = read_json(&store.path(ActivityKind::Delve)).unwrap();
        assert_eq!(delves["delves"].as_array().unwrap().len(), 1);
        assert!(!store.path(ActivityKind::Fight).exists());
    }

    #[test]
    fn other_characters_are_untouched() {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::new(dir.path());
        let mut a = kira();
        let mut b = Character::new(CharacterId::new(4).unwrap(), "Asha");
        a.start_activity(ActivityKind::Journey, Difficulty::Troublesome);
        b.start_activity(ActivityKind::Journey, Difficulty::Extreme);
        store.save(&a).unwrap();
        store.save(&b).unwrap();
        store.delete(a.id).unwrap();

        let mut report = ValidationReport::new();
        let loaded = store.load(b.id, ActivityKind::Journey, &mut report).unwrap();
        assert_eq!(loaded, b.activity);
        let journeys = read_json(&store.path(ActivityKind::Journey)).unwrap();
        assert_eq!(journeys["journeys"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_track_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::new(dir.path());
        let mut report = ValidationReport::new();
        let activity = store
            .load(kira().id, ActivityKind::Delve, &mut report)
            .unwrap();
        assert_eq!(
            activity,
            Activity::start(ActivityKind::Delve, Difficulty::Troublesome)
        );
    }

    #[test]
    fn out_of_range_track_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = TrackerStore::new(dir.path());
        let doc = json!({ "journeys": [ { "id": 3, "difficulty": 9, "progress": 14.0 } ] });
        let Value::Object(doc) = doc else { unreachable!() };
        write_json(&store.path(ActivityKind::Journey), &doc).unwrap();

        let mut report = ValidationReport::new();
        let activity = store
            .load(kira().id, ActivityKind::Journey, &mut report)
            .unwrap();
        let track = activity.track().unwrap();
        assert_eq!(track.difficulty, Difficulty::Troublesome);
        assert_eq!(track.progress, 0.0);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn non_object_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fights.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(read_json(&path), Err(StoreError::Malformed(_))));
    }
}
