//! `characters.json`: the persisted roster.
//!
//! The document is `{ "characters": [ <record>, ... ], "last_used": <id> }`.
//! Every write is a full read-modify-write of the document, so fields this
//! crate does not know about survive a save.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use vk_core::validate::ValidationReport;
use vk_core::{Activity, Character, CharacterId, Difficulty};

use crate::error::{StoreError, StoreResult};
use crate::record::{from_record, record_id, record_name, to_record};
use crate::roster::Roster;
use crate::trackers::{TrackerStore, read_json, write_json};

/// File name of the roster document inside the data directory.
pub const CHARACTERS_FILE: &str = "characters.json";

const CHARACTERS_KEY: &str = "characters";
const LAST_USED_KEY: &str = "last_used";

/// A character read back from disk.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The validated character, with its activity restored.
    pub character: Character,
    /// Fields that were out of range and replaced by defaults.
    pub report: ValidationReport,
}

/// What the roster file says at startup.
#[derive(Debug, Clone, Default)]
pub struct RosterSummary {
    /// Every valid entry in the file.
    pub roster: Roster,
    /// The character to resume, if `last_used` names a known entry.
    pub resume: Option<CharacterId>,
}

/// Reads and writes `characters.json` and, through it, the tracker files.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
    trackers: TrackerStore,
}

impl RosterStore {
    /// A store rooted at `dir`. Nothing is touched until the first call.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            path: dir.join(CHARACTERS_FILE),
            trackers: TrackerStore::new(dir),
        }
    }

    /// Path of `characters.json`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tracker files that go with this roster.
    pub fn trackers(&self) -> &TrackerStore {
        &self.trackers
    }

    /// Save a character and mark it as last used.
    ///
    /// An existing record with the same id is removed and the new one is
    /// appended at the end.
    pub fn save(&self, character: &Character) -> StoreResult<()> {
        self.trackers.save(character)?;

        let mut doc = self.read_or_empty()?;
        let mut records = take_records(&mut doc);
        let id = i64::from(character.id.get());
        if let Some(pos) = records.iter().position(|r| record_id(r) == Some(id)) {
            records.remove(pos);
        }
        records.push(to_record(character));

        doc.insert(CHARACTERS_KEY.into(), Value::Array(records));
        doc.insert(LAST_USED_KEY.into(), Value::from(character.id.get()));
        self.write(&doc)?;

        tracing::debug!(id = %character.id, name = %character.name, "character saved");
        Ok(())
    }

    /// Remove every record with this id, and its tracks.
    pub fn delete(&self, id: CharacterId) -> StoreResult<()> {
        let mut doc = match read_json(&self.path) {
            Ok(doc) => doc,
            Err(StoreError::Missing(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        let mut records = take_records(&mut doc);
        let raw = i64::from(id.get());
        records.retain(|r| record_id(r) != Some(raw));
        doc.insert(CHARACTERS_KEY.into(), Value::Array(records));
        self.write(&doc)?;

        self.trackers.delete(id)?;
        tracing::debug!(%id, "character deleted");
        Ok(())
    }

    /// Forget which character was last used.
    pub fn unset_last_used(&self) -> StoreResult<()> {
        let mut doc = match read_json(&self.path) {
            Ok(doc) => doc,
            Err(StoreError::Missing(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        doc.insert(LAST_USED_KEY.into(), Value::from(0));
        self.write(&doc)
    }

    /// Load the character with this id.
    ///
    /// Out-of-range fields are replaced by their defaults and listed in the
    /// returned report. If the file holds the id twice, the later record
    /// wins.
    pub fn load(&self, id: CharacterId) -> StoreResult<Loaded> {
        let doc = read_json(&self.path)?;
        let records = doc
            .get(CHARACTERS_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::NoCharacters(self.path.clone()))?;

        let raw = i64::from(id.get());
        let record = records
            .iter()
            .rev()
            .find(|r| record_id(r) == Some(raw))
            .and_then(Value::as_object)
            .ok_or(StoreError::NotFound(id))?;

        let mut report = ValidationReport::new();
        let (mut character, claimed) = from_record(record, id, &mut report);
        if let Some(kind) = claimed {
            let mut track_report = ValidationReport::new();
            character.activity = match self.trackers.load(id, kind, &mut track_report) {
                Ok(activity) => {
                    report.merge(track_report);
                    activity
                }
                Err(e) => {
                    tracing::warn!(%id, %kind, error = %e, "cannot read track, starting fresh");
                    Activity::start(kind, Difficulty::Troublesome)
                }
            };
        }

        tracing::debug!(
            %id,
            name = %character.name,
            violations = report.len(),
            "character loaded"
        );
        Ok(Loaded { character, report })
    }

    /// Read the roster and the last-used id.
    ///
    /// Records without a valid id are skipped. A `last_used` that names no
    /// entry is ignored with a warning.
    pub fn load_roster_summary(&self) -> StoreResult<RosterSummary> {
        let doc = read_json(&self.path)?;
        let records = doc
            .get(CHARACTERS_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::NoCharacters(self.path.clone()))?;

        let mut roster = Roster::new();
        for record in records {
            let Some(id) = record_id(record).and_then(CharacterId::new) else {
                tracing::warn!(id = ?record_id(record), "skipping record with invalid id");
                continue;
            };
            let name = match record_name(record) {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => format!("character-{id}"),
            };
            if !roster.add(id, name.as_str()) {
                tracing::warn!(%id, %name, "skipping duplicate roster entry");
            }
        }

        let last_used = doc.get(LAST_USED_KEY).and_then(Value::as_i64).unwrap_or(0);
        let resume = CharacterId::new(last_used).filter(|id| roster.contains_id(*id));
        if last_used > 0 && resume.is_none() {
            tracing::warn!(last_used, "last used character is not in the roster");
        }

        Ok(RosterSummary { roster, resume })
    }

    fn read_or_empty(&self) -> StoreResult<Map<String, Value>> {
        match read_json(&self.path) {
            Ok(doc) => Ok(doc),
            Err(StoreError::Missing(_)) => Ok(Map::new()),
            Err(e) => Err(e),
        }
    }

    fn write(&self, doc: &Map<String, Value>) -> StoreResult<()> {
        write_json(&self.path, doc).inspect_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "error saving");
        })
    }
}

fn take_records(doc: &mut Map<String, Value>) -> Vec<Value> {
    match doc.remove(CHARACTERS_KEY) {
        Some(Value::Array(records)) => records,
        _ => Vec::new(),
    }
}
