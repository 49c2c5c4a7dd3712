//! The in-memory list of known characters.

use vk_core::CharacterId;

/// One character known to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Character id, unique within the roster.
    pub id: CharacterId,
    /// Display name, unique ignoring case.
    pub name: String,
}

/// Names and ids of every character in `characters.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Returns false, leaving the roster as it was, if the
    /// id or the name is already present.
    pub fn add(&mut self, id: CharacterId, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains_id(id) || self.contains_name(&name) {
            return false;
        }
        self.entries.push(RosterEntry { id, name });
        true
    }

    /// Remove the entry with this id.
    pub fn remove(&mut self, id: CharacterId) -> Option<RosterEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Find an entry by name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&RosterEntry> {
        let name_lower = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == name_lower)
    }

    /// Returns true if some entry has this name, ignoring case.
    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Returns true if some entry has this id.
    pub fn contains_id(&self, id: CharacterId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// All entries, in file order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// All names, in file order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> CharacterId {
        CharacterId::new(n).unwrap()
    }

    #[test]
    fn add_and_list() {
        let mut r = Roster::new();
        assert!(r.add(id(1), "Kira"));
        assert!(r.add(id(2), "Asha"));
        assert_eq!(r.len(), 2);
        assert_eq!(r.names(), vec!["Kira", "Asha"]);
    }

    #[test]
    fn duplicate_name_is_rejected_case_insensitively() {
        let mut r = Roster::new();
        r.add(id(1), "Kira");
        assert!(!r.add(id(2), "KIRA"));
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut r = Roster::new();
        r.add(id(1), "Kira");
        assert!(!r.add(id(1), "Asha"));
        assert!(!r.contains_name("Asha"));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let mut r = Roster::new();
        r.add(id(5), "Kira");
        assert_eq!(r.find_by_name("kira").map(|e| e.id), Some(id(5)));
        assert!(r.find_by_name("nobody").is_none());
    }

    #[test]
    fn remove_entry() {
        let mut r = Roster::new();
        r.add(id(1), "Kira");
        r.add(id(2), "Asha");
        let removed = r.remove(id(1)).unwrap();
        assert_eq!(removed.name, "Kira");
        assert!(!r.contains_id(id(1)));
        assert!(r.remove(id(1)).is_none());
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn empty_roster() {
        let r = Roster::new();
        assert!(r.is_empty());
        assert!(r.entries().is_empty());
    }
}
