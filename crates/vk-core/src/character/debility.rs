//! Debilities: conditions that shrink momentum and gate recovery.

use serde::{Deserialize, Serialize};

use crate::error::MutationError;

/// One of the eight debilities a character can suffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Debility {
    /// Blocks increasing health.
    Wounded,
    /// Blocks increasing supply.
    Unprepared,
    /// Blocks increasing spirit.
    Shaken,
    /// Carrying too much.
    Encumbered,
    /// Permanent once set.
    Maimed,
    /// A lasting curse.
    Cursed,
    /// Permanent once set.
    Corrupted,
    /// A lasting torment.
    Tormented,
}

impl Debility {
    /// All debilities, in the order they are listed to the player.
    pub const ALL: [Debility; 8] = [
        Debility::Wounded,
        Debility::Unprepared,
        Debility::Shaken,
        Debility::Encumbered,
        Debility::Maimed,
        Debility::Cursed,
        Debility::Corrupted,
        Debility::Tormented,
    ];

    /// Lower-case name used in commands and records.
    pub fn name(self) -> &'static str {
        match self {
            Self::Wounded => "wounded",
            Self::Unprepared => "unprepared",
            Self::Shaken => "shaken",
            Self::Encumbered => "encumbered",
            Self::Maimed => "maimed",
            Self::Cursed => "cursed",
            Self::Corrupted => "corrupted",
            Self::Tormented => "tormented",
        }
    }

    /// Capitalised name for messages.
    pub fn title(self) -> &'static str {
        match self {
            Self::Wounded => "Wounded",
            Self::Unprepared => "Unprepared",
            Self::Shaken => "Shaken",
            Self::Encumbered => "Encumbered",
            Self::Maimed => "Maimed",
            Self::Cursed => "Cursed",
            Self::Corrupted => "Corrupted",
            Self::Tormented => "Tormented",
        }
    }

    /// Permanent banes can be set but never cleared.
    pub fn is_permanent(self) -> bool {
        matches!(self, Self::Maimed | Self::Corrupted)
    }
}

impl std::fmt::Display for Debility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Debility {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Debility::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MutationError::UnknownDebility(trimmed.to_string()))
    }
}

/// The set of debility flags on a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debilities {
    /// See [`Debility::Wounded`].
    pub wounded: bool,
    /// See [`Debility::Unprepared`].
    pub unprepared: bool,
    /// See [`Debility::Shaken`].
    pub shaken: bool,
    /// See [`Debility::Encumbered`].
    pub encumbered: bool,
    /// See [`Debility::Maimed`].
    pub maimed: bool,
    /// See [`Debility::Cursed`].
    pub cursed: bool,
    /// See [`Debility::Corrupted`].
    pub corrupted: bool,
    /// See [`Debility::Tormented`].
    pub tormented: bool,
}

impl Debilities {
    /// Whether a debility is set.
    pub fn get(&self, debility: Debility) -> bool {
        match debility {
            Debility::Wounded => self.wounded,
            Debility::Unprepared => self.unprepared,
            Debility::Shaken => self.shaken,
            Debility::Encumbered => self.encumbered,
            Debility::Maimed => self.maimed,
            Debility::Cursed => self.cursed,
            Debility::Corrupted => self.corrupted,
            Debility::Tormented => self.tormented,
        }
    }

    /// Set or clear a debility. Does not check permanence.
    pub fn set(&mut self, debility: Debility, value: bool) {
        let slot = match debility {
            Debility::Wounded => &mut self.wounded,
            Debility::Unprepared => &mut self.unprepared,
            Debility::Shaken => &mut self.shaken,
            Debility::Encumbered => &mut self.encumbered,
            Debility::Maimed => &mut self.maimed,
            Debility::Cursed => &mut self.cursed,
            Debility::Corrupted => &mut self.corrupted,
            Debility::Tormented => &mut self.tormented,
        };
        *slot = value;
    }

    /// Number of debilities currently set.
    pub fn count(&self) -> i32 {
        Debility::ALL.into_iter().filter(|d| self.get(*d)).count() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("Wounded".parse::<Debility>().unwrap(), Debility::Wounded);
        assert_eq!("CORRUPTED".parse::<Debility>().unwrap(), Debility::Corrupted);
        assert!("hungry".parse::<Debility>().is_err());
    }

    #[test]
    fn only_maimed_and_corrupted_are_permanent() {
        let permanent: Vec<_> = Debility::ALL
            .into_iter()
            .filter(|d| d.is_permanent())
            .collect();
        assert_eq!(permanent, vec![Debility::Maimed, Debility::Corrupted]);
    }

    #[test]
    fn set_get_count() {
        let mut d = Debilities::default();
        assert_eq!(d.count(), 0);
        d.set(Debility::Shaken, true);
        d.set(Debility::Cursed, true);
        assert!(d.get(Debility::Shaken));
        assert!(!d.get(Debility::Wounded));
        assert_eq!(d.count(), 2);
        d.set(Debility::Shaken, false);
        assert_eq!(d.count(), 1);
    }
}
