//! The Ironsworn character record and the rules that keep it consistent.
//!
//! A character carries five attributes, four resources, experience, a weapon
//! class, bonds, eight debilities and at most one running progress track.
//! `max_momentum` and `momentum_reset` are derived from the debilities and
//! cannot be set directly.

pub mod debility;

pub use debility::{Debilities, Debility};

use serde::{Deserialize, Serialize};

use crate::error::{MutationError, MutationResult};
use crate::mutate::{Adjustment, Direction, Stat, StatChange, modify_bounded};
use crate::progress::{Activity, ActivityKind, Difficulty, ProgressMark};

/// Lowest momentum a character can fall to.
pub const MOMENTUM_MIN: i32 = -6;
/// Momentum ceiling with no debilities.
pub const MOMENTUM_CEILING: i32 = 10;
/// Momentum reset value with no debilities.
pub const MOMENTUM_RESET_BASE: i32 = 2;
/// Highest value of an attribute.
pub const ATTRIBUTE_MAX: i32 = 4;
/// Highest value of health, spirit and supply.
pub const RESOURCE_MAX: i32 = 5;
/// Highest amount of experience.
pub const EXP_MAX: i32 = 30;
/// Highest bonds value.
pub const BONDS_MAX: f64 = 5.0;

/// Opaque, positive identifier of a character within the roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(u32);

impl CharacterId {
    /// Largest id that older roster files can represent.
    pub const MAX: u32 = i32::MAX as u32;

    /// Wrap a raw id. Returns `None` unless it lies in `1..=i32::MAX`.
    pub fn new(raw: i64) -> Option<Self> {
        if (1..=i64::from(Self::MAX)).contains(&raw) {
            Some(Self(raw as u32))
        } else {
            None
        }
    }

    /// The raw id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weapon class, which sets the harm a strike inflicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// A simple weapon (level 1).
    #[default]
    Simple,
    /// A deadly weapon (level 2).
    Deadly,
}

impl Weapon {
    /// Look up a weapon class by level.
    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Simple),
            2 => Some(Self::Deadly),
            _ => None,
        }
    }

    /// Numeric level, as persisted.
    pub fn level(self) -> i32 {
        match self {
            Self::Simple => 1,
            Self::Deadly => 2,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Deadly => "deadly",
        }
    }
}

/// Changes to the derived momentum limits after debilities changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitsChange {
    /// Old and new `max_momentum`, if it moved.
    pub max_momentum: Option<(i32, i32)>,
    /// Old and new `momentum_reset`, if it moved.
    pub momentum_reset: Option<(i32, i32)>,
}

impl std::fmt::Display for LimitsChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = Vec::new();
        if let Some((from, to)) = self.max_momentum {
            lines.push(format!("Your max momentum changed from {from} to {to}"));
        }
        if let Some((from, to)) = self.momentum_reset {
            lines.push(format!("Your reset momentum changed from {from} to {to}"));
        }
        f.write_str(&lines.join("\n"))
    }
}

/// A reported debility toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleReport {
    /// The debility that flipped.
    pub debility: Debility,
    /// Its value before the toggle.
    pub from: bool,
    /// Its value after the toggle.
    pub to: bool,
    /// Resulting change of the momentum limits.
    pub limits: LimitsChange,
}

impl std::fmt::Display for ToggleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Toggle {} from {} to {}",
            self.debility,
            u8::from(self.from),
            u8::from(self.to)
        )?;
        if self.limits != LimitsChange::default() {
            write!(f, "\n{}", self.limits)?;
        }
        Ok(())
    }
}

/// An Ironsworn character.
///
/// Fields are public so stored records can be restored as-is; use the
/// methods to mutate a live character. After writing `debilities` directly,
/// call [`Character::refresh_momentum_limits`].
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Roster id.
    pub id: CharacterId,
    /// Display name, unique within the roster (case-insensitive).
    pub name: String,
    /// Edge attribute, 0-4.
    pub edge: i32,
    /// Heart attribute, 0-4.
    pub heart: i32,
    /// Iron attribute, 0-4.
    pub iron: i32,
    /// Shadow attribute, 0-4.
    pub shadow: i32,
    /// Wits attribute, 0-4.
    pub wits: i32,
    /// Health, 0-5.
    pub health: i32,
    /// Spirit, 0-5.
    pub spirit: i32,
    /// Supply, 0-5.
    pub supply: i32,
    /// Momentum, from -6 up to the derived maximum.
    pub momentum: i32,
    max_momentum: i32,
    momentum_reset: i32,
    /// Experience earned, 0-30.
    pub exp: i32,
    /// Experience spent, never more than `exp`.
    pub exp_used: i32,
    /// Weapon class.
    pub weapon: Weapon,
    /// Bonds progress, 0-5.
    pub bonds: f64,
    /// Debility flags.
    pub debilities: Debilities,
    /// Whether the character has died. Informational only.
    pub dead: bool,
    /// The running journey, fight or delve.
    pub activity: Activity,
}

impl Character {
    /// A fresh character: all attributes zero, resources full, no debilities.
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            edge: 0,
            heart: 0,
            iron: 0,
            shadow: 0,
            wits: 0,
            health: RESOURCE_MAX,
            spirit: RESOURCE_MAX,
            supply: RESOURCE_MAX,
            momentum: MOMENTUM_RESET_BASE,
            max_momentum: MOMENTUM_CEILING,
            momentum_reset: MOMENTUM_RESET_BASE,
            exp: 0,
            exp_used: 0,
            weapon: Weapon::Simple,
            bonds: 0.0,
            debilities: Debilities::default(),
            dead: false,
            activity: Activity::Inactive,
        }
    }

    /// Momentum ceiling: 10 minus one per debility.
    pub fn max_momentum(&self) -> i32 {
        self.max_momentum
    }

    /// Momentum after a reset: 2 minus one per debility, never below 0.
    pub fn momentum_reset(&self) -> i32 {
        self.momentum_reset
    }

    /// Recompute `max_momentum` and `momentum_reset` from the debilities.
    ///
    /// Momentum itself is not clamped here; it is only bounded by the next
    /// explicit momentum change.
    pub fn refresh_momentum_limits(&mut self) -> LimitsChange {
        let count = self.debilities.count();
        let max = MOMENTUM_CEILING - count;
        let reset = (MOMENTUM_RESET_BASE - count).max(0);

        let mut change = LimitsChange::default();
        if max != self.max_momentum {
            change.max_momentum = Some((self.max_momentum, max));
            self.max_momentum = max;
        }
        if reset != self.momentum_reset {
            change.momentum_reset = Some((self.momentum_reset, reset));
            self.momentum_reset = reset;
        }
        change
    }

    /// Current value of a stat. The weapon reads as its level.
    pub fn value(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Edge => self.edge,
            Stat::Heart => self.heart,
            Stat::Iron => self.iron,
            Stat::Shadow => self.shadow,
            Stat::Wits => self.wits,
            Stat::Exp => self.exp,
            Stat::ExpSpent => self.exp_used,
            Stat::Weapon => self.weapon.level(),
            Stat::Momentum => self.momentum,
            Stat::Health => self.health,
            Stat::Spirit => self.spirit,
            Stat::Supply => self.supply,
        }
    }

    /// The inclusive `(min, max)` bounds of a stat for this character.
    pub fn bounds(&self, stat: Stat) -> (i32, i32) {
        match stat {
            Stat::Edge | Stat::Heart | Stat::Iron | Stat::Shadow | Stat::Wits => {
                (0, ATTRIBUTE_MAX)
            }
            Stat::Exp => (0, EXP_MAX),
            Stat::ExpSpent => (0, self.exp),
            Stat::Weapon => (1, 2),
            Stat::Momentum => (MOMENTUM_MIN, self.max_momentum),
            Stat::Health | Stat::Spirit | Stat::Supply => (0, RESOURCE_MAX),
        }
    }

    fn set_value(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Edge => self.edge = value,
            Stat::Heart => self.heart = value,
            Stat::Iron => self.iron = value,
            Stat::Shadow => self.shadow = value,
            Stat::Wits => self.wits = value,
            Stat::Exp => self.exp = value,
            Stat::ExpSpent => self.exp_used = value,
            Stat::Weapon => {
                self.weapon = Weapon::from_level(i64::from(value)).unwrap_or_default();
            }
            Stat::Momentum => self.momentum = value,
            Stat::Health => self.health = value,
            Stat::Spirit => self.spirit = value,
            Stat::Supply => self.supply = value,
        }
    }

    /// Increase or decrease a stat by one within its bounds.
    ///
    /// Health, spirit and supply cannot be increased while wounded, shaken
    /// or unprepared respectively.
    pub fn adjust(&mut self, stat: Stat, direction: Direction) -> MutationResult<StatChange> {
        let blocked = stat
            .blocking_debility()
            .filter(|d| direction == Direction::Increase && self.debilities.get(*d));
        if let Some(debility) = blocked {
            return Err(MutationError::BlockedByDebility { stat, debility });
        }

        let (min, max) = self.bounds(stat);
        let adjustment = modify_bounded(self.value(stat), min, max, 1, direction);
        if let Adjustment::Changed { to, .. } = adjustment {
            self.set_value(stat, to);
        }

        Ok(StatChange {
            stat,
            direction,
            adjustment,
        })
    }

    /// Flip a debility and recompute the momentum limits.
    ///
    /// A permanent debility that is already set is refused.
    pub fn toggle(&mut self, debility: Debility) -> MutationResult<ToggleReport> {
        let from = self.debilities.get(debility);
        if from && debility.is_permanent() {
            return Err(MutationError::PermanentDebility(debility));
        }

        self.debilities.set(debility, !from);
        let limits = self.refresh_momentum_limits();

        Ok(ToggleReport {
            debility,
            from,
            to: !from,
            limits,
        })
    }

    /// Mark progress on the running journey, fight or delve.
    pub fn mark_progress(&mut self, direction: Direction) -> MutationResult<ProgressMark> {
        let kind = self.activity.kind().ok_or(MutationError::NoActiveProgress)?;
        let track = self
            .activity
            .track_mut()
            .ok_or(MutationError::NoActiveProgress)?;
        let (from, to) = track.mark(direction);
        Ok(ProgressMark {
            kind,
            from,
            to,
            complete: track.is_complete(),
        })
    }

    /// Start a journey, fight or delve, replacing whatever was running.
    ///
    /// Returns the kind of the activity that was replaced, if any.
    pub fn start_activity(
        &mut self,
        kind: ActivityKind,
        difficulty: Difficulty,
    ) -> Option<ActivityKind> {
        let previous = self.activity.kind();
        self.activity = Activity::start(kind, difficulty);
        previous
    }

    /// End the running activity. Returns its kind, if one was running.
    pub fn end_activity(&mut self) -> Option<ActivityKind> {
        let previous = self.activity.kind();
        self.activity = Activity::Inactive;
        previous
    }

    /// Flip initiative in the running fight. Returns the new value.
    pub fn toggle_initiative(&mut self) -> Option<bool> {
        let fight = self.activity.fight_mut()?;
        fight.initiative = !fight.initiative;
        Some(fight.initiative)
    }

    /// The prompt segment for this character, e.g. `Kira > Journey 3/10 > `.
    pub fn prompt_label(&self) -> String {
        let mut label = format!("{} > ", self.name);
        if let (Some(kind), Some(track)) = (self.activity.kind(), self.activity.track()) {
            label.push_str(&format!("{kind} {}/10", track.progress_label()));
            if self.activity.fight().is_some_and(|f| f.initiative) {
                label.push_str(" [I]");
            }
            label.push_str(" > ");
        }
        label
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |d: Debility| u8::from(self.debilities.get(d));

        write!(
            f,
            "Name: {} (Exp: {}/{EXP_MAX}) Exp spent: {}",
            self.name, self.exp, self.exp_used
        )?;
        if self.dead {
            write!(f, " [DECEASED]")?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "\nEdge: {} Heart: {} Iron: {} Shadow: {} Wits: {}\n",
            self.edge, self.heart, self.iron, self.shadow, self.wits
        )?;
        writeln!(
            f,
            "Momentum: {}/{} [{}] Health: {}/5 Spirit: {}/5 Supply: {}/5",
            self.momentum,
            self.max_momentum,
            self.momentum_reset,
            self.health,
            self.spirit,
            self.supply
        )?;
        writeln!(
            f,
            "\nWounded: {} Unprepared: {} Encumbered: {} Shaken: {}",
            flag(Debility::Wounded),
            flag(Debility::Unprepared),
            flag(Debility::Encumbered),
            flag(Debility::Shaken)
        )?;
        writeln!(
            f,
            "Corrupted: {} Tormented: {} Cursed: {} Maimed: {}",
            flag(Debility::Corrupted),
            flag(Debility::Tormented),
            flag(Debility::Cursed),
            flag(Debility::Maimed)
        )?;
        writeln!(f, "\nUses a {} weapon", self.weapon.name())?;
        write!(f, "\nBonds: {:.2}", self.bonds)?;

        if let (Some(kind), Some(track)) = (self.activity.kind(), self.activity.track()) {
            write!(f, "\n\nActive {kind}: {track}")?;
            if self.activity.fight().is_some_and(|fight| fight.initiative) {
                write!(f, " [initiative]")?;
            }
        }
        Ok(())
    }
}
