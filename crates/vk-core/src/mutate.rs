//! Bounded increase/decrease of character stats.
//!
//! All twelve mutable stats share one routine, [`modify_bounded`], each with
//! its own bound pair. Changing a value at its limit is a no-op reported as
//! [`Adjustment::AtLimit`].

use serde::{Deserialize, Serialize};

use crate::character::Debility;
use crate::error::MutationError;

/// Which way a value moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move towards the maximum.
    Increase,
    /// Move towards the minimum.
    Decrease,
}

impl Direction {
    /// The imperative verb, as typed by the player.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }
}

/// Result of a bounded change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The value moved.
    Changed {
        /// Value before the change.
        from: i32,
        /// Value after the change.
        to: i32,
    },
    /// The value already sat at the limit in the requested direction.
    AtLimit {
        /// The unchanged value.
        value: i32,
    },
}

impl Adjustment {
    /// The value after the adjustment.
    pub fn value(self) -> i32 {
        match self {
            Self::Changed { to, .. } => to,
            Self::AtLimit { value } => value,
        }
    }

    /// Whether the value moved.
    pub fn is_changed(self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Move `current` by `delta` in `direction`, clamping to `[min, max]`.
///
/// A value already at (or beyond) the limit in the requested direction is
/// left untouched.
pub fn modify_bounded(
    current: i32,
    min: i32,
    max: i32,
    delta: i32,
    direction: Direction,
) -> Adjustment {
    match direction {
        Direction::Increase => {
            if current >= max {
                return Adjustment::AtLimit { value: current };
            }
            let to = if current + delta >= max { max } else { current + delta };
            Adjustment::Changed { from: current, to }
        }
        Direction::Decrease => {
            if current <= min {
                return Adjustment::AtLimit { value: current };
            }
            let to = if current - delta <= min { min } else { current - delta };
            Adjustment::Changed { from: current, to }
        }
    }
}

/// A stat that can be increased or decreased by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    /// Speed, agility and ranged combat.
    Edge,
    /// Courage, willpower and empathy.
    Heart,
    /// Physical strength and close combat.
    Iron,
    /// Sneakiness and deception.
    Shadow,
    /// Expertise and observation.
    Wits,
    /// Experience earned.
    Exp,
    /// Experience spent on advances.
    ExpSpent,
    /// Weapon class (simple or deadly).
    Weapon,
    /// Banked advantage.
    Momentum,
    /// Physical condition.
    Health,
    /// Mental state.
    Spirit,
    /// Preparedness and provisions.
    Supply,
}

impl Stat {
    /// Every mutable stat, in the order they are listed to the player.
    pub const ALL: [Stat; 12] = [
        Stat::Edge,
        Stat::Heart,
        Stat::Iron,
        Stat::Shadow,
        Stat::Wits,
        Stat::Momentum,
        Stat::Health,
        Stat::Spirit,
        Stat::Supply,
        Stat::Exp,
        Stat::ExpSpent,
        Stat::Weapon,
    ];

    /// The name used in commands and persisted records.
    pub fn name(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Heart => "heart",
            Self::Iron => "iron",
            Self::Shadow => "shadow",
            Self::Wits => "wits",
            Self::Exp => "exp",
            Self::ExpSpent => "expspent",
            Self::Weapon => "weapon",
            Self::Momentum => "momentum",
            Self::Health => "health",
            Self::Spirit => "spirit",
            Self::Supply => "supply",
        }
    }

    /// The debility that blocks increasing this stat, if any.
    pub fn blocking_debility(self) -> Option<Debility> {
        match self {
            Self::Health => Some(Debility::Wounded),
            Self::Spirit => Some(Debility::Shaken),
            Self::Supply => Some(Debility::Unprepared),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Stat {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Stat::ALL
            .into_iter()
            .find(|stat| stat.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MutationError::UnknownStat(trimmed.to_string()))
    }
}

/// A reported change of one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatChange {
    /// The stat that was adjusted.
    pub stat: Stat,
    /// The direction requested.
    pub direction: Direction,
    /// What happened.
    pub adjustment: Adjustment,
}

impl std::fmt::Display for StatChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.adjustment, self.direction) {
            (Adjustment::Changed { from, to }, Direction::Increase) => {
                write!(f, "Increasing {} from {from} to {to}", self.stat)
            }
            (Adjustment::Changed { from, to }, Direction::Decrease) => {
                write!(f, "Decreasing {} from {from} to {to}", self.stat)
            }
            (Adjustment::AtLimit { value }, Direction::Increase) => {
                write!(f, "{} is already at its maximum ({value})", self.stat)
            }
            (Adjustment::AtLimit { value }, Direction::Decrease) => {
                write!(f, "{} is already at its minimum ({value})", self.stat)
            }
        }
    }
}
