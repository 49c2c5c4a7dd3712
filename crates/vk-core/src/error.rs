//! Error types for character mutation and creation.

use crate::character::Debility;
use crate::mutate::Stat;

/// Errors that can occur while mutating a character.
///
/// All of these are recoverable: the character is left exactly as it was
/// before the attempted change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The stat name does not match any of the mutable stats.
    #[error("unknown value: {0}")]
    UnknownStat(String),

    /// The debility name does not match any of the eight debilities.
    #[error("unknown debility: {0}")]
    UnknownDebility(String),

    /// The debility is permanent and already set.
    #[error("{} is a permanent bane and cannot be changed", .0.title())]
    PermanentDebility(Debility),

    /// The resource cannot be increased while a debility is active.
    #[error("You are {debility}, you cannot increase {stat}")]
    BlockedByDebility {
        /// The resource that was about to be increased.
        stat: Stat,
        /// The debility that blocks the increase.
        debility: Debility,
    },

    /// Progress was marked while no journey, fight or delve is active.
    #[error("no journey, fight or delve is active")]
    NoActiveProgress,
}

/// Convenience result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that abort the character creation flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreationError {
    /// The entered name was empty.
    #[error("Please provide a longer name")]
    EmptyName,

    /// A character with this name already exists in the roster.
    #[error("Sorry, there is already a character named {0}")]
    DuplicateName(String),

    /// Input ended before the character was complete.
    #[error("character creation aborted")]
    Aborted,
}
