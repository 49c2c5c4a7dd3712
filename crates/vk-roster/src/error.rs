//! Error types for the roster store and the session.

use std::path::PathBuf;

use thiserror::Error;
use vk_core::{CharacterId, CreationError, MutationError};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the roster files.
///
/// None of these touch in-memory state: a failed save leaves the character
/// exactly as it was.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file did not contain valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The roster file does not exist yet.
    #[error("no character file found at {}", .0.display())]
    Missing(PathBuf),

    /// The file is valid JSON but not an object.
    #[error("{} is not a JSON object", .0.display())]
    Malformed(PathBuf),

    /// The roster file has no `characters` array.
    #[error("cannot find a [characters] array in {}", .0.display())]
    NoCharacters(PathBuf),

    /// No record with this id exists.
    #[error("no character with id {0}")]
    NotFound(CharacterId),
}

/// Result type for session commands.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors reported back to the player by session commands.
///
/// `create` and `switch` save and unload the current character before they
/// check the new name or read the file, so a failure there leaves the
/// session without a character. Other commands leave it unchanged.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The command needs a loaded character.
    #[error("no character loaded")]
    NoCharacter,

    /// No roster entry has this name.
    #[error("No character named {0} found.")]
    UnknownCharacter(String),

    /// A roster entry already has this name.
    #[error("Sorry, there is already a character named {0}")]
    DuplicateName(String),

    /// The command was missing or had a malformed argument.
    #[error("{0}")]
    Usage(String),

    /// The character refused the change.
    #[error("{0}")]
    Mutation(#[from] MutationError),

    /// Character creation was aborted.
    #[error("{0}")]
    Creation(#[from] CreationError),

    /// The store could not be read or written.
    #[error("{0}")]
    Store(#[from] StoreError),
}
