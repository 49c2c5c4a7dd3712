//! Character model and rules engine for Vowkeeper.
//!
//! Provides the Ironsworn character record, bounded stat mutation with
//! debility gating, derived momentum limits, journey/fight/delve progress
//! tracks, interactive character creation, and the validator that guards
//! values read back from disk.

pub mod character;
pub mod creation;
pub mod error;
pub mod mutate;
pub mod progress;
pub mod validate;

pub use character::{Character, CharacterId, Debilities, Debility, Weapon};
pub use creation::{Prompt, ScriptedPrompt, create_character};
pub use error::{CreationError, MutationError, MutationResult};
pub use mutate::{Adjustment, Direction, Stat, StatChange, modify_bounded};
pub use progress::{Activity, ActivityKind, Difficulty, FightTrack, ProgressMark, ProgressTrack};
pub use validate::{FieldViolation, ValidationReport, validate_double, validate_int};
