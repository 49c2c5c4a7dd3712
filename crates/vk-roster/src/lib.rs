//! Persistence and session management for Vowkeeper.
//!
//! Characters live in `characters.json` inside the data directory, with
//! running journeys, fights and delves in their own files next to it.
//! [`Session`] ties the store to one active character and exposes the
//! commands the front end offers.

pub mod config;
pub mod error;
pub mod record;
pub mod roster;
pub mod session;
pub mod store;
pub mod trackers;

pub use config::{DATA_DIR_ENV, SessionConfig, default_data_dir};
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use roster::{Roster, RosterEntry};
pub use session::Session;
pub use store::{CHARACTERS_FILE, Loaded, RosterStore, RosterSummary};
pub use trackers::TrackerStore;
