//! Configuration for a tracking session.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "VOWKEEPER_DIR";

/// Configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding `characters.json` and the progress track files.
    pub data_dir: PathBuf,
    /// RNG seed for reproducible character ids. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Resolve the data directory: `$VOWKEEPER_DIR`, then the platform data
/// directory, then `./.vowkeeper`.
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    match ProjectDirs::from("org", "vowkeeper", "vowkeeper") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => {
            tracing::debug!("no home directory, falling back to ./.vowkeeper");
            PathBuf::from(".vowkeeper")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_seed() {
        let cfg = SessionConfig::default();
        assert!(cfg.seed.is_none());
        assert!(!cfg.data_dir.as_os_str().is_empty());
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default()
            .with_data_dir("/tmp/vk")
            .with_seed(123);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/vk"));
        assert_eq!(cfg.seed, Some(123));
    }
}
