//! Config struct definition and defaults.

use serde::{Deserialize, Serialize};

/// Name of the config file looked up at the project root.
pub const CONFIG_FILE_NAME: &str = "confsync.yaml";

/// Prefix that marks a config object as an exclusion directive.
pub const DEFAULT_DIRECTIVE_PREFIX: &str = "ignore.";

/// Extension of config object files (no leading dot).
pub const DEFAULT_FILE_EXTENSION: &str = "yml";

/// Subdirectory of the system temp dir used as the masking scratch area.
pub const DEFAULT_SCRATCH_SUBDIR: &str = "confsync";

/// Configuration for a confsync project.
///
/// Relative directories are resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Stores
    // =========================================================================
    /// Staging directories, most specific first. Together they form the
    /// staged store; an object in an earlier directory shadows later ones.
    pub staging_dirs: Vec<String>,

    /// Directory holding the active configuration.
    pub active_dir: String,

    /// Extension of config object files (default: "yml").
    pub file_extension: String,

    // =========================================================================
    // Exclusion
    // =========================================================================
    /// Prefix marking a directive name (default: "ignore.").
    pub directive_prefix: String,

    /// Scratch area for masked artifacts. Defaults to `<temp>/confsync`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<String>,

    // =========================================================================
    // Locking
    // =========================================================================
    /// Minutes after which an import lock is considered stale.
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            staging_dirs: vec!["config/sync".to_string()],
            active_dir: "config/active".to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            directive_prefix: DEFAULT_DIRECTIVE_PREFIX.to_string(),
            scratch_dir: None,
            lock_stale_minutes: 60,
        }
    }
}
