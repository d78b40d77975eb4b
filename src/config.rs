//! Gate configuration file handling.
//!
//! A deployment describes its committee in TOML:
//!
//! ```toml
//! [gate]
//! owners = ["0x…", "0x…", "0x…", "0x…"]
//! threshold = 2
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The owner set and threshold are read once to construct the gate. Nothing
//! here can change them on a running gate.

use crate::gate::{ApprovalGate, GateError, OWNER_COUNT};
use crate::identity::{Identity, IdentityParseError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Expected {expected} owners, found {0}", expected = OWNER_COUNT)]
    OwnerCount(usize),

    #[error("Invalid owner identity '{value}': {source}")]
    InvalidIdentity {
        value: String,
        #[source]
        source: IdentityParseError,
    },

    #[error("Invalid gate configuration: {0}")]
    Gate(#[from] GateError),
}

/// Full gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Committee definition.
    pub gate: GateSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The committee: owner identities and approval threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSection {
    /// Owner identities as hex, in registration order.
    pub owners: Vec<String>,

    /// Minimum net affirmative votes to execute.
    pub threshold: u32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (e.g. `info`, `approval_gate=debug`)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl GateConfig {
    /// Create a configuration for the given committee.
    pub fn new(owners: &[Identity; OWNER_COUNT], threshold: u32) -> Self {
        Self {
            gate: GateSection {
                owners: owners.iter().map(Identity::to_string).collect(),
                threshold,
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        fs::write(path, contents).map_err(write_err)
    }

    /// Parse the owner list into identities.
    pub fn owner_identities(&self) -> Result<[Identity; OWNER_COUNT], ConfigError> {
        let owners = &self.gate.owners;
        if owners.len() != OWNER_COUNT {
            return Err(ConfigError::OwnerCount(owners.len()));
        }

        let mut identities = [Identity::ZERO; OWNER_COUNT];
        for (slot, value) in identities.iter_mut().zip(owners) {
            *slot = value
                .parse()
                .map_err(|source| ConfigError::InvalidIdentity {
                    value: value.clone(),
                    source,
                })?;
        }

        Ok(identities)
    }

    /// Construct the gate this configuration describes.
    ///
    /// Gate validation (threshold range, zero or duplicate owners) applies
    /// unchanged and surfaces as `ConfigError::Gate`.
    pub fn build_gate(&self) -> Result<ApprovalGate, ConfigError> {
        let owners = self.owner_identities()?;
        Ok(ApprovalGate::new(owners, self.gate.threshold)?)
    }

    /// Generate configuration content as a string with comments
    pub fn generate_default_toml(owners: &[Identity; OWNER_COUNT], threshold: u32) -> String {
        let owner_lines: String = owners
            .iter()
            .map(|owner| format!("    \"{}\",\n", owner))
            .collect();

        format!(
            r#"# Approval Gate Configuration
#
# The committee below is fixed for the lifetime of the gate. Changing this
# file does not alter a gate that is already running; a new gate must be
# constructed from the new file.

[gate]
# Exactly {count} distinct, non-zero owner identities (20-byte hex)
owners = [
{owner_lines}]

# Minimum net affirmative votes (affirmative minus negative) to execute.
# Must be between 1 and {count}.
threshold = {threshold}

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/approval-gate/gate.log"
"#,
            count = OWNER_COUNT,
            owner_lines = owner_lines,
            threshold = threshold,
        )
    }
}
