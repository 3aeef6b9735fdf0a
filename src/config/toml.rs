//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Interface filter configuration
    #[serde(default)]
    pub filter: FilterSection,

    /// Output formatting configuration
    #[serde(default)]
    pub display: DisplaySection,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Polling interval in milliseconds
    pub poll_interval_ms: Option<u64>,
}

/// Interface filter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for interfaces to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for interfaces to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Exclude virtual interfaces
    #[serde(default)]
    pub exclude_virtual: bool,

    /// Exclude loopback interfaces
    #[serde(default)]
    pub exclude_loopback: bool,
}

/// Output formatting section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySection {
    /// Separator between MAC address bytes, or "none"
    pub mac_separator: Option<String>,

    /// Print MAC addresses in uppercase
    pub mac_uppercase: Option<bool>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netif-watch Configuration File

[monitor]
# Polling interval in milliseconds (default: 1000)
poll_interval_ms = 1000

[filter]
# Regex patterns matched against the interface id or alias (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^eth", "^wlan", "^Ethernet"]

# Regex patterns for interfaces to exclude
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^docker", "^veth", "^vEthernet"]

# Exclude virtual interfaces (bridges, tunnels, container veths, loopback)
# exclude_virtual = false

# Exclude loopback interfaces
# exclude_loopback = false

[display]
# Separator between MAC address bytes; "none" prints the compact form
# mac_separator = ":"

# Print MAC addresses in uppercase (default: true)
# mac_uppercase = true
"#
    .to_string()
}
