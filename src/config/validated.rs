//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::network::filter::{FilterChain, KindFilter, NameRegexFilter, VirtualFilter};
use crate::network::{InterfaceKind, MacAddress};

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// How MAC addresses are rendered in command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacFormat {
    /// Separator between bytes; `None` for the compact form
    pub separator: Option<char>,

    /// Uppercase hex digits
    pub upper_case: bool,
}

impl Default for MacFormat {
    fn default() -> Self {
        Self {
            separator: Some(defaults::MAC_SEPARATOR),
            upper_case: defaults::MAC_UPPERCASE,
        }
    }
}

impl MacFormat {
    /// Renders `mac` in this format.
    #[must_use]
    pub fn format(&self, mac: &MacAddress) -> String {
        mac.to_string_with(self.upper_case, self.separator)
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Polling interval
    pub poll_interval: Duration,

    /// Interface filter applied to every snapshot
    pub filter: FilterChain,

    /// MAC address rendering
    pub mac_format: MacFormat,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = self
            .mac_format
            .separator
            .map_or_else(|| "none".to_string(), |c| format!("'{c}'"));

        write!(
            f,
            "Config {{ poll_interval: {}ms, filters: {} include/{} exclude, mac_separator: {}, \
             mac_uppercase: {} }}",
            self.poll_interval.as_millis(),
            self.filter.include_count(),
            self.filter.exclude_count(),
            separator,
            self.mac_format.upper_case,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Regex patterns are invalid
    /// - The poll interval is zero
    /// - The MAC separator is longer than one character
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let poll_interval = Self::resolve_poll_interval(cli, toml)?;
        let filter = Self::build_filter(cli, toml)?;
        let mac_format = Self::resolve_mac_format(cli, toml)?;

        Ok(Self {
            poll_interval,
            filter,
            mac_format,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let millis = cli
            .poll_interval_ms
            .or_else(|| toml.and_then(|t| t.monitor.poll_interval_ms))
            .unwrap_or(defaults::POLL_INTERVAL_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        let mut filter = FilterChain::new();

        // Boolean flags only enable: either source turns them on
        let exclude_virtual = cli.exclude_virtual || toml.is_some_and(|t| t.filter.exclude_virtual);
        let exclude_loopback =
            cli.exclude_loopback || toml.is_some_and(|t| t.filter.exclude_loopback);

        if exclude_virtual {
            filter = filter.exclude(VirtualFilter);
        }
        if exclude_loopback {
            filter = filter.exclude(KindFilter::new([InterfaceKind::Loopback]));
        }

        // CLI patterns replace TOML patterns, per list
        let includes = Self::patterns(
            &cli.include_interfaces,
            toml.map(|t| t.filter.include.as_slice()),
        );
        for pattern in includes {
            filter = filter.include(compile(pattern)?);
        }

        let excludes = Self::patterns(
            &cli.exclude_interfaces,
            toml.map(|t| t.filter.exclude.as_slice()),
        );
        for pattern in excludes {
            filter = filter.exclude(compile(pattern)?);
        }

        Ok(filter)
    }

    fn patterns<'a>(cli: &'a [String], toml: Option<&'a [String]>) -> &'a [String] {
        if cli.is_empty() {
            toml.unwrap_or_default()
        } else {
            cli
        }
    }

    fn resolve_mac_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<MacFormat, ConfigError> {
        let separator = match cli
            .mac_separator
            .as_deref()
            .or_else(|| toml.and_then(|t| t.display.mac_separator.as_deref()))
        {
            Some(value) => parse_separator(value)?,
            None => Some(defaults::MAC_SEPARATOR),
        };

        // --mac-lowercase wins, then TOML, then default
        let upper_case = if cli.mac_lowercase {
            false
        } else {
            toml.and_then(|t| t.display.mac_uppercase)
                .unwrap_or(defaults::MAC_UPPERCASE)
        };

        Ok(MacFormat {
            separator,
            upper_case,
        })
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn compile(pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

fn parse_separator(value: &str) -> Result<Option<char>, ConfigError> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(c)),
        _ => Err(ConfigError::InvalidSeparator {
            value: value.to_string(),
        }),
    }
}
