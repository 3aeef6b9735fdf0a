//! Configuration layer for netif-watch.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`MacFormat`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For filter patterns (`include`, `exclude`), CLI patterns **replace** TOML
//! patterns entirely (not merged). Include and exclude lists are handled
//! independently.
//!
//! # Boolean Flag Semantics
//!
//! `--exclude-virtual` and `--exclude-loopback` use OR semantics: if set in
//! either CLI or TOML, the filter is enabled. `--mac-lowercase` always wins
//! over `display.mac_uppercase`.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{DisplaySection, FilterSection, MonitorSection, TomlConfig, default_config_template};
pub use validated::{MacFormat, ValidatedConfig, write_default_config};
