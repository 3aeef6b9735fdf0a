//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// netif-watch: Network Interface Watcher
///
/// Lists the host's network interfaces and reports changes to them
/// (addresses, gateways, link state) as they happen.
#[derive(Debug, Parser)]
#[command(name = "netif-watch")]
#[command(version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run (default: monitor)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Polling interval in milliseconds
    #[arg(long = "poll-interval-ms", global = true, value_name = "N")]
    pub poll_interval_ms: Option<u64>,

    /// Regex pattern for interfaces to include (can be specified multiple times)
    #[arg(long = "include-interface", global = true, value_name = "REGEX")]
    pub include_interfaces: Vec<String>,

    /// Regex pattern for interfaces to exclude (can be specified multiple times)
    #[arg(long = "exclude-interface", global = true, value_name = "REGEX")]
    pub exclude_interfaces: Vec<String>,

    /// Exclude virtual interfaces (bridges, tunnels, container veths, loopback)
    #[arg(long = "exclude-virtual", global = true)]
    pub exclude_virtual: bool,

    /// Exclude loopback interfaces
    #[arg(long = "exclude-loopback", global = true)]
    pub exclude_loopback: bool,

    /// Separator between MAC address bytes; 'none' for the compact form
    #[arg(long = "mac-separator", global = true, value_name = "CHAR|none")]
    pub mac_separator: Option<String>,

    /// Print MAC addresses in lowercase
    #[arg(long = "mac-lowercase", global = true)]
    pub mac_lowercase: bool,
}

/// Subcommands for netif-watch
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every interface once and exit
    List {
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a single interface by id
    Get {
        /// Interface id (e.g. eth0, or the adapter GUID on Windows)
        name: String,
    },

    /// Watch interfaces and print changes until interrupted
    Monitor,

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "netif-watch.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if this runs the monitor, either explicitly or by default.
    #[must_use]
    pub const fn is_monitor(&self) -> bool {
        matches!(self.command, None | Some(Command::Monitor))
    }
}
