//! Tests for CLI argument parsing.

use super::cli::{Cli, Command};
use clap::Parser;

mod parsing {
    use super::*;

    #[test]
    fn default_values() {
        let cli = Cli::parse_from_iter(["netif-watch"]);

        // Optional fields have no defaults in CLI - None when not specified
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.poll_interval_ms.is_none());
        assert!(cli.mac_separator.is_none());
        // Boolean flags default to false
        assert!(!cli.verbose);
        assert!(!cli.exclude_virtual);
        assert!(!cli.exclude_loopback);
        assert!(!cli.mac_lowercase);
        // Vec fields default to empty
        assert!(cli.include_interfaces.is_empty());
        assert!(cli.exclude_interfaces.is_empty());
    }

    #[test]
    fn parse_filter_options() {
        let cli = Cli::parse_from_iter([
            "netif-watch",
            "--include-interface",
            "^eth",
            "--include-interface",
            "^wlan",
            "--exclude-interface",
            "^docker",
            "--exclude-virtual",
            "--exclude-loopback",
        ]);

        assert_eq!(cli.include_interfaces, vec!["^eth", "^wlan"]);
        assert_eq!(cli.exclude_interfaces, vec!["^docker"]);
        assert!(cli.exclude_virtual);
        assert!(cli.exclude_loopback);
    }

    #[test]
    fn parse_monitor_options() {
        let cli = Cli::parse_from_iter(["netif-watch", "--poll-interval-ms", "250"]);

        assert_eq!(cli.poll_interval_ms, Some(250));
    }

    #[test]
    fn parse_display_options() {
        let cli = Cli::parse_from_iter([
            "netif-watch",
            "--mac-separator",
            "-",
            "--mac-lowercase",
        ]);

        assert_eq!(cli.mac_separator.as_deref(), Some("-"));
        assert!(cli.mac_lowercase);
    }

    #[test]
    fn parse_misc_options() {
        let cli = Cli::parse_from_iter([
            "netif-watch",
            "--config",
            "/path/to/config.toml",
            "--verbose",
        ]);

        assert_eq!(
            cli.config.as_ref().unwrap().to_str(),
            Some("/path/to/config.toml")
        );
        assert!(cli.verbose);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from_iter(["netif-watch", "-v", "-c", "cfg.toml"]);

        assert!(cli.verbose);
        assert_eq!(cli.config.as_ref().unwrap().to_str(), Some("cfg.toml"));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from_iter(["netif-watch", "list", "--exclude-loopback", "-v"]);

        assert!(cli.exclude_loopback);
        assert!(cli.verbose);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let result = Cli::try_parse_from(["netif-watch", "--poll-interval-ms", "fast"]);
        assert!(result.is_err());
    }
}

mod subcommands {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn no_subcommand_means_monitor() {
        let cli = Cli::parse_from_iter(["netif-watch"]);

        assert!(cli.is_monitor());
        assert!(!cli.is_init());
    }

    #[test]
    fn parse_monitor() {
        let cli = Cli::parse_from_iter(["netif-watch", "monitor"]);

        assert_eq!(cli.command, Some(Command::Monitor));
        assert!(cli.is_monitor());
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from_iter(["netif-watch", "list"]);
        assert_eq!(cli.command, Some(Command::List { json: false }));

        let cli = Cli::parse_from_iter(["netif-watch", "list", "--json"]);
        assert_eq!(cli.command, Some(Command::List { json: true }));
        assert!(!cli.is_monitor());
    }

    #[test]
    fn parse_get() {
        let cli = Cli::parse_from_iter(["netif-watch", "get", "eth0"]);

        assert_eq!(
            cli.command,
            Some(Command::Get {
                name: "eth0".to_string()
            })
        );
    }

    #[test]
    fn get_requires_name() {
        let result = Cli::try_parse_from(["netif-watch", "get"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_init_with_default_output() {
        let cli = Cli::parse_from_iter(["netif-watch", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("netif-watch.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_custom_output() {
        let cli = Cli::parse_from_iter(["netif-watch", "init", "--output", "/custom/path/config.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("/custom/path/config.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }
}
