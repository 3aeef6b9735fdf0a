//! Tests for validated configuration.

use std::fs;
use std::io::Write;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};

use crate::network::filter::InterfaceFilter;
use crate::network::{Interface, InterfaceKind, MacAddress};

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{MacFormat, ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["netif-watch"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn eth0() -> Interface {
    Interface::new("eth0", InterfaceKind::Ethernet).with_alias("Ethernet")
}

fn docker0() -> Interface {
    Interface::new("docker0", InterfaceKind::Ethernet).with_virtual(true)
}

fn lo() -> Interface {
    Interface::new("lo", InterfaceKind::Loopback)
}

mod defaults {
    use super::*;

    #[test]
    fn empty_input_uses_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.filter.is_empty());
        assert_eq!(config.mac_format, MacFormat::default());
        assert!(!config.verbose);
    }

    #[test]
    fn default_mac_format_is_uppercase_colon() {
        let mac = MacAddress::new([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]);

        assert_eq!(MacFormat::default().format(&mac), "00:1A:2B:3C:4D:5E");
    }

    #[test]
    fn verbose_is_carried() {
        let config = ValidatedConfig::from_raw(&cli(&["-v"]), None).unwrap();
        assert!(config.verbose);
    }
}

mod precedence {
    use super::*;

    #[test]
    fn cli_interval_beats_toml() {
        let toml = toml("[monitor]\npoll_interval_ms = 500");
        let config =
            ValidatedConfig::from_raw(&cli(&["--poll-interval-ms", "250"]), Some(&toml)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn toml_interval_beats_default() {
        let toml = toml("[monitor]\npoll_interval_ms = 500");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn cli_separator_beats_toml() {
        let toml = toml("[display]\nmac_separator = \"-\"");
        let config =
            ValidatedConfig::from_raw(&cli(&["--mac-separator", "."]), Some(&toml)).unwrap();

        assert_eq!(config.mac_format.separator, Some('.'));
    }

    #[test]
    fn toml_uppercase_setting_is_used() {
        let toml = toml("[display]\nmac_uppercase = false");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(!config.mac_format.upper_case);
    }

    #[test]
    fn cli_lowercase_beats_toml_uppercase() {
        let toml = toml("[display]\nmac_uppercase = true");
        let config = ValidatedConfig::from_raw(&cli(&["--mac-lowercase"]), Some(&toml)).unwrap();

        assert!(!config.mac_format.upper_case);
    }

    #[test]
    fn cli_include_patterns_replace_toml() {
        let toml = toml("[filter]\ninclude = [\"^docker\"]\nexclude = [\"^lo$\"]");
        let config =
            ValidatedConfig::from_raw(&cli(&["--include-interface", "^eth"]), Some(&toml)).unwrap();

        assert_eq!(config.filter.include_count(), 1);
        assert_eq!(config.filter.exclude_count(), 1);
        assert!(config.filter.matches(&eth0()));
        assert!(!config.filter.matches(&docker0()));
        assert!(!config.filter.matches(&lo()));
    }

    #[test]
    fn toml_patterns_used_without_cli() {
        let toml = toml("[filter]\nexclude = [\"^docker\"]");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(config.filter.matches(&eth0()));
        assert!(!config.filter.matches(&docker0()));
    }

    #[test]
    fn boolean_flags_use_or_semantics() {
        let toml = toml("[filter]\nexclude_virtual = true");
        let config = ValidatedConfig::from_raw(&cli(&["--exclude-loopback"]), Some(&toml)).unwrap();

        assert_eq!(config.filter.exclude_count(), 2);
        assert!(config.filter.matches(&eth0()));
        assert!(!config.filter.matches(&docker0()));
        assert!(!config.filter.matches(&lo()));
    }
}

mod validation {
    use super::*;

    #[test]
    fn zero_interval_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--poll-interval-ms", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "poll_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn zero_interval_in_toml_is_rejected() {
        let toml = toml("[monitor]\npoll_interval_ms = 0");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn invalid_regex_reports_pattern() {
        let result = ValidatedConfig::from_raw(&cli(&["--exclude-interface", "[unclosed"]), None);

        match result {
            Err(ConfigError::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
            other => panic!("Expected InvalidRegex, got {other:?}"),
        }
    }

    #[test]
    fn invalid_regex_in_toml_is_rejected() {
        let toml = toml("[filter]\ninclude = [\"(\"]");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidRegex { .. })));
    }

    #[test]
    fn multi_character_separator_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--mac-separator", "::"]), None);

        match result {
            Err(ConfigError::InvalidSeparator { value }) => assert_eq!(value, "::"),
            other => panic!("Expected InvalidSeparator, got {other:?}"),
        }
    }

    #[test]
    fn none_separator_means_compact_form() {
        let config = ValidatedConfig::from_raw(
            &cli(&["--mac-separator", "none", "--mac-lowercase"]),
            None,
        )
        .unwrap();
        let mac = MacAddress::new([0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22]);

        assert_eq!(config.mac_format.separator, None);
        assert_eq!(config.mac_format.format(&mac), "aabbcc001122");
    }

    #[test]
    fn empty_separator_in_toml_means_compact_form() {
        let toml = toml("[display]\nmac_separator = \"\"");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.mac_format.separator, None);
    }
}

mod display {
    use super::*;

    #[test]
    fn display_summarizes_config() {
        let config = ValidatedConfig::from_raw(
            &cli(&["--poll-interval-ms", "250", "--exclude-virtual"]),
            None,
        )
        .unwrap();

        let text = config.to_string();
        assert!(text.contains("poll_interval: 250ms"));
        assert!(text.contains("0 include/1 exclude"));
        assert!(text.contains("mac_separator: ':'"));
        assert!(text.contains("mac_uppercase: true"));
    }

    #[test]
    fn display_shows_compact_separator_as_none() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--mac-separator", "none"]), None).unwrap();

        assert!(config.to_string().contains("mac_separator: none"));
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_without_config_file() {
        let config = ValidatedConfig::load(&cli(&["--poll-interval-ms", "100"])).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[monitor]\npoll_interval_ms = 750\n\n[filter]\nexclude_loopback = true")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ValidatedConfig::load(&cli(&["--config", &path])).unwrap();

        assert_eq!(config.poll_interval, Duration::from_millis(750));
        assert!(!config.filter.matches(&lo()));
    }

    #[test]
    fn load_missing_file_returns_file_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = ValidatedConfig::load(&cli(&["--config", path.to_str().unwrap()]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_malformed_file_returns_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[monitor\npoll_interval_ms = ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = ValidatedConfig::load(&cli(&["--config", &path]));

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn write_default_config_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("netif-watch.toml");

        write_default_config(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml(&content))).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn write_default_config_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/netif-watch.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
