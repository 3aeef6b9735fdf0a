//! Tests for the run module.

use super::*;
use netif_watch::network::{InterfaceKind, MacAddress};

fn eth0() -> Interface {
    Interface::new("eth0", InterfaceKind::Ethernet)
        .with_alias("Ethernet")
        .with_mac_address(MacAddress::new([0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e]))
        .with_ip_address_info(IpAddressInfo::new(
            "192.168.1.10".parse().unwrap(),
            "255.255.255.0".parse().unwrap(),
        ))
        .with_gateway("192.168.1.1".parse().unwrap())
        .with_state(true, true)
}

mod run_error {
    use super::*;

    #[test]
    fn stream_terminated_displays_message() {
        let error = RunError::StreamTerminated;
        assert_eq!(error.to_string(), "Event stream terminated unexpectedly");
    }

    #[test]
    fn lookup_is_transparent() {
        let error = RunError::from(MonitorError::NotFound {
            name: "eth9".to_string(),
        });
        assert_eq!(error.to_string(), "Interface not found: eth9");
    }

    #[test]
    fn debug_format_works() {
        let error = RunError::StreamTerminated;
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("StreamTerminated"));
    }
}

mod render_interface_block {
    use super::*;

    #[test]
    fn full_interface() {
        let text = render_interface(&eth0(), &MacFormat::default());

        assert_eq!(
            text,
            "eth0 (Ethernet) [Ethernet] up,connected\n\
             \x20   mac: 00:1A:2B:3C:4D:5E\n\
             \x20   inet: 192.168.1.10/24\n\
             \x20   gateway: 192.168.1.1\n"
        );
    }

    #[test]
    fn zero_mac_is_omitted() {
        let loopback = Interface::new("lo", InterfaceKind::Loopback).with_state(true, true);
        let text = render_interface(&loopback, &MacFormat::default());

        assert_eq!(text, "lo (lo) [Loopback] up,connected,virtual\n");
    }

    #[test]
    fn description_shown_when_distinct() {
        let adapter = Interface::new("{GUID}", InterfaceKind::WiFi)
            .with_description("Intel Wireless")
            .with_alias("Wi-Fi");
        let text = render_interface(&adapter, &MacFormat::default());

        assert!(text.starts_with("{GUID} (Wi-Fi) [WiFi] down\n"));
        assert!(text.contains("    description: Intel Wireless\n"));
    }

    #[test]
    fn mac_format_is_applied() {
        let format = MacFormat {
            separator: Some('-'),
            upper_case: false,
        };
        let text = render_interface(&eth0(), &format);

        assert!(text.contains("mac: 00-1a-2b-3c-4d-5e"));
    }
}

mod render_event_line {
    use super::*;

    #[test]
    fn added_line_summarizes_interface() {
        let line = render_event(&InterfaceEvent::Added(eth0()), &MacFormat::default());

        assert_eq!(
            line,
            "+ eth0 (Ethernet) [Ethernet] up,connected mac=00:1A:2B:3C:4D:5E \
             addresses=[192.168.1.10/24] gateways=[192.168.1.1]"
        );
    }

    #[test]
    fn removed_line() {
        let line = render_event(&InterfaceEvent::Removed(eth0()), &MacFormat::default());
        assert_eq!(line, "- eth0");
    }

    #[test]
    fn state_change_lines() {
        let format = MacFormat::default();

        let enabled = InterfaceEvent::EnabledChanged {
            interface: eth0(),
            is_enabled: false,
        };
        let connected = InterfaceEvent::ConnectedChanged {
            interface: eth0(),
            is_connected: true,
        };
        let alias = InterfaceEvent::AliasChanged {
            interface: eth0(),
            alias: "LAN".to_string(),
        };

        assert_eq!(render_event(&enabled, &format), "~ eth0 enabled=false");
        assert_eq!(render_event(&connected, &format), "~ eth0 connected=true");
        assert_eq!(render_event(&alias, &format), "~ eth0 alias=LAN");
    }

    #[test]
    fn address_change_lines() {
        let format = MacFormat::default();
        let v6 = IpAddressInfo::new(
            "fe80::1".parse().unwrap(),
            "ffff:ffff:ffff:ffff::".parse().unwrap(),
        );

        let addresses = InterfaceEvent::IpAddressInfosChanged {
            interface: eth0(),
            ip_address_infos: vec![eth0().ip_address_infos[0], v6],
        };
        let gateways = InterfaceEvent::GatewaysChanged {
            interface: eth0(),
            gateways: Vec::new(),
        };

        assert_eq!(
            render_event(&addresses, &format),
            "~ eth0 addresses=[192.168.1.10/24, fe80::1/64]"
        );
        assert_eq!(render_event(&gateways, &format), "~ eth0 gateways=[]");
    }
}

mod render_json_output {
    use super::*;

    #[test]
    fn json_is_an_array_in_id_order() {
        let mut interfaces = Interfaces::new();
        interfaces.insert("wlan0".to_string(), Interface::new("wlan0", InterfaceKind::WiFi));
        interfaces.insert("eth0".to_string(), eth0());

        let json = render_json(&interfaces).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let list = value.as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], "eth0");
        assert_eq!(list[0]["mac_address"], "00:1A:2B:3C:4D:5E");
        assert_eq!(list[1]["kind"], "WiFi");
    }
}
