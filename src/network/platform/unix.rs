//! Unix network interface fetching using `getifaddrs`.

use std::collections::BTreeMap;
use std::ffi::CStr;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use crate::address::{IpAddress, IpAddressInfo};
use crate::network::{FetchError, Interface, InterfaceFetcher, InterfaceKind, Interfaces, MacAddress};

/// Kernel routing table, one route per line.
const PROC_NET_ROUTE: &str = "/proc/net/route";

/// Unix implementation of [`InterfaceFetcher`] using `getifaddrs`.
///
/// `getifaddrs` yields one entry per (interface, address family) pair. The
/// first entry seen for a name creates the interface record and later
/// entries append to it. On Linux the link-layer entry carries the MAC.
///
/// # Example
///
/// ```no_run
/// use netif_watch::network::{InterfaceFetcher, platform::UnixFetcher};
///
/// let interfaces = UnixFetcher::new().fetch().unwrap();
/// for interface in interfaces.values() {
///     println!("{}: {:?}", interface.id, interface.ip_address_infos);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UnixFetcher {
    _private: (),
}

impl UnixFetcher {
    /// Creates a new Unix interface fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceFetcher for UnixFetcher {
    fn fetch(&self) -> Result<Interfaces, FetchError> {
        let mut interfaces = Interfaces::new();
        let addresses = IfAddrs::new()?;

        for ifa in addresses.iter() {
            if ifa.ifa_name.is_null() {
                continue;
            }
            // SAFETY: ifa_name is a NUL-terminated string owned by the list.
            let name = unsafe { CStr::from_ptr(ifa.ifa_name) }
                .to_string_lossy()
                .into_owned();

            let interface = interfaces
                .entry(name.clone())
                .or_insert_with(|| new_interface(&name, ifa.ifa_flags));

            // SAFETY: ifa_addr is either null or a sockaddr valid for the list lifetime.
            let Some(addr) = (unsafe { ifa.ifa_addr.as_ref() }) else {
                continue;
            };
            match i32::from(addr.sa_family) {
                libc::AF_INET | libc::AF_INET6 => {
                    // SAFETY: the family was checked and the netmask shares it.
                    let info = unsafe { address_info(ifa.ifa_addr, ifa.ifa_netmask) };
                    if let Some(info) = info {
                        interface.ip_address_infos.push(info);
                    }
                }
                #[cfg(any(target_os = "linux", target_os = "android"))]
                libc::AF_PACKET => {
                    // SAFETY: AF_PACKET entries point at a sockaddr_ll.
                    if let Some(mac) = unsafe { link_layer_address(ifa.ifa_addr) } {
                        interface.mac_address = mac;
                    }
                }
                _ => {}
            }
        }

        attach_default_gateways(&mut interfaces);
        Ok(interfaces)
    }
}

/// Owns the list returned by `getifaddrs` and frees it on drop.
struct IfAddrs(*mut libc::ifaddrs);

impl IfAddrs {
    fn new() -> io::Result<Self> {
        let mut head: *mut libc::ifaddrs = std::ptr::null_mut();
        // SAFETY: getifaddrs writes a list head we own until freeifaddrs.
        if unsafe { libc::getifaddrs(&raw mut head) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(head))
    }

    fn iter(&self) -> impl Iterator<Item = &libc::ifaddrs> + '_ {
        // SAFETY: every node stays valid until self is dropped.
        std::iter::successors(unsafe { self.0.as_ref() }, |ifa| unsafe {
            ifa.ifa_next.as_ref()
        })
    }
}

impl Drop for IfAddrs {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from getifaddrs and is freed once.
            unsafe { libc::freeifaddrs(self.0) };
        }
    }
}

#[allow(clippy::cast_sign_loss)]
const fn has_flags(flags: libc::c_uint, wanted: libc::c_int) -> bool {
    flags & wanted as libc::c_uint == wanted as libc::c_uint
}

fn new_interface(name: &str, flags: libc::c_uint) -> Interface {
    let kind = if has_flags(flags, libc::IFF_LOOPBACK) {
        InterfaceKind::Loopback
    } else if Path::new("/sys/class/net").join(name).join("wireless").exists() {
        InterfaceKind::WiFi
    } else {
        InterfaceKind::Ethernet
    };
    let is_virtual =
        kind.is_loopback() || Path::new("/sys/devices/virtual/net").join(name).exists();

    Interface::new(name, kind)
        .with_state(
            has_flags(flags, libc::IFF_UP),
            has_flags(flags, libc::IFF_UP | libc::IFF_RUNNING),
        )
        .with_virtual(is_virtual)
}

/// Reads an address/netmask pair.
///
/// # Safety
///
/// `addr` must point at a `sockaddr_in` or `sockaddr_in6` matching its
/// family. `netmask` must be null or point at a sockaddr of the same family.
unsafe fn address_info(
    addr: *const libc::sockaddr,
    netmask: *const libc::sockaddr,
) -> Option<IpAddressInfo> {
    let address = unsafe { socket_address(addr) }?;
    let netmask = unsafe { socket_address(netmask) }.unwrap_or_default();
    Some(IpAddressInfo::new(address, netmask))
}

#[allow(clippy::cast_ptr_alignment)]
unsafe fn socket_address(addr: *const libc::sockaddr) -> Option<IpAddress> {
    let family = i32::from(unsafe { addr.as_ref() }?.sa_family);
    match family {
        libc::AF_INET => {
            let sin = unsafe { &*addr.cast::<libc::sockaddr_in>() };
            Some(Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes()).into())
        }
        libc::AF_INET6 => {
            let sin6 = unsafe { &*addr.cast::<libc::sockaddr_in6>() };
            Some(Ipv6Addr::from(sin6.sin6_addr.s6_addr).into())
        }
        _ => None,
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
#[allow(clippy::cast_ptr_alignment)]
unsafe fn link_layer_address(addr: *const libc::sockaddr) -> Option<MacAddress> {
    let sll = unsafe { &*addr.cast::<libc::sockaddr_ll>() };
    if sll.sll_halen != 6 {
        return None;
    }
    let mut bytes = [0u8; 6];
    bytes.copy_from_slice(&sll.sll_addr[..6]);
    Some(MacAddress::new(bytes))
}

fn attach_default_gateways(interfaces: &mut Interfaces) {
    let Ok(table) = std::fs::read_to_string(PROC_NET_ROUTE) else {
        return;
    };
    for (name, gateways) in parse_default_gateways(&table) {
        if let Some(interface) = interfaces.get_mut(&name) {
            interface.gateways = gateways;
        }
    }
}

/// Extracts default IPv4 gateways per interface from `/proc/net/route`.
///
/// Destination and gateway are the kernel's native-endian hex dump of the
/// network-order address. Rows that are not default routes, or have no
/// gateway, are skipped. Duplicates keep their first position.
fn parse_default_gateways(table: &str) -> BTreeMap<String, Vec<IpAddress>> {
    let mut gateways: BTreeMap<String, Vec<IpAddress>> = BTreeMap::new();

    for line in table.lines().skip(1) {
        let mut columns = line.split_whitespace();
        let (Some(name), Some(destination), Some(gateway)) =
            (columns.next(), columns.next(), columns.next())
        else {
            continue;
        };
        let (Ok(destination), Ok(gateway)) = (
            u32::from_str_radix(destination, 16),
            u32::from_str_radix(gateway, 16),
        ) else {
            continue;
        };
        if destination != 0 || gateway == 0 {
            continue;
        }

        let address = IpAddress::from(Ipv4Addr::from(gateway.to_ne_bytes()));
        let list = gateways.entry(name.to_string()).or_default();
        if !list.contains(&address) {
            list.push(address);
        }
    }

    gateways
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE_TABLE: &str = "\
Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
eth0\t00000000\t0101A8C0\t0003\t0\t0\t100\t00000000\t0\t0\t0
eth0\t0001A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0
wlan0\t00000000\t FE01A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0
docker0\t000011AC\t00000000\t0001\t0\t0\t0\t0000FFFF\t0\t0\t0
eth0\t00000000\t0101A8C0\t0003\t0\t0\t200\t00000000\t0\t0\t0
";

    mod route_table {
        use super::*;

        #[test]
        #[cfg(target_endian = "little")]
        fn default_routes_yield_gateways() {
            let gateways = parse_default_gateways(ROUTE_TABLE);

            assert_eq!(gateways.len(), 2);
            assert_eq!(gateways["eth0"].len(), 1);
            assert_eq!(gateways["eth0"][0].as_str(), "192.168.1.1");
            assert_eq!(gateways["wlan0"][0].as_str(), "192.168.1.254");
        }

        #[test]
        fn non_default_routes_are_skipped() {
            let gateways = parse_default_gateways(ROUTE_TABLE);
            assert!(!gateways.contains_key("docker0"));
        }

        #[test]
        fn malformed_lines_are_skipped() {
            let table = "Iface\tDestination\tGateway\nbroken\nx\tzz\t01\n";
            assert!(parse_default_gateways(table).is_empty());
        }

        #[test]
        fn header_only_is_empty() {
            assert!(parse_default_gateways("Iface\tDestination\tGateway\n").is_empty());
        }
    }

    mod flags {
        use super::*;

        #[test]
        #[allow(clippy::cast_sign_loss)]
        fn connected_needs_up_and_running() {
            let up = libc::IFF_UP as libc::c_uint;
            let running = libc::IFF_RUNNING as libc::c_uint;

            assert!(has_flags(up, libc::IFF_UP));
            assert!(!has_flags(up, libc::IFF_UP | libc::IFF_RUNNING));
            assert!(has_flags(up | running, libc::IFF_UP | libc::IFF_RUNNING));
        }

        #[test]
        #[allow(clippy::cast_sign_loss)]
        fn loopback_flag_gives_virtual_loopback() {
            let flags = (libc::IFF_LOOPBACK | libc::IFF_UP | libc::IFF_RUNNING) as libc::c_uint;
            let interface = new_interface("lo-test-unlikely-name", flags);

            assert_eq!(interface.kind, InterfaceKind::Loopback);
            assert!(interface.is_virtual);
            assert!(interface.is_enabled);
            assert!(interface.is_connected);
        }
    }

    // Integration test against the running system.
    #[test]
    fn fetch_returns_at_least_loopback() {
        let interfaces = UnixFetcher::new().fetch().unwrap();

        let has_loopback = interfaces.values().any(|interface| {
            interface.kind == InterfaceKind::Loopback
                && interface
                    .ip_address_infos
                    .iter()
                    .any(|info| matches!(info.address.as_str(), "127.0.0.1" | "::1"))
        });
        assert!(has_loopback, "no loopback in {interfaces:?}");
    }
}
