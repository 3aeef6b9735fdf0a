//! Windows-specific interface fetching using `GetAdaptersAddresses`.

use crate::address::{IpAddress, IpAddressInfo, make_packed_mask_v4, make_packed_mask_v6};
use crate::network::{FetchError, Interface, InterfaceFetcher, InterfaceKind, Interfaces, MacAddress};
use std::net::{Ipv4Addr, Ipv6Addr};
use windows::Win32::Foundation::WIN32_ERROR;
use windows::Win32::NetworkManagement::IpHelper::{
    GAA_FLAG_INCLUDE_GATEWAYS, GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER,
    GAA_FLAG_SKIP_MULTICAST, GetAdaptersAddresses, IF_TYPE_ETHERNET_CSMACD, IF_TYPE_IEEE80211,
    IF_TYPE_SOFTWARE_LOOPBACK, IP_ADAPTER_ADDRESSES_LH,
};
use windows::Win32::NetworkManagement::Ndis::IfOperStatusUp;
use windows::Win32::Networking::WinSock::{
    AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR, SOCKADDR_IN, SOCKADDR_IN6,
};

/// Interface type for PPP (Point-to-Point Protocol) adapters.
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_PPP: u32 = 23;

/// Interface type for tunnel adapters (VPN, etc.).
/// Value from Windows SDK `iptypes.h` - not exported by the `windows` crate.
const IF_TYPE_TUNNEL: u32 = 131;

/// Buffer size hint for `GetAdaptersAddresses`.
/// The API will tell us the actual required size if this is insufficient.
const INITIAL_BUFFER_SIZE: u32 = 16384;

/// Windows implementation of [`InterfaceFetcher`] using `GetAdaptersAddresses`.
///
/// `GetAdaptersAddresses` only reports adapters that are present with IP
/// enabled, so every reported adapter counts as enabled. Connection state
/// comes from the operational status.
///
/// # Example
///
/// ```no_run
/// use netif_watch::network::{InterfaceFetcher, platform::WindowsFetcher};
///
/// let interfaces = WindowsFetcher::new().fetch().expect("Failed to fetch adapters");
///
/// for interface in interfaces.values() {
///     println!("{} ({}): {:?}", interface.alias, interface.id, interface.ip_address_infos);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WindowsFetcher {
    _private: (),
}

impl WindowsFetcher {
    /// Creates a new Windows adapter fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceFetcher for WindowsFetcher {
    fn fetch(&self) -> Result<Interfaces, FetchError> {
        fetch_interfaces()
    }
}

fn fetch_interfaces() -> Result<Interfaces, FetchError> {
    let raw_adapters = get_adapter_addresses()?;

    let mut interfaces = Interfaces::new();
    // SAFETY: GetAdaptersAddresses returns a properly aligned buffer for IP_ADAPTER_ADDRESSES_LH.
    #[allow(clippy::cast_ptr_alignment)]
    let mut current = raw_adapters.as_ptr().cast::<IP_ADAPTER_ADDRESSES_LH>();

    // SAFETY: We iterate through a linked list returned by GetAdaptersAddresses.
    // The list is valid as long as the buffer (`raw_adapters`) is alive.
    while !current.is_null() {
        let adapter = unsafe { &*current };

        if let Some(interface) = parse_adapter(adapter) {
            interfaces.insert(interface.id.clone(), interface);
        }

        current = adapter.Next;
    }

    Ok(interfaces)
}

/// Calls `GetAdaptersAddresses` and returns the raw buffer containing adapter data.
///
/// This function handles the two-call pattern:
/// 1. First call with estimated buffer size
/// 2. Retry with exact size if buffer was too small
fn get_adapter_addresses() -> Result<Vec<u8>, FetchError> {
    let flags = GAA_FLAG_SKIP_ANYCAST
        | GAA_FLAG_SKIP_MULTICAST
        | GAA_FLAG_SKIP_DNS_SERVER
        | GAA_FLAG_INCLUDE_GATEWAYS;
    let family = u32::from(AF_UNSPEC.0);

    let mut buffer: Vec<u8> = vec![0u8; INITIAL_BUFFER_SIZE as usize];
    let mut size = INITIAL_BUFFER_SIZE;

    // SAFETY: We provide a valid buffer and size. The function writes adapter
    // information to the buffer and updates `size` with the required length.
    let result = unsafe {
        GetAdaptersAddresses(
            family,
            flags,
            None,
            Some(buffer.as_mut_ptr().cast()),
            &raw mut size,
        )
    };

    handle_api_result(result, &mut buffer, &mut size, flags, family)?;

    Ok(buffer)
}

/// Handles the result of `GetAdaptersAddresses`, retrying once with a larger buffer.
#[cfg(not(tarpaulin_include))]
fn handle_api_result(
    result: u32,
    buffer: &mut Vec<u8>,
    size: &mut u32,
    flags: windows::Win32::NetworkManagement::IpHelper::GET_ADAPTERS_ADDRESSES_FLAGS,
    family: u32,
) -> Result<(), FetchError> {
    use windows::Win32::Foundation::{ERROR_BUFFER_OVERFLOW, NO_ERROR};

    if result == ERROR_BUFFER_OVERFLOW.0 {
        buffer.resize(*size as usize, 0);

        // SAFETY: Same as above, but with correctly sized buffer
        let result = unsafe {
            GetAdaptersAddresses(
                family,
                flags,
                None,
                Some(buffer.as_mut_ptr().cast()),
                &raw mut *size,
            )
        };

        if result != NO_ERROR.0 {
            return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
        }
    } else if result != NO_ERROR.0 {
        return Err(windows::core::Error::from(WIN32_ERROR(result)).into());
    }

    Ok(())
}

/// Parses a single `IP_ADAPTER_ADDRESSES_LH` structure into an [`Interface`].
///
/// Returns `None` if the adapter name cannot be read.
fn parse_adapter(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Option<Interface> {
    // SAFETY: the name strings live in the adapter buffer.
    let id = unsafe { adapter.AdapterName.to_string().ok()? };
    let description = unsafe { adapter.Description.to_string() }.unwrap_or_default();
    let alias = unsafe { adapter.FriendlyName.to_string() }.unwrap_or_else(|_| id.clone());

    let (kind, is_virtual) = map_adapter_type(adapter.IfType);

    let mut interface = Interface::new(id, kind)
        .with_description(description)
        .with_alias(alias)
        .with_state(true, adapter.OperStatus == IfOperStatusUp)
        .with_virtual(is_virtual);

    if adapter.PhysicalAddressLength == 6 {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&adapter.PhysicalAddress[..6]);
        interface.mac_address = MacAddress::new(bytes);
    }

    interface.ip_address_infos = collect_addresses(adapter);
    interface.gateways = collect_gateways(adapter);

    Some(interface)
}

/// Maps Windows `IF_TYPE_*` constants to a kind and a virtual flag.
const fn map_adapter_type(if_type: u32) -> (InterfaceKind, bool) {
    match if_type {
        IF_TYPE_ETHERNET_CSMACD => (InterfaceKind::Ethernet, false),
        IF_TYPE_IEEE80211 => (InterfaceKind::WiFi, false),
        IF_TYPE_SOFTWARE_LOOPBACK => (InterfaceKind::Loopback, true),
        IF_TYPE_TUNNEL | IF_TYPE_PPP => (InterfaceKind::None, true),
        _ => (InterfaceKind::None, false),
    }
}

/// Converts an IPv4 or IPv6 socket address to an [`IpAddress`].
///
/// # Safety Note
///
/// The pointer casts to `SOCKADDR_IN` and `SOCKADDR_IN6` are allowed despite alignment
/// concerns because Windows guarantees proper alignment of these structures when returned
/// from the networking APIs.
#[allow(clippy::cast_ptr_alignment)]
fn socket_address(sockaddr: &SOCKADDR) -> Option<IpAddress> {
    match sockaddr.sa_family {
        f if f == AF_INET => {
            // SAFETY: We verified the family is AF_INET, so this is a valid cast.
            let sockaddr_in = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN>()) };
            // SAFETY: sin_addr contains the IPv4 address bytes in network order.
            let octets = unsafe { sockaddr_in.sin_addr.S_un.S_un_b };
            Some(Ipv4Addr::new(octets.s_b1, octets.s_b2, octets.s_b3, octets.s_b4).into())
        }
        f if f == AF_INET6 => {
            // SAFETY: We verified the family is AF_INET6, so this is a valid cast.
            let sockaddr_in6 = unsafe { &*(std::ptr::from_ref(sockaddr).cast::<SOCKADDR_IN6>()) };
            // SAFETY: We verified this is an IPv6 address, so the union field is valid.
            let octets = unsafe { sockaddr_in6.sin6_addr.u.Byte };
            Some(Ipv6Addr::from(octets).into())
        }
        _ => None,
    }
}

/// Builds the netmask matching an address's family from its on-link prefix.
fn prefix_netmask(address: &IpAddress, prefix_length: u8) -> IpAddress {
    if address.v4().is_ok() {
        IpAddress::from_packed_v4(make_packed_mask_v4(prefix_length))
    } else {
        IpAddress::from_packed_v6(make_packed_mask_v6(prefix_length))
    }
}

fn collect_addresses(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<IpAddressInfo> {
    let mut infos = Vec::new();
    let mut unicast = adapter.FirstUnicastAddress;

    // SAFETY: We iterate through a linked list of unicast addresses.
    // Each address is valid as long as the parent adapter buffer is alive.
    while !unicast.is_null() {
        let entry = unsafe { &*unicast };

        if let Some(address) =
            unsafe { entry.Address.lpSockaddr.as_ref() }.and_then(socket_address)
        {
            let netmask = prefix_netmask(&address, entry.OnLinkPrefixLength);
            infos.push(IpAddressInfo::new(address, netmask));
        }

        unicast = entry.Next;
    }

    infos
}

fn collect_gateways(adapter: &IP_ADAPTER_ADDRESSES_LH) -> Vec<IpAddress> {
    let mut gateways = Vec::new();
    let mut gateway = adapter.FirstGatewayAddress;

    // SAFETY: Same list ownership as the unicast addresses.
    while !gateway.is_null() {
        let entry = unsafe { &*gateway };

        if let Some(address) =
            unsafe { entry.Address.lpSockaddr.as_ref() }.and_then(socket_address)
        {
            gateways.push(address);
        }

        gateway = entry.Next;
    }

    gateways
}
