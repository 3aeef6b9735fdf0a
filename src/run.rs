//! Application execution logic.
//!
//! This module contains the `list`, `get` and `monitor` commands, and the
//! text rendering they share.

use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tokio_stream::StreamExt;

use netif_watch::address::{IpAddress, IpAddressInfo};
use netif_watch::config::{MacFormat, ValidatedConfig};
use netif_watch::monitor::{InterfaceEvent, InterfaceMonitor, MonitorError, Observer, event_channel};
use netif_watch::network::filter::{FilterChain, FilteredFetcher};
use netif_watch::network::platform::PlatformFetcher;
use netif_watch::network::{Interface, Interfaces};

/// Type alias for the application's filtered fetcher.
type AppFetcher = FilteredFetcher<PlatformFetcher, FilterChain>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The requested interface does not exist.
    #[error(transparent)]
    Lookup(#[from] MonitorError),

    /// Failed to render interfaces as JSON.
    #[error("Failed to serialize interfaces: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to create the async runtime.
    #[error("Failed to create Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Unexpected stream termination.
    #[error("Event stream terminated unexpectedly")]
    StreamTerminated,
}

/// Builds the monitor over the filtered platform fetcher.
fn create_monitor(config: ValidatedConfig) -> InterfaceMonitor {
    let fetcher: AppFetcher = FilteredFetcher::new(PlatformFetcher::new(), config.filter);
    InterfaceMonitor::with_poll_interval(fetcher, config.poll_interval)
}

/// Prints every interface once.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn list(config: ValidatedConfig, json: bool) -> Result<(), RunError> {
    let mac_format = config.mac_format;
    let monitor = create_monitor(config);
    let interfaces = monitor.interfaces();
    tracing::debug!("Fetched {} interfaces", interfaces.len());

    if json {
        println!("{}", render_json(&interfaces)?);
    } else {
        for interface in interfaces.values() {
            print!("{}", render_interface(interface, &mac_format));
        }
    }
    Ok(())
}

/// Prints a single interface.
///
/// # Errors
///
/// Returns [`RunError::Lookup`] if no interface has this id.
pub fn get(config: ValidatedConfig, name: &str) -> Result<(), RunError> {
    let mac_format = config.mac_format;
    let monitor = create_monitor(config);
    let interface = monitor.get_interface_by_name(name)?;

    print!("{}", render_interface(&interface, &mac_format));
    Ok(())
}

/// Prints the current interfaces as `+` lines, then every change until a
/// shutdown signal arrives.
///
/// # Errors
///
/// Returns [`RunError::StreamTerminated`] if the event stream ends while
/// the subscription is still alive.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Platform-specific network APIs
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn monitor(config: ValidatedConfig) -> Result<(), RunError> {
    let mac_format = config.mac_format;
    let poll_interval = config.poll_interval;
    let monitor = create_monitor(config);

    let (observer, mut stream) = event_channel();
    let observer: Arc<dyn Observer> = observer;
    // Replay of the current interfaces is queued before this returns.
    let _subscription = monitor.subscribe(observer);

    tracing::info!(
        "Monitoring network interfaces (poll every {}ms), press Ctrl+C to stop",
        poll_interval.as_millis()
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            event = stream.next() => {
                match event {
                    Some(event) => println!("{}", render_event(&event, &mac_format)),
                    None => return Err(RunError::StreamTerminated),
                }
            }
        }
    }
}

/// Renders interfaces as pretty-printed JSON.
fn render_json(interfaces: &Interfaces) -> Result<String, serde_json::Error> {
    let list: Vec<&Interface> = interfaces.values().collect();
    serde_json::to_string_pretty(&list)
}

/// Renders one interface as an indented text block.
fn render_interface(interface: &Interface, mac_format: &MacFormat) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}) [{}]{}",
        interface.id,
        interface.alias,
        interface.kind,
        render_flags(interface)
    );
    if interface.description != interface.id {
        let _ = writeln!(out, "    description: {}", interface.description);
    }
    if interface.mac_address.is_valid() {
        let _ = writeln!(out, "    mac: {}", mac_format.format(&interface.mac_address));
    }
    for info in &interface.ip_address_infos {
        let _ = writeln!(out, "    inet: {info}");
    }
    for gateway in &interface.gateways {
        let _ = writeln!(out, "    gateway: {gateway}");
    }

    out
}

fn render_flags(interface: &Interface) -> String {
    let mut flags = Vec::new();
    flags.push(if interface.is_enabled { "up" } else { "down" });
    if interface.is_connected {
        flags.push("connected");
    }
    if interface.is_virtual {
        flags.push("virtual");
    }
    format!(" {}", flags.join(","))
}

/// Renders one event as a single `+`, `-` or `~` line.
fn render_event(event: &InterfaceEvent, mac_format: &MacFormat) -> String {
    let id = &event.interface().id;
    match event {
        InterfaceEvent::Added(interface) => {
            let mut line = format!("+ {id} ({}) [{}]", interface.alias, interface.kind);
            line.push_str(&render_flags(interface));
            if interface.mac_address.is_valid() {
                let _ = write!(line, " mac={}", mac_format.format(&interface.mac_address));
            }
            if !interface.ip_address_infos.is_empty() {
                let _ = write!(line, " addresses={}", join_infos(&interface.ip_address_infos));
            }
            if !interface.gateways.is_empty() {
                let _ = write!(line, " gateways={}", join_addresses(&interface.gateways));
            }
            line
        }
        InterfaceEvent::Removed(_) => format!("- {id}"),
        InterfaceEvent::EnabledChanged { is_enabled, .. } => format!("~ {id} enabled={is_enabled}"),
        InterfaceEvent::ConnectedChanged { is_connected, .. } => {
            format!("~ {id} connected={is_connected}")
        }
        InterfaceEvent::AliasChanged { alias, .. } => format!("~ {id} alias={alias}"),
        InterfaceEvent::IpAddressInfosChanged {
            ip_address_infos, ..
        } => format!("~ {id} addresses={}", join_infos(ip_address_infos)),
        InterfaceEvent::GatewaysChanged { gateways, .. } => {
            format!("~ {id} gateways={}", join_addresses(gateways))
        }
    }
}

fn join_infos(infos: &[IpAddressInfo]) -> String {
    let parts: Vec<String> = infos.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn join_addresses(addresses: &[IpAddress]) -> String {
    let parts: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
