//! Async adapter: interface events as a [`Stream`].
//!
//! Callbacks run on the poller thread, so the adapter forwards them
//! through an unbounded channel that never blocks the sender.

use super::{InterfaceEvent, Observer};
use crate::address::{IpAddress, IpAddressInfo};
use crate::network::Interface;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Creates a connected observer/stream pair.
///
/// Register the observer with an [`InterfaceMonitor`](super::InterfaceMonitor);
/// every callback then shows up on the stream as an [`InterfaceEvent`]. The
/// stream ends once the observer (and every clone of its `Arc`) is dropped.
#[must_use]
pub fn event_channel() -> (Arc<ChannelObserver>, EventStream) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        Arc::new(ChannelObserver { sender }),
        EventStream {
            inner: UnboundedReceiverStream::new(receiver),
        },
    )
}

/// Observer that forwards every callback into a channel.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<InterfaceEvent>,
}

impl ChannelObserver {
    fn forward(&self, event: InterfaceEvent) {
        // A closed receiver only means nobody is listening any more.
        let _ = self.sender.send(event);
    }

    /// Returns true once the stream side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Observer for ChannelObserver {
    fn on_interface_added(&self, interface: &Interface) {
        self.forward(InterfaceEvent::Added(interface.clone()));
    }

    fn on_interface_removed(&self, interface: &Interface) {
        self.forward(InterfaceEvent::Removed(interface.clone()));
    }

    fn on_enabled_state_changed(&self, interface: &Interface, is_enabled: bool) {
        self.forward(InterfaceEvent::EnabledChanged {
            interface: interface.clone(),
            is_enabled,
        });
    }

    fn on_connected_state_changed(&self, interface: &Interface, is_connected: bool) {
        self.forward(InterfaceEvent::ConnectedChanged {
            interface: interface.clone(),
            is_connected,
        });
    }

    fn on_alias_changed(&self, interface: &Interface, alias: &str) {
        self.forward(InterfaceEvent::AliasChanged {
            interface: interface.clone(),
            alias: alias.to_string(),
        });
    }

    fn on_ip_address_infos_changed(&self, interface: &Interface, ip_address_infos: &[IpAddressInfo]) {
        self.forward(InterfaceEvent::IpAddressInfosChanged {
            interface: interface.clone(),
            ip_address_infos: ip_address_infos.to_vec(),
        });
    }

    fn on_gateways_changed(&self, interface: &Interface, gateways: &[IpAddress]) {
        self.forward(InterfaceEvent::GatewaysChanged {
            interface: interface.clone(),
            gateways: gateways.to_vec(),
        });
    }
}

/// Stream of interface events fed by a [`ChannelObserver`].
#[derive(Debug)]
pub struct EventStream {
    inner: UnboundedReceiverStream<InterfaceEvent>,
}

impl Stream for EventStream {
    type Item = InterfaceEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
