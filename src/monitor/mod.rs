//! Monitor layer for detecting network interface changes.
//!
//! This module provides types and functions for:
//! - Representing interface change events ([`InterfaceEvent`])
//! - Detecting changes between snapshots ([`diff`])
//! - Receiving notifications ([`Observer`])
//! - Producing snapshots ([`PollingDriver`], [`ThreadPoller`])
//! - The monitor service itself ([`InterfaceMonitor`], [`Subscription`])
//! - Consuming events asynchronously ([`event_channel`], [`EventStream`])
//! - Error handling ([`MonitorError`])

mod change;
mod error;
mod observer;
mod poller;
mod service;
mod stream;

pub use change::{InterfaceEvent, diff};
pub use error::MonitorError;
pub use observer::{Observer, PollingDriver, SnapshotSink};
pub use poller::{DEFAULT_POLL_INTERVAL, POLLER_THREAD_NAME, ThreadPoller};
pub use service::{InterfaceMonitor, Subscription};
pub use stream::{ChannelObserver, EventStream, event_channel};
