//! Seam between the channel manager and a concrete bidirectional transport.

use std::{sync::Arc, time::Duration};

use thiserror::Error;

/// Lifecycle and data events reported by a transport link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    /// Link dropped; a new attempt starts after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    Error(String),
    /// Terminal for the link. No further events follow.
    Closed { initiated_locally: bool },
}

/// Receives the events of one link. May be invoked from a transport worker
/// thread, never concurrently for the same link.
pub type EventSink = Arc<dyn Fn(TransportEvent) + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid live endpoint {endpoint}: {details}")]
    InvalidEndpoint { endpoint: String, details: String },
    #[error("transport link is closed")]
    LinkClosed,
    #[cfg_attr(not(test), allow(dead_code))]
    #[error("transport refused to open a link: {0}")]
    Refused(String),
}

pub trait UpdateTransport: Send + Sync {
    /// Starts connecting to `endpoint` without blocking on the handshake.
    fn open(
        &self,
        endpoint: &str,
        sink: EventSink,
    ) -> Result<Box<dyn TransportLink>, TransportError>;
}

pub trait TransportLink: Send {
    fn send_text(&self, payload: &str) -> Result<(), TransportError>;
    /// Requests closure. Safe to call more than once.
    fn close(&mut self);
}
