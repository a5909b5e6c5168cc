//! Live-update integration layer: the shared channel, its transport seam and
//! the WebSocket transport used at runtime.

pub mod backoff;
pub mod channel;
#[cfg(test)]
pub mod loopback;
pub mod status_tracker;
pub mod transport;
pub mod websocket;

pub use backoff::ReconnectPolicy;
pub use channel::LiveUpdateChannel;
pub use websocket::WebSocketTransport;

/// Returns the live module name for smoke checks.
pub fn module_name() -> &'static str {
    "live"
}
