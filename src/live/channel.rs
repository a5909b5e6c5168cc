//! Shared live-update channel.
//!
//! One `LiveUpdateChannel` is built per application session and handed to
//! every screen by clone; clones share the same link. The channel holds at
//! most one transport link: `connect` closes the previous link before opening
//! a new one, and a link that closes on its own is forgotten immediately.
//!
//! Failures never propagate to callers. They are logged with a stable code
//! and recorded in the [`ChannelStatusTracker`].

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use crate::{
    domain::{channel_status::ChannelPhase, update_message::UpdateMessage},
    live::{
        status_tracker::ChannelStatusTracker,
        transport::{EventSink, TransportEvent, TransportLink, UpdateTransport},
    },
    usecases::contracts::UpdateAnnouncer,
};

const LIVE_CHANNEL_OPENED: &str = "LIVE_CHANNEL_OPENED";
const LIVE_CHANNEL_OPEN_FAILED: &str = "LIVE_CHANNEL_OPEN_FAILED";
const LIVE_CHANNEL_REPLACED: &str = "LIVE_CHANNEL_REPLACED";
const LIVE_CHANNEL_RECONNECTING: &str = "LIVE_CHANNEL_RECONNECTING";
const LIVE_CHANNEL_TRANSPORT_ERROR: &str = "LIVE_CHANNEL_TRANSPORT_ERROR";
const LIVE_CHANNEL_CLOSED: &str = "LIVE_CHANNEL_CLOSED";
const LIVE_CHANNEL_CLOSED_BY_PEER: &str = "LIVE_CHANNEL_CLOSED_BY_PEER";
const LIVE_CHANNEL_SEND_DROPPED: &str = "LIVE_CHANNEL_SEND_DROPPED";
const LIVE_CHANNEL_SEND_FAILED: &str = "LIVE_CHANNEL_SEND_FAILED";

type MessageHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Outcome of [`LiveUpdateChannel::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Transmitted,
    Dropped,
}

#[derive(Clone)]
pub struct LiveUpdateChannel {
    endpoint: Arc<str>,
    transport: Arc<dyn UpdateTransport>,
    shared: Arc<Mutex<ChannelShared>>,
    status: ChannelStatusTracker,
}

#[derive(Default)]
struct ChannelShared {
    /// Bumped by every `connect` and `close`; events tagged with an older
    /// generation belong to a superseded link and are ignored.
    generation: u64,
    link: Option<Box<dyn TransportLink>>,
    phase: ChannelPhase,
    /// The current link reported a transport error since `connect`.
    transport_failed: bool,
}

impl LiveUpdateChannel {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn UpdateTransport>) -> Self {
        Self {
            endpoint: Arc::from(endpoint.into()),
            transport,
            shared: Arc::new(Mutex::new(ChannelShared::default())),
            status: ChannelStatusTracker::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn phase(&self) -> ChannelPhase {
        self.lock().phase
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_connected(&self) -> bool {
        self.lock().link.is_some()
    }

    pub fn status(&self) -> &ChannelStatusTracker {
        &self.status
    }

    /// Opens a link and routes every inbound text frame to `on_message`.
    ///
    /// Any existing link is closed first. Returns before the handshake
    /// completes; watch [`Self::phase`] or the status tracker for `Open`.
    pub fn connect<F>(&self, on_message: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let (generation, previous) = {
            let mut shared = self.lock();
            let previous = shared.link.take();
            shared.generation += 1;
            shared.phase = ChannelPhase::Connecting;
            shared.transport_failed = false;
            self.status.on_phase_changed(ChannelPhase::Connecting);
            (shared.generation, previous)
        };

        if let Some(mut previous) = previous {
            tracing::info!(
                code = LIVE_CHANNEL_REPLACED,
                generation,
                "closing previous live link before connecting again"
            );
            previous.close();
        }

        let sink = self.event_sink(generation, Arc::new(on_message));
        let opened = self.transport.open(&self.endpoint, sink);

        let mut shared = self.lock();
        match opened {
            Ok(mut link) => {
                let superseded = shared.generation != generation;
                let already_closed = shared.phase == ChannelPhase::Closed;
                if superseded || already_closed {
                    drop(shared);
                    tracing::debug!(
                        generation,
                        superseded,
                        already_closed,
                        "discarding live link that ended before it was stored"
                    );
                    link.close();
                    return;
                }

                shared.link = Some(link);
                tracing::info!(
                    endpoint = %self.endpoint,
                    generation,
                    "live update link requested"
                );
            }
            Err(error) => {
                tracing::error!(
                    code = LIVE_CHANNEL_OPEN_FAILED,
                    endpoint = %self.endpoint,
                    error = %error,
                    "live update link could not be opened"
                );
                if shared.generation == generation {
                    shared.phase = ChannelPhase::Closed;
                    self.status.on_phase_changed(ChannelPhase::Closed);
                    self.status.on_error(LIVE_CHANNEL_OPEN_FAILED);
                }
            }
        }
    }

    /// Transmits `payload` verbatim when the channel is open. Anything sent
    /// while connecting, closed or never connected is dropped, not queued.
    pub fn send(&self, payload: &str) -> Delivery {
        let shared = self.lock();
        let link = match (&shared.link, shared.phase) {
            (Some(link), ChannelPhase::Open) => link,
            (_, phase) => {
                tracing::warn!(
                    code = LIVE_CHANNEL_SEND_DROPPED,
                    phase = phase.as_label(),
                    "live update channel is not open; dropping outbound frame"
                );
                return Delivery::Dropped;
            }
        };

        match link.send_text(payload) {
            Ok(()) => {
                tracing::debug!(bytes = payload.len(), "live update frame sent");
                Delivery::Transmitted
            }
            Err(error) => {
                tracing::warn!(
                    code = LIVE_CHANNEL_SEND_FAILED,
                    error = %error,
                    "live update frame could not be handed to the transport"
                );
                Delivery::Dropped
            }
        }
    }

    /// Closes the current link, if any. Calling it again is a no-op.
    ///
    /// A `connect` still opening its link when this runs sees the channel
    /// closed and discards that link.
    pub fn close(&self) {
        let link = {
            let mut shared = self.lock();
            shared.generation += 1;
            if matches!(shared.phase, ChannelPhase::Connecting | ChannelPhase::Open) {
                shared.phase = ChannelPhase::Closed;
                self.status.on_phase_changed(ChannelPhase::Closed);
            }
            shared.link.take()
        };

        match link {
            Some(mut link) => {
                link.close();
                tracing::info!(code = LIVE_CHANNEL_CLOSED, "live update channel closed");
            }
            None => tracing::debug!("close requested without a live link"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelShared> {
        lock_shared(&self.shared)
    }

    fn event_sink(&self, generation: u64, handler: MessageHandler) -> EventSink {
        let shared = Arc::downgrade(&self.shared);
        let status = self.status.clone();

        Arc::new(move |event| {
            handle_event(&shared, &status, generation, &handler, event);
        })
    }
}

impl fmt::Debug for LiveUpdateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveUpdateChannel")
            .field("endpoint", &self.endpoint)
            .field("phase", &self.phase())
            .finish()
    }
}

impl UpdateAnnouncer for LiveUpdateChannel {
    fn announce(&self, message: &UpdateMessage) {
        let delivery = self.send(&message.to_payload());
        tracing::debug!(tag = message.tag(), delivery = ?delivery, "update announced");
    }
}

fn lock_shared(shared: &Mutex<ChannelShared>) -> MutexGuard<'_, ChannelShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn handle_event(
    shared: &Weak<Mutex<ChannelShared>>,
    status: &ChannelStatusTracker,
    generation: u64,
    handler: &MessageHandler,
    event: TransportEvent,
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };

    let mut state = lock_shared(&shared);
    if state.generation != generation {
        tracing::trace!(event = ?event, "ignoring event from superseded live link");
        return;
    }

    match event {
        TransportEvent::Message(text) => {
            drop(state);
            status.on_message_received();
            handler(&text);
        }
        TransportEvent::Opened => {
            state.phase = ChannelPhase::Open;
            status.on_phase_changed(ChannelPhase::Open);
            tracing::info!(code = LIVE_CHANNEL_OPENED, "live update channel open");
        }
        TransportEvent::Reconnecting { attempt, delay } => {
            state.phase = ChannelPhase::Connecting;
            status.on_phase_changed(ChannelPhase::Connecting);
            tracing::warn!(
                code = LIVE_CHANNEL_RECONNECTING,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "live update link dropped; reconnecting"
            );
        }
        TransportEvent::Error(details) => {
            state.transport_failed = true;
            status.on_error(LIVE_CHANNEL_TRANSPORT_ERROR);
            tracing::warn!(
                code = LIVE_CHANNEL_TRANSPORT_ERROR,
                details = %details,
                "live update transport error"
            );
        }
        TransportEvent::Closed { initiated_locally } => {
            // A link that ends before opening keeps the transport error as its cause.
            let failed_before_open = state.phase != ChannelPhase::Open && state.transport_failed;
            let stale = state.link.take();
            state.phase = ChannelPhase::Closed;
            status.on_phase_changed(ChannelPhase::Closed);
            if !initiated_locally && !failed_before_open {
                status.on_error(LIVE_CHANNEL_CLOSED_BY_PEER);
            }
            drop(state);
            drop(stale);
            let code = if initiated_locally {
                LIVE_CHANNEL_CLOSED
            } else {
                LIVE_CHANNEL_CLOSED_BY_PEER
            };
            tracing::info!(
                code,
                initiated_locally,
                "live update link ended; channel cleared"
            );
        }
    }
}
