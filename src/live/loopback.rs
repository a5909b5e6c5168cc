//! In-process transport hub standing in for the live-update server in tests.
//!
//! Every link opened on the same hub is a peer of the same logical channel:
//! a frame sent by one peer is delivered to all other open peers. Sinks are
//! always invoked with the hub lock released.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::live::transport::{
    EventSink, TransportError, TransportEvent, TransportLink, UpdateTransport,
};

#[derive(Clone, Default)]
pub struct LoopbackHub {
    inner: Arc<Mutex<HubState>>,
}

#[derive(Default)]
struct HubState {
    next_peer_id: u64,
    peers: Vec<Peer>,
    transmitted: Vec<(u64, String)>,
    refuse_with: Option<String>,
    hold_handshakes: bool,
}

struct Peer {
    id: u64,
    sink: EventSink,
    open: bool,
}

impl LoopbackHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links stay in the handshake until [`Self::complete_handshakes`].
    pub fn with_pending_handshakes() -> Self {
        let hub = Self::default();
        hub.lock().hold_handshakes = true;
        hub
    }

    pub fn refusing(reason: &str) -> Self {
        let hub = Self::default();
        hub.lock().refuse_with = Some(reason.to_owned());
        hub
    }

    pub fn complete_handshakes(&self) {
        let sinks: Vec<EventSink> = {
            let mut state = self.lock();
            state.hold_handshakes = false;
            state
                .peers
                .iter_mut()
                .filter(|peer| !peer.open)
                .map(|peer| {
                    peer.open = true;
                    peer.sink.clone()
                })
                .collect()
        };

        for sink in sinks {
            sink(TransportEvent::Opened);
        }
    }

    /// Fails every link still in its handshake, as a refused upgrade would.
    pub fn fail_pending_handshakes(&self, reason: &str) {
        let pending: Vec<Peer> = {
            let mut state = self.lock();
            let (pending, open) = std::mem::take(&mut state.peers)
                .into_iter()
                .partition(|peer| !peer.open);
            state.peers = open;
            pending
        };

        for peer in pending {
            (peer.sink)(TransportEvent::Error(reason.to_owned()));
            (peer.sink)(TransportEvent::Closed {
                initiated_locally: false,
            });
        }
    }

    /// Drops every open connection and starts retrying it. The peers stay
    /// registered and reopen on [`Self::complete_handshakes`].
    pub fn interrupt_open_peers(&self) {
        let sinks: Vec<EventSink> = self
            .lock()
            .peers
            .iter_mut()
            .filter(|peer| peer.open)
            .map(|peer| {
                peer.open = false;
                peer.sink.clone()
            })
            .collect();

        for sink in sinks {
            sink(TransportEvent::Reconnecting {
                attempt: 1,
                delay: Duration::from_millis(500),
            });
        }
    }

    /// Server push to every open peer.
    pub fn inject(&self, text: &str) {
        let sinks: Vec<EventSink> = self
            .lock()
            .peers
            .iter()
            .filter(|peer| peer.open)
            .map(|peer| peer.sink.clone())
            .collect();

        for sink in sinks {
            sink(TransportEvent::Message(text.to_owned()));
        }
    }

    /// Simulates the server going away.
    pub fn drop_all_peers(&self) {
        let peers = std::mem::take(&mut self.lock().peers);

        for peer in peers {
            (peer.sink)(TransportEvent::Error("connection reset by peer".to_owned()));
            (peer.sink)(TransportEvent::Closed {
                initiated_locally: false,
            });
        }
    }

    pub fn open_peer_ids(&self) -> Vec<u64> {
        self.lock()
            .peers
            .iter()
            .filter(|peer| peer.open)
            .map(|peer| peer.id)
            .collect()
    }

    /// Every frame sent through the hub, tagged with the sending peer.
    pub fn transmitted(&self) -> Vec<(u64, String)> {
        self.lock().transmitted.clone()
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UpdateTransport for LoopbackHub {
    fn open(
        &self,
        _endpoint: &str,
        sink: EventSink,
    ) -> Result<Box<dyn TransportLink>, TransportError> {
        let (id, open) = {
            let mut state = self.lock();
            if let Some(reason) = state.refuse_with.clone() {
                return Err(TransportError::Refused(reason));
            }

            state.next_peer_id += 1;
            let id = state.next_peer_id;
            let open = !state.hold_handshakes;
            state.peers.push(Peer {
                id,
                sink: sink.clone(),
                open,
            });
            (id, open)
        };

        if open {
            sink(TransportEvent::Opened);
        }

        Ok(Box::new(LoopbackLink {
            id,
            hub: self.clone(),
        }))
    }
}

struct LoopbackLink {
    id: u64,
    hub: LoopbackHub,
}

impl TransportLink for LoopbackLink {
    fn send_text(&self, payload: &str) -> Result<(), TransportError> {
        let sinks: Vec<EventSink> = {
            let mut state = self.hub.lock();
            if !state.peers.iter().any(|peer| peer.id == self.id && peer.open) {
                return Err(TransportError::LinkClosed);
            }

            state.transmitted.push((self.id, payload.to_owned()));
            state
                .peers
                .iter()
                .filter(|peer| peer.id != self.id && peer.open)
                .map(|peer| peer.sink.clone())
                .collect()
        };

        for sink in sinks {
            sink(TransportEvent::Message(payload.to_owned()));
        }

        Ok(())
    }

    fn close(&mut self) {
        let removed = {
            let mut state = self.hub.lock();
            let position = state.peers.iter().position(|peer| peer.id == self.id);
            position.map(|index| state.peers.remove(index))
        };

        if let Some(peer) = removed {
            (peer.sink)(TransportEvent::Closed {
                initiated_locally: true,
            });
        }
    }
}

impl Drop for LoopbackLink {
    fn drop(&mut self) {
        self.close();
    }
}
