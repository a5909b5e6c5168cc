use std::{
    sync::{mpsc, Arc, Mutex},
    time::{Duration, Instant},
};

use crate::domain::channel_status::{now_unix_ms, ChannelPhase, ChannelStatus, StatusError};

/// Observable connection state of a live-update channel.
#[derive(Clone, Debug, Default)]
pub struct ChannelStatusTracker {
    inner: Arc<Mutex<StatusTrackerState>>,
}

#[derive(Debug, Default)]
struct StatusTrackerState {
    snapshot: ChannelStatus,
    subscribers: Vec<mpsc::Sender<ChannelStatus>>,
}

impl ChannelStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot is sent immediately, then one per change.
    pub fn subscribe(&self) -> mpsc::Receiver<ChannelStatus> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut state) = self.inner.lock() {
            let _ = tx.send(state.snapshot.clone());
            state.subscribers.push(tx);
        }
        rx
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn snapshot(&self) -> ChannelStatus {
        self.inner
            .lock()
            .map(|state| state.snapshot.clone())
            .unwrap_or_default()
    }

    pub fn on_phase_changed(&self, phase: ChannelPhase) {
        self.mutate(|snapshot| {
            snapshot.phase = phase;
            if phase == ChannelPhase::Open {
                snapshot.last_error = None;
            }
        });
    }

    pub fn on_error(&self, code: &str) {
        self.mutate(|snapshot| {
            snapshot.last_error = Some(StatusError {
                code: code.to_owned(),
                at_unix_ms: now_unix_ms(),
            });
        });
    }

    /// Counts an inbound frame without notifying subscribers.
    pub fn on_message_received(&self) {
        if let Ok(mut state) = self.inner.lock() {
            state.snapshot.messages_received += 1;
        }
    }

    /// Blocks until the channel reports `Open`. Gives up on `Closed` or
    /// when `timeout` elapses.
    pub fn wait_until_open(&self, timeout: Duration) -> bool {
        let updates = self.subscribe();
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match updates.recv_timeout(remaining) {
                Ok(status) if status.phase == ChannelPhase::Open => return true,
                Ok(status) if status.phase == ChannelPhase::Closed => return false,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    }

    fn mutate<F>(&self, mutator: F)
    where
        F: FnOnce(&mut ChannelStatus),
    {
        if let Ok(mut state) = self.inner.lock() {
            mutator(&mut state.snapshot);
            state.snapshot.updated_at_unix_ms = now_unix_ms();
            let payload = state.snapshot.clone();
            state
                .subscribers
                .retain(|sub| sub.send(payload.clone()).is_ok());
        }
    }
}
