use std::time::{SystemTime, UNIX_EPOCH};

/// Lifecycle of the live-update link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPhase {
    #[default]
    Unconnected,
    Connecting,
    Open,
    Closed,
}

impl ChannelPhase {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Unconnected => "LIVE_UNCONNECTED",
            Self::Connecting => "LIVE_CONNECTING",
            Self::Open => "LIVE_OPEN",
            Self::Closed => "LIVE_CLOSED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub code: String,
    pub at_unix_ms: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub phase: ChannelPhase,
    pub updated_at_unix_ms: u128,
    pub last_error: Option<StatusError>,
    pub messages_received: u64,
}

impl Default for ChannelStatus {
    fn default() -> Self {
        Self {
            phase: ChannelPhase::Unconnected,
            updated_at_unix_ms: now_unix_ms(),
            last_error: None,
            messages_received: 0,
        }
    }
}

pub fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
