//! Typed contract for live-update frames.
//!
//! Frames are UTF-8 text, conventionally a JSON object with a `type` tag.
//! Parsing never fails: anything that does not carry a readable tag degrades
//! to `UpdateMessage::Unknown` holding the raw text, so it simply matches no
//! refresh target.

use serde::{Deserialize, Serialize};

pub const WALLET_UPDATED: &str = "WALLET_UPDATED";
pub const TRANSACTION_UPDATED: &str = "TRANSACTION_UPDATED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMessage {
    WalletUpdated,
    TransactionUpdated,
    Unknown(String),
}

/// Which list a screen has to fetch again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTarget {
    Wallets,
    Transactions,
}

impl RefreshTarget {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Wallets => "wallets",
            Self::Transactions => "transactions",
        }
    }
}

#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct OutboundEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

/// Reads the `type` tag of a frame, falling back to the raw text.
pub fn parse_update_tag(raw: &str) -> String {
    match serde_json::from_str::<InboundEnvelope>(raw) {
        Ok(envelope) => envelope.kind,
        Err(_) => raw.to_owned(),
    }
}

impl UpdateMessage {
    pub fn parse(raw: &str) -> Self {
        Self::from_tag(parse_update_tag(raw))
    }

    pub fn from_tag(tag: String) -> Self {
        match tag.as_str() {
            WALLET_UPDATED => Self::WalletUpdated,
            TRANSACTION_UPDATED => Self::TransactionUpdated,
            _ => Self::Unknown(tag),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::WalletUpdated => WALLET_UPDATED,
            Self::TransactionUpdated => TRANSACTION_UPDATED,
            Self::Unknown(tag) => tag,
        }
    }

    pub fn refresh_target(&self) -> Option<RefreshTarget> {
        match self {
            Self::WalletUpdated => Some(RefreshTarget::Wallets),
            Self::TransactionUpdated => Some(RefreshTarget::Transactions),
            Self::Unknown(_) => None,
        }
    }

    /// Wire form announced after a successful mutation.
    pub fn to_payload(&self) -> String {
        let envelope = OutboundEnvelope { kind: self.tag() };
        serde_json::to_string(&envelope)
            .unwrap_or_else(|_| format!("{{\"type\":\"{}\"}}", self.tag()))
    }
}
