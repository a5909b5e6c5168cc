//! Screen focus and blur protocol over the shared live channel.
//!
//! A focused screen holds the channel open and turns each matching update
//! message into a [`ScreenEvent::Refresh`] for the thread that owns the
//! screen state. Blurring the screen closes the channel.

use std::sync::{mpsc::Sender, Mutex};

use crate::{
    domain::{
        events::ScreenEvent,
        update_message::{RefreshTarget, UpdateMessage},
    },
    live::LiveUpdateChannel,
};

const SCREEN_FOCUSED: &str = "SCREEN_FOCUSED";
const SCREEN_BLURRED: &str = "SCREEN_BLURRED";
const SCREEN_UPDATE_IGNORED: &str = "SCREEN_UPDATE_IGNORED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// Wallet summary plus recent transactions.
    Home,
    Wallets,
    Expenses,
}

impl ScreenKind {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Wallets => "wallets",
            Self::Expenses => "expenses",
        }
    }

    /// Lists shown by the screen, in fetch order.
    pub fn targets(self) -> &'static [RefreshTarget] {
        match self {
            Self::Home => &[RefreshTarget::Wallets, RefreshTarget::Transactions],
            Self::Wallets => &[RefreshTarget::Wallets],
            Self::Expenses => &[RefreshTarget::Transactions],
        }
    }

    pub fn watches(self, target: RefreshTarget) -> bool {
        self.targets().contains(&target)
    }
}

pub struct LiveScreen {
    kind: ScreenKind,
    channel: LiveUpdateChannel,
}

impl LiveScreen {
    pub fn new(kind: ScreenKind, channel: LiveUpdateChannel) -> Self {
        Self { kind, channel }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn channel(&self) -> &LiveUpdateChannel {
        &self.channel
    }

    /// Connects the channel and forwards matching refresh requests to `events`.
    pub fn on_focus(&self, events: Sender<ScreenEvent>) {
        let kind = self.kind;
        let events = Mutex::new(events);

        self.channel.connect(move |raw| {
            let message = UpdateMessage::parse(raw);
            match message.refresh_target() {
                Some(target) if kind.watches(target) => {
                    let delivered = events
                        .lock()
                        .map(|events| events.send(ScreenEvent::Refresh(target)).is_ok())
                        .unwrap_or(false);
                    if !delivered {
                        tracing::debug!(
                            screen = kind.as_label(),
                            "screen is gone; dropping refresh request"
                        );
                    }
                }
                _ => tracing::debug!(
                    code = SCREEN_UPDATE_IGNORED,
                    screen = kind.as_label(),
                    tag = message.tag(),
                    "update does not concern this screen"
                ),
            }
        });

        tracing::info!(code = SCREEN_FOCUSED, screen = kind.as_label(), "screen focused");
    }

    pub fn on_blur(&self) {
        self.channel.close();
        tracing::info!(
            code = SCREEN_BLURRED,
            screen = self.kind.as_label(),
            "screen blurred"
        );
    }
}
