use super::{channel_status::ChannelPhase, update_message::RefreshTarget};

/// Events driving a focused screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Refresh(RefreshTarget),
    ChannelChanged(ChannelPhase),
    QuitRequested,
}
