//! One-shot commands that mutate data still announce the change to every
//! watching screen. The shared channel is opened around the mutation and
//! closed again afterwards.

use std::time::Duration;

use crate::live::LiveUpdateChannel;

const BROADCAST_CHANNEL_NOT_OPEN: &str = "BROADCAST_CHANNEL_NOT_OPEN";

/// Runs `mutation` with the channel connected. If the channel does not open
/// within `open_timeout` the mutation still runs; its announcement is then
/// dropped by the channel.
pub fn with_open_channel<T>(
    channel: &LiveUpdateChannel,
    open_timeout: Duration,
    mutation: impl FnOnce(&LiveUpdateChannel) -> T,
) -> T {
    channel.connect(|raw| {
        tracing::trace!(bytes = raw.len(), "ignoring inbound update while broadcasting");
    });

    if !channel.status().wait_until_open(open_timeout) {
        tracing::warn!(
            code = BROADCAST_CHANNEL_NOT_OPEN,
            endpoint = channel.endpoint(),
            timeout_ms = u64::try_from(open_timeout.as_millis()).unwrap_or(u64::MAX),
            "live channel did not open; other screens will not be notified"
        );
    }

    let outcome = mutation(channel);
    channel.close();
    outcome
}
