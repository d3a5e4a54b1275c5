//! State sink port: receives channel values as they are computed.

use wattwise_domain::channel::{ChannelState, ChannelUid};

/// Listener for channel updates.
///
/// Called synchronously from the refresh path, so implementations should
/// hand the value off instead of blocking.
pub trait StateSink: Send + Sync {
    fn state_updated(&self, channel: &ChannelUid, state: ChannelState);
}

impl<T: StateSink> StateSink for std::sync::Arc<T> {
    fn state_updated(&self, channel: &ChannelUid, state: ChannelState) {
        (**self).state_updated(channel, state);
    }
}
