//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use wattwise_domain::channel::{ChannelState, ChannelUid};
use wattwise_domain::error::WattwiseError;
use wattwise_domain::event::Event;

use crate::ports::{EventPublisher, StateSink};

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped). Also acts as a [`StateSink`], turning each
/// channel update into a `ChannelUpdated` event.
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    fn send(&self, event: Event) {
        // fails only when nobody is subscribed
        let _ = self.sender.send(event);
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WattwiseError>> + Send {
        self.send(event);
        async { Ok(()) }
    }
}

impl StateSink for InProcessEventBus {
    fn state_updated(&self, channel: &ChannelUid, state: ChannelState) {
        self.send(Event::channel_updated(channel, &state));
    }
}
