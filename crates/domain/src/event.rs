//! Event: an immutable record of something that happened.
//!
//! Events are produced when a channel value is published and when the
//! price series is refreshed (or fails to refresh).

use serde::{Deserialize, Serialize};

use crate::channel::{ChannelState, ChannelUid};
use crate::id::EventId;
use crate::time::{Timestamp, now};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ChannelUpdated,
    PricesRefreshed,
    RefreshFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    /// Thing the event concerns, if any.
    pub thing: Option<String>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, thing: Option<String>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            thing,
            data,
            timestamp: now(),
        }
    }

    /// A `ChannelUpdated` event carrying `state` for `channel`.
    #[must_use]
    pub fn channel_updated(channel: &ChannelUid, state: &ChannelState) -> Self {
        Self::new(
            EventType::ChannelUpdated,
            Some(channel.thing.clone()),
            serde_json::json!({
                "channel": channel.channel,
                "state": state,
            }),
        )
    }

    /// Decode the payload of a `ChannelUpdated` event.
    #[must_use]
    pub fn as_channel_update(&self) -> Option<(ChannelUid, ChannelState)> {
        if self.event_type != EventType::ChannelUpdated {
            return None;
        }
        let thing = self.thing.clone()?;
        let channel = serde_json::from_value(self.data.get("channel")?.clone()).ok()?;
        let state = serde_json::from_value(self.data.get("state")?.clone()).ok()?;
        Some((ChannelUid::new(thing, channel), state))
    }
}
