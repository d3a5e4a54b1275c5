//! Channels: the observable values a best-price thing publishes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// The six channels every best-price thing exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    Start,
    End,
    Hours,
    Active,
    Countdown,
    Remaining,
}

impl ChannelId {
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::End,
        Self::Hours,
        Self::Active,
        Self::Countdown,
        Self::Remaining,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Hours => "hours",
            Self::Active => "active",
            Self::Countdown => "countdown",
            Self::Remaining => "remaining",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown channel name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel {0:?}")]
pub struct UnknownChannel(pub String);

impl FromStr for ChannelId {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Fully-qualified channel: owning thing plus channel id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelUid {
    pub thing: String,
    pub channel: ChannelId,
}

impl ChannelUid {
    #[must_use]
    pub fn new(thing: impl Into<String>, channel: ChannelId) -> Self {
        Self {
            thing: thing.into(),
            channel,
        }
    }
}

impl fmt::Display for ChannelUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.thing, self.channel)
    }
}

/// Typed value of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelState {
    DateTime(Timestamp),
    Text(String),
    OnOff(bool),
    /// Whole minutes.
    Minutes(i64),
    /// No value can be derived (missing prices, no candidate window).
    Undefined,
}

impl ChannelState {
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(ts) => f.write_str(&ts.to_rfc3339()),
            Self::Text(text) => f.write_str(text),
            Self::OnOff(true) => f.write_str("ON"),
            Self::OnOff(false) => f.write_str("OFF"),
            Self::Minutes(minutes) => write!(f, "{minutes} min"),
            Self::Undefined => f.write_str("UNDEF"),
        }
    }
}
