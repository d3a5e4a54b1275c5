//! Event bus port: publish/subscribe for domain events.

use std::future::Future;

use wattwise_domain::error::WattwiseError;
use wattwise_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WattwiseError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), WattwiseError>> + Send {
        (**self).publish(event)
    }
}
