//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_bus;
pub mod price_source;
pub mod state_sink;
pub mod time_provider;

pub use event_bus::EventPublisher;
pub use price_source::PriceSource;
pub use state_sink::StateSink;
pub use time_provider::TimeProvider;
