//! Message bus and stream ingestion for the merx catalog service.
//!
//! - [`MessageBus`] — in-process topic bus backed by `tokio::sync::broadcast`.
//! - [`MessageSource`] — blocking-receive capability the consumer loop is
//!   written against, so tests can drive it with a double.
//! - [`ProductConsumer`] — long-running loop that decodes product batch
//!   messages and feeds them to the bulk-insert engine.

pub mod bus;
pub mod consumer;

pub use bus::{BusError, BusMessage, BusSubscription, MessageBus, MessageSource};
pub use consumer::{ProductConsumer, PRODUCT_TOPIC};
