//! In-process message bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`MessageBus`] carries raw payload bytes on named topics, shared via
//! `Arc<MessageBus>` across the application. Consumers receive through
//! [`BusSubscription`], which implements the [`MessageSource`] capability
//! trait so a loop written against it can also be driven by a test double.

use async_trait::async_trait;
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// A raw message delivered on a named topic.
#[derive(Debug, Clone)]
pub struct BusMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Receive-side failure of a bus subscription.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The receiver fell behind and the bus dropped messages on it.
    #[error("subscription lagged, {0} messages dropped")]
    Lagged(u64),
    /// Every sender is gone; no further messages will ever arrive.
    #[error("bus closed")]
    Closed,
}

/// Blocking-receive capability over a stream of bus messages.
///
/// The consumer loop suspends on [`recv`](MessageSource::recv) with no
/// timeout until a message arrives or the source reports an error.
#[async_trait]
pub trait MessageSource: Send {
    async fn recv(&mut self) -> Result<BusMessage, BusError>;
}

/// In-process fan-out bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`BusMessage`].
pub struct MessageBus {
    sender: broadcast::Sender<BusMessage>,
}

impl MessageBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow subscribers observe [`BusError::Lagged`].
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a message to all current subscribers.
    ///
    /// With zero subscribers the message is silently dropped.
    pub fn publish(&self, message: BusMessage) {
        // Ignore the SendError — it only means there are no receivers.
        let _ = self.sender.send(message);
    }

    /// Subscribe to all messages published on this bus, on every topic.
    pub fn subscribe(&self) -> BusSubscription {
        BusSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// One subscriber's receive handle on a [`MessageBus`].
pub struct BusSubscription {
    receiver: broadcast::Receiver<BusMessage>,
}

#[async_trait]
impl MessageSource for BusSubscription {
    async fn recv(&mut self) -> Result<BusMessage, BusError> {
        match self.receiver.recv().await {
            Ok(message) => Ok(message),
            Err(broadcast::error::RecvError::Lagged(n)) => Err(BusError::Lagged(n)),
            Err(broadcast::error::RecvError::Closed) => Err(BusError::Closed),
        }
    }
}
