//! In-process fan-out of publication notifications over tokio broadcast
//! channels.
//!
//! Each topic owns one bounded channel. Subscribers receive every
//! notification emitted after they subscribed, in emission order; nothing is
//! replayed. Emitting never waits for subscribers: when a subscriber falls
//! more than the channel capacity behind, the oldest notifications are
//! overwritten and the subscriber is told how many it missed.

use crate::article::{
    domain::{PublicationNotification, Topic},
    ports::{EmitError, EmitResult, PublicationEventEmitter},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

/// Largest per-topic channel capacity. Larger values are lowered to this.
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;

/// Configuration for the broadcast fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanoutConfig {
    /// Notifications retained per topic for slow subscribers.
    pub channel_capacity: usize,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

impl FanoutConfig {
    /// Sets the per-topic channel capacity.
    ///
    /// The fan-out clamps the value to `1..=MAX_CHANNEL_CAPACITY`.
    #[must_use]
    pub const fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }
}

/// Errors returned when receiving from a [`Subscription`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ReceiveError {
    /// The subscriber fell behind and missed this many notifications.
    #[error("subscriber lagged behind by {0} notification(s)")]
    Lagged(u64),

    /// The fan-out was closed and every retained notification was consumed.
    #[error("publication fan-out is closed")]
    Closed,
}

/// A live subscription to one topic.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    receiver: broadcast::Receiver<PublicationNotification>,
}

impl Subscription {
    /// Returns the subscribed topic.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Waits for the next notification.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiveError::Lagged`] once after notifications were
    /// skipped, then resumes with the oldest retained one. Returns
    /// [`ReceiveError::Closed`] after the fan-out is closed and drained.
    pub async fn recv(&mut self) -> Result<PublicationNotification, ReceiveError> {
        self.receiver.recv().await.map_err(|err| match err {
            broadcast::error::RecvError::Lagged(skipped) => ReceiveError::Lagged(skipped),
            broadcast::error::RecvError::Closed => ReceiveError::Closed,
        })
    }

    /// Returns the next notification if one is already waiting.
    ///
    /// # Errors
    ///
    /// See [`Self::recv`].
    pub fn try_recv(&mut self) -> Result<Option<PublicationNotification>, ReceiveError> {
        match self.receiver.try_recv() {
            Ok(notification) => Ok(Some(notification)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                Err(ReceiveError::Lagged(skipped))
            }
            Err(broadcast::error::TryRecvError::Closed) => Err(ReceiveError::Closed),
        }
    }
}

#[derive(Debug)]
struct Channels {
    ticker: broadcast::Sender<PublicationNotification>,
    breaking: broadcast::Sender<PublicationNotification>,
}

impl Channels {
    fn new(capacity: usize) -> Self {
        let (ticker, _) = broadcast::channel(capacity);
        let (breaking, _) = broadcast::channel(capacity);
        Self { ticker, breaking }
    }

    const fn sender(&self, topic: Topic) -> &broadcast::Sender<PublicationNotification> {
        match topic {
            Topic::Ticker => &self.ticker,
            Topic::Breaking => &self.breaking,
        }
    }
}

/// Broadcast fan-out implementing [`PublicationEventEmitter`].
///
/// Clones share the same channels.
///
/// # Examples
///
/// ```
/// use gazette::article::adapters::BroadcastFanout;
/// use gazette::article::domain::{ArticleId, NotificationKind, PublicationNotification, Topic};
/// use gazette::article::ports::PublicationEventEmitter;
/// use mockable::DefaultClock;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let fanout = BroadcastFanout::new();
/// let mut ticker = fanout.subscribe(Topic::Ticker);
///
/// let notification =
///     PublicationNotification::new(ArticleId::new(), NotificationKind::Published, &DefaultClock);
/// fanout.emit(&notification).await.expect("emit succeeds");
///
/// assert_eq!(ticker.recv().await, Ok(notification));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct BroadcastFanout {
    channels: Arc<RwLock<Option<Channels>>>,
}

impl Default for BroadcastFanout {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastFanout {
    /// Creates a fan-out with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FanoutConfig::default())
    }

    /// Creates a fan-out with `config`.
    #[must_use]
    pub fn with_config(config: FanoutConfig) -> Self {
        Self {
            channels: Arc::new(RwLock::new(Some(Channels::new(
                config.channel_capacity.clamp(1, MAX_CHANNEL_CAPACITY),
            )))),
        }
    }

    /// Subscribes to `topic`.
    ///
    /// A subscription taken after [`Self::close`] reports
    /// [`ReceiveError::Closed`] immediately.
    #[must_use]
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let receiver = match self.channels.read() {
            Ok(guard) => guard
                .as_ref()
                .map(|channels| channels.sender(topic).subscribe()),
            Err(_) => None,
        };
        let receiver = receiver.unwrap_or_else(|| broadcast::channel(1).1);
        Subscription { topic, receiver }
    }

    /// Returns the number of live subscriptions on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .as_ref()
                    .map(|channels| channels.sender(topic).receiver_count())
            })
            .unwrap_or_default()
    }

    /// Stops accepting notifications.
    ///
    /// Subscribers drain what is already queued and then observe
    /// [`ReceiveError::Closed`].
    pub fn close(&self) {
        let mut guard = match self.channels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            log::info!("publication fan-out closed");
        }
    }
}

#[async_trait]
impl PublicationEventEmitter for BroadcastFanout {
    async fn emit(&self, notification: &PublicationNotification) -> EmitResult<()> {
        let guard = self
            .channels
            .read()
            .map_err(|err| EmitError::transport(std::io::Error::other(err.to_string())))?;
        let channels = guard.as_ref().ok_or(EmitError::Closed)?;

        let topic = notification.topic();
        match channels.sender(topic).send(notification.clone()) {
            Ok(delivered) => log::debug!(
                "fanned out {} notification for article {} to {delivered} subscriber(s) on {topic}",
                notification.kind,
                notification.article_id
            ),
            Err(_) => log::debug!(
                "no subscribers on {topic} for {} notification of article {}",
                notification.kind,
                notification.article_id
            ),
        }
        Ok(())
    }
}
