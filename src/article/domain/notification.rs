//! Publication notifications handed to the reader fan-out.

use super::ArticleId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Broadcast channel a notification is delivered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// The running news ticker.
    Ticker,
    /// Breaking-news alerts.
    Breaking,
}

impl Topic {
    /// Returns the topic name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Breaking => "breaking",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The article moved from draft to published.
    Published,
    /// The article was flagged as breaking news.
    Breaking,
}

impl NotificationKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Breaking => "breaking",
        }
    }

    /// Returns the topic this kind is delivered on.
    #[must_use]
    pub const fn topic(self) -> Topic {
        match self {
            Self::Published => Topic::Ticker,
            Self::Breaking => Topic::Breaking,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification for one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationNotification {
    /// The article concerned.
    pub article_id: ArticleId,
    /// When the transition was committed.
    pub occurred_at: DateTime<Utc>,
    /// What happened.
    pub kind: NotificationKind,
}

impl PublicationNotification {
    /// Creates a notification stamped with the clock's current time.
    #[must_use]
    pub fn new(article_id: ArticleId, kind: NotificationKind, clock: &impl Clock) -> Self {
        Self {
            article_id,
            occurred_at: clock.utc(),
            kind,
        }
    }

    /// Returns the topic this notification is delivered on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.kind.topic()
    }
}
