//! Article aggregate root and its publication status.

use super::{ArticleDomainError, ArticleId, ParseArticleStatusError};
use crate::article::codec::{SanitizedMarkup, StorageRepresentation};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication status of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    /// Being written; not visible to readers.
    Draft,
    /// Visible to readers.
    Published,
}

impl ArticleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Returns `true` for published articles.
    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl TryFrom<&str> for ArticleStatus {
    type Error = ParseArticleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(ParseArticleStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted form of an article body.
///
/// The variant tells the loader whether legacy migration has to run.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleBody {
    /// A flat rich-text body written before the block model existed.
    Legacy(String),
    /// A block document encoded for storage.
    Structured(StorageRepresentation),
}

impl ArticleBody {
    /// Returns `true` for bodies that predate the block model.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

/// Article aggregate root.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    id: ArticleId,
    body: ArticleBody,
    rendered: Option<SanitizedMarkup>,
    status: ArticleStatus,
    breaking: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted article.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedArticleData {
    /// Persisted identifier.
    pub id: ArticleId,
    /// Persisted body.
    pub body: ArticleBody,
    /// Persisted display rendering, if one was produced.
    pub rendered: Option<SanitizedMarkup>,
    /// Persisted status.
    pub status: ArticleStatus,
    /// Persisted breaking-news flag.
    pub breaking: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted publication timestamp.
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Creates a draft article with a structured body.
    #[must_use]
    pub fn new_draft(
        body: StorageRepresentation,
        rendered: SanitizedMarkup,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ArticleId::new(),
            body: ArticleBody::Structured(body),
            rendered: Some(rendered),
            status: ArticleStatus::Draft,
            breaking: false,
            created_at: timestamp,
            updated_at: timestamp,
            published_at: None,
        }
    }

    /// Creates a draft article holding a legacy flat body.
    #[must_use]
    pub fn new_legacy(markup: impl Into<String>, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ArticleId::new(),
            body: ArticleBody::Legacy(markup.into()),
            rendered: None,
            status: ArticleStatus::Draft,
            breaking: false,
            created_at: timestamp,
            updated_at: timestamp,
            published_at: None,
        }
    }

    /// Reconstructs an article from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedArticleData) -> Self {
        Self {
            id: data.id,
            body: data.body,
            rendered: data.rendered,
            status: data.status,
            breaking: data.breaking,
            created_at: data.created_at,
            updated_at: data.updated_at,
            published_at: data.published_at,
        }
    }

    /// Returns the article identifier.
    #[must_use]
    pub const fn id(&self) -> ArticleId {
        self.id
    }

    /// Returns the persisted body.
    #[must_use]
    pub const fn body(&self) -> &ArticleBody {
        &self.body
    }

    /// Returns the sanitised display rendering, if any.
    #[must_use]
    pub const fn rendered(&self) -> Option<&SanitizedMarkup> {
        self.rendered.as_ref()
    }

    /// Returns the publication status.
    #[must_use]
    pub const fn status(&self) -> ArticleStatus {
        self.status
    }

    /// Returns `true` if the article is flagged as breaking news.
    #[must_use]
    pub const fn is_breaking(&self) -> bool {
        self.breaking
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the article was published, if it has been.
    #[must_use]
    pub const fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Replaces the body with a freshly encoded document and its rendering.
    pub fn replace_body(
        &mut self,
        body: StorageRepresentation,
        rendered: SanitizedMarkup,
        clock: &impl Clock,
    ) {
        self.body = ArticleBody::Structured(body);
        self.rendered = Some(rendered);
        self.touch(clock);
    }

    /// Moves a draft article to published.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleDomainError::InvalidStatusTransition`] if the article
    /// is already published.
    pub fn publish(&mut self, clock: &impl Clock) -> Result<(), ArticleDomainError> {
        if self.status != ArticleStatus::Draft {
            return Err(ArticleDomainError::InvalidStatusTransition {
                article_id: self.id,
                from: self.status,
                to: ArticleStatus::Published,
            });
        }
        self.status = ArticleStatus::Published;
        self.touch(clock);
        self.published_at = Some(self.updated_at);
        Ok(())
    }

    /// Sets the breaking-news flag.
    ///
    /// Returns `true` when the flag changed.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleDomainError::BreakingRequiresPublished`] when flagging
    /// an unpublished article. Clearing the flag is always permitted.
    pub fn set_breaking(
        &mut self,
        breaking: bool,
        clock: &impl Clock,
    ) -> Result<bool, ArticleDomainError> {
        if self.breaking == breaking {
            return Ok(false);
        }
        if breaking && self.status != ArticleStatus::Published {
            return Err(ArticleDomainError::BreakingRequiresPublished(self.id));
        }
        self.breaking = breaking;
        self.touch(clock);
        Ok(true)
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
