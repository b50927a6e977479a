//! Store port for article persistence.

use crate::article::domain::{Article, ArticleId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for article store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Article persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Stores a new article.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateArticle`] when the identifier already
    /// exists.
    async fn store(&self, article: &Article) -> StoreResult<()>;

    /// Replaces the stored record of an existing article.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the article does not exist.
    async fn update(&self, article: &Article) -> StoreResult<()>;

    /// Finds an article by identifier.
    ///
    /// Returns `None` when the article does not exist.
    async fn find_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>>;

    /// Removes an article and returns its last stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the article does not exist.
    async fn remove(&self, id: ArticleId) -> StoreResult<Article>;
}

/// Errors returned by article store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An article with the same identifier already exists.
    #[error("duplicate article identifier: {0}")]
    DuplicateArticle(ArticleId),

    /// The article was not found.
    #[error("article not found: {0}")]
    NotFound(ArticleId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
