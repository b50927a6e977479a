//! In-memory article store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::article::{
    domain::{Article, ArticleId},
    ports::{ArticleStore, StoreError, StoreResult},
};

/// Thread-safe in-memory article store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleStore {
    state: Arc<RwLock<HashMap<ArticleId, Article>>>,
}

impl InMemoryArticleStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored articles.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the lock is poisoned.
    pub fn article_count(&self) -> StoreResult<usize> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.len())
    }
}

fn poisoned<T>(err: &std::sync::PoisonError<T>) -> StoreError {
    StoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn store(&self, article: &Article) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if state.contains_key(&article.id()) {
            return Err(StoreError::DuplicateArticle(article.id()));
        }
        state.insert(article.id(), article.clone());
        Ok(())
    }

    async fn update(&self, article: &Article) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let stored = state
            .get_mut(&article.id())
            .ok_or(StoreError::NotFound(article.id()))?;
        *stored = article.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ArticleId) -> StoreResult<Option<Article>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.get(&id).cloned())
    }

    async fn remove(&self, id: ArticleId) -> StoreResult<Article> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        state.remove(&id).ok_or(StoreError::NotFound(id))
    }
}
