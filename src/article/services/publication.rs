//! Service layer for saving and publishing structured articles.

use crate::article::{
    codec::ContentCodec,
    domain::{
        Article, ArticleBody, ArticleDomainError, ArticleId, BlockDocument, NotificationKind,
        PublicationNotification,
    },
    error::{CodecError, PublishPreconditionError, ValidationError},
    migration::LegacyMigrator,
    ports::{ArticleStore, BlockValidator, EmitError, PublicationEventEmitter, StoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for article publication.
#[derive(Debug, Error)]
pub enum PublicationError {
    /// The article does not exist.
    #[error("article not found: {0}")]
    NotFound(ArticleId),
    /// A lifecycle rule was violated.
    #[error(transparent)]
    Domain(#[from] ArticleDomainError),
    /// The document exceeds authoring limits.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The document is not publishable.
    #[error(transparent)]
    Precondition(#[from] PublishPreconditionError),
    /// The body could not be encoded, decoded or rendered.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The notification could not be emitted; the stored record was
    /// restored.
    #[error("notification failed, article change rolled back: {0}")]
    Emission(#[from] EmitError),
    /// The notification could not be emitted and restoring the previous
    /// record failed as well.
    #[error("notification failed ({emit}) and rollback failed: {rollback}")]
    RollbackFailed {
        /// The emission failure.
        emit: EmitError,
        /// The store failure during rollback.
        #[source]
        rollback: StoreError,
    },
}

/// Result type for publication service operations.
pub type PublicationResult<T> = Result<T, PublicationError>;

/// An article together with its editable block document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArticle {
    /// The stored article record.
    pub article: Article,
    /// The decoded or migrated document.
    pub document: BlockDocument,
}

/// Orchestrates persistence, rendering and notification of articles.
///
/// Publishing persists the new record and then emits a notification. If
/// the emission fails the previous record is written back, so callers never
/// observe one effect without the other.
#[derive(Clone)]
pub struct ArticlePublicationService<S, E, V, C>
where
    S: ArticleStore,
    E: PublicationEventEmitter,
    V: BlockValidator,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    emitter: Arc<E>,
    validator: Arc<V>,
    codec: ContentCodec<V>,
    migrator: LegacyMigrator<V>,
    clock: Arc<C>,
}

impl<S, E, V, C> ArticlePublicationService<S, E, V, C>
where
    S: ArticleStore,
    E: PublicationEventEmitter,
    V: BlockValidator,
    C: Clock + Send + Sync,
{
    /// Creates a new publication service.
    #[must_use]
    pub fn new(store: Arc<S>, emitter: Arc<E>, validator: Arc<V>, clock: Arc<C>) -> Self {
        Self {
            store,
            emitter,
            codec: ContentCodec::new(Arc::clone(&validator)),
            migrator: LegacyMigrator::new(Arc::clone(&validator)),
            validator,
            clock,
        }
    }

    /// Stores a new draft article with `document` as its body.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Validation`] when the document exceeds
    /// authoring limits, or a codec or store error.
    pub async fn create_draft(&self, document: &BlockDocument) -> PublicationResult<Article> {
        self.validator.validate_document(document)?;
        let body = self.codec.encode_for_storage(document)?;
        let rendered = self.codec.render_for_display(document)?;
        let article = Article::new_draft(body, rendered, &*self.clock);
        self.store.store(&article).await?;
        log::info!("created draft article {}", article.id());
        Ok(article)
    }

    /// Stores a draft article holding a legacy flat body.
    ///
    /// The body is migrated to blocks when the article is first loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Store`] when persistence fails.
    pub async fn import_legacy(&self, markup: &str) -> PublicationResult<Article> {
        let article = Article::new_legacy(markup, &*self.clock);
        self.store.store(&article).await?;
        log::info!("imported legacy article {}", article.id());
        Ok(article)
    }

    /// Loads an article and its editable document.
    ///
    /// Legacy bodies are migrated on load; the migrated document must be
    /// confirmed before it can be published.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::NotFound`] for unknown articles and
    /// [`PublicationError::Codec`] when the stored body cannot be decoded.
    pub async fn load(&self, id: ArticleId) -> PublicationResult<LoadedArticle> {
        let article = self.find(id).await?;
        let document = match article.body() {
            ArticleBody::Legacy(markup) => {
                log::info!("migrating legacy body of article {id}");
                self.migrator.migrate(markup)
            }
            ArticleBody::Structured(representation) => {
                self.codec.decode_from_storage(representation)?
            }
        };
        Ok(LoadedArticle { article, document })
    }

    /// Persists `document` as the body of an existing article.
    ///
    /// A published article only accepts documents that are themselves
    /// publishable.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Validation`] when the document exceeds
    /// authoring limits, [`PublicationError::Precondition`] when a published
    /// article would become unpublishable, or a codec or store error.
    pub async fn save(&self, id: ArticleId, document: &BlockDocument) -> PublicationResult<Article> {
        let mut article = self.find(id).await?;
        self.validator.validate_document(document)?;
        if article.status().is_published() {
            self.validator.validate_for_publish(document)?;
        }
        let body = self.codec.encode_for_storage(document)?;
        let rendered = self.codec.render_for_display(document)?;
        article.replace_body(body, rendered, &*self.clock);
        self.store.update(&article).await?;
        log::debug!("saved article {id} at revision {}", document.revision());
        Ok(article)
    }

    /// Publishes a draft article with `document` as its final body.
    ///
    /// The document is validated in publish mode. The stored record and the
    /// ticker notification are committed together.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Domain`] when the article is already
    /// published, [`PublicationError::Precondition`] listing every offending
    /// block, [`PublicationError::Emission`] when the notification could not
    /// be delivered, or a codec or store error.
    pub async fn publish(
        &self,
        id: ArticleId,
        document: &BlockDocument,
    ) -> PublicationResult<Article> {
        let previous = self.find(id).await?;
        let mut article = previous.clone();
        article.publish(&*self.clock)?;
        self.validator.validate_for_publish(document)?;

        let body = self.codec.encode_for_storage(document)?;
        let rendered = self.codec.render_for_display(document)?;
        article.replace_body(body, rendered, &*self.clock);

        self.commit(&previous, &article, Some(NotificationKind::Published))
            .await?;
        log::info!("published article {id}");
        Ok(article)
    }

    /// Sets or clears the breaking-news flag.
    ///
    /// Switching the flag on emits a breaking notification together with the
    /// stored change. Clearing it emits nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PublicationError::Domain`] when flagging an unpublished
    /// article, [`PublicationError::Emission`] when the notification could
    /// not be delivered, or a store error.
    pub async fn set_breaking(&self, id: ArticleId, breaking: bool) -> PublicationResult<Article> {
        let previous = self.find(id).await?;
        let mut article = previous.clone();
        if !article.set_breaking(breaking, &*self.clock)? {
            return Ok(article);
        }

        let kind = breaking.then_some(NotificationKind::Breaking);
        self.commit(&previous, &article, kind).await?;
        log::info!("article {id} breaking flag set to {breaking}");
        Ok(article)
    }

    async fn find(&self, id: ArticleId) -> PublicationResult<Article> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(PublicationError::NotFound(id))
    }

    async fn commit(
        &self,
        previous: &Article,
        article: &Article,
        kind: Option<NotificationKind>,
    ) -> PublicationResult<()> {
        self.store.update(article).await?;
        let Some(notification_kind) = kind else {
            return Ok(());
        };

        let notification =
            PublicationNotification::new(article.id(), notification_kind, &*self.clock);
        let Err(emit) = self.emitter.emit(&notification).await else {
            return Ok(());
        };

        log::warn!(
            "{notification_kind} notification for article {} failed, restoring previous record: {emit}",
            article.id()
        );
        if let Err(rollback) = self.store.update(previous).await {
            log::error!("rollback of article {} failed: {rollback}", article.id());
            return Err(PublicationError::RollbackFailed { emit, rollback });
        }
        Err(PublicationError::Emission(emit))
    }
}
