//! World state for article publication scenarios.

use std::sync::Arc;

use eyre::{WrapErr, eyre};
use gazette::article::{
    adapters::{BroadcastFanout, InMemoryArticleStore, Subscription},
    domain::{Article, Block, BlockDocument, PublicationNotification},
    ports::{BlockValidator, ValidationMode},
    services::{ArticlePublicationService, PublicationError},
    validation::DefaultBlockValidator,
};
use mockable::DefaultClock;
use rstest::fixture;

pub type TestPublicationService = ArticlePublicationService<
    InMemoryArticleStore,
    BroadcastFanout,
    DefaultBlockValidator,
    DefaultClock,
>;

/// World state for publication BDD tests.
pub struct PublicationWorld {
    pub store: InMemoryArticleStore,
    pub fanout: BroadcastFanout,
    pub validator: Arc<DefaultBlockValidator>,
    pub service: TestPublicationService,
    pub ticker: Option<Subscription>,
    pub breaking: Option<Subscription>,
    pub article: Option<Article>,
    pub document: Option<BlockDocument>,
    pub last_error: Option<PublicationError>,
}

impl Default for PublicationWorld {
    fn default() -> Self {
        let store = InMemoryArticleStore::new();
        let fanout = BroadcastFanout::new();
        let validator = Arc::new(DefaultBlockValidator::new());
        let service = ArticlePublicationService::new(
            Arc::new(store.clone()),
            Arc::new(fanout.clone()),
            Arc::clone(&validator),
            Arc::new(DefaultClock),
        );

        Self {
            store,
            fanout,
            validator,
            service,
            ticker: None,
            breaking: None,
            article: None,
            document: None,
            last_error: None,
        }
    }
}

#[fixture]
pub fn world() -> PublicationWorld {
    PublicationWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds an authored document, failing the step if a block is invalid.
pub fn authored_document(
    validator: &DefaultBlockValidator,
    blocks: Vec<Block>,
) -> Result<BlockDocument, eyre::Report> {
    let mut document = BlockDocument::new();
    for block in blocks {
        let normalized = validator
            .validate(block, ValidationMode::Authoring)
            .wrap_err("validate block")?;
        let end = document.len();
        document.insert(end, normalized).wrap_err("append block")?;
    }
    Ok(document)
}

/// Stores `document` as a new draft and remembers it.
pub fn store_draft(
    world: &mut PublicationWorld,
    document: BlockDocument,
) -> Result<(), eyre::Report> {
    let article = run_async(world.service.create_draft(&document)).wrap_err("create draft")?;
    world.article = Some(article);
    world.document = Some(document);
    Ok(())
}

/// Drains every notification already queued on `subscription`.
pub fn drain(
    subscription: Option<&mut Subscription>,
) -> Result<Vec<PublicationNotification>, eyre::Report> {
    let subscription = subscription.ok_or_else(|| eyre!("no subscription"))?;
    let mut received = Vec::new();
    loop {
        match subscription.try_recv() {
            Ok(Some(notification)) => received.push(notification),
            Ok(None) => return Ok(received),
            Err(err) => return Err(eyre!("subscription failed: {err}")),
        }
    }
}

pub fn current_article(world: &PublicationWorld) -> Result<&Article, eyre::Report> {
    world.article.as_ref().ok_or_else(|| eyre!("no article"))
}
