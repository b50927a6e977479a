//! Shared helpers for in-memory integration tests.

use gazette::article::{
    adapters::{BroadcastFanout, FanoutConfig, InMemoryArticleStore},
    domain::{
        ArticleId, Block, BlockDocument, HeadingLevel, ImageBlock, NotificationKind,
        PublicationNotification,
    },
    ports::{BlockValidator, ValidationMode},
    services::ArticlePublicationService,
    validation::DefaultBlockValidator,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Publication service wired to in-memory adapters.
pub type InMemoryService = ArticlePublicationService<
    InMemoryArticleStore,
    BroadcastFanout,
    DefaultBlockValidator,
    DefaultClock,
>;

/// A service together with handles on the adapters it writes to.
pub struct Newsroom {
    /// The service under test.
    pub service: InMemoryService,
    /// Shares state with the service's store.
    pub store: InMemoryArticleStore,
    /// Shares channels with the service's emitter.
    pub fanout: BroadcastFanout,
    /// The validator the service was built with.
    pub validator: Arc<DefaultBlockValidator>,
}

impl Newsroom {
    /// Builds a newsroom whose fan-out uses `config`.
    #[must_use]
    pub fn with_fanout(config: FanoutConfig) -> Self {
        let store = InMemoryArticleStore::new();
        let fanout = BroadcastFanout::with_config(config);
        let validator = Arc::new(DefaultBlockValidator::new());
        let service = ArticlePublicationService::new(
            Arc::new(store.clone()),
            Arc::new(fanout.clone()),
            Arc::clone(&validator),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            store,
            fanout,
            validator,
        }
    }
}

/// Provides a fresh newsroom for each test.
#[fixture]
pub fn newsroom() -> Newsroom {
    Newsroom::with_fanout(FanoutConfig::default())
}

/// Provides a fan-out with the default configuration.
#[fixture]
pub fn fanout() -> BroadcastFanout {
    BroadcastFanout::new()
}

/// Builds an authored document from `blocks`.
///
/// # Panics
///
/// Panics if any block fails authoring validation.
#[must_use]
pub fn authored(validator: &DefaultBlockValidator, blocks: Vec<Block>) -> BlockDocument {
    let mut document = BlockDocument::new();
    for block in blocks {
        let normalized = validator
            .validate(block, ValidationMode::Authoring)
            .expect("fixture block should validate");
        let end = document.len();
        document.insert(end, normalized).expect("append is in range");
    }
    document
}

/// A short publishable report with one block of every variant.
#[must_use]
pub fn storm_report(validator: &DefaultBlockValidator) -> BlockDocument {
    authored(
        validator,
        vec![
            Block::heading("Storm makes landfall", HeadingLevel::H2),
            Block::paragraph("Winds reached <strong>180 km/h</strong>."),
            Block::quote("Stay indoors.", "Coastguard"),
            Block::Image(
                ImageBlock::new("https://cdn.example.com/storm.jpg")
                    .with_alt_text("Waves over the sea wall")
                    .with_credit("Staff photographer"),
            ),
        ],
    )
}

/// Builds a notification for a fresh article.
#[must_use]
pub fn notification(kind: NotificationKind) -> PublicationNotification {
    PublicationNotification::new(ArticleId::new(), kind, &DefaultClock)
}
