//! End-to-end publication flows over the in-memory store and broadcast
//! fan-out.

use super::helpers::{Newsroom, authored, newsroom, storm_report};
use gazette::article::{
    adapters::ReceiveError,
    domain::{ArticleStatus, Block, NotificationKind, Topic},
    error::PublishPreconditionError,
    ports::ArticleStore,
    services::PublicationError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publishing_notifies_ticker_subscribers(newsroom: Newsroom) {
    let mut ticker = newsroom.fanout.subscribe(Topic::Ticker);
    let mut breaking = newsroom.fanout.subscribe(Topic::Breaking);
    let document = storm_report(&newsroom.validator);

    let draft = newsroom
        .service
        .create_draft(&document)
        .await
        .expect("draft stored");
    let published = newsroom
        .service
        .publish(draft.id(), &document)
        .await
        .expect("article published");

    let received = ticker.recv().await.expect("ticker notification");
    assert_eq!(received.article_id, published.id());
    assert_eq!(received.kind, NotificationKind::Published);
    assert_eq!(breaking.try_recv(), Ok(None));

    let stored = newsroom
        .store
        .find_by_id(published.id())
        .await
        .expect("lookup succeeds")
        .expect("article exists");
    assert_eq!(stored.status(), ArticleStatus::Published);
    assert!(stored.published_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn breaking_flag_reaches_breaking_subscribers_only(newsroom: Newsroom) {
    let document = storm_report(&newsroom.validator);
    let draft = newsroom
        .service
        .create_draft(&document)
        .await
        .expect("draft stored");
    newsroom
        .service
        .publish(draft.id(), &document)
        .await
        .expect("article published");

    let mut ticker = newsroom.fanout.subscribe(Topic::Ticker);
    let mut breaking = newsroom.fanout.subscribe(Topic::Breaking);
    let flagged = newsroom
        .service
        .set_breaking(draft.id(), true)
        .await
        .expect("flag set");

    assert!(flagged.is_breaking());
    let received = breaking.recv().await.expect("breaking notification");
    assert_eq!(received.kind, NotificationKind::Breaking);
    assert_eq!(received.article_id, draft.id());
    assert_eq!(ticker.try_recv(), Ok(None));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_fanout_rolls_publication_back(newsroom: Newsroom) {
    let document = storm_report(&newsroom.validator);
    let draft = newsroom
        .service
        .create_draft(&document)
        .await
        .expect("draft stored");
    newsroom.fanout.close();

    let result = newsroom.service.publish(draft.id(), &document).await;

    assert!(matches!(result, Err(PublicationError::Emission(_))));
    let stored = newsroom
        .store
        .find_by_id(draft.id())
        .await
        .expect("lookup succeeds")
        .expect("article exists");
    assert_eq!(stored, draft);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_article_is_migrated_confirmed_and_published(newsroom: Newsroom) {
    let mut ticker = newsroom.fanout.subscribe(Topic::Ticker);
    let imported = newsroom
        .service
        .import_legacy("<h2>Archive</h2><p>From the <b>old</b> system</p>")
        .await
        .expect("legacy article stored");

    let mut loaded = newsroom
        .service
        .load(imported.id())
        .await
        .expect("legacy article loads");
    assert!(loaded.document.requires_confirmation());

    let refused = newsroom.service.publish(imported.id(), &loaded.document).await;
    assert!(matches!(
        refused,
        Err(PublicationError::Precondition(
            PublishPreconditionError::UnconfirmedMigration
        ))
    ));
    assert_eq!(ticker.try_recv(), Ok(None));

    loaded.document.confirm_migration();
    let published = newsroom
        .service
        .publish(imported.id(), &loaded.document)
        .await
        .expect("confirmed migration publishes");

    assert_eq!(
        published.rendered().map(|markup| markup.as_str()),
        Some("<h2>Archive</h2>\n<p>From the <strong>old</strong> system</p>")
    );
    assert!(ticker.recv().await.is_ok());

    let reloaded = newsroom
        .service
        .load(imported.id())
        .await
        .expect("structured article loads");
    assert_eq!(reloaded.document, loaded.document);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn incomplete_image_keeps_article_in_draft(newsroom: Newsroom) {
    let mut ticker = newsroom.fanout.subscribe(Topic::Ticker);
    let document = authored(
        &newsroom.validator,
        vec![Block::paragraph("Photos to follow"), Block::image("")],
    );
    let draft = newsroom
        .service
        .create_draft(&document)
        .await
        .expect("incomplete images are fine in drafts");

    let result = newsroom.service.publish(draft.id(), &document).await;

    let Err(PublicationError::Precondition(error)) = result else {
        panic!("expected a publish precondition failure");
    };
    assert_eq!(error.offending_positions(), vec![1]);
    assert_eq!(ticker.try_recv(), Ok(None));
    assert_eq!(
        newsroom
            .service
            .load(draft.id())
            .await
            .expect("draft loads")
            .article
            .status(),
        ArticleStatus::Draft
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn subscribers_see_closed_after_shutdown(newsroom: Newsroom) {
    let mut ticker = newsroom.fanout.subscribe(Topic::Ticker);
    newsroom.fanout.close();
    assert_eq!(ticker.recv().await, Err(ReceiveError::Closed));
}
