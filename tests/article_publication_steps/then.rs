//! Then steps for publication BDD scenarios.

use super::world::{PublicationWorld, current_article, drain, run_async};
use eyre::{WrapErr, ensure, eyre};
use gazette::article::{
    domain::{ArticleDomainError, ArticleStatus, NotificationKind, PublicationNotification},
    error::PublishPreconditionError,
    ports::ArticleStore,
    services::PublicationError,
};
use rstest_bdd_macros::then;

// ============================================================================
// Helper Functions
// ============================================================================

/// Fetch the stored status of the current article.
fn stored_status(world: &PublicationWorld) -> Result<ArticleStatus, eyre::Report> {
    let id = current_article(world)?.id();
    let article = run_async(world.store.find_by_id(id))
        .wrap_err("find article")?
        .ok_or_else(|| eyre!("article {id} not stored"))?;
    Ok(article.status())
}

fn expect_notifications(
    received: &[PublicationNotification],
    count: usize,
    kind: NotificationKind,
) -> Result<(), eyre::Report> {
    ensure!(
        received.len() == count,
        "expected {count} notification(s), got {}",
        received.len()
    );
    ensure!(
        received.iter().all(|notification| notification.kind == kind),
        "expected only {kind} notifications, got {received:?}"
    );
    Ok(())
}

// ============================================================================
// Then Steps
// ============================================================================

#[then("the article is published")]
fn article_is_published(world: &PublicationWorld) -> Result<(), eyre::Report> {
    if let Some(err) = &world.last_error {
        return Err(eyre!("publication failed: {err}"));
    }
    ensure!(
        stored_status(world)? == ArticleStatus::Published,
        "stored article is not published"
    );
    Ok(())
}

#[then("the article is still a draft")]
fn article_is_draft(world: &PublicationWorld) -> Result<(), eyre::Report> {
    ensure!(
        stored_status(world)? == ArticleStatus::Draft,
        "stored article left draft status"
    );
    Ok(())
}

#[then("the ticker receives {count:usize} published notification")]
fn ticker_receives(world: &mut PublicationWorld, count: usize) -> Result<(), eyre::Report> {
    let received = drain(world.ticker.as_mut())?;
    expect_notifications(&received, count, NotificationKind::Published)
}

#[then("the breaking channel receives {count:usize} breaking notification")]
fn breaking_receives(world: &mut PublicationWorld, count: usize) -> Result<(), eyre::Report> {
    let received = drain(world.breaking.as_mut())?;
    expect_notifications(&received, count, NotificationKind::Breaking)
}

#[then("the ticker is silent")]
fn ticker_silent(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let received = drain(world.ticker.as_mut())?;
    ensure!(received.is_empty(), "ticker received {received:?}");
    Ok(())
}

#[then("the breaking channel is silent")]
fn breaking_silent(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let received = drain(world.breaking.as_mut())?;
    ensure!(received.is_empty(), "breaking channel received {received:?}");
    Ok(())
}

#[then("publication is refused naming block position {position:usize}")]
fn refused_naming_position(
    world: &PublicationWorld,
    position: usize,
) -> Result<(), eyre::Report> {
    let Some(PublicationError::Precondition(error)) = &world.last_error else {
        return Err(eyre!("expected a precondition failure, got {:?}", world.last_error));
    };
    ensure!(
        error.offending_positions() == vec![position],
        "expected offending position {position}, got {:?}",
        error.offending_positions()
    );
    Ok(())
}

#[then("publication is refused because the migration is unconfirmed")]
fn refused_unconfirmed(world: &PublicationWorld) -> Result<(), eyre::Report> {
    ensure!(
        matches!(
            world.last_error,
            Some(PublicationError::Precondition(
                PublishPreconditionError::UnconfirmedMigration
            ))
        ),
        "expected unconfirmed migration, got {:?}",
        world.last_error
    );
    Ok(())
}

#[then(r#"the rendered article contains "{fragment}""#)]
fn rendered_contains(world: &PublicationWorld, fragment: String) -> Result<(), eyre::Report> {
    let rendered = current_article(world)?
        .rendered()
        .ok_or_else(|| eyre!("article has no rendered markup"))?;
    ensure!(
        rendered.as_str().contains(&fragment),
        "rendered markup {rendered} lacks {fragment}"
    );
    Ok(())
}

#[then("the breaking flag is rejected")]
fn breaking_rejected(world: &PublicationWorld) -> Result<(), eyre::Report> {
    ensure!(
        matches!(
            world.last_error,
            Some(PublicationError::Domain(
                ArticleDomainError::BreakingRequiresPublished(_)
            ))
        ),
        "expected a lifecycle error, got {:?}",
        world.last_error
    );
    ensure!(
        !current_article(world)?.is_breaking(),
        "draft was flagged as breaking"
    );
    Ok(())
}
