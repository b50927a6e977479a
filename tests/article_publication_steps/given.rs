//! Given steps for publication BDD scenarios.

use super::world::{PublicationWorld, authored_document, drain, run_async, store_draft};
use eyre::{WrapErr, eyre};
use gazette::article::domain::{Block, HeadingLevel, Topic};
use rstest_bdd_macros::given;

// ============================================================================
// Background Steps
// ============================================================================

#[given("a newsroom with ticker and breaking subscribers")]
fn newsroom_with_subscribers(world: &mut PublicationWorld) {
    world.ticker = Some(world.fanout.subscribe(Topic::Ticker));
    world.breaking = Some(world.fanout.subscribe(Topic::Breaking));
}

// ============================================================================
// Given Steps
// ============================================================================

#[given(r#"a draft headed "{heading}" with paragraph "{text}""#)]
fn draft_with_heading(
    world: &mut PublicationWorld,
    heading: String,
    text: String,
) -> Result<(), eyre::Report> {
    let document = authored_document(
        &world.validator,
        vec![
            Block::heading(heading, HeadingLevel::H2),
            Block::paragraph(text),
        ],
    )?;
    store_draft(world, document)
}

#[given(r#"a draft with paragraph "{text}" and an image without a URL"#)]
fn draft_with_incomplete_image(
    world: &mut PublicationWorld,
    text: String,
) -> Result<(), eyre::Report> {
    let document = authored_document(
        &world.validator,
        vec![Block::paragraph(text), Block::image("")],
    )?;
    store_draft(world, document)
}

#[given(r#"a legacy article with body "{body}""#)]
fn legacy_article(world: &mut PublicationWorld, body: String) -> Result<(), eyre::Report> {
    let article =
        run_async(world.service.import_legacy(&body)).wrap_err("import legacy article")?;
    world.article = Some(article);
    Ok(())
}

#[given(r#"a published article headed "{heading}" with paragraph "{text}""#)]
fn published_article(
    world: &mut PublicationWorld,
    heading: String,
    text: String,
) -> Result<(), eyre::Report> {
    draft_with_heading(world, heading, text)?;
    let id = world
        .article
        .as_ref()
        .map(|article| article.id())
        .ok_or_else(|| eyre!("no draft"))?;
    let document = world.document.as_ref().ok_or_else(|| eyre!("no document"))?;

    let article = run_async(world.service.publish(id, document)).wrap_err("publish article")?;
    world.article = Some(article);
    drain(world.ticker.as_mut()).wrap_err("drain ticker")?;
    Ok(())
}
