//! When steps for publication BDD scenarios.

use super::world::{PublicationWorld, current_article, run_async};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;

// ============================================================================
// When Steps
// ============================================================================

#[when("the editor publishes the draft")]
fn publish_draft(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let id = current_article(world)?.id();
    let document = world.document.as_ref().ok_or_else(|| eyre!("no document"))?;

    match run_async(world.service.publish(id, document)) {
        Ok(article) => {
            world.article = Some(article);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}

#[when("the editor loads the article")]
fn load_article(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let id = current_article(world)?.id();
    let loaded = run_async(world.service.load(id)).wrap_err("load article")?;
    world.article = Some(loaded.article);
    world.document = Some(loaded.document);
    Ok(())
}

#[when("the editor confirms the migration")]
fn confirm_migration(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let document = world.document.as_mut().ok_or_else(|| eyre!("no document"))?;
    document.confirm_migration();
    Ok(())
}

#[when("the editor flags the article as breaking")]
fn flag_breaking(world: &mut PublicationWorld) -> Result<(), eyre::Report> {
    let id = current_article(world)?.id();
    match run_async(world.service.set_breaking(id, true)) {
        Ok(article) => {
            world.article = Some(article);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
    Ok(())
}
