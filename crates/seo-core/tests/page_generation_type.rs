//! Functional tests for changing a page's sentence generation type.
//!
//! Guarantees exercised here:
//! - Settings resolve page > site > global, whole record at a time.
//! - A successful change writes the page-level record and queues exactly one
//!   change description carrying the page, old and new types.
//! - Invalid input, unknown pages and unauthorized callers are rejected before
//!   any write and queue nothing.
//! - A failed read or write queues nothing; a failed enqueue does not fail the command.

use pretty_assertions::assert_eq;
use seo_core::{CommandError, SetPageSentenceGenerationTypeCommand};
use seo_settings::{
    GeneratorSettings, PageId, SentenceGenerationType, SentenceType, SettingsResolver,
    SettingsSource, SettingsStore,
};
use seo_test_utils::TestWorld;

fn command(
    world: &TestWorld,
    page_id: PageId,
    sentence_type: SentenceType,
    generation_type: SentenceGenerationType,
) -> SetPageSentenceGenerationTypeCommand {
    SetPageSentenceGenerationTypeCommand::new(
        Some(world.owner),
        page_id.to_string(),
        sentence_type,
        generation_type,
    )
}

#[tokio::test]
async fn change_is_persisted_and_propagated_once() {
    let mut world = TestWorld::new();
    let page = world.create_page();

    let change = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Title,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap();

    assert_eq!(change.page_id, page.id);
    assert_eq!(change.sentence_type, SentenceType::Title);
    assert_eq!(change.old, SentenceGenerationType::Auto);
    assert_eq!(change.new, SentenceGenerationType::Manual);
    assert_eq!(world.drain_changes(), vec![change]);
    assert_eq!(world.store.writes(), 1);

    let stored = world.store.page_settings_or_default(page.id).await.unwrap();
    assert_eq!(stored.get(SentenceType::Title), Some(SentenceGenerationType::Manual));
    // Global entries were materialized into the page record
    assert_eq!(stored.get(SentenceType::H1), Some(SentenceGenerationType::Template));
}

#[tokio::test]
async fn site_settings_shadow_global_and_are_copied_to_the_page() {
    let mut world = TestWorld::new();
    let page = world.create_page();
    let site = GeneratorSettings::from_entries([(
        SentenceType::Description,
        SentenceGenerationType::Disabled,
    )]);
    world
        .store
        .inner()
        .set_site_settings(world.site_id, site, false)
        .await
        .unwrap();

    let resolver = SettingsResolver::new(world.store.clone());
    let before = resolver.resolve(page.id, world.site_id).await.unwrap();
    assert_eq!(before.source, SettingsSource::Site);
    // Whole-record shadowing: no per-key fallback to global
    assert_eq!(before.settings.get(SentenceType::Title), None);

    let change = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Title,
            SentenceGenerationType::Template,
        ))
        .await
        .unwrap();
    // Missing key in the site record reads as the global value
    assert_eq!(change.old, SentenceGenerationType::Auto);

    let after = resolver.resolve(page.id, world.site_id).await.unwrap();
    assert_eq!(after.source, SettingsSource::Page);
    assert_eq!(
        after.settings.get(SentenceType::Description),
        Some(SentenceGenerationType::Disabled)
    );
    assert_eq!(
        after.settings.get(SentenceType::Title),
        Some(SentenceGenerationType::Template)
    );
    assert_eq!(world.drain_changes().len(), 1);
}

#[tokio::test]
async fn repeated_value_still_writes_and_propagates() {
    let mut world = TestWorld::new();
    let page = world.create_page();

    for _ in 0..2 {
        world
            .page_handler
            .handle(command(
                &world,
                page.id,
                SentenceType::Keywords,
                SentenceGenerationType::Auto,
            ))
            .await
            .unwrap();
    }

    let changes = world.drain_changes();
    assert_eq!(changes.len(), 2);
    assert!(!changes[0].is_noop());
    assert!(changes[1].is_noop());
    assert_eq!(world.store.writes(), 2);
}

#[tokio::test]
async fn invalid_enums_are_rejected_before_any_write() {
    let mut world = TestWorld::new();
    let page = world.create_page();

    let err = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Title,
            SentenceGenerationType::Invalid,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Validation { .. }));

    let err = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Invalid,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Validation { .. }));

    assert_eq!(world.store.writes(), 0);
    assert_eq!(world.store.reads(), 0);
    assert!(world.drain_changes().is_empty());
}

#[tokio::test]
async fn unknown_page_is_not_found_and_not_propagated() {
    let mut world = TestWorld::new();

    let err = world
        .page_handler
        .handle(command(
            &world,
            PageId::new(),
            SentenceType::Title,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::NotFound { entity: "page", .. }));
    assert_eq!(world.store.writes(), 0);
    assert!(world.drain_changes().is_empty());
}

#[tokio::test]
async fn anonymous_and_foreign_callers_are_rejected() {
    let mut world = TestWorld::new();
    let page = world.create_page();
    let foreign = world.create_foreign_page();

    let err = world
        .page_handler
        .handle(SetPageSentenceGenerationTypeCommand::new(
            None,
            page.id.to_string(),
            SentenceType::Title,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Unauthenticated));

    let err = world
        .page_handler
        .handle(command(
            &world,
            foreign.id,
            SentenceType::Title,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::AccessDenied(_)));

    assert_eq!(world.store.writes(), 0);
    assert!(world.drain_changes().is_empty());
}

#[tokio::test]
async fn failed_write_is_a_server_fault_and_not_propagated() {
    let mut world = TestWorld::new();
    let page = world.create_page();
    world.store.fail_writes(true);

    let err = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Title,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::Persistence(_)));
    assert!(err.is_server_fault());
    assert_eq!(world.store.writes(), 1);
    assert!(world.drain_changes().is_empty());
    assert_eq!(world.store.inner().page_record_count(), 0);
}

#[tokio::test]
async fn failed_read_leaves_no_mutation() {
    let mut world = TestWorld::new();
    let page = world.create_page();
    world.store.fail_reads(true);

    let err = world
        .page_handler
        .handle(command(
            &world,
            page.id,
            SentenceType::Description,
            SentenceGenerationType::Manual,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::Persistence(_)));
    assert!(err.is_server_fault());
    assert_eq!(world.store.reads(), 1);
    assert_eq!(world.store.writes(), 0);
    assert!(world.drain_changes().is_empty());
    assert_eq!(world.store.inner().page_record_count(), 0);
}

#[tokio::test]
async fn full_queue_does_not_fail_the_command() {
    let mut world = TestWorld::with_queue_capacity(1);
    let page = world.create_page();

    for generation_type in [SentenceGenerationType::Manual, SentenceGenerationType::Disabled] {
        world
            .page_handler
            .handle(command(&world, page.id, SentenceType::Title, generation_type))
            .await
            .unwrap();
    }

    // Second change could not be queued but is still persisted
    assert_eq!(world.drain_changes().len(), 1);
    let stored = world.store.page_settings_or_default(page.id).await.unwrap();
    assert_eq!(stored.get(SentenceType::Title), Some(SentenceGenerationType::Disabled));
}
