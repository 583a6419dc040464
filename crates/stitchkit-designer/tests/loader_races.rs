#[path = "common/mod.rs"]
mod common;

use common::{settle, Harness};
use stitchkit_core::{LoadStatus, ResourceKind};
use stitchkit_designer::{Action, EngineSlot, LoadOutcome, ResourceLoader};
use std::sync::Arc;

#[tokio::test]
async fn test_late_result_for_abandoned_index_is_discarded() {
    let h = Harness::new();
    let first = h.design_locator(1);
    let second = h.design_locator(0);
    h.engine.hold(&first);
    h.engine.hold(&second);

    let abandoned = h.loader.select_design(1).expect("select 1");
    let current = h.loader.select_design(0).expect("select 0");
    assert_eq!(h.store.snapshot().product.design_index, 0);

    // index 0 resolves first, index 1 afterwards
    h.engine.release(&second);
    assert_eq!(current.await.expect("join").expect("load"), LoadOutcome::Committed);
    h.engine.release(&first);
    assert_eq!(abandoned.await.expect("join").expect("load"), LoadOutcome::Stale);

    let state = h.store.snapshot();
    let design = state.product.design.as_ref().expect("design loaded");
    assert_eq!(h.engine.locator_of(design.uid), Some(second));
    assert_eq!(state.product.design_status, Some(LoadStatus::Succeeded));
}

#[tokio::test]
async fn test_stale_result_arriving_first_does_not_flash() {
    let h = Harness::new();
    let first = h.design_locator(1);
    let second = h.design_locator(2);
    h.engine.hold(&first);
    h.engine.hold(&second);

    let abandoned = h.loader.select_design(1).expect("select 1");
    let current = h.loader.select_design(2).expect("select 2");

    h.engine.release(&first);
    assert_eq!(abandoned.await.expect("join").expect("load"), LoadOutcome::Stale);
    settle().await;
    let state = h.store.snapshot();
    assert!(state.product.design.is_none());
    assert_eq!(state.product.design_status, Some(LoadStatus::Loading));

    h.engine.release(&second);
    assert_eq!(current.await.expect("join").expect("load"), LoadOutcome::Committed);
    let design = h.store.snapshot().product.design.clone().expect("design");
    assert_eq!(h.engine.locator_of(design.uid), Some(second));
}

#[tokio::test]
async fn test_status_is_loading_while_fetch_is_pending() {
    let h = Harness::new();
    let locator = h.design_locator(3);
    h.engine.hold(&locator);

    let task = h.loader.select_design(3).expect("select");
    settle().await;
    assert_eq!(
        h.store.snapshot().product.design_status,
        Some(LoadStatus::Loading)
    );

    h.engine.release(&locator);
    task.await.expect("join").expect("load");
    assert_eq!(
        h.store.snapshot().product.design_status,
        Some(LoadStatus::Succeeded)
    );
}

#[tokio::test]
async fn test_empty_image_entry_never_fetches() {
    let h = Harness::new();
    let outcome = h
        .loader
        .select_image(0)
        .expect("select")
        .await
        .expect("join")
        .expect("load");

    assert_eq!(outcome, LoadOutcome::Empty);
    assert_eq!(h.engine.fetch_count(), 0);
    let state = h.store.snapshot();
    assert!(state.product.image.is_none());
    assert_eq!(state.product.image_status, Some(LoadStatus::Succeeded));
}

#[tokio::test]
async fn test_failed_fetch_marks_failed_until_reselected() {
    let h = Harness::new();
    let locator = h.design_locator(1);
    h.engine.fail(&locator);

    let outcome = h.loader.select_design(1).expect("select").await.expect("join");
    assert_eq!(outcome.expect("load"), LoadOutcome::Failed);
    let state = h.store.snapshot();
    assert!(state.product.design.is_none());
    assert_eq!(state.product.design_status, Some(LoadStatus::Failed));

    // a later, unrelated dispatch does not retry
    h.store.dispatch(Action::Toggle3d { enabled: false });
    assert_eq!(h.engine.fetch_count(), 1);
    assert_eq!(
        h.store.snapshot().product.design_status,
        Some(LoadStatus::Failed)
    );
}

#[tokio::test]
async fn test_image_is_placed_and_framed() {
    let h = Harness::new();
    let before = h.store.snapshot().view.viewport;

    let outcome = h.loader.select_image(1).expect("select").await.expect("join");
    assert_eq!(outcome.expect("load"), LoadOutcome::Committed);

    let state = h.store.snapshot();
    let image = state.product.image.as_ref().expect("image");
    // White TShirt: 5080 wide, 1200/1000 aspect, origin offset (-600, 800)
    assert!((image.rect.width() - 5080.0).abs() < 1e-9);
    assert!((image.rect.height() - 6096.0).abs() < 1e-9);
    assert_eq!(image.rect.center().x, 600.0);

    let viewport = state.view.viewport;
    assert_ne!(viewport, before);
    assert!(viewport.contains_rect(&image.rect));
    assert!((viewport.aspect_ratio() - before.aspect_ratio()).abs() < 1e-9);
}

#[tokio::test]
async fn test_stale_image_does_not_zoom() {
    let h = Harness::new();
    let locator = h.image_locator(2);
    h.engine.hold(&locator);

    let abandoned = h.loader.select_image(2).expect("select 2");
    h.loader.select_image(0).expect("select 0").await.expect("join").expect("load");
    let viewport = h.store.snapshot().view.viewport;

    h.engine.release(&locator);
    assert_eq!(abandoned.await.expect("join").expect("load"), LoadOutcome::Stale);
    let state = h.store.snapshot();
    assert!(state.product.image.is_none());
    assert_eq!(state.view.viewport, viewport);
}

#[tokio::test]
async fn test_out_of_range_selection_is_rejected() {
    let h = Harness::new();
    let before = h.store.snapshot();

    let err = h.loader.select_design(42).expect_err("out of range");
    assert!(err.is_catalog_error());
    assert!(h.store.snapshot().is_same(&before));
}

#[tokio::test]
async fn test_load_is_deferred_without_engine() {
    let h = Harness::new();
    let slot = EngineSlot::new();
    let loader = Arc::new(ResourceLoader::new(
        h.store.clone(),
        slot,
        h.viewport.clone(),
    ));

    let outcome = loader.select_design(2).expect("select").await.expect("join");
    assert_eq!(outcome.expect("load"), LoadOutcome::Deferred);
    let state = h.store.snapshot();
    assert_eq!(state.product.design_index, 2);
    assert_eq!(state.product.status(ResourceKind::Design), None);
    assert_eq!(h.engine.fetch_count(), 0);
}

#[tokio::test]
async fn test_reload_all_loads_both_concurrently() {
    let h = Harness::new();
    h.store.dispatch(Action::ChangeImage { index: 2 });
    let design = h.design_locator(0);
    let image = h.image_locator(2);
    h.engine.hold(&design);

    let loader = h.loader.clone();
    let reload = tokio::spawn(async move { loader.reload_all().await });
    settle().await;
    // the image completes while the design is still held
    assert!(h.store.snapshot().product.image.is_some());
    assert!(h.engine.fetches().contains(&image));

    h.engine.release(&design);
    let (design_outcome, image_outcome) = reload.await.expect("join");
    assert_eq!(design_outcome.expect("design"), LoadOutcome::Committed);
    assert_eq!(image_outcome.expect("image"), LoadOutcome::Committed);
}
