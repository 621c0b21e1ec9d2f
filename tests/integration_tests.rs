//! Integration tests through the public API
//!
//! Tests the full flow: factory → engine → source adapter → page window

use futures::future::join_all;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use window_pager::retry::{load_page, load_with_retry};
use window_pager::{
    Applied, EngineConfig, EngineFactory, Error, EveryNth, FlakySource, Generation, LoadParams,
    LoadResult, LoadType, OneShotFault, PageWindow, RetryPolicy, SequenceSource, VecSource,
};

fn config() -> EngineConfig {
    EngineConfig::new(20, 20).unwrap()
}

fn factory(size: usize) -> EngineFactory<SequenceSource> {
    EngineFactory::new(Arc::new(SequenceSource::new(size)), config())
}

// ============================================================================
// Worked Examples
// ============================================================================

#[tokio::test]
async fn test_end_to_end_examples() {
    let (engine, generation) = factory(60).create();
    assert_eq!(generation, Generation(0));

    let cold = engine
        .load(&LoadParams::refresh(None, 20, 20).unwrap())
        .await
        .unwrap();
    let cold = cold.page().unwrap();
    assert_eq!(cold.items().first().unwrap().value, "item 0");
    assert_eq!(cold.items().last().unwrap().value, "item 19");
    assert_eq!(cold.prev_key(), None);
    assert_eq!(cold.next_key(), Some(&20));
    assert_eq!((cold.items_before(), cold.items_after()), (0, Some(40)));

    let middle = engine
        .load(&LoadParams::append(20, 20, 20).unwrap())
        .await
        .unwrap();
    let middle = middle.page().unwrap();
    assert_eq!(middle.items().first().unwrap().position, 20);
    assert_eq!(middle.items().last().unwrap().position, 39);
    assert_eq!(middle.prev_key(), Some(&20));
    assert_eq!(middle.next_key(), Some(&40));
    assert_eq!((middle.items_before(), middle.items_after()), (20, Some(20)));

    let last = engine
        .load(&LoadParams::append(40, 20, 20).unwrap())
        .await
        .unwrap();
    let last = last.page().unwrap();
    assert_eq!(last.next_key(), None);
    assert_eq!((last.items_before(), last.items_after()), (40, Some(0)));

    let centered = engine
        .load(&LoadParams::refresh(Some(30), 20, 20).unwrap())
        .await
        .unwrap();
    let centered = centered.page().unwrap();
    assert_eq!(centered.items().first().unwrap().position, 20);
    assert_eq!(centered.items().last().unwrap().position, 39);
    assert_eq!(centered.prev_key(), Some(&20));
    assert_eq!(centered.next_key(), Some(&40));
}

#[tokio::test]
async fn test_malformed_requests_are_rejected() {
    let (engine, _) = factory(60).create();

    let err = LoadParams::<usize>::new(LoadType::Append, None, 20, 20).unwrap_err();
    assert!(matches!(err, Error::MissingKey { .. }));

    let err = LoadParams::<usize>::refresh(None, 0, 20).unwrap_err();
    assert!(matches!(err, Error::InvalidLoadSize { .. }));

    let err = engine
        .load(&LoadParams::append(60, 20, 20).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::KeyOutOfRange { .. }));

    let err = engine
        .load(&LoadParams::prepend(0, 20, 20).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::KeyOutOfRange { .. }));
}

// ============================================================================
// Window Walks
// ============================================================================

#[tokio::test]
async fn test_walk_from_middle_covers_dataset_once() {
    let factory = factory(95);
    let (engine, generation) = factory.create();
    let mut window = PageWindow::new();
    window.reset(generation);

    let first = engine
        .load(&engine.initial_params(Some(47)))
        .await
        .unwrap()
        .into_page()
        .unwrap();
    window.apply(generation, LoadType::Refresh, first).unwrap();

    while let Some(params) = window.prev_request(engine.config()) {
        let page = engine.load(&params).await.unwrap().into_page().unwrap();
        assert_eq!(
            window.apply(generation, LoadType::Prepend, page).unwrap(),
            Applied::Prepended
        );
    }
    while let Some(params) = window.next_request(engine.config()) {
        let page = engine.load(&params).await.unwrap().into_page().unwrap();
        assert_eq!(
            window.apply(generation, LoadType::Append, page).unwrap(),
            Applied::Appended
        );
    }

    let positions: Vec<usize> = window.items().map(|item| item.position).collect();
    assert_eq!(positions, (0..95).collect::<Vec<_>>());
    assert_eq!(window.placeholders_before(), 0);
    assert_eq!(window.placeholders_after(), Some(0));
}

#[tokio::test]
async fn test_bounded_window_keeps_placeholders_consistent() {
    let (engine, generation) = factory(100).create();
    let mut window = PageWindow::new().with_max_pages(2);
    window.reset(generation);

    let first = engine
        .load(&engine.initial_params(None))
        .await
        .unwrap()
        .into_page()
        .unwrap();
    window.apply(generation, LoadType::Refresh, first).unwrap();

    while let Some(params) = window.next_request(engine.config()) {
        let page = engine.load(&params).await.unwrap().into_page().unwrap();
        window.apply(generation, LoadType::Append, page).unwrap();
        let after = window.placeholders_after().unwrap();
        assert_eq!(window.placeholders_before() + window.len() + after, 100);
        assert!(window.page_count() <= 2);
    }
    assert_eq!(window.placeholders_before(), 60);
    assert_eq!(window.prev_key(), Some(60));
}

// ============================================================================
// Generations
// ============================================================================

#[tokio::test]
async fn test_invalidation_drops_stale_results() {
    let source = Arc::new(VecSource::new(
        (0..40).map(|i| format!("old {i}")).collect::<Vec<_>>(),
    ));
    let factory = EngineFactory::new(Arc::clone(&source), config());

    let (old_engine, old_gen) = factory.create();
    let mut window = PageWindow::new();
    window.reset(old_gen);
    let page = old_engine
        .load(&old_engine.initial_params(None))
        .await
        .unwrap()
        .into_page()
        .unwrap();
    window.apply(old_gen, LoadType::Refresh, page).unwrap();

    // An append from the old engine is still in flight when the data changes
    let late = old_engine
        .load(&LoadParams::append(20, 20, 20).unwrap())
        .await
        .unwrap()
        .into_page()
        .unwrap();

    source
        .replace((0..30).map(|i| format!("new {i}")).collect())
        .await;
    let (new_engine, new_gen) = factory.create();
    assert!(new_gen > old_gen);
    window.reset(new_gen);

    assert_eq!(
        window.apply(old_gen, LoadType::Append, late).unwrap(),
        Applied::Stale
    );
    assert!(window.is_empty());

    let fresh = new_engine
        .load(&new_engine.initial_params(None))
        .await
        .unwrap()
        .into_page()
        .unwrap();
    assert_eq!(fresh.items()[0].value, "new 0");
    assert_eq!(fresh.items()[0].generation, new_gen);
    assert_eq!(fresh.items_after(), Some(10));
    window.apply(new_gen, LoadType::Refresh, fresh).unwrap();
    assert_eq!(window.len(), 20);
}

#[tokio::test]
async fn test_concurrent_engines_tag_their_items() {
    let factory = EngineFactory::new(
        Arc::new(SequenceSource::new(60)),
        config().with_variant_count(3).unwrap(),
    );
    let engines: Vec<_> = (0..6).map(|_| factory.create()).collect();

    let results = join_all(engines.iter().map(|(engine, _)| async move {
        engine
            .load(&LoadParams::refresh(Some(30), 20, 20).unwrap())
            .await
    }))
    .await;

    for ((engine, generation), result) in engines.iter().zip(results) {
        let page = result.unwrap().into_page().unwrap();
        assert_eq!(page.len(), 20);
        assert!(page
            .items()
            .iter()
            .all(|item| item.generation == *generation && item.variant == engine.variant()));
        assert_eq!(engine.variant(), (generation.get() % 3) as usize);
    }
    assert_eq!(factory.current_generation(), Some(Generation(5)));
}

// ============================================================================
// Failures and Retries
// ============================================================================

#[tokio::test]
async fn test_one_shot_fault_then_identical_retry() {
    let fault = Arc::new(OneShotFault::armed());
    let factory = factory(60).with_faults(fault.clone());
    let (engine, _) = factory.create();
    let params = LoadParams::append(20, 20, 20).unwrap();

    let first = engine.load(&params).await.unwrap();
    assert!(first.is_retryable());
    assert!(!fault.is_armed());

    let second = engine.load(&params).await.unwrap();
    let page = second.into_page().unwrap();
    assert_eq!(page.items_before(), 20);
    assert_eq!(page.next_key(), Some(&40));
}

#[tokio::test(start_paused = true)]
async fn test_retry_is_deterministic_with_every_nth_faults() {
    let factory = factory(60).with_faults(Arc::new(EveryNth::new(2)));
    let (engine, _) = factory.create();
    let policy = RetryPolicy::default().with_max_retries(1);

    let mut window = PageWindow::new();
    window.reset(engine.generation());
    let page = load_page(&engine, &engine.initial_params(None), &policy)
        .await
        .unwrap();
    window
        .apply(engine.generation(), LoadType::Refresh, page)
        .unwrap();

    while let Some(params) = window.next_request(engine.config()) {
        let page = load_page(&engine, &params, &policy).await.unwrap();
        window
            .apply(engine.generation(), LoadType::Append, page)
            .unwrap();
    }
    assert_eq!(window.len(), 60);
}

#[tokio::test(start_paused = true)]
async fn test_source_failures_surface_as_data() {
    let source = Arc::new(FlakySource::new(SequenceSource::new(60)));
    source.fail_next(2).await;
    let factory = EngineFactory::new(Arc::clone(&source), config());
    let (engine, _) = factory.create();
    let params = LoadParams::refresh(None, 20, 20).unwrap();

    let result = load_with_retry(&engine, &params, &RetryPolicy::none())
        .await
        .unwrap();
    assert!(matches!(&result, LoadResult::Error(e) if e.retryable));

    let result = load_with_retry(&engine, &params, &RetryPolicy::default())
        .await
        .unwrap();
    assert_eq!(result.page().map(|p| p.len()), Some(20));
    assert_eq!(source.pending_failures().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_abandons_slow_load() {
    let factory = EngineFactory::new(
        Arc::new(SequenceSource::new(60)),
        config().with_latency(Duration::from_secs(5)),
    );
    let (engine, _) = factory.create();
    let params = LoadParams::refresh(None, 20, 20).unwrap();

    let err = window_pager::retry::load_with_timeout(&engine, &params, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 1000 }));

    let result = window_pager::retry::load_with_timeout(&engine, &params, Duration::from_secs(10))
        .await
        .unwrap();
    assert!(result.is_page());
}
