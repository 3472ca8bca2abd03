mod common;

use common::*;
use docrag::domain::error::DomainError;
use docrag::domain::ports::document_repository::DocumentRepository;
use docrag::domain::values::reconcile_policy::ReconcilePolicy;
use docrag::domain::values::search::SearchQuery;
use docrag::infrastructure::embeddings::stub::StubProvider;
use docrag::SearchOptions;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_empty_index_returns_no_results() {
    let app = setup();
    let resp = app.search(SearchQuery::new("anything at all", None)).await.unwrap();
    assert!(resp.results.is_empty());
    assert_eq!(resp.query, "anything at all");
}

#[tokio::test]
async fn test_empty_query_rejected_before_any_call() {
    let embedder = Arc::new(CountingEmbedder::default());
    let index = Arc::new(FakeIndex::default());
    let app = setup_with(embedder.clone(), index.clone(), ReconcilePolicy::BestEffort);

    let err = app.search(SearchQuery::new("", Some(3))).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidQuery(_)));
    assert_eq!(embedder.calls(), 0);
    assert_eq!(index.queries(), 0);
}

#[tokio::test]
async fn test_non_positive_limit_uses_default() {
    let candidates = (0..8)
        .map(|i| candidate(&format!("doc-{i}"), 0.1 * i as f64, "n", "body"))
        .collect();
    let index = Arc::new(FakeIndex::with_candidates(candidates));
    let app = setup_with(Arc::new(StubProvider::default()), index.clone(), ReconcilePolicy::BestEffort);

    for limit in [None, Some(0), Some(-4), Some(5)] {
        let resp = app.search(SearchQuery::new("budget", limit)).await.unwrap();
        assert_eq!(resp.results.len(), 5, "limit {limit:?}");
        assert_eq!(index.last_limit(), 5);
    }
}

#[tokio::test]
async fn test_budget_report_keeps_index_order() {
    let index = Arc::new(FakeIndex::with_candidates(vec![
        candidate("a", 0.10, "Quarterly Budget Report", "Q3 spend"),
        candidate("b", 0.12, "Budget Forecast", "FY25 forecast"),
        candidate("c", 0.30, "Expense Report", "travel"),
    ]));
    let app = setup_with(Arc::new(StubProvider::default()), index, ReconcilePolicy::BestEffort);

    let resp = app.search(SearchQuery::new("find budget report", Some(2))).await.unwrap();
    let ids: Vec<_> = resp.results.iter().map(|r| r.id.as_str()).collect();
    let scores: Vec<_> = resp.results.iter().map(|r| r.score).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(scores, [0.10, 0.12]);
    assert_eq!(resp.query, "find budget report");
}

#[tokio::test]
async fn test_empty_body_candidate_is_read_repaired() {
    let repo = Arc::new(memory_document_repo());
    let stored = docrag::domain::entities::document::Document::new(
        Some("doc-1".into()),
        "Budget".into(),
        "authoritative body".into(),
    );
    repo.create(&stored).unwrap();

    let index = Arc::new(FakeIndex::with_candidates(vec![candidate("doc-1", 0.2, "stale name", "")]));
    let app = setup_with_repo(repo, Arc::new(StubProvider::default()), index, SearchOptions::default());

    let resp = app.search(SearchQuery::new("budget", None)).await.unwrap();
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].document.value, "authoritative body");
    assert_eq!(resp.results[0].document.name, "Budget");
    assert_eq!(resp.results[0].score, 0.2);
}

#[tokio::test]
async fn test_candidate_missing_from_store_keeps_snapshot() {
    let index = Arc::new(FakeIndex::with_candidates(vec![
        candidate("ghost", 0.05, "Deleted doc", ""),
        candidate("full", 0.07, "Has body", "indexed text"),
    ]));
    let app = setup_with(Arc::new(StubProvider::default()), index, ReconcilePolicy::BestEffort);

    let resp = app.search(SearchQuery::new("anything", None)).await.unwrap();
    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.results[0].id, "ghost");
    assert_eq!(resp.results[0].document.name, "Deleted doc");
    assert_eq!(resp.results[0].document.value, "");
    assert_eq!(resp.results[1].document.value, "indexed text");
}

#[tokio::test]
async fn test_store_error_best_effort_keeps_snapshot() {
    let index = Arc::new(FakeIndex::with_candidates(vec![candidate("doc-1", 0.1, "Snapshot", "")]));
    let app = setup_with_repo(
        Arc::new(BrokenDocumentRepo),
        Arc::new(StubProvider::default()),
        index,
        SearchOptions::default(),
    );

    let resp = app.search(SearchQuery::new("q", None)).await.unwrap();
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].document.name, "Snapshot");
}

#[tokio::test]
async fn test_store_error_fail_fast_aborts() {
    let index = Arc::new(FakeIndex::with_candidates(vec![candidate("doc-1", 0.1, "Snapshot", "")]));
    let app = setup_with_repo(
        Arc::new(BrokenDocumentRepo),
        Arc::new(StubProvider::default()),
        index,
        SearchOptions {
            reconcile: ReconcilePolicy::FailFast,
            ..SearchOptions::default()
        },
    );

    let err = app.search(SearchQuery::new("q", None)).await.unwrap_err();
    match err {
        DomainError::SearchFailed(cause) => assert!(matches!(*cause, DomainError::Database(_))),
        other => panic!("expected SearchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_full_snapshot_skips_store_lookup() {
    // A broken store is never touched when the snapshot already has a body.
    let index = Arc::new(FakeIndex::with_candidates(vec![candidate("doc-1", 0.1, "Snapshot", "body")]));
    let app = setup_with_repo(
        Arc::new(BrokenDocumentRepo),
        Arc::new(StubProvider::default()),
        index,
        SearchOptions {
            reconcile: ReconcilePolicy::FailFast,
            ..SearchOptions::default()
        },
    );

    let resp = app.search(SearchQuery::new("q", None)).await.unwrap();
    assert_eq!(resp.results[0].document.value, "body");
}

#[tokio::test]
async fn test_provider_failure_is_search_failed() {
    let index = Arc::new(FakeIndex::default());
    let app = setup_with(Arc::new(FailingEmbedder), index.clone(), ReconcilePolicy::BestEffort);

    let err = app.search(SearchQuery::new("q", None)).await.unwrap_err();
    match err {
        DomainError::SearchFailed(cause) => assert!(matches!(*cause, DomainError::ProviderUnavailable(_))),
        other => panic!("expected SearchFailed, got {other:?}"),
    }
    assert_eq!(index.queries(), 0);
}

#[tokio::test]
async fn test_index_failure_is_search_failed() {
    let app = setup_with(
        Arc::new(StubProvider::default()),
        Arc::new(FakeIndex::failing()),
        ReconcilePolicy::BestEffort,
    );

    let err = app.search(SearchQuery::new("q", None)).await.unwrap_err();
    match err {
        DomainError::SearchFailed(cause) => assert!(matches!(*cause, DomainError::IndexUnavailable(_))),
        other => panic!("expected SearchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let app = setup_with_repo(
        Arc::new(memory_document_repo()),
        Arc::new(HangingEmbedder),
        Arc::new(FakeIndex::default()),
        SearchOptions {
            deadline: Duration::from_millis(50),
            ..SearchOptions::default()
        },
    );

    let err = app.search(SearchQuery::new("q", None)).await.unwrap_err();
    match err {
        DomainError::SearchFailed(cause) => assert!(matches!(*cause, DomainError::DeadlineExceeded(_))),
        other => panic!("expected SearchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_created_document_is_a_candidate() {
    let app = setup();
    let doc = app
        .create_document(None, "Quarterly Budget Report".into(), "Q3 spend came in under budget".into())
        .await
        .unwrap();

    let resp = app.search(SearchQuery::new("budget report", None)).await.unwrap();
    assert!(resp.results.iter().any(|r| r.id == doc.id));
    let hit = resp.results.iter().find(|r| r.id == doc.id).unwrap();
    assert_eq!(hit.document.value, "Q3 spend came in under budget");
}

#[tokio::test]
async fn test_deleted_document_leaves_index() {
    let app = setup();
    let doc = app.create_document(None, "Temp".into(), "short lived".into()).await.unwrap();
    app.delete_document(&doc.id).await.unwrap();

    let resp = app.search(SearchQuery::new("short lived", None)).await.unwrap();
    assert!(resp.results.iter().all(|r| r.id != doc.id));
}
