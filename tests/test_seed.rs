mod common;

use common::*;
use docrag::application::seed::SeedReport;
use docrag::config::Config;
use docrag::domain::values::search::SearchQuery;
use docrag::DocRag;

#[tokio::test]
async fn test_seed_populates_empty_stores() {
    let app = setup();
    let report = app.seed().await.unwrap();
    assert_eq!(report, SeedReport { documents: 3, widgets: 2 });
    assert_eq!(app.list_documents().unwrap().len(), 3);
    assert_eq!(app.list_widgets().unwrap().len(), 2);
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = setup();
    app.seed().await.unwrap();
    let again = app.seed().await.unwrap();
    assert_eq!(again, SeedReport::default());
    assert_eq!(app.list_documents().unwrap().len(), 3);
    assert_eq!(app.list_widgets().unwrap().len(), 2);
}

#[tokio::test]
async fn test_seed_skips_non_empty_store() {
    let app = setup();
    app.create_widget(None, "Mine".into(), "v".into()).unwrap();
    let report = app.seed().await.unwrap();
    assert_eq!(report, SeedReport { documents: 3, widgets: 0 });
    assert_eq!(app.list_widgets().unwrap().len(), 1);
}

#[tokio::test]
async fn test_seed_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("docrag.db").to_string_lossy().into_owned(),
        ..Config::default()
    };

    let first = DocRag::new(&config).unwrap();
    assert_eq!(first.seed().await.unwrap().documents, 3);
    drop(first);

    let second = DocRag::new(&config).unwrap();
    assert_eq!(second.seed().await.unwrap(), SeedReport::default());
    assert_eq!(second.list_documents().unwrap().len(), 3);

    // Seeded documents were indexed into the on-disk local index.
    let resp = second.search(SearchQuery::new("budget", Some(10))).await.unwrap();
    assert_eq!(resp.results.len(), 3);
    assert!(resp.results.iter().all(|r| !r.document.value.is_empty()));
}
