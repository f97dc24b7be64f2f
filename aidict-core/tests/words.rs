//! Word storage and processing registry

use aidict_core::db::{create_pool, DbError, WordRepo};
use aidict_core::models::{NewWord, WordStatus};
use aidict_core::{ProcessingRegistry, WordStream};

async fn setup() -> WordRepo {
    let pool = create_pool("sqlite::memory:").await.expect("pool creation failed");
    WordRepo::new(pool, ProcessingRegistry::new())
}

#[tokio::test]
async fn test_create_and_get() {
    let repo = setup().await;

    let id = repo.create_word(&NewWord::processing("serendipity", "1.0")).await.unwrap();
    let record = repo.get_word_by_id(&id).await.unwrap();

    assert_eq!(record.id, id);
    assert_eq!(record.original_word, "serendipity");
    assert_eq!(record.status, WordStatus::Processing);
    assert_eq!(record.prompt_version, "1.0");
    assert!(record.word_doc.is_none());

    let by_text = repo.get_by_original_word("serendipity").await.unwrap();
    assert_eq!(by_text, record);
}

#[tokio::test]
async fn test_update_overwrites_record() {
    let repo = setup().await;

    let id = repo.create_word(&NewWord::processing("serendipity", "1.0")).await.unwrap();
    repo.update_word(&id, &NewWord::completed("serendipity", "1.1", "a happy accident".into()))
        .await
        .unwrap();

    let record = repo.get_word_by_id(&id).await.unwrap();
    assert_eq!(record.status, WordStatus::Completed);
    assert_eq!(record.prompt_version, "1.1");
    assert_eq!(record.word_doc.as_deref(), Some("a happy accident"));
}

#[tokio::test]
async fn test_missing_word_is_not_found() {
    let repo = setup().await;

    assert!(matches!(
        repo.get_word_by_id("nope").await.unwrap_err(),
        DbError::NotFound { resource: "word", .. }
    ));
    assert!(matches!(
        repo.get_by_original_word("nope").await.unwrap_err(),
        DbError::NotFound { .. }
    ));
    assert!(matches!(
        repo.update_word("nope", &NewWord::processing("nope", "1.0")).await.unwrap_err(),
        DbError::NotFound { .. }
    ));
    assert!(matches!(repo.delete_word("nope").await.unwrap_err(), DbError::NotFound { .. }));
}

#[tokio::test]
async fn test_delete_word() {
    let repo = setup().await;

    let id = repo.create_word(&NewWord::processing("ephemeral", "1.0")).await.unwrap();
    repo.delete_word(&id).await.unwrap();

    assert!(matches!(repo.get_word_by_id(&id).await.unwrap_err(), DbError::NotFound { .. }));
}

#[tokio::test]
async fn test_registry_round_trip() {
    let repo = setup().await;
    let stream = WordStream::new();

    repo.create_processing_word("w1", stream.clone());
    let found = repo.get_processing_word("w1").expect("stream registered");
    assert!(found.same_stream(&stream));

    repo.delete_processing_word("w1");
    assert!(repo.get_processing_word("w1").is_none());
    // deleting twice is harmless
    repo.delete_processing_word("w1");
}

#[tokio::test]
async fn test_initialization_sweep() {
    let repo = setup().await;

    let p1 = repo.create_word(&NewWord::processing("one", "1.0")).await.unwrap();
    let p2 = repo.create_word(&NewWord::processing("two", "1.0")).await.unwrap();
    let done = repo
        .create_word(&NewWord::completed("three", "1.0", "doc".into()))
        .await
        .unwrap();
    repo.create_processing_word(&p1, WordStream::new());
    repo.create_processing_word(&p2, WordStream::new());

    let removed = repo.delete_processing_words_on_initialization().await.unwrap();

    assert_eq!(removed, 2);
    assert!(repo.registry().is_empty());
    assert!(repo.get_word_by_id(&p1).await.is_err());
    assert!(repo.get_word_by_id(&p2).await.is_err());
    assert_eq!(repo.get_word_by_id(&done).await.unwrap().status, WordStatus::Completed);

    // nothing left to sweep
    assert_eq!(repo.delete_processing_words_on_initialization().await.unwrap(), 0);
}

#[tokio::test]
async fn test_text_lookup_prefers_newest_across_precisions() {
    use chrono::{Duration, TimeZone, Utc};

    let repo = setup().await;
    let whole_second = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let mut older = NewWord::completed("twice", "1.0", "older".into());
    older.create_time = whole_second;
    let mut newer = NewWord::completed("twice", "1.0", "newer".into());
    newer.create_time = whole_second + Duration::milliseconds(500);

    // insert the newer row first so insertion order cannot mask the ordering
    let newer_id = repo.create_word(&newer).await.unwrap();
    repo.create_word(&older).await.unwrap();

    let found = repo.get_by_original_word("twice").await.unwrap();
    assert_eq!(found.id, newer_id);
    assert_eq!(found.create_time, newer.create_time);
}
