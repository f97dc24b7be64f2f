//! Feed logs and the feed service

use aidict_core::db::{create_pool, FeedRepo};
use aidict_core::services::FeedService;

async fn repo(capacity: u32) -> FeedRepo {
    let pool = create_pool("sqlite::memory:").await.expect("pool creation failed");
    FeedRepo::with_capacity(pool, capacity)
}

#[tokio::test]
async fn test_newest_first() {
    let repo = repo(100).await;

    for (id, word) in [("w1", "apple"), ("w2", "banana"), ("w3", "cherry")] {
        repo.write_newest_word(id, word).await.unwrap();
    }

    let words: Vec<String> = repo
        .get_newest_word(10)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.original_word)
        .collect();
    assert_eq!(words, vec!["cherry", "banana", "apple"]);
}

#[tokio::test]
async fn test_top_bounds_result() {
    let repo = repo(100).await;

    for i in 0..5 {
        repo.write_newest_chat(&format!("d{i}"), &format!("title {i}")).await.unwrap();
    }

    let newest = repo.get_newest_chat(2).await.unwrap();
    assert_eq!(newest.len(), 2);
    assert_eq!(newest[0].id, "d4");
    assert_eq!(newest[1].id, "d3");

    assert_eq!(repo.get_newest_chat(50).await.unwrap().len(), 5);
    assert!(repo.get_newest_chat(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_capacity_evicts_oldest() {
    let repo = repo(3).await;

    for i in 0..5 {
        repo.write_newest_chat(&format!("d{i}"), &format!("title {i}")).await.unwrap();
    }

    assert_eq!(repo.count_chats().await.unwrap(), 3);
    let ids: Vec<String> = repo
        .get_newest_chat(10)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec!["d4", "d3", "d2"]);
}

#[tokio::test]
async fn test_logs_are_independent() {
    let repo = repo(2).await;

    repo.write_newest_chat("d1", "first chat").await.unwrap();
    for i in 0..4 {
        repo.write_newest_word(&format!("w{i}"), "word").await.unwrap();
    }

    assert_eq!(repo.count_chats().await.unwrap(), 1);
    assert_eq!(repo.count_words().await.unwrap(), 2);
    assert_eq!(repo.get_newest_chat(5).await.unwrap()[0].title, "first chat");
}

#[tokio::test]
async fn test_duplicate_ids_are_separate_entries() {
    let repo = repo(10).await;

    repo.write_newest_word("w1", "apple").await.unwrap();
    repo.write_newest_word("w1", "apple").await.unwrap();

    assert_eq!(repo.get_newest_word(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_service_uses_fixed_top() {
    let service = FeedService::with_top(repo(100).await, 3);

    for i in 0..5 {
        service.push_new_chat(&format!("d{i}"), "title", None).await.unwrap();
        service.push_new_word(&format!("w{i}"), "word").await.unwrap();
    }

    let chats = service.get_chat_feed(Some("w1")).await.unwrap();
    assert_eq!(chats.newest.len(), 3);
    assert_eq!(chats.newest[0].id, "d4");

    let words = service.get_word_feed().await.unwrap();
    assert_eq!(words.newest.len(), 3);
    assert_eq!(words.newest[0].id, "w4");
}

#[tokio::test]
async fn test_empty_feed() {
    let service = FeedService::new(repo(100).await);
    assert!(service.get_chat_feed(None).await.unwrap().newest.is_empty());
    assert!(service.get_word_feed().await.unwrap().newest.is_empty());
}
