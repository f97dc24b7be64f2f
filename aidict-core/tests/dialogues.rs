//! Dialogue storage against an in-memory database

use aidict_core::db::{create_pool, DbError, DialogueRepo};
use aidict_core::models::Message;
use sqlx::SqlitePool;

async fn setup() -> (SqlitePool, DialogueRepo) {
    let pool = create_pool("sqlite::memory:").await.expect("pool creation failed");
    let repo = DialogueRepo::new(pool.clone());
    (pool, repo)
}

fn msg(sender: &str, content: &str) -> Message {
    Message::new(sender, content).unwrap()
}

async fn insert_raw(pool: &SqlitePool, id: &str, parents: &[&str], messages: &[Message]) {
    sqlx::query("INSERT INTO dialogues (id, dependent_dialog_id_list, messages) VALUES (?, ?, ?)")
        .bind(id)
        .bind(serde_json::to_string(parents).unwrap())
        .bind(serde_json::to_string(messages).unwrap())
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_then_read() {
    let (_pool, repo) = setup().await;
    let messages = vec![msg("user", "Hi"), msg("bot", "Hello")];

    let id = repo.create_dialog(&messages).await.unwrap();

    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(repo.get_dialog(&id).await.unwrap(), messages);
    assert!(repo.exists(&id).await.unwrap());
}

#[tokio::test]
async fn test_empty_dialogue() {
    let (_pool, repo) = setup().await;
    let id = repo.create_dialog(&[]).await.unwrap();
    assert!(repo.get_dialog(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fork_appends_after_parent() {
    let (_pool, repo) = setup().await;

    let d1 = repo.create_dialog(&[msg("user", "Hi")]).await.unwrap();
    let d2 = repo.fork_dialog(&d1, &[msg("bot", "Yo")]).await.unwrap();

    assert_ne!(d1, d2);
    assert_eq!(
        repo.get_dialog(&d2).await.unwrap(),
        vec![msg("user", "Hi"), msg("bot", "Yo")]
    );
    // source is untouched
    assert_eq!(repo.get_dialog(&d1).await.unwrap(), vec![msg("user", "Hi")]);
}

#[tokio::test]
async fn test_fork_stores_reference_not_copy() {
    let (pool, repo) = setup().await;

    let d1 = repo.create_dialog(&[msg("user", "Hi")]).await.unwrap();
    let d2 = repo.fork_dialog(&d1, &[msg("bot", "Yo")]).await.unwrap();

    let (parents, messages): (String, String) =
        sqlx::query_as("SELECT dependent_dialog_id_list, messages FROM dialogues WHERE id = ?")
            .bind(&d2)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(serde_json::from_str::<Vec<String>>(&parents).unwrap(), vec![d1]);
    assert_eq!(
        serde_json::from_str::<Vec<Message>>(&messages).unwrap(),
        vec![msg("bot", "Yo")]
    );
}

#[tokio::test]
async fn test_fork_chain() {
    let (_pool, repo) = setup().await;

    let a = repo.create_dialog(&[msg("user", "1")]).await.unwrap();
    let b = repo.fork_dialog(&a, &[msg("bot", "2")]).await.unwrap();
    let c = repo.fork_dialog(&b, &[msg("user", "3"), msg("bot", "4")]).await.unwrap();
    // two forks of the same source do not see each other
    let b2 = repo.fork_dialog(&a, &[msg("bot", "2b")]).await.unwrap();

    let contents: Vec<String> = repo
        .get_dialog(&c)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["1", "2", "3", "4"]);

    let contents: Vec<String> = repo
        .get_dialog(&b2)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["1", "2b"]);
}

#[tokio::test]
async fn test_multiple_parents_resolve_in_listed_order() {
    let (pool, repo) = setup().await;

    insert_raw(&pool, "a", &[], &[msg("user", "a")]).await;
    insert_raw(&pool, "b", &[], &[msg("user", "b")]).await;
    insert_raw(&pool, "c", &["b", "a"], &[msg("user", "c")]).await;

    let contents: Vec<String> = repo
        .get_dialog("c")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn test_shared_ancestor_is_not_a_cycle() {
    let (pool, repo) = setup().await;

    insert_raw(&pool, "root", &[], &[msg("user", "root")]).await;
    insert_raw(&pool, "left", &["root"], &[msg("user", "left")]).await;
    insert_raw(&pool, "right", &["root"], &[msg("user", "right")]).await;
    insert_raw(&pool, "join", &["left", "right"], &[msg("user", "join")]).await;

    let contents: Vec<String> = repo
        .get_dialog("join")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["root", "left", "root", "right", "join"]);
}

#[tokio::test]
async fn test_missing_dialogue_is_not_found() {
    let (_pool, repo) = setup().await;

    let err = repo.get_dialog("does-not-exist").await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "dialogue", ref id } if id == "does-not-exist"));
    assert!(!repo.exists("does-not-exist").await.unwrap());
}

#[tokio::test]
async fn test_dangling_parent_surfaces_on_read() {
    let (_pool, repo) = setup().await;

    let forked = repo.fork_dialog("ghost", &[msg("bot", "Yo")]).await.unwrap();

    let err = repo.get_dialog(&forked).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { ref id, .. } if id == "ghost"));
}

#[tokio::test]
async fn test_cycle_is_detected() {
    let (pool, repo) = setup().await;

    insert_raw(&pool, "a", &["b"], &[msg("user", "a")]).await;
    insert_raw(&pool, "b", &["a"], &[msg("user", "b")]).await;

    let err = repo.get_dialog("a").await.unwrap_err();
    assert!(matches!(err, DbError::CyclicDependency { ref id } if id == "a"));
}

#[tokio::test]
async fn test_self_reference_is_a_cycle() {
    let (pool, repo) = setup().await;

    insert_raw(&pool, "loop", &["loop"], &[]).await;

    let err = repo.get_dialog("loop").await.unwrap_err();
    assert!(matches!(err, DbError::CyclicDependency { .. }));
}

#[tokio::test]
async fn test_malformed_row_is_json_error() {
    let (pool, repo) = setup().await;

    sqlx::query("INSERT INTO dialogues (id, dependent_dialog_id_list, messages) VALUES ('bad', 'not json', '[]')")
        .execute(&pool)
        .await
        .unwrap();

    assert!(matches!(repo.get_dialog("bad").await.unwrap_err(), DbError::Json(_)));
}
