//! Integration tests for [`storage::BotStore`].
//!
//! Covers both stores sharing one in-memory database and persistence of a file database.

use storage::{BotStore, EditStore, TriggerAction, TriggerStore};

/// **Test: triggers and edits live side by side in one in-memory database.**
#[tokio::test]
async fn test_memory_store_serves_both_tables() {
    let store = BotStore::open("sqlite::memory:")
        .await
        .expect("Failed to open store");

    store.add_text("team1", "ping", "pong").await.unwrap();
    store.add_team_edit("team1", "flip", "(╯°□°）╯︵ ┻━┻").await.unwrap();

    let triggers = store.list("team1").await.unwrap();
    assert_eq!(triggers[0].action, TriggerAction::Text("pong".to_string()));

    let edit = store.find_edit("u1", "team1", "flip").await.unwrap().unwrap();
    assert_eq!(edit.replacement, "(╯°□°）╯︵ ┻━┻");
    assert_eq!(store.edits().list_edits("team1").await.unwrap().len(), 1);
    assert_eq!(store.triggers().search("team1").await.unwrap().len(), 1);
}

/// **Test: edits survive reopening a file database.**
#[tokio::test]
async fn test_file_store_persists_edits() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("bot.db").display());

    {
        let store = BotStore::open(&url).await.expect("Failed to open store");
        store.add_user_edit("u1", "shrug", "¯\\_(ツ)_/¯").await.unwrap();
    }

    let store = BotStore::open(&url).await.expect("Failed to reopen store");
    let edit = store.find_edit("u1", "team1", "shrug").await.unwrap().unwrap();
    assert_eq!(edit.replacement, "¯\\_(ツ)_/¯");
}
