//! Unit tests for TriggerHandler over an in-memory TriggerRepository.
//!
//! Covers the `!trigger` commands, firing order, the per-channel antispam and the per
//! (channel, trigger) repeat delay.

use std::time::Duration;

use super::{posted, posted_in, TestContext, BOT_ID};
use crate::{Tempo, TriggerHandler, DEFAULT_DELAY_REPEAT};
use mbot_core::{Context, Handler, HandlerError, MbotError};
use storage::{TriggerAction, TriggerRepository, TriggerStore};

async fn ctx() -> TestContext<TriggerRepository> {
    let repo = TriggerRepository::new("sqlite::memory:")
        .await
        .expect("Failed to create repository");
    TestContext::new(repo)
}

fn handler() -> TriggerHandler {
    TriggerHandler::new(DEFAULT_DELAY_REPEAT).unwrap()
}

#[tokio::test]
async fn test_add_text_trigger_acknowledges() {
    let ctx = ctx().await;

    handler()
        .handle(&ctx, &posted(r#"!trigger text "hello" "world""#))
        .await
        .unwrap();

    let stored = ctx.store().list("team1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].triggered_by, "hello");
    assert_eq!(stored[0].action, TriggerAction::Text("world".to_string()));

    let reactions = ctx.client.reactions();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].emoji_name, "ok_hand");
    assert_eq!(reactions[0].post_id, "p1");
    assert_eq!(reactions[0].user_id, BOT_ID);
}

#[tokio::test]
async fn test_add_reaction_trigger() {
    let ctx = ctx().await;

    handler()
        .handle(&ctx, &posted(r#"!trigger reaction "party" :tada:"#))
        .await
        .unwrap();

    let stored = ctx.store().list("team1").await.unwrap();
    assert_eq!(stored[0].action, TriggerAction::Emoji("tada".to_string()));
    assert_eq!(ctx.client.emojis(), ["ok_hand"]);
}

#[tokio::test]
async fn test_list_replies_with_table() {
    let ctx = ctx().await;
    ctx.store().add_text("team1", "hello", "world").await.unwrap();
    ctx.store().add_emoji("team1", "party", "tada").await.unwrap();

    handler()
        .handle(&ctx, &posted("!trigger list"))
        .await
        .unwrap();

    let replies = ctx.client.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].message,
        "| trigger | action |\n|---|---|\n| hello | world |\n| party | :tada: |\n"
    );
}

#[tokio::test]
async fn test_list_empty() {
    let ctx = ctx().await;

    handler()
        .handle(&ctx, &posted("!trigger list"))
        .await
        .unwrap();

    assert_eq!(ctx.client.replies()[0].message, "no triggers for this team");
}

#[tokio::test]
async fn test_delete_trigger() {
    let ctx = ctx().await;
    ctx.store().add_text("team1", "hello", "world").await.unwrap();

    handler()
        .handle(&ctx, &posted(r#"!trigger del "hello""#))
        .await
        .unwrap();
    handler()
        .handle(&ctx, &posted(r#"!trigger del "hello""#))
        .await
        .unwrap();

    assert!(ctx.store().list("team1").await.unwrap().is_empty());
    assert_eq!(ctx.client.emojis(), ["ok_hand"]);
    assert_eq!(ctx.client.replies()[0].message, "unknown trigger: hello");
}

/// **Test: unknown sub-command is a handler error; nothing is sent.**
#[tokio::test]
async fn test_unknown_subcommand_is_error() {
    let ctx = ctx().await;

    let err = handler()
        .handle(&ctx, &posted("!trigger frobnicate"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MbotError::Handler(HandlerError::InvalidCommand(_))
    ));
    assert!(ctx.client.replies().is_empty());
    assert!(ctx.client.reactions().is_empty());
}

#[tokio::test]
async fn test_blank_trigger_is_refused() {
    let ctx = ctx().await;

    handler()
        .handle(&ctx, &posted(r#"!trigger text "   " "spam""#))
        .await
        .unwrap();

    assert!(ctx.store().list("team1").await.unwrap().is_empty());
    assert!(ctx.client.replies()[0].message.contains("Invalid trigger"));
    assert!(ctx.client.reactions().is_empty());
}

/// **Test: every matching emoji fires, then only the first matching text reply.**
#[tokio::test]
async fn test_fire_emoji_first_then_one_text() {
    let ctx = ctx().await;
    let store = ctx.store();
    store.add_emoji("team1", "party", "tada").await.unwrap();
    store.add_emoji("team1", "cake", "cake").await.unwrap();
    store.add_text("team1", "hello", "world").await.unwrap();
    store.add_text("team1", "hi", "there").await.unwrap();
    store.add_emoji("team1", "absent", "ghost").await.unwrap();

    handler()
        .handle(&ctx, &posted("hello party hi cake"))
        .await
        .unwrap();

    assert_eq!(ctx.client.emojis(), ["cake", "tada"]);
    let replies = ctx.client.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].message, "world");
    assert_eq!(replies[0].root_id.as_deref(), Some("p1"));
}

#[tokio::test]
async fn test_partial_word_does_not_fire() {
    let ctx = ctx().await;
    ctx.store().add_text("team1", "hello", "world").await.unwrap();

    handler()
        .handle(&ctx, &posted("othello is a play"))
        .await
        .unwrap();

    assert!(ctx.client.replies().is_empty());
}

/// **Test: a second message in the same channel within the antispam window is ignored.**
#[tokio::test]
async fn test_channel_antispam() {
    let ctx = ctx().await;
    ctx.store().add_text("team1", "hello", "world").await.unwrap();
    let handler = handler();

    handler.handle(&ctx, &posted("unrelated")).await.unwrap();
    handler.handle(&ctx, &posted("hello")).await.unwrap();
    assert!(ctx.client.replies().is_empty());

    handler
        .handle(&ctx, &posted_in("chan2", "hello"))
        .await
        .unwrap();
    let replies = ctx.client.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].channel_id, "chan2");
}

/// **Test: a trigger that fired recently in a channel stays quiet there.**
#[tokio::test]
async fn test_repeat_delay_per_channel_and_trigger() {
    let ctx = ctx().await;
    ctx.store().add_text("team1", "hello", "world").await.unwrap();
    let tempo = Tempo::new();
    tempo.set("team1/chan1/hello".to_string(), Duration::from_secs(60));
    let handler = TriggerHandler::with_tempo(tempo.clone(), DEFAULT_DELAY_REPEAT).unwrap();

    handler.handle(&ctx, &posted("hello")).await.unwrap();
    assert!(ctx.client.replies().is_empty());

    handler
        .handle(&ctx, &posted_in("chan2", "hello"))
        .await
        .unwrap();
    assert_eq!(ctx.client.replies().len(), 1);
    assert!(tempo.exists(&"team1/chan2/hello".to_string()));
}

#[test]
fn test_help_mentions_delays() {
    let handler = TriggerHandler::new(Duration::from_secs(45)).unwrap();

    let help = Handler::<TestContext<TriggerRepository>>::help(&handler).unwrap();

    assert!(help.contains("45 seconds"));
    assert!(help.contains("3 seconds"));
    assert!(help.contains("!trigger reaction"));
    assert_eq!(handler.delay_repeat(), Duration::from_secs(45));
}
