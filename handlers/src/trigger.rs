//! Per-team triggers: words that make the bot react with an emoji or reply with a text.
//!
//! ```text
//! !trigger list
//! !trigger text "trigger" "reply"
//! !trigger reaction "trigger" :emoji:
//! !trigger del "trigger"
//! ```

use std::time::Duration;

use async_trait::async_trait;
use mbot_core::{Context, Event, Handler, HandlerError, MbotError, Post, Result};
use regex_lite::Regex;
use storage::{StorageError, TriggerAction, TriggerRecord, TriggerStore};
use tracing::{debug, instrument};

use crate::tempo::Tempo;

/// Default per (channel, trigger) delay before a trigger can fire again.
pub const DEFAULT_DELAY_REPEAT: Duration = Duration::from_secs(120);

/// Per-channel quiet period after any plain message, so heated channels are not flooded.
const CHANNEL_ANTISPAM: Duration = Duration::from_secs(3);

pub(crate) const ACK_EMOJI: &str = "ok_hand";

/// Whether `find` occurs in `message` delimited by ASCII whitespace or the message bounds.
pub fn valid_match(find: &str, message: &str) -> bool {
    if find.is_empty() {
        return false;
    }
    let bytes = message.as_bytes();
    message.match_indices(find).any(|(start, _)| {
        let end = start + find.len();
        let left = start == 0 || bytes[start - 1].is_ascii_whitespace();
        let right = end == bytes.len() || bytes[end].is_ascii_whitespace();
        left && right
    })
}

enum Command<'a> {
    List,
    Text { trigger: &'a str, reply: &'a str },
    Reaction { trigger: &'a str, emoji: &'a str },
    Delete { trigger: &'a str },
}

pub struct TriggerHandler {
    tempo: Tempo<String>,
    delay_repeat: Duration,
    match_list: Regex,
    match_text: Regex,
    match_reaction: Regex,
    match_del: Regex,
}

impl TriggerHandler {
    pub fn new(delay_repeat: Duration) -> Result<Self> {
        Self::with_tempo(Tempo::new(), delay_repeat)
    }

    /// Shares rate-limit state with other holders of `tempo`.
    pub fn with_tempo(tempo: Tempo<String>, delay_repeat: Duration) -> Result<Self> {
        Ok(Self {
            tempo,
            delay_repeat,
            match_list: pattern(r"^!trigger list\b")?,
            match_text: pattern(r#"^!trigger text "([^"]+)" "([^"]+)""#)?,
            match_reaction: pattern(r#"^!trigger reaction "([^"]+)" [:"]([^:"]+)[:"]"#)?,
            match_del: pattern(r#"^!trigger del "(.+)""#)?,
        })
    }

    pub fn delay_repeat(&self) -> Duration {
        self.delay_repeat
    }

    fn parse<'a>(&self, message: &'a str) -> Option<Command<'a>> {
        if self.match_list.is_match(message) {
            return Some(Command::List);
        }
        if let Some(caps) = self.match_text.captures(message) {
            return Some(Command::Text {
                trigger: caps.get(1)?.as_str(),
                reply: caps.get(2)?.as_str(),
            });
        }
        if let Some(caps) = self.match_reaction.captures(message) {
            return Some(Command::Reaction {
                trigger: caps.get(1)?.as_str(),
                emoji: caps.get(2)?.as_str(),
            });
        }
        if let Some(caps) = self.match_del.captures(message) {
            return Some(Command::Delete {
                trigger: caps.get(1)?.as_str(),
            });
        }
        None
    }

    async fn command<C>(&self, ctx: &C, post: &Post) -> Result<()>
    where
        C: Context + ?Sized,
        C::Store: TriggerStore,
    {
        let store = ctx.store();
        let Some(command) = self.parse(&post.message) else {
            return Err(HandlerError::InvalidCommand(post.message.clone()).into());
        };

        match command {
            Command::List => {
                let triggers = store.list(&post.team_id).await.map_err(database)?;
                ctx.client().reply(post, &format_list(&triggers)).await?;
            }
            Command::Text { trigger, reply } => {
                if let Err(e) = check_trigger(trigger) {
                    ctx.client().reply(post, &e.to_string()).await?;
                    return Ok(());
                }
                store
                    .add_text(&post.team_id, trigger, reply)
                    .await
                    .map_err(database)?;
                ctx.client().react(&ctx.me().id, post, ACK_EMOJI).await?;
            }
            Command::Reaction { trigger, emoji } => {
                if let Err(e) = check_trigger(trigger) {
                    ctx.client().reply(post, &e.to_string()).await?;
                    return Ok(());
                }
                store
                    .add_emoji(&post.team_id, trigger, emoji)
                    .await
                    .map_err(database)?;
                ctx.client().react(&ctx.me().id, post, ACK_EMOJI).await?;
            }
            Command::Delete { trigger } => {
                if store.delete(&post.team_id, trigger).await.map_err(database)? {
                    ctx.client().react(&ctx.me().id, post, ACK_EMOJI).await?;
                } else {
                    ctx.client()
                        .reply(post, &format!("unknown trigger: {}", trigger))
                        .await?;
                }
            }
        }
        Ok(())
    }

    async fn fire<C>(&self, ctx: &C, post: &Post) -> Result<()>
    where
        C: Context + ?Sized,
        C::Store: TriggerStore,
    {
        let channel_key = format!("{}/{}", post.team_id, post.channel_id);
        if !self.tempo.try_set(channel_key, CHANNEL_ANTISPAM) {
            debug!(channel_id = %post.channel_id, "channel antispam active");
            return Ok(());
        }

        let triggers = ctx.store().search(&post.team_id).await.map_err(database)?;
        for trigger in triggers
            .iter()
            .filter(|t| valid_match(&t.triggered_by, &post.message))
        {
            let key = format!("{}/{}/{}", post.team_id, post.channel_id, trigger.triggered_by);
            if !self.tempo.try_set(key, self.delay_repeat) {
                continue;
            }

            debug!(trigger = %trigger.triggered_by, "trigger fired");
            match &trigger.action {
                TriggerAction::Emoji(emoji) => {
                    ctx.client().react(&ctx.me().id, post, emoji).await?;
                }
                // Emoji triggers sort first; one text reply ends the pass.
                TriggerAction::Text(text) => {
                    ctx.client().reply(post, text).await?;
                    break;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<C> Handler<C> for TriggerHandler
where
    C: Context + ?Sized,
    C::Store: TriggerStore,
{
    fn name(&self) -> &str {
        "trigger"
    }

    fn help(&self) -> Option<String> {
        Some(format!(
            "```
Automatically react to a given text in each received message on channels where the bot is present.

There is a per channel antispam of {} seconds, avoiding a heated channel to be polluted by the bot.

A per [channel, trigger] antispam is effective and currently configured at {} seconds.

!trigger list
!trigger text \"trigger\" \"me\"
!trigger reaction \"trigger\" :emoji:
!trigger del \"trigger\"
```",
            CHANNEL_ANTISPAM.as_secs(),
            self.delay_repeat.as_secs()
        ))
    }

    #[instrument(skip(self, ctx, event))]
    async fn handle(&self, ctx: &C, event: &Event) -> Result<()> {
        let Event::Posted(post) = event else {
            return Ok(());
        };

        if post.message == "!trigger" || post.message.starts_with("!trigger ") {
            self.command(ctx, post).await
        } else {
            self.fire(ctx, post).await
        }
    }
}

pub(crate) fn pattern(re: &str) -> Result<Regex> {
    Regex::new(re).map_err(|e| MbotError::Config(format!("bad command pattern {}: {}", re, e)))
}

fn check_trigger(trigger: &str) -> std::result::Result<(), HandlerError> {
    if trigger.trim().is_empty() || trigger.trim() != trigger {
        return Err(HandlerError::InvalidTrigger(format!(
            "{:?} must be non-blank without surrounding spaces",
            trigger
        )));
    }
    Ok(())
}

pub(crate) fn database(e: StorageError) -> MbotError {
    MbotError::Database(e.to_string())
}

fn format_list(triggers: &[TriggerRecord]) -> String {
    if triggers.is_empty() {
        return "no triggers for this team".to_string();
    }
    let mut table = String::from("| trigger | action |\n|---|---|\n");
    for trigger in triggers {
        let action = match &trigger.action {
            TriggerAction::Text(text) => text.clone(),
            TriggerAction::Emoji(emoji) => format!(":{}:", emoji),
        };
        table.push_str(&format!("| {} | {} |\n", trigger.triggered_by, action));
    }
    table
}
