//! Message edits: a post whose whole text is a known key is rewritten into its replacement.
//!
//! ```text
//! !edit list
//! !edit add "key" "replacement"
//! !edit me "key" "replacement"
//! !edit del "key"
//! !edit delme "key"
//! ```
//!
//! `add` and `del` act on the team's edits; `me` and `delme` on the sender's own, which take
//! precedence over team edits with the same key.

use async_trait::async_trait;
use mbot_core::{Context, Event, Handler, HandlerError, Post, Result};
use regex_lite::Regex;
use storage::{EditRecord, EditStore};
use tracing::{debug, instrument};

use crate::trigger::{database, pattern, ACK_EMOJI};

enum Command<'a> {
    List,
    AddTeam { edit: &'a str, replacement: &'a str },
    AddUser { edit: &'a str, replacement: &'a str },
    DeleteTeam { edit: &'a str },
    DeleteUser { edit: &'a str },
}

pub struct EditHandler {
    match_list: Regex,
    match_add: Regex,
    match_del: Regex,
}

impl EditHandler {
    pub fn new() -> Result<Self> {
        Ok(Self {
            match_list: pattern(r"^!edit list\b")?,
            match_add: pattern(r#"^!edit (add|me) "([^"]+)" "([^"]+)""#)?,
            match_del: pattern(r#"^!edit (del|delme) "(.+)""#)?,
        })
    }

    fn parse<'a>(&self, message: &'a str) -> Option<Command<'a>> {
        if self.match_list.is_match(message) {
            return Some(Command::List);
        }
        if let Some(caps) = self.match_add.captures(message) {
            let edit = caps.get(2)?.as_str();
            let replacement = caps.get(3)?.as_str();
            return Some(match caps.get(1)?.as_str() {
                "me" => Command::AddUser { edit, replacement },
                _ => Command::AddTeam { edit, replacement },
            });
        }
        if let Some(caps) = self.match_del.captures(message) {
            let edit = caps.get(2)?.as_str();
            return Some(match caps.get(1)?.as_str() {
                "delme" => Command::DeleteUser { edit },
                _ => Command::DeleteTeam { edit },
            });
        }
        None
    }

    async fn command<C>(&self, ctx: &C, post: &Post) -> Result<()>
    where
        C: Context + ?Sized,
        C::Store: EditStore,
    {
        let store = ctx.store();
        let Some(command) = self.parse(&post.message) else {
            return Err(HandlerError::InvalidCommand(post.message.clone()).into());
        };

        let removed = match command {
            Command::List => {
                let edits = store.list_edits(&post.team_id).await.map_err(database)?;
                ctx.client().reply(post, &format_list(&edits)).await?;
                return Ok(());
            }
            Command::AddTeam { edit, replacement } => {
                if let Err(e) = check_edit(edit) {
                    ctx.client().reply(post, &e.to_string()).await?;
                    return Ok(());
                }
                store
                    .add_team_edit(&post.team_id, edit, replacement)
                    .await
                    .map_err(database)?;
                true
            }
            Command::AddUser { edit, replacement } => {
                if let Err(e) = check_edit(edit) {
                    ctx.client().reply(post, &e.to_string()).await?;
                    return Ok(());
                }
                store
                    .add_user_edit(&post.user_id, edit, replacement)
                    .await
                    .map_err(database)?;
                true
            }
            Command::DeleteTeam { edit } => store
                .delete_team_edit(&post.team_id, edit)
                .await
                .map_err(database)?,
            Command::DeleteUser { edit } => store
                .delete_user_edit(&post.user_id, edit)
                .await
                .map_err(database)?,
        };

        if removed {
            ctx.client().react(&ctx.me().id, post, ACK_EMOJI).await?;
        } else {
            ctx.client().reply(post, "unknown edit").await?;
        }
        Ok(())
    }

    async fn rewrite<C>(&self, ctx: &C, post: &Post) -> Result<()>
    where
        C: Context + ?Sized,
        C::Store: EditStore,
    {
        let key = post.message.trim();
        if key.is_empty() {
            return Ok(());
        }

        let found = ctx
            .store()
            .find_edit(&post.user_id, &post.team_id, key)
            .await
            .map_err(database)?;
        if let Some(edit) = found {
            debug!(post_id = %post.id, edit = %edit.edit, "rewriting post");
            ctx.client().patch_post(&post.id, &edit.replacement).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<C> Handler<C> for EditHandler
where
    C: Context + ?Sized,
    C::Store: EditStore,
{
    fn name(&self) -> &str {
        "edit"
    }

    fn help(&self) -> Option<String> {
        Some(
            "```
Rewrite a message whose whole text is a known key into its replacement.

Personal edits apply to your own messages in every team and win over team edits.

!edit list
!edit add \"key\" \"replacement\"
!edit me \"key\" \"replacement\"
!edit del \"key\"
!edit delme \"key\"
```"
            .to_string(),
        )
    }

    #[instrument(skip(self, ctx, event))]
    async fn handle(&self, ctx: &C, event: &Event) -> Result<()> {
        let Event::Posted(post) = event else {
            return Ok(());
        };

        if post.message == "!edit" || post.message.starts_with("!edit ") {
            self.command(ctx, post).await
        } else {
            self.rewrite(ctx, post).await
        }
    }
}

fn check_edit(edit: &str) -> std::result::Result<(), HandlerError> {
    if edit.trim().is_empty() || edit.trim() != edit {
        return Err(HandlerError::InvalidEdit(format!(
            "{:?} must be non-blank without surrounding spaces",
            edit
        )));
    }
    Ok(())
}

fn format_list(edits: &[EditRecord]) -> String {
    if edits.is_empty() {
        return "no edits for this team".to_string();
    }
    let mut table = String::from("| edit | replacement |\n|---|---|\n");
    for edit in edits {
        table.push_str(&format!("| {} | {} |\n", edit.edit, edit.replacement));
    }
    table
}
