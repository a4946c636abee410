//! Command handler: executes parsed commands against the injected services.
//!
//! One handler instance serves every server; per-server playback sessions are
//! tracked in the session registry so `stop` can cancel the token `play`
//! installed.

use crate::commands::{Command, CommandOrigin, PlaylistCommand, Target, help_message};
use crate::error::Result;
use crate::gateway::{CommandContext, Messenger, ServerId, VoiceGateway};
use crate::player::SequentialPlayer;
use crate::search::LinkSearch;
use crate::store::{Playlist, PlaylistService};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct CommandHandler {
    playlists: Arc<PlaylistService>,
    search: Arc<dyn LinkSearch>,
    messenger: Arc<dyn Messenger>,
    voice: Arc<dyn VoiceGateway>,
    prefix: String,
    // server -> cancellation token of the active playback session
    sessions: Mutex<HashMap<ServerId, CancellationToken>>,
}

impl CommandHandler {
    pub fn new(
        playlists: Arc<PlaylistService>,
        search: Arc<dyn LinkSearch>,
        messenger: Arc<dyn Messenger>,
        voice: Arc<dyn VoiceGateway>,
        prefix: &str,
    ) -> Self {
        Self {
            playlists,
            search,
            messenger,
            voice,
            prefix: prefix.to_string(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn reply(&self, ctx: &CommandContext, text: &str) -> Result<()> {
        self.messenger.send(&ctx.channel, text).await
    }

    /// Execute one parsed command.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        command: Command,
        origin: CommandOrigin,
    ) -> Result<()> {
        match command {
            Command::Help => self.reply(ctx, &help_message(&self.prefix)).await,
            Command::Join => self.handle_join(ctx).await,
            Command::Leave => self.handle_leave(ctx).await,
            Command::Playlist(sub) => self.handle_playlist(ctx, sub, origin).await,
        }
    }

    async fn handle_join(&self, ctx: &CommandContext) -> Result<()> {
        match &ctx.voice_channel {
            Some(channel) => self.voice.join(channel).await,
            None => {
                self.reply(ctx, "You must be in a voice channel to use that command.")
                    .await
            }
        }
    }

    async fn handle_leave(&self, ctx: &CommandContext) -> Result<()> {
        let bot_channel = self.voice.current_channel().await;
        match bot_channel {
            Some(channel) if ctx.voice_channel.as_ref() == Some(&channel) => {
                self.voice.leave().await
            }
            _ => {
                self.reply(ctx, "You need to be in my voice channel to do that.")
                    .await
            }
        }
    }

    async fn handle_playlist(
        &self,
        ctx: &CommandContext,
        command: PlaylistCommand,
        origin: CommandOrigin,
    ) -> Result<()> {
        match command {
            PlaylistCommand::Create { name } => {
                let description = format!("Playlist '{}' created by {}", name, ctx.author_name);
                if self.playlists.create(&ctx.server, &name, &description).await? {
                    self.reply(ctx, &format!("Created playlist '{}'.", name)).await
                } else {
                    self.reply(ctx, &format!("Playlist '{}' already exists.", name))
                        .await
                }
            }
            PlaylistCommand::Delete { name } => {
                if self.playlists.delete(&ctx.server, &name).await? {
                    self.reply(ctx, &format!("Deleted playlist '{}'.", name)).await
                } else {
                    self.reply_no_playlist(ctx, &name).await
                }
            }
            PlaylistCommand::Add { name, target } => {
                let Some(link) = self.resolve_target(ctx, target).await? else {
                    return Ok(());
                };
                if self.playlists.add_link(&ctx.server, &name, &link).await? {
                    self.reply(ctx, &format!("Added {} to '{}'.", link, name)).await
                } else {
                    self.reply_no_playlist(ctx, &name).await
                }
            }
            PlaylistCommand::Remove { name, target } => {
                let Some(link) = self.resolve_target(ctx, target).await? else {
                    return Ok(());
                };
                match self.playlists.remove_link(&ctx.server, &name, &link).await? {
                    None => self.reply_no_playlist(ctx, &name).await,
                    Some(0) => {
                        self.reply(ctx, &format!("{} is not in '{}'.", link, name))
                            .await
                    }
                    Some(_) => {
                        self.reply(ctx, &format!("Removed {} from '{}'.", link, name))
                            .await
                    }
                }
            }
            PlaylistCommand::Play { name } => self.handle_play(ctx, &name).await,
            PlaylistCommand::Stop => self.handle_stop(ctx, origin).await,
            PlaylistCommand::Show { name } => {
                match self.playlists.show(&ctx.server, &name).await? {
                    Some(playlist) => self.reply(ctx, &format_playlist(&playlist)).await,
                    None => self.reply_no_playlist(ctx, &name).await,
                }
            }
            PlaylistCommand::All => {
                let playlists = self.playlists.all(&ctx.server).await?;
                self.reply(ctx, &format_all(&playlists)).await
            }
        }
    }

    /// Resolve an add/remove target to a concrete link. Literal links pass
    /// through untouched; keywords go to the search adapter and take the
    /// first result. Replies and returns `None` when nothing matched.
    async fn resolve_target(&self, ctx: &CommandContext, target: Target) -> Result<Option<String>> {
        match target {
            Target::Link(link) => Ok(Some(link)),
            Target::Keywords(query) => match self.search.first_link(&query).await? {
                Some(link) => Ok(Some(link)),
                None => {
                    self.reply(ctx, &format!("No results for \"{}\".", query))
                        .await?;
                    Ok(None)
                }
            },
        }
    }

    async fn handle_play(&self, ctx: &CommandContext, name: &str) -> Result<()> {
        let Some(links) = self.playlists.links(&ctx.server, name).await? else {
            return self.reply_no_playlist(ctx, name).await;
        };
        if links.is_empty() {
            return self.reply(ctx, &format!("Playlist '{}' is empty.", name)).await;
        }

        // Fresh token per session: a prior stop never bleeds into this run.
        let token = CancellationToken::new();
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ctx.server.clone(), token.clone());

        let queue: VecDeque<String> = links.into();
        let count = queue.len();
        let player = SequentialPlayer::new(Arc::clone(&self.voice), token);
        tokio::spawn(async move {
            match player.play_all(queue).await {
                Ok(state) => debug!(?state, "playback ended"),
                Err(e) => warn!(error = %e, "playback failed"),
            }
        });

        self.reply(ctx, &format!("Playing playlist '{}' ({} links).", name, count))
            .await
    }

    async fn handle_stop(&self, ctx: &CommandContext, origin: CommandOrigin) -> Result<()> {
        // Spoken "stop" while playback is already talking over the capture
        // was judged unreliable; stop stays text-only.
        if origin == CommandOrigin::Voice {
            debug!(server = %ctx.server, "ignoring voice-originated stop");
            return Ok(());
        }

        if let Some(token) = self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&ctx.server)
        {
            token.cancel();
        }
        // No native stop primitive; silence cuts off the clip on air.
        self.voice.play_silence().await?;
        self.reply(ctx, "Stopped playback.").await
    }

    async fn reply_no_playlist(&self, ctx: &CommandContext, name: &str) -> Result<()> {
        self.reply(ctx, &format!("No playlist named '{}'.", name)).await
    }

    #[cfg(test)]
    fn active_session(&self, server: &ServerId) -> Option<CancellationToken> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(server)
            .cloned()
    }
}

/// One playlist, formatted for a `show` reply.
fn format_playlist(playlist: &Playlist) -> String {
    let mut out = format!("Playlist '{}': {}", playlist.name, playlist.description);
    if playlist.links.is_empty() {
        out.push_str("\n  (empty)");
    } else {
        for (i, link) in playlist.links.iter().enumerate() {
            out.push_str(&format!("\n  {}. {}", i + 1, link));
        }
    }
    out
}

/// Every playlist of a server, formatted for an `all` reply.
fn format_all(playlists: &[Playlist]) -> String {
    if playlists.is_empty() {
        return "No playlists yet.".to_string();
    }
    let mut out = "Playlists:".to_string();
    for playlist in playlists {
        out.push_str(&format!(
            "\n  {} ({} links)",
            playlist.name,
            playlist.links.len()
        ));
    }
    out
}
