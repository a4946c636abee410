//! Bot composition root.
//!
//! Wires the dependency-injected service handles into the message and
//! utterance entry points the platform client calls. No ambient singletons;
//! everything the handlers touch comes in through [`BotServices`].

use crate::audio::{DurationGate, Utterance};
use crate::commands::{self, CommandHandler, CommandOrigin, ParseOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{ChatMessage, CommandContext, Messenger, VoiceGateway};
use crate::pipeline::UtterancePipeline;
use crate::search::LinkSearch;
use crate::stt::SpeechToText;
use crate::store::PlaylistService;
use crate::transcode::Transcoder;
use std::sync::Arc;
use tracing::{debug, info};

/// Service handles the bot runs against.
pub struct BotServices {
    pub playlists: Arc<PlaylistService>,
    pub search: Arc<dyn LinkSearch>,
    pub transcoder: Arc<dyn Transcoder>,
    pub speech: Arc<dyn SpeechToText>,
    pub messenger: Arc<dyn Messenger>,
    pub voice: Arc<dyn VoiceGateway>,
}

pub struct Bot {
    prefix: String,
    playlists: Arc<PlaylistService>,
    messenger: Arc<dyn Messenger>,
    handler: CommandHandler,
    pipeline: UtterancePipeline,
}

impl Bot {
    pub fn new(config: &Config, services: BotServices) -> Self {
        let gate = DurationGate::new(config.min_utterance_secs, config.max_utterance_secs);
        let pipeline = UtterancePipeline::new(
            gate,
            Arc::clone(&services.transcoder),
            Arc::clone(&services.speech),
            &config.wake_prefix,
        );
        let handler = CommandHandler::new(
            Arc::clone(&services.playlists),
            Arc::clone(&services.search),
            Arc::clone(&services.messenger),
            Arc::clone(&services.voice),
            &config.prefix,
        );
        info!(bot = %config.bot_name, "bot ready");
        Self {
            prefix: config.prefix.clone(),
            playlists: services.playlists,
            messenger: services.messenger,
            handler,
            pipeline,
        }
    }

    /// Entry point for one inbound chat message.
    pub async fn handle_message(&self, message: &ChatMessage) -> Result<()> {
        debug!(content = %message.content, "received message");
        if message.author_is_bot {
            return Ok(());
        }

        self.playlists
            .record_message(&message.context.server, &message.context.author)
            .await?;

        let Some(line) = message.content.strip_prefix(&self.prefix) else {
            return Ok(());
        };
        self.route_line(&message.context, line, CommandOrigin::Text)
            .await
    }

    /// Entry point for one finished utterance from the capture adapter.
    pub async fn handle_utterance(&self, ctx: &CommandContext, utterance: Utterance) -> Result<()> {
        let Some(line) = self.pipeline.process(utterance).await? else {
            return Ok(());
        };
        info!(speaker = %ctx.author, command = %line, "voice command recognized");
        self.route_line(ctx, &line, CommandOrigin::Voice).await
    }

    async fn route_line(
        &self,
        ctx: &CommandContext,
        line: &str,
        origin: CommandOrigin,
    ) -> Result<()> {
        match commands::parse(line) {
            ParseOutcome::Command(command) => self.handler.dispatch(ctx, command, origin).await,
            ParseOutcome::Usage(usage) => self.messenger.send(&ctx.channel, &usage).await,
            ParseOutcome::Unknown => {
                debug!(line = %line, "unknown command, ignoring");
                Ok(())
            }
        }
    }
}
