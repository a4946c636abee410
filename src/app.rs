//! Top-level command runners wired from the CLI.
//!
//! `check` reports configuration and tool health, `repl` drives the bot
//! against in-memory services from stdin, `transcribe` runs one capture file
//! through the utterance pipeline against the real speech service.

use crate::audio::{DurationGate, UtteranceRecorder};
use crate::bot::{Bot, BotServices};
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{
    ChannelId, ChatMessage, CommandContext, ConsoleMessenger, ConsoleVoiceGateway, ServerId, UserId,
};
use crate::pipeline::UtterancePipeline;
use crate::search::StaticSearch;
use crate::store::{MemoryStore, PlaylistService};
use crate::stt::{CloudSpeechClient, MockSpeech};
use crate::transcode::{FfmpegTranscoder, MockTranscoder};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Check configuration and external dependencies, reporting each on stdout.
///
/// Diagnostic mode: problems are reported, not returned, so every check runs.
pub async fn run_check_command() -> Result<()> {
    match Config::from_env() {
        Ok(config) => {
            println!("configuration: ok");
            println!(
                "  utterance window: {}s - {}s",
                config.min_utterance_secs, config.max_utterance_secs
            );
            println!("  speech language: {}", config.speech.language);
            println!("  database: {}", config.database.base_url);
        }
        Err(e) => println!("configuration: {}", e),
    }

    let transcoder = FfmpegTranscoder::new();
    if transcoder.is_available().await {
        println!("ffmpeg: ok");
    } else {
        println!("ffmpeg: not found in PATH");
    }

    Ok(())
}

/// Run the bot offline: in-memory store, console gateways, stdin as the chat
/// channel. Voice capture is not wired; text commands only.
pub async fn run_repl_command(prefix: &str, wake_prefix: &str) -> Result<()> {
    let config = Config::local(prefix, wake_prefix);
    let services = BotServices {
        playlists: Arc::new(PlaylistService::new(Arc::new(MemoryStore::new()))),
        search: Arc::new(StaticSearch::empty()),
        transcoder: Arc::new(MockTranscoder::new()),
        speech: Arc::new(MockSpeech::new()),
        messenger: Arc::new(ConsoleMessenger),
        voice: Arc::new(ConsoleVoiceGateway::default()),
    };
    let bot = Bot::new(&config, services);

    info!("Bot is ready.");
    println!("Type commands (prefix '{}'), Ctrl+D to quit.", prefix);

    let context = CommandContext {
        server: ServerId::new("local"),
        channel: ChannelId::new("console"),
        author: UserId::new("operator"),
        author_name: "operator".to_string(),
        voice_channel: Some(ChannelId::new("console-voice")),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }
        let message = ChatMessage {
            context: context.clone(),
            content: line.to_string(),
            author_is_bot: false,
        };
        bot.handle_message(&message).await?;
    }
    Ok(())
}

/// Run one raw PCM capture file through the full utterance pipeline and print
/// the extracted command line. Needs complete environment configuration.
pub async fn run_transcribe_command(file: &Path, speaker: &str) -> Result<()> {
    let config = Config::from_env()?;
    let pipeline = UtterancePipeline::new(
        DurationGate::new(config.min_utterance_secs, config.max_utterance_secs),
        Arc::new(FfmpegTranscoder::new()),
        Arc::new(CloudSpeechClient::new(&config.speech)),
        &config.wake_prefix,
    );

    let pcm = tokio::fs::read(file).await?;
    let mut recorder = UtteranceRecorder::new(UserId::new(speaker))?;
    recorder.write(&pcm)?;
    let utterance = recorder.finish()?;

    match pipeline.process(utterance).await? {
        Some(line) => println!("{}", line),
        None => println!("(no command recognized)"),
    }
    Ok(())
}
