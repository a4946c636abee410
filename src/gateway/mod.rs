//! Seam between the bot core and the messaging platform.
//!
//! The platform client (gateway connection, voice channel mechanics) lives
//! outside this crate. It drives the bot through [`crate::bot::Bot`] and
//! provides these traits as dependency-injected handles.

pub mod console;

pub use console::{ConsoleMessenger, ConsoleVoiceGateway};

use crate::error::{Result, VoxlistError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Server (guild) identifier on the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerId(pub String);

/// Channel identifier (text or voice) on the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

/// User identifier on the messaging platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a command came from and where replies go.
///
/// The voice path has no chat message, so this is the shared context both
/// paths hand to the command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub server: ServerId,
    /// Text channel replies are sent to.
    pub channel: ChannelId,
    pub author: UserId,
    pub author_name: String,
    /// Voice channel the author currently occupies, if any.
    pub voice_channel: Option<ChannelId>,
}

/// One inbound chat message as delivered by the platform client.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub context: CommandContext,
    pub content: String,
    /// Set when the author is a bot account; such messages are ignored.
    pub author_is_bot: bool,
}

/// Sends text replies into a channel.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<()>;
}

/// Voice-channel surface of the platform client.
///
/// `play` resolves when the gateway reports the clip finished speaking; the
/// sequential player relies on that to advance. There is no native stop
/// primitive, so interrupting playback goes through `play_silence`.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Join the given voice channel.
    async fn join(&self, channel: &ChannelId) -> Result<()>;

    /// Leave the current voice channel.
    async fn leave(&self) -> Result<()>;

    /// Voice channel the bot currently occupies, if any.
    async fn current_channel(&self) -> Option<ChannelId>;

    /// Play one link to completion.
    async fn play(&self, link: &str) -> Result<()>;

    /// Play the short silence clip, cutting off whatever is speaking.
    async fn play_silence(&self) -> Result<()>;
}

/// Recording messenger for tests.
#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<(ChannelId, String)>>,
    should_fail: bool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on send
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// All messages sent so far as (channel, text) pairs.
    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Text of the last message sent, if any.
    pub fn last(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<()> {
        if self.should_fail {
            return Err(VoxlistError::Other("mock send failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((channel.clone(), text.to_string()));
        Ok(())
    }
}

/// Recording voice gateway for tests.
///
/// `play` resolves immediately and records the link. A cancellation token can
/// be armed to fire when a specific link plays, simulating a stop command
/// arriving while that clip is on air.
#[derive(Default)]
pub struct MockVoiceGateway {
    channel: Mutex<Option<ChannelId>>,
    played: Mutex<Vec<String>>,
    silence_count: Mutex<usize>,
    cancel_on: Mutex<Option<(String, CancellationToken)>>,
    should_fail_play: bool,
}

impl MockVoiceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on play
    pub fn with_play_failure(mut self) -> Self {
        self.should_fail_play = true;
        self
    }

    /// Arm a token to be cancelled while `link` is playing.
    pub fn cancel_during(&self, link: &str, token: CancellationToken) {
        *self.cancel_on.lock().unwrap_or_else(|e| e.into_inner()) = Some((link.to_string(), token));
    }

    /// Links played so far, in order.
    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of silence clips played.
    pub fn silence_count(&self) -> usize {
        *self.silence_count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VoiceGateway for MockVoiceGateway {
    async fn join(&self, channel: &ChannelId) -> Result<()> {
        *self.channel.lock().unwrap_or_else(|e| e.into_inner()) = Some(channel.clone());
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        *self.channel.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn current_channel(&self) -> Option<ChannelId> {
        self.channel.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn play(&self, link: &str) -> Result<()> {
        if self.should_fail_play {
            return Err(VoxlistError::Voice {
                message: "mock playback failure".to_string(),
            });
        }
        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(link.to_string());
        if let Some((target, token)) = self.cancel_on.lock().unwrap_or_else(|e| e.into_inner()).as_ref()
            && target == link
        {
            token.cancel();
        }
        Ok(())
    }

    async fn play_silence(&self) -> Result<()> {
        *self.silence_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}
