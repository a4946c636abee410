//! Console gateway for the local REPL mode.
//!
//! Prints replies and playback to stdout instead of talking to a platform.

use super::{ChannelId, Messenger, VoiceGateway};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Messenger that prints replies to stdout.
#[derive(Debug, Default)]
pub struct ConsoleMessenger;

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send(&self, _channel: &ChannelId, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}

/// Voice gateway that prints playback lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleVoiceGateway {
    channel: Mutex<Option<ChannelId>>,
}

#[async_trait]
impl VoiceGateway for ConsoleVoiceGateway {
    async fn join(&self, channel: &ChannelId) -> Result<()> {
        println!("[voice] joined {}", channel);
        *self.channel.lock().await = Some(channel.clone());
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        println!("[voice] left");
        *self.channel.lock().await = None;
        Ok(())
    }

    async fn current_channel(&self) -> Option<ChannelId> {
        self.channel.lock().await.clone()
    }

    async fn play(&self, link: &str) -> Result<()> {
        println!("[voice] playing {}", link);
        Ok(())
    }

    async fn play_silence(&self) -> Result<()> {
        println!("[voice] playing silence");
        Ok(())
    }
}
