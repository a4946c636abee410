//! Sequential playlist playback.
//!
//! One link in flight at a time, advancing when the voice gateway reports the
//! clip finished. Cancellation is cooperative: the token is checked at each
//! iteration boundary, so a stop lands between clips, never mid-clip (the
//! silence escape hatch handles the clip already on air).

use crate::error::Result;
use crate::gateway::VoiceGateway;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where a playback run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing was queued.
    Idle,
    /// A clip is on air.
    Playing,
    /// The queue drained completely.
    Finished,
    /// The cancellation token fired between clips.
    Stopped,
}

pub struct SequentialPlayer {
    voice: Arc<dyn VoiceGateway>,
    token: CancellationToken,
}

impl SequentialPlayer {
    pub fn new(voice: Arc<dyn VoiceGateway>, token: CancellationToken) -> Self {
        Self { voice, token }
    }

    /// Drain the queue head-first, playing each link to completion.
    ///
    /// A playback error ends the run; there is no retry.
    pub async fn play_all(&self, mut queue: VecDeque<String>) -> Result<PlayerState> {
        if queue.is_empty() {
            return Ok(PlayerState::Idle);
        }

        while let Some(link) = queue.pop_front() {
            if self.token.is_cancelled() {
                debug!(remaining = queue.len() + 1, "playback stopped");
                return Ok(PlayerState::Stopped);
            }
            debug!(link = %link, "playing");
            self.voice.play(&link).await?;
        }
        Ok(PlayerState::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockVoiceGateway;

    fn queue(links: &[&str]) -> VecDeque<String> {
        links.iter().map(|l| l.to_string()).collect()
    }

    #[tokio::test]
    async fn test_plays_all_links_in_order() {
        let voice = Arc::new(MockVoiceGateway::new());
        let player = SequentialPlayer::new(voice.clone(), CancellationToken::new());

        let state = player.play_all(queue(&["A", "B", "C"])).await.unwrap();

        assert_eq!(state, PlayerState::Finished);
        assert_eq!(
            voice.played(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
    }

    #[tokio::test]
    async fn test_stop_after_first_clip_plays_only_first() {
        let voice = Arc::new(MockVoiceGateway::new());
        let token = CancellationToken::new();
        // Simulate a stop command arriving while A is on air
        voice.cancel_during("A", token.clone());

        let player = SequentialPlayer::new(voice.clone(), token);
        let state = player.play_all(queue(&["A", "B", "C"])).await.unwrap();

        assert_eq!(state, PlayerState::Stopped);
        assert_eq!(voice.played(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn test_already_cancelled_plays_nothing() {
        let voice = Arc::new(MockVoiceGateway::new());
        let token = CancellationToken::new();
        token.cancel();

        let player = SequentialPlayer::new(voice.clone(), token);
        let state = player.play_all(queue(&["A", "B"])).await.unwrap();

        assert_eq!(state, PlayerState::Stopped);
        assert!(voice.played().is_empty());
    }

    #[tokio::test]
    async fn test_empty_queue_is_idle() {
        let voice = Arc::new(MockVoiceGateway::new());
        let player = SequentialPlayer::new(voice, CancellationToken::new());

        let state = player.play_all(VecDeque::new()).await.unwrap();
        assert_eq!(state, PlayerState::Idle);
    }

    #[tokio::test]
    async fn test_playback_error_stops_the_chain() {
        let voice = Arc::new(MockVoiceGateway::new().with_play_failure());
        let player = SequentialPlayer::new(voice.clone(), CancellationToken::new());

        let result = player.play_all(queue(&["A", "B"])).await;
        assert!(result.is_err());
        assert!(voice.played().is_empty());
    }
}
