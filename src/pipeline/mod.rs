//! Per-utterance processing pipeline.
//!
//! One captured utterance flows through strictly sequential steps:
//! duration gate → transcode → transcribe → wake-prefix gate. The output is
//! the command line a voice command carries, or `None` when the utterance is
//! dropped along the way. Both temp artifacts (raw and transcoded) are
//! deleted whatever the outcome; they live in drop-owned temp paths.
//!
//! Pipelines for different speakers or servers run independently; nothing
//! here is shared mutable state.

use crate::audio::{DurationGate, GateDecision, Utterance};
use crate::error::Result;
use crate::stt::SpeechToText;
use crate::transcode::Transcoder;
use std::sync::Arc;
use tracing::debug;

pub struct UtterancePipeline {
    gate: DurationGate,
    transcoder: Arc<dyn Transcoder>,
    speech: Arc<dyn SpeechToText>,
    /// Stored lowercased; transcripts are lowercased before matching.
    wake_prefix: String,
}

impl UtterancePipeline {
    pub fn new(
        gate: DurationGate,
        transcoder: Arc<dyn Transcoder>,
        speech: Arc<dyn SpeechToText>,
        wake_prefix: &str,
    ) -> Self {
        Self {
            gate,
            transcoder,
            speech,
            wake_prefix: wake_prefix.trim().to_lowercase(),
        }
    }

    /// Run one utterance through the pipeline.
    ///
    /// Returns the prefix-stripped command line, or `None` when the utterance
    /// was gated out or the transcript did not start with the wake prefix.
    pub async fn process(&self, utterance: Utterance) -> Result<Option<String>> {
        let seconds = match self.gate.evaluate(utterance.byte_len) {
            GateDecision::Reject { seconds } => {
                debug!(
                    speaker = %utterance.speaker,
                    seconds,
                    "utterance outside duration window, dropping"
                );
                return Ok(None);
            }
            GateDecision::Accept { seconds } => seconds,
        };
        debug!(speaker = %utterance.speaker, seconds, "utterance accepted");

        let flac = tempfile::Builder::new()
            .suffix(".flac")
            .tempfile()?
            .into_temp_path();
        self.transcoder.transcode(&utterance.path, &flac).await?;

        let transcript = self.speech.transcribe(&flac, &self.wake_prefix).await?;
        debug!(speaker = %utterance.speaker, transcript = %transcript, "transcribed");

        Ok(self.extract_command(&transcript))
    }

    /// Strip the wake prefix from a transcript, after trimming and
    /// lowercasing. `None` when the prefix is absent or nothing follows it.
    fn extract_command(&self, transcript: &str) -> Option<String> {
        let text = transcript.trim().to_lowercase();
        let rest = text.strip_prefix(&self.wake_prefix)?.trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}
