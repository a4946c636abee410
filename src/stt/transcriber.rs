use crate::error::{Result, VoxlistError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;

/// Trait for speech-to-text transcription.
///
/// This trait allows swapping implementations (cloud service vs mock).
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe a mono FLAC artifact to text.
    ///
    /// `hint` is a vocabulary phrase the recognizer should be biased toward;
    /// the voice pipeline passes the wake prefix so it survives recognition.
    async fn transcribe(&self, audio: &Path, hint: &str) -> Result<String>;
}

/// Implement SpeechToText for Arc<T> to allow sharing across pipelines.
#[async_trait]
impl<T: SpeechToText> SpeechToText for Arc<T> {
    async fn transcribe(&self, audio: &Path, hint: &str) -> Result<String> {
        (**self).transcribe(audio, hint).await
    }
}

/// Mock speech-to-text for testing.
#[derive(Default)]
pub struct MockSpeech {
    response: String,
    should_fail: bool,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl MockSpeech {
    /// Create a new mock with default settings
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Configure the mock to return a specific transcript
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Calls so far as (audio path, hint) pairs.
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SpeechToText for MockSpeech {
    async fn transcribe(&self, audio: &Path, hint: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((audio.to_path_buf(), hint.to_string()));
        if self.should_fail {
            Err(VoxlistError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}
