//! Cloud speech recognition client.
//!
//! Posts the base64-encoded FLAC artifact to the recognition REST endpoint
//! with a phrase hint and returns the first alternative of the first result.

use crate::config::SpeechConfig;
use crate::defaults;
use crate::error::{Result, VoxlistError};
use crate::stt::transcriber::SpeechToText;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

pub struct CloudSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognizeResult>,
}

#[derive(Debug, Deserialize)]
struct RecognizeResult {
    #[serde(default)]
    alternatives: Vec<RecognizeAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognizeAlternative {
    transcript: String,
}

impl CloudSpeechClient {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        }
    }

    /// Recognition request body for one artifact.
    fn request_body(&self, content_b64: &str, hint: &str) -> serde_json::Value {
        json!({
            "config": {
                "encoding": "FLAC",
                "sampleRateHertz": defaults::TRANSCODE_SAMPLE_RATE,
                "languageCode": self.language,
                "speechContexts": [{ "phrases": [hint] }],
            },
            "audio": { "content": content_b64 },
        })
    }

    fn first_transcript(response: RecognizeResponse) -> Result<String> {
        response
            .results
            .into_iter()
            .next()
            .and_then(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .ok_or_else(|| VoxlistError::Transcription {
                message: "empty recognition response".to_string(),
            })
    }
}

#[async_trait]
impl SpeechToText for CloudSpeechClient {
    async fn transcribe(&self, audio: &Path, hint: &str) -> Result<String> {
        let bytes = tokio::fs::read(audio).await?;
        let body = self.request_body(&BASE64.encode(bytes), hint);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoxlistError::Transcription {
                message: format!("recognition request failed: {}", response.status()),
            });
        }

        Self::first_transcript(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CloudSpeechClient {
        CloudSpeechClient::new(&SpeechConfig {
            api_key: "k".to_string(),
            language: "en-US".to_string(),
            endpoint: defaults::SPEECH_ENDPOINT.to_string(),
        })
    }

    #[test]
    fn test_request_body_shape() {
        let body = test_client().request_body("QUJD", "jukebox");

        assert_eq!(body["config"]["encoding"], "FLAC");
        assert_eq!(body["config"]["sampleRateHertz"], 16000);
        assert_eq!(body["config"]["languageCode"], "en-US");
        assert_eq!(body["config"]["speechContexts"][0]["phrases"][0], "jukebox");
        assert_eq!(body["audio"]["content"], "QUJD");
    }

    #[test]
    fn test_first_transcript_picks_first_alternative() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{
                "results": [
                    { "alternatives": [
                        { "transcript": "jukebox playlist play default" },
                        { "transcript": "jute box playlist play default" }
                    ]},
                    { "alternatives": [{ "transcript": "trailing" }] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            CloudSpeechClient::first_transcript(response).unwrap(),
            "jukebox playlist play default"
        );
    }

    #[test]
    fn test_empty_response_is_an_error() {
        let response: RecognizeResponse = serde_json::from_str("{}").unwrap();
        let err = CloudSpeechClient::first_transcript(response).unwrap_err();
        assert!(matches!(err, VoxlistError::Transcription { .. }));
    }
}
