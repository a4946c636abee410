//! Environment-based configuration.
//!
//! Every setting comes from the environment. Startup collects all missing
//! variables first so one failed launch reports the complete list instead of
//! one name at a time.

use crate::defaults;
use crate::error::{Result, VoxlistError};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Messaging-platform bot token.
    pub token: String,
    /// Display name the bot announces itself with.
    pub bot_name: String,
    /// Leading characters that mark a chat message as a text command.
    pub prefix: String,
    /// Leading word required before a transcript is treated as a voice command.
    pub wake_prefix: String,
    /// Minimum accepted utterance duration in seconds.
    pub min_utterance_secs: f64,
    /// Maximum accepted utterance duration in seconds.
    pub max_utterance_secs: f64,
    pub speech: SpeechConfig,
    pub database: DatabaseConfig,
}

/// Speech recognition service configuration (JSON-valued variable).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechConfig {
    pub api_key: String,
    #[serde(default = "default_speech_language")]
    pub language: String,
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,
}

/// Realtime database connection configuration (JSON-valued variable).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub base_url: String,
    #[serde(default)]
    pub auth: Option<String>,
}

fn default_speech_language() -> String {
    defaults::SPEECH_LANGUAGE.to_string()
}

fn default_speech_endpoint() -> String {
    defaults::SPEECH_ENDPOINT.to_string()
}

const VAR_TOKEN: &str = "VOXLIST_TOKEN";
const VAR_BOT_NAME: &str = "VOXLIST_BOT_NAME";
const VAR_PREFIX: &str = "VOXLIST_PREFIX";
const VAR_WAKE_PREFIX: &str = "VOXLIST_WAKE_PREFIX";
const VAR_MIN_UTTERANCE: &str = "VOXLIST_MIN_UTTERANCE_SECS";
const VAR_MAX_UTTERANCE: &str = "VOXLIST_MAX_UTTERANCE_SECS";
const VAR_SPEECH: &str = "VOXLIST_SPEECH_CREDENTIALS";
const VAR_DATABASE: &str = "VOXLIST_DATABASE_CONFIG";

const REQUIRED_VARS: [&str; 8] = [
    VAR_TOKEN,
    VAR_BOT_NAME,
    VAR_PREFIX,
    VAR_WAKE_PREFIX,
    VAR_MIN_UTTERANCE,
    VAR_MAX_UTTERANCE,
    VAR_SPEECH,
    VAR_DATABASE,
];

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails with a single error naming every missing variable, then with a
    /// per-key error for values that are present but unparseable.
    pub fn from_env() -> Result<Self> {
        let mut values = std::collections::HashMap::new();
        let mut missing = Vec::new();

        for name in REQUIRED_VARS {
            match std::env::var(name) {
                Ok(v) if !v.is_empty() => {
                    values.insert(name, v);
                }
                _ => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(VoxlistError::ConfigMissing { names: missing });
        }

        let min_utterance_secs = parse_secs(VAR_MIN_UTTERANCE, &values[VAR_MIN_UTTERANCE])?;
        let max_utterance_secs = parse_secs(VAR_MAX_UTTERANCE, &values[VAR_MAX_UTTERANCE])?;
        if min_utterance_secs > max_utterance_secs {
            return Err(VoxlistError::ConfigInvalidValue {
                key: VAR_MIN_UTTERANCE.to_string(),
                message: "minimum exceeds maximum".to_string(),
            });
        }

        let speech: SpeechConfig = parse_json(VAR_SPEECH, &values[VAR_SPEECH])?;
        let database: DatabaseConfig = parse_json(VAR_DATABASE, &values[VAR_DATABASE])?;

        Ok(Self {
            token: values[VAR_TOKEN].clone(),
            bot_name: values[VAR_BOT_NAME].clone(),
            prefix: values[VAR_PREFIX].clone(),
            wake_prefix: values[VAR_WAKE_PREFIX].clone(),
            min_utterance_secs,
            max_utterance_secs,
            speech,
            database,
        })
    }

    /// Offline configuration for the local REPL mode. No credentials, in-memory
    /// store, console gateway.
    pub fn local(prefix: &str, wake_prefix: &str) -> Self {
        Self {
            token: String::new(),
            bot_name: "voxlist".to_string(),
            prefix: prefix.to_string(),
            wake_prefix: wake_prefix.to_string(),
            min_utterance_secs: 1.0,
            max_utterance_secs: 10.0,
            speech: SpeechConfig {
                api_key: String::new(),
                language: default_speech_language(),
                endpoint: default_speech_endpoint(),
            },
            database: DatabaseConfig {
                base_url: String::new(),
                auth: None,
            },
        }
    }
}

fn parse_secs(key: &str, value: &str) -> Result<f64> {
    let secs: f64 = value
        .parse()
        .map_err(|_| VoxlistError::ConfigInvalidValue {
            key: key.to_string(),
            message: format!("expected seconds as a number, got \"{}\"", value),
        })?;
    if secs < 0.0 {
        return Err(VoxlistError::ConfigInvalidValue {
            key: key.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(secs)
}

fn parse_json<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    serde_json::from_str(value).map_err(|e| VoxlistError::ConfigInvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
