//! Error types for voxlist.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxlistError {
    // Configuration errors
    #[error("Missing configuration: {}", .names.join(", "))]
    ConfigMissing { names: Vec<String> },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // Audio capture errors
    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Transcoding errors
    #[error("Transcoder tool not found: {tool}")]
    TranscoderNotFound { tool: String },

    #[error("Transcoding failed: {message}")]
    Transcode { message: String },

    // Transcription errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Playlist store errors
    #[error("Playlist store error: {message}")]
    Store { message: String },

    // Link search errors
    #[error("Link search failed: {message}")]
    Search { message: String },

    // Voice gateway errors
    #[error("Voice gateway error: {message}")]
    Voice { message: String },

    // Adapter transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxlistError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_missing_lists_every_name() {
        let error = VoxlistError::ConfigMissing {
            names: vec!["VOXLIST_TOKEN".to_string(), "VOXLIST_PREFIX".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Missing configuration: VOXLIST_TOKEN, VOXLIST_PREFIX"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = VoxlistError::ConfigInvalidValue {
            key: "VOXLIST_MIN_UTTERANCE_SECS".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for VOXLIST_MIN_UTTERANCE_SECS: not a number"
        );
    }

    #[test]
    fn test_transcoder_not_found_display() {
        let error = VoxlistError::TranscoderNotFound {
            tool: "ffmpeg".to_string(),
        };
        assert_eq!(error.to_string(), "Transcoder tool not found: ffmpeg");
    }

    #[test]
    fn test_transcode_display() {
        let error = VoxlistError::Transcode {
            message: "exit status 1".to_string(),
        };
        assert_eq!(error.to_string(), "Transcoding failed: exit status 1");
    }

    #[test]
    fn test_transcription_display() {
        let error = VoxlistError::Transcription {
            message: "empty recognition response".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription failed: empty recognition response"
        );
    }

    #[test]
    fn test_store_display() {
        let error = VoxlistError::Store {
            message: "unexpected value shape".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Playlist store error: unexpected value shape"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: VoxlistError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let error: VoxlistError = json_error.into();
        assert!(error.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: VoxlistError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<VoxlistError>();
        assert_sync::<VoxlistError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);

        fn returns_error() -> Result<i32> {
            Err(VoxlistError::Other("test error".to_string()))
        }
        assert!(returns_error().is_err());
    }
}
