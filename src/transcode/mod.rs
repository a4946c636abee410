//! Transcoder adapter: raw stereo PCM → mono FLAC.
//!
//! The speech service wants mono FLAC; the capture adapter delivers raw
//! stereo PCM. Conversion is delegated to an external tool invocation.

use crate::defaults;
use crate::error::{Result, VoxlistError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Mutex;
use tokio::process::Command;

/// Trait for audio transcoding.
///
/// This trait allows swapping implementations (real ffmpeg vs mock).
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Convert the raw artifact at `input` into a mono FLAC artifact at
    /// `output`.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Transcoder backed by the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: String,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self {
            binary: defaults::TRANSCODER_BINARY.to_string(),
        }
    }

    /// Use a non-PATH binary location.
    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    /// Whether the binary can be invoked at all.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .output()
            .await
            .is_ok()
    }

    /// Argument list for one conversion. Split out so the invocation shape is
    /// testable without running the tool.
    fn args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-f".to_string(),
            "s16le".to_string(),
            "-ar".to_string(),
            defaults::CAPTURE_SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            defaults::CAPTURE_CHANNELS.to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-ar".to_string(),
            defaults::TRANSCODE_SAMPLE_RATE.to_string(),
            "-ac".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "flac".to_string(),
            output.display().to_string(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        let result = Command::new(&self.binary)
            .args(Self::args(input, output))
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VoxlistError::TranscoderNotFound {
                    tool: self.binary.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(VoxlistError::Transcode {
                message: format!("{}: {}", out.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

/// Mock transcoder for testing.
#[derive(Default)]
pub struct MockTranscoder {
    should_fail: bool,
    calls: Mutex<usize>,
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on transcode
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcode calls so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(&self, _input: &Path, output: &Path) -> Result<()> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        if self.should_fail {
            return Err(VoxlistError::Transcode {
                message: "mock transcode failure".to_string(),
            });
        }
        // Produce an (empty) output artifact so downstream reads succeed.
        std::fs::write(output, b"")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_args_describe_stereo_pcm_to_mono_flac() {
        let args = FfmpegTranscoder::args(Path::new("/tmp/in.pcm"), Path::new("/tmp/out.flac"));

        // Input: raw 48kHz stereo s16le
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], "/tmp/in.pcm");
        assert!(args[..input_pos].windows(2).any(|w| w == ["-f", "s16le"]));
        assert!(args[..input_pos].windows(2).any(|w| w == ["-ar", "48000"]));
        assert!(args[..input_pos].windows(2).any(|w| w == ["-ac", "2"]));

        // Output: 16kHz mono FLAC
        let tail = &args[input_pos + 2..];
        assert!(tail.windows(2).any(|w| w == ["-ar", "16000"]));
        assert!(tail.windows(2).any(|w| w == ["-ac", "1"]));
        assert!(tail.windows(2).any(|w| w == ["-f", "flac"]));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.flac"));
    }

    #[tokio::test]
    async fn test_missing_binary_reports_tool_name() {
        let transcoder = FfmpegTranscoder::new().with_binary("definitely-not-installed-xyz");
        let err = transcoder
            .transcode(Path::new("/tmp/in.pcm"), Path::new("/tmp/out.flac"))
            .await
            .unwrap_err();

        match err {
            VoxlistError::TranscoderNotFound { tool } => {
                assert_eq!(tool, "definitely-not-installed-xyz");
            }
            other => panic!("Expected TranscoderNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_transcoder_creates_output() {
        let dir = tempfile::tempdir().unwrap();
        let output: PathBuf = dir.path().join("out.flac");

        let transcoder = MockTranscoder::new();
        transcoder
            .transcode(Path::new("/tmp/in.pcm"), &output)
            .await
            .unwrap();

        assert!(output.exists());
        assert_eq!(transcoder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_transcoder_failure() {
        let transcoder = MockTranscoder::new().with_failure();
        let result = transcoder
            .transcode(Path::new("/tmp/in.pcm"), Path::new("/tmp/out.flac"))
            .await;

        assert!(result.is_err());
        assert_eq!(transcoder.call_count(), 1);
    }
}
