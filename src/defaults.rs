//! Shared constants for voxlist.
//!
//! Audio format constants match what the voice capture adapter delivers and
//! what the transcription service expects; the store and command defaults
//! mirror the persisted layout.

/// Sample rate of captured voice audio in Hz.
pub const CAPTURE_SAMPLE_RATE: u32 = 48_000;

/// Channel count of captured voice audio (stereo).
pub const CAPTURE_CHANNELS: u32 = 2;

/// Bytes per sample of captured voice audio (16-bit PCM).
pub const BYTES_PER_SAMPLE: u32 = 2;

/// Raw PCM bytes per second of captured audio.
///
/// 48kHz * 2 channels * 2 bytes = 192000. Utterance duration is derived from
/// byte length with this constant alone.
pub const PCM_BYTES_PER_SECOND: u32 = CAPTURE_SAMPLE_RATE * CAPTURE_CHANNELS * BYTES_PER_SAMPLE;

/// Sample rate of the transcoded mono artifact sent to the speech service.
pub const TRANSCODE_SAMPLE_RATE: u32 = 16_000;

/// Playlist name used when a command omits one.
pub const DEFAULT_PLAYLIST: &str = "default";

/// URL prefix that marks an add/remove argument as a literal video link
/// rather than search keywords.
pub const VIDEO_URL_PREFIX: &str = "https://www.youtube.com/watch";

/// Default transcoder binary name, resolved via PATH.
pub const TRANSCODER_BINARY: &str = "ffmpeg";

/// Default speech recognition endpoint.
pub const SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1/speech:recognize";

/// Default language code for speech recognition.
pub const SPEECH_LANGUAGE: &str = "en-US";
