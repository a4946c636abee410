//! Per-speaker utterance buffering.
//!
//! The capture adapter hands us raw PCM chunks from the moment a speaker
//! starts until they stop. The recorder spools them into a temp file; the
//! finished [`Utterance`] owns that file and deletes it on drop, so every
//! pipeline outcome (gated, failed, transcribed) cleans up the artifact.

use crate::error::Result;
use crate::gateway::UserId;
use std::io::Write;
use tempfile::{NamedTempFile, TempPath};

/// Accumulates one speaker's raw audio while they are speaking.
pub struct UtteranceRecorder {
    speaker: UserId,
    file: NamedTempFile,
    byte_len: u64,
}

impl UtteranceRecorder {
    /// Start buffering a new utterance for `speaker`.
    pub fn new(speaker: UserId) -> Result<Self> {
        Ok(Self {
            speaker,
            file: tempfile::Builder::new().suffix(".pcm").tempfile()?,
            byte_len: 0,
        })
    }

    /// Append one raw PCM chunk.
    pub fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk)?;
        self.byte_len += chunk.len() as u64;
        Ok(())
    }

    /// Bytes buffered so far.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// Finalize when the speaker stops; the recorder is consumed.
    pub fn finish(mut self) -> Result<Utterance> {
        self.file.flush()?;
        Ok(Utterance {
            speaker: self.speaker,
            path: self.file.into_temp_path(),
            byte_len: self.byte_len,
        })
    }
}

/// One captured span of a single speaker's audio.
///
/// The backing temp file is deleted when this value drops.
pub struct Utterance {
    pub speaker: UserId,
    pub path: TempPath,
    pub byte_len: u64,
}
