//! Duration gate for captured utterances.
//!
//! Duration comes straight from byte length and the fixed capture format
//! (48kHz, 16-bit, stereo = 192000 bytes/second). Utterances outside the
//! configured window are dropped silently, log line only.

use crate::defaults::PCM_BYTES_PER_SECOND;

/// Accepts utterances whose duration falls inside `[min, max]`, inclusive.
#[derive(Debug, Clone, Copy)]
pub struct DurationGate {
    min_secs: f64,
    max_secs: f64,
}

/// Outcome of gating one utterance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Accept { seconds: f64 },
    Reject { seconds: f64 },
}

impl DurationGate {
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Utterance duration in seconds for a raw artifact of `byte_len` bytes.
    pub fn seconds(byte_len: u64) -> f64 {
        byte_len as f64 / PCM_BYTES_PER_SECOND as f64
    }

    pub fn evaluate(&self, byte_len: u64) -> GateDecision {
        let seconds = Self::seconds(byte_len);
        if seconds >= self.min_secs && seconds <= self.max_secs {
            GateDecision::Accept { seconds }
        } else {
            GateDecision::Reject { seconds }
        }
    }
}
