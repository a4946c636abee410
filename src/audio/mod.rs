//! Utterance capture buffering and duration gating.

pub mod gate;
pub mod utterance;

pub use gate::{DurationGate, GateDecision};
pub use utterance::{Utterance, UtteranceRecorder};
