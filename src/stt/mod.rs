//! Speech-to-text adapter.

pub mod cloud;
pub mod transcriber;

pub use cloud::CloudSpeechClient;
pub use transcriber::{MockSpeech, SpeechToText};
