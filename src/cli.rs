//! Command-line interface for voxlist
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voice-commanded playlist bot
#[derive(Parser, Debug)]
#[command(name = "voxlist", version, about = "Voice-commanded playlist bot")]
pub struct Cli {
    /// Subcommand to execute (default: repl)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check configuration and external tool availability
    Check,

    /// Run an offline command loop against an in-memory store
    Repl {
        /// Text command prefix
        #[arg(long, value_name = "PREFIX", default_value = "!")]
        prefix: String,

        /// Wake word required before voice commands
        #[arg(long, value_name = "WORD", default_value = "voxlist")]
        wake_prefix: String,
    },

    /// Run one raw capture file through the utterance pipeline
    Transcribe {
        /// Raw 48kHz stereo s16le PCM file
        file: PathBuf,

        /// Speaker id to attribute the utterance to
        #[arg(long, value_name = "ID", default_value = "cli")]
        speaker: String,
    },
}
