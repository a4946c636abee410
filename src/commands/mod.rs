//! Command grammar shared by the text and voice paths.
//!
//! The caller strips the prefix (text prefix or wake prefix) before parsing;
//! the grammar itself is identical for both origins. Dispatch differences
//! (voice has no `stop`) live in the handler.

pub mod handler;

pub use handler::CommandHandler;

use crate::defaults;

/// Where a command line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    Text,
    Voice,
}

/// A parsed top-level command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Join,
    Leave,
    Playlist(PlaylistCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistCommand {
    Create { name: String },
    Delete { name: String },
    Add { name: String, target: Target },
    Remove { name: String, target: Target },
    Play { name: String },
    Stop,
    Show { name: String },
    All,
}

/// What an add/remove argument resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Argument started with the video URL prefix; used verbatim.
    Link(String),
    /// Free text to resolve through the search adapter.
    Keywords(String),
}

/// Result of parsing one prefix-stripped line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Command(Command),
    /// Recognized command with missing or malformed arguments; the string is
    /// the usage reply.
    Usage(String),
    /// Not a command we know. Ignored, like the original bot.
    Unknown,
}

const PLAYLIST_USAGE: &str =
    "Usage: playlist <create|delete|add|remove|play|stop|show|all> [name] [link|keywords]";

/// Parse one prefix-stripped command line.
pub fn parse(line: &str) -> ParseOutcome {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.first() {
        None => ParseOutcome::Unknown,
        Some(&"help") => ParseOutcome::Command(Command::Help),
        Some(&"join") => ParseOutcome::Command(Command::Join),
        Some(&"leave") => ParseOutcome::Command(Command::Leave),
        Some(&"playlist") => parse_playlist(&tokens[1..]),
        Some(_) => ParseOutcome::Unknown,
    }
}

fn parse_playlist(rest: &[&str]) -> ParseOutcome {
    let Some(&sub) = rest.first() else {
        return ParseOutcome::Usage(PLAYLIST_USAGE.to_string());
    };

    let named = |f: fn(String) -> PlaylistCommand| {
        let name = rest
            .get(1)
            .copied()
            .unwrap_or(defaults::DEFAULT_PLAYLIST)
            .to_string();
        ParseOutcome::Command(Command::Playlist(f(name)))
    };

    match sub {
        "create" => named(|name| PlaylistCommand::Create { name }),
        "delete" => named(|name| PlaylistCommand::Delete { name }),
        "play" => named(|name| PlaylistCommand::Play { name }),
        "show" => named(|name| PlaylistCommand::Show { name }),
        "stop" => ParseOutcome::Command(Command::Playlist(PlaylistCommand::Stop)),
        "all" => ParseOutcome::Command(Command::Playlist(PlaylistCommand::All)),
        "add" | "remove" => {
            let Some(&name) = rest.get(1) else {
                return ParseOutcome::Usage(PLAYLIST_USAGE.to_string());
            };
            let args = &rest[2..];
            let Some(target) = parse_target(args) else {
                return ParseOutcome::Usage(PLAYLIST_USAGE.to_string());
            };
            let name = name.to_string();
            let command = if sub == "add" {
                PlaylistCommand::Add { name, target }
            } else {
                PlaylistCommand::Remove { name, target }
            };
            ParseOutcome::Command(Command::Playlist(command))
        }
        _ => ParseOutcome::Usage(PLAYLIST_USAGE.to_string()),
    }
}

fn parse_target(args: &[&str]) -> Option<Target> {
    let first = args.first()?;
    if first.starts_with(defaults::VIDEO_URL_PREFIX) {
        Some(Target::Link(first.to_string()))
    } else {
        Some(Target::Keywords(args.join(" ")))
    }
}

/// The fixed help message, sent for `help`.
pub fn help_message(prefix: &str) -> String {
    format!(
        "Commands:\n\
         {p}help - show this message\n\
         {p}join - join your voice channel\n\
         {p}leave - leave the voice channel\n\
         {p}playlist create [name] - create a playlist\n\
         {p}playlist delete [name] - delete a playlist\n\
         {p}playlist add <name> <link|keywords> - add a video\n\
         {p}playlist remove <name> <link|keywords> - remove a video\n\
         {p}playlist play [name] - play a playlist\n\
         {p}playlist stop - stop playback\n\
         {p}playlist show [name] - show a playlist\n\
         {p}playlist all - list all playlists",
        p = prefix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Command {
        match parse(line) {
            ParseOutcome::Command(c) => c,
            other => panic!("Expected command for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parsed("help"), Command::Help);
        assert_eq!(parsed("join"), Command::Join);
        assert_eq!(parsed("leave"), Command::Leave);
    }

    #[test]
    fn test_parse_unknown_is_ignored() {
        assert_eq!(parse("dance"), ParseOutcome::Unknown);
        assert_eq!(parse(""), ParseOutcome::Unknown);
        assert_eq!(parse("   "), ParseOutcome::Unknown);
    }

    #[test]
    fn test_parse_create_with_default_name() {
        assert_eq!(
            parsed("playlist create"),
            Command::Playlist(PlaylistCommand::Create {
                name: "default".to_string()
            })
        );
        assert_eq!(
            parsed("playlist create chill"),
            Command::Playlist(PlaylistCommand::Create {
                name: "chill".to_string()
            })
        );
    }

    #[test]
    fn test_parse_add_with_link() {
        assert_eq!(
            parsed("playlist add default https://www.youtube.com/watch?v=X"),
            Command::Playlist(PlaylistCommand::Add {
                name: "default".to_string(),
                target: Target::Link("https://www.youtube.com/watch?v=X".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_add_with_keywords() {
        assert_eq!(
            parsed("playlist add default lofi beats"),
            Command::Playlist(PlaylistCommand::Add {
                name: "default".to_string(),
                target: Target::Keywords("lofi beats".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_remove_with_link() {
        assert_eq!(
            parsed("playlist remove mix https://www.youtube.com/watch?v=Y"),
            Command::Playlist(PlaylistCommand::Remove {
                name: "mix".to_string(),
                target: Target::Link("https://www.youtube.com/watch?v=Y".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_add_without_arguments_is_usage() {
        assert!(matches!(parse("playlist add"), ParseOutcome::Usage(_)));
        assert!(matches!(
            parse("playlist add default"),
            ParseOutcome::Usage(_)
        ));
    }

    #[test]
    fn test_parse_play_show_stop_all() {
        assert_eq!(
            parsed("playlist play"),
            Command::Playlist(PlaylistCommand::Play {
                name: "default".to_string()
            })
        );
        assert_eq!(
            parsed("playlist show mix"),
            Command::Playlist(PlaylistCommand::Show {
                name: "mix".to_string()
            })
        );
        assert_eq!(parsed("playlist stop"), Command::Playlist(PlaylistCommand::Stop));
        assert_eq!(parsed("playlist all"), Command::Playlist(PlaylistCommand::All));
    }

    #[test]
    fn test_parse_playlist_without_subcommand_is_usage() {
        assert!(matches!(parse("playlist"), ParseOutcome::Usage(_)));
        assert!(matches!(parse("playlist shuffle"), ParseOutcome::Usage(_)));
    }

    #[test]
    fn test_non_url_argument_is_keywords_even_with_one_token() {
        assert_eq!(
            parsed("playlist add default lofi"),
            Command::Playlist(PlaylistCommand::Add {
                name: "default".to_string(),
                target: Target::Keywords("lofi".to_string()),
            })
        );
    }

    #[test]
    fn test_help_message_lists_every_command() {
        let help = help_message("!");
        for needle in [
            "!help", "!join", "!leave", "!playlist create", "!playlist delete", "!playlist add",
            "!playlist remove", "!playlist play", "!playlist stop", "!playlist show",
            "!playlist all",
        ] {
            assert!(help.contains(needle), "help missing {}", needle);
        }
    }
}
