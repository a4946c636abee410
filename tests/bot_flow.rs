//! End-to-end flows through the composition root: chat text in one side,
//! store writes and voice playback out the other, with mock adapters at the
//! platform seams.

use std::sync::Arc;
use std::time::Duration;
use voxlist::audio::UtteranceRecorder;
use voxlist::bot::{Bot, BotServices};
use voxlist::config::Config;
use voxlist::gateway::{
    ChannelId, ChatMessage, CommandContext, Messenger, MockMessenger, MockVoiceGateway, ServerId,
    UserId, VoiceGateway,
};
use voxlist::search::StaticSearch;
use voxlist::store::{MemoryStore, PlaylistService};
use voxlist::stt::MockSpeech;
use voxlist::transcode::MockTranscoder;

struct Harness {
    bot: Bot,
    messenger: Arc<MockMessenger>,
    voice: Arc<MockVoiceGateway>,
}

fn harness(speech: MockSpeech, search: StaticSearch) -> Harness {
    let messenger = Arc::new(MockMessenger::new());
    let voice = Arc::new(MockVoiceGateway::new());
    let services = BotServices {
        playlists: Arc::new(PlaylistService::new(Arc::new(MemoryStore::new()))),
        search: Arc::new(search),
        transcoder: Arc::new(MockTranscoder::new()),
        speech: Arc::new(speech),
        messenger: messenger.clone() as Arc<dyn Messenger>,
        voice: voice.clone() as Arc<dyn VoiceGateway>,
    };
    Harness {
        bot: Bot::new(&Config::local("!", "jukebox"), services),
        messenger,
        voice,
    }
}

fn ctx() -> CommandContext {
    CommandContext {
        server: ServerId::new("guild-1"),
        channel: ChannelId::new("general"),
        author: UserId::new("user-1"),
        author_name: "alice".to_string(),
        voice_channel: Some(ChannelId::new("music")),
    }
}

async fn say(h: &Harness, content: &str) {
    let message = ChatMessage {
        context: ctx(),
        content: content.to_string(),
        author_is_bot: false,
    };
    h.bot.handle_message(&message).await.unwrap();
}

async fn wait_for_plays(voice: &MockVoiceGateway, expected: usize) {
    for _ in 0..100 {
        if voice.played().len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "Expected {} plays, saw {:?} after waiting",
        expected,
        voice.played()
    );
}

#[tokio::test]
async fn text_commands_build_and_play_a_playlist() {
    let h = harness(MockSpeech::new(), StaticSearch::empty());

    say(&h, "!playlist create mix").await;
    say(&h, "!playlist add mix https://www.youtube.com/watch?v=A").await;
    say(&h, "!playlist add mix https://www.youtube.com/watch?v=B").await;
    say(&h, "!playlist play mix").await;

    wait_for_plays(&h.voice, 2).await;
    assert_eq!(
        h.voice.played(),
        vec![
            "https://www.youtube.com/watch?v=A".to_string(),
            "https://www.youtube.com/watch?v=B".to_string()
        ]
    );
    assert!(
        h.messenger
            .sent()
            .iter()
            .any(|(_, text)| text == "Playing playlist 'mix' (2 links).")
    );
}

#[tokio::test]
async fn keyword_add_resolves_through_search() {
    let h = harness(
        MockSpeech::new(),
        StaticSearch::with_result("https://www.youtube.com/watch?v=found"),
    );

    say(&h, "!playlist create mix").await;
    say(&h, "!playlist add mix lofi beats to study to").await;
    say(&h, "!playlist show mix").await;

    let reply = h.messenger.last().unwrap();
    assert!(reply.contains("1. https://www.youtube.com/watch?v=found"));
}

#[tokio::test]
async fn stop_cancels_a_running_playlist() {
    let h = harness(MockSpeech::new(), StaticSearch::empty());

    say(&h, "!playlist create mix").await;
    say(&h, "!playlist add mix https://www.youtube.com/watch?v=A").await;
    say(&h, "!playlist add mix https://www.youtube.com/watch?v=B").await;

    say(&h, "!playlist play mix").await;
    wait_for_plays(&h.voice, 1).await;
    say(&h, "!playlist stop").await;

    assert_eq!(h.voice.silence_count(), 1);
    assert!(
        h.messenger
            .sent()
            .iter()
            .any(|(_, text)| text == "Stopped playback.")
    );
}

#[tokio::test]
async fn voice_utterance_drives_the_same_commands() {
    let h = harness(
        MockSpeech::new().with_response("Jukebox playlist create roadtrip"),
        StaticSearch::empty(),
    );

    // 5 seconds of 48kHz stereo s16le
    let mut recorder = UtteranceRecorder::new(UserId::new("user-1")).unwrap();
    recorder.write(&vec![0u8; 960_000]).unwrap();
    let utterance = recorder.finish().unwrap();

    h.bot.handle_utterance(&ctx(), utterance).await.unwrap();

    assert_eq!(h.messenger.last().unwrap(), "Created playlist 'roadtrip'.");
}

#[tokio::test]
async fn short_utterance_is_dropped_silently() {
    let h = harness(
        MockSpeech::new().with_response("jukebox playlist all"),
        StaticSearch::empty(),
    );

    let mut recorder = UtteranceRecorder::new(UserId::new("user-1")).unwrap();
    recorder.write(&vec![0u8; 1_000]).unwrap();
    let utterance = recorder.finish().unwrap();

    h.bot.handle_utterance(&ctx(), utterance).await.unwrap();
    assert!(h.messenger.sent().is_empty());
}
