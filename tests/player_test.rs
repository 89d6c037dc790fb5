use std::sync::{Arc, Mutex};
use std::time::Duration;
use subroll::{Error, PlayerOptions, RenderFrame, SubtitlePlayer};
use tempfile::NamedTempFile;

const SRT: &str = r#"1
00:00:01,000 --> 00:00:03,000
Hello there

2
00:00:05,000 --> 00:00:07,000
<i>General Kenobi</i>

3
00:00:09,000 --> 00:00:12,000
hello again
"#;

fn player() -> SubtitlePlayer {
    SubtitlePlayer::new(PlayerOptions::default()).unwrap()
}

#[test]
fn test_invalid_options_are_rejected() {
    let result = SubtitlePlayer::new(PlayerOptions::default().with_tick_interval(0));
    assert!(matches!(result, Err(Error::InvalidParameters(_))));

    let result = SubtitlePlayer::new(PlayerOptions::default().with_seek_steps(0, 5000));
    assert!(matches!(result, Err(Error::InvalidParameters(_))));
}

#[test]
fn test_load_file_sets_name_and_duration() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), SRT).unwrap();

    let mut player = player();
    assert_eq!(player.load_file(temp_file.path()).unwrap(), 3);

    let expected_name = temp_file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(player.file_name(), Some(expected_name.as_str()));
    assert_eq!(player.duration_ms(), 12_000);
    assert_eq!(player.position_ms(), 0);
    assert_eq!(player.remaining_label(), "-00:12");
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let mut player = player();
    player.load_str("good.srt", SRT);
    player.seek_absolute(6000);

    let result = player.load_file("/no/such/file.srt");

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(player.error_message().is_some());
    assert_eq!(player.file_name(), Some("good.srt"));
    assert_eq!(player.position_ms(), 6000);
    assert_eq!(player.duration_ms(), 12_000);
}

#[test]
fn test_step_seeks_use_options() {
    let mut player = SubtitlePlayer::new(PlayerOptions::default().with_seek_steps(1000, 5000)).unwrap();
    player.load_str("a.srt", SRT);

    player.long_step(true);
    assert_eq!(player.position_ms(), 5000);
    player.step(false);
    assert_eq!(player.position_ms(), 4000);
    player.long_step(false);
    assert_eq!(player.position_ms(), 0);
    assert_eq!(player.position_label(), "00:00");
}

#[test]
fn test_search_navigates_between_results() {
    let mut player = player();
    player.load_str("a.srt", SRT);

    assert_eq!(player.search("hello"), 2);
    assert_eq!(player.position_ms(), 1000);

    assert_eq!(player.next_result(), Some(2));
    assert_eq!(player.position_ms(), 9000);
    assert_eq!(player.next_result(), Some(0));
    assert_eq!(player.previous_result(), Some(2));
    assert_eq!(player.search_state().counter(), (1, 2));

    assert_eq!(player.search("kenobi"), 1);
    assert_eq!(player.frame().active.unwrap().text, "General Kenobi");

    // Новый файл сбрасывает поиск
    player.load_str("b.srt", SRT);
    assert!(player.search_state().results().is_empty());
}

#[test]
fn test_observer_gets_frames() {
    let seen: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut player = player().with_observer(Box::new(move |frame: &RenderFrame| {
        sink.lock().unwrap().push(frame.position_ms);
    }));
    player.load_str("a.srt", SRT);
    player.seek_absolute(2500);

    assert_eq!(*seen.lock().unwrap(), vec![0, 2500]);
    assert_eq!(player.last_published_frame().unwrap().position_ms, 2500);
}

#[test]
fn test_select_and_step_segment() {
    let mut player = player();
    player.load_str("a.srt", SRT);

    assert!(player.select_segment(1));
    assert_eq!(player.position_ms(), 5000);
    assert!(player.step_segment(true));
    assert_eq!(player.position_ms(), 9000);
    assert!(!player.step_segment(true));
}

#[tokio::test(start_paused = true)]
async fn test_playback_through_facade() {
    let mut player = player();
    player.load_str("a.srt", SRT);

    assert!(player.play().unwrap());
    tokio::time::sleep(Duration::from_millis(6000)).await;
    player.pause();

    assert_eq!(player.position_ms(), 6000);
    let frame = player.frame();
    assert_eq!(frame.active.as_ref().unwrap().text, "General Kenobi");
    assert_eq!(frame.previous.as_ref().unwrap().text, "Hello there");
    assert_eq!(frame.next.as_ref().unwrap().text, "hello again");

    // Выбор субтитра во время воспроизведения игнорируется
    player.play().unwrap();
    assert!(!player.select_segment(0));
    player.pause();
}
