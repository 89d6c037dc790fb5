//! Открывает SRT файл и печатает кадры "ленты" в виде JSON, пока идет
//! воспроизведение.
//!
//! `cargo run --example roll -- path/to/file.srt [seconds]`

use anyhow::{bail, Context};
use std::time::Duration;
use subroll::{PlayerOptions, RenderFrame, SubtitlePlayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: roll <file.srt> [seconds]");
    };
    let seconds: u64 = match args.next() {
        Some(s) => s.parse().context("seconds must be a number")?,
        None => 10,
    };

    let options = PlayerOptions::default().with_tick_interval(50);
    let mut last_center: Option<String> = None;
    let mut player = SubtitlePlayer::new(options)?.with_observer(Box::new(|frame: &RenderFrame| {
        if frame.is_playing {
            log::trace!("{} / {}", frame.position_ms, frame.duration_ms);
        }
    }));

    let count = player
        .load_file(&path)
        .with_context(|| format!("could not read file {}", path))?;
    println!("{}: {} segments", player.file_name().unwrap_or("Unknown"), count);

    player.play()?;
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);

    while tokio::time::Instant::now() < deadline && player.is_playing() {
        ticker.tick().await;
        let frame = player.frame();
        let center = frame.center().map(|s| s.text.clone());
        if center != last_center {
            println!("{} {}", player.position_label(), serde_json::to_string(&frame)?);
            last_center = center;
        }
    }

    player.pause();
    println!("stopped at {} ({})", player.position_label(), player.remaining_label());
    Ok(())
}
