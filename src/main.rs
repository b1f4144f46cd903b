//! Fly Feast entry point
//!
//! Headless demo run: builds the level, advances the simulation at the
//! fixed tick rate with a scripted input track, and routes sound events
//! through the logging sink. A front-end drives the same API with real
//! input and a real mixer.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use fly_feast::audio::{self, LogSink};
use fly_feast::consts::*;
use fly_feast::sim::{GameState, Level, Mode, TickInput, tick};
use fly_feast::{HighScores, Settings, assets};

/// Where settings and the leaderboard live
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fly-feast")
}

fn main() {
    env_logger::init();
    log::info!("Fly Feast starting...");

    let data = data_dir();
    let settings = Settings::load(&data.join("settings.json"));
    let mut highscores = HighScores::load(&data.join("highscores.json"));

    let level = if PathBuf::from("assets").is_dir() {
        assets::load_level(&PathBuf::from("assets"))
    } else {
        log::info!("no assets directory, using the standard arena");
        Level::standard()
    };

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xF1FEA57);
    let mut state = GameState::new(seed, &level);
    log::info!(
        "seed {seed}: {} platforms, {} flies",
        level.platforms().len(),
        state.flies.len()
    );

    let mut sink = LogSink;

    // Scripted demo: hop around and flick the tongue at the fly cloud for
    // ten seconds of simulated time.
    let demo_ticks = 10 * TICK_HZ;
    for i in 0..demo_ticks {
        let input = TickInput {
            move_axis: if (i / 120) % 2 == 0 { 1.0 } else { -1.0 },
            jump: i % 90 == 30,
            capture_aim: (i % 45 == 0).then(|| {
                let t = i as f32 * 0.1;
                state.character.center() + Vec2::new(t.cos(), -t.sin().abs()) * 200.0
            }),
            ..Default::default()
        };
        tick(&mut state, &level, &input);
        let events = state.drain_events();
        audio::dispatch(&events, &settings, &mut sink);
        if state.mode != Mode::Running {
            break;
        }
    }

    println!(
        "demo over: score {} (high {}), {} flies left, {}s remaining, mode {:?}",
        state.score,
        state.high_score,
        state.flies.len(),
        state.timer_remaining_secs(),
        state.mode,
    );

    if highscores.qualifies(state.score) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        if let Some(rank) = highscores.add_score(state.score, now_ms) {
            log::info!("demo run placed rank {rank} on the leaderboard");
        }
        highscores.save(&data.join("highscores.json"));
    }
}
