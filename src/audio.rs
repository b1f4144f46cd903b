//! Sound event routing
//!
//! The simulation emits `GameEvent`s; this module maps them to named sound
//! triggers and forwards them to a `SoundSink`. Fire-and-forget: nothing
//! here ever feeds back into the simulation.

use crate::Settings;
use crate::sim::GameEvent;

/// Sound trigger interface exposed by the host (mixer, engine binding, ...)
pub trait SoundSink {
    fn play(&mut self, name: &str, volume: f32);
}

/// Discards every trigger
#[derive(Debug, Default)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _name: &str, _volume: f32) {}
}

/// Logs triggers instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, name: &str, volume: f32) {
        log::debug!("sound '{name}' at volume {volume:.2}");
    }
}

/// The trigger name for an event, `None` for silent events
pub fn trigger_name(event: GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::Jump => Some("jump"),
        GameEvent::CaptureAttempt => Some("hit"),
        GameEvent::CaptureSuccess => Some("eaten"),
        GameEvent::Death => Some("gameover"),
        GameEvent::RoundOver => None,
    }
}

/// Forward a batch of drained events to the sink at the configured volume
pub fn dispatch(events: &[GameEvent], settings: &Settings, sink: &mut dyn SoundSink) {
    let volume = settings.effective_sfx();
    for &event in events {
        if let Some(name) = trigger_name(event) {
            sink.play(name, volume);
        }
    }
}
