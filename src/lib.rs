//! Fly Feast - a swamp platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collision, tongue capture)
//! - `assets`: Bitmap layer loading with graceful fallback
//! - `audio`: Game event to sound trigger routing
//! - `settings` / `highscores`: JSON-persisted preferences and leaderboard

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation tick rate in Hz
    pub const TICK_HZ: u64 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions (pixels)
    pub const WORLD_W: f32 = 1920.0;
    pub const WORLD_H: f32 = 1080.0;

    /// Top of the walkable ground band
    pub const GROUND_Y: f32 = WORLD_H - 150.0;
    /// Depth of the band below the ground line (hazard pools sit in it)
    pub const GROUND_DEPTH: f32 = WORLD_H - GROUND_Y;

    /// Swamp pool (right side), lethal at the ground line
    pub const SWAMP_START_X: f32 = WORLD_W * 0.6;
    pub const SWAMP_WIDTH: f32 = WORLD_W * 0.3;
    /// Left water pool, smaller and sunk below the ground surface
    pub const LEFT_WATER_START_X: f32 = WORLD_W * 0.05;
    pub const LEFT_WATER_WIDTH: f32 = WORLD_W * 0.15;
    pub const LEFT_WATER_DEPTH: f32 = GROUND_DEPTH * 0.4;

    /// Fixed thickness of every platform segment
    pub const PLATFORM_HEIGHT: f32 = 20.0;

    /// Character box and motion
    pub const CHAR_W: f32 = 50.0;
    pub const CHAR_H: f32 = 30.0;
    pub const CHAR_SPEED: f32 = 5.0;
    pub const JUMP_SPEED: f32 = -15.0;
    pub const GRAVITY: f32 = 0.8;
    /// The sprite's feet sit this far above the box bottom; rest positions
    /// are offset by it so the visual feet touch the surface.
    pub const FOOT_INSET: f32 = 5.0;
    pub const DOUBLE_JUMP_COOLDOWN_MS: u64 = 500;

    /// Tongue (capture probe)
    pub const TONGUE_MAX_LEN: f32 = 300.0;
    pub const TONGUE_EXTEND_SPEED: f32 = 50.0;
    pub const TONGUE_RETRACT_SPEED: f32 = 65.0;
    pub const TONGUE_HOLD_MS: u64 = 300;
    pub const CAPTURE_RADIUS: f32 = 30.0;

    /// Flies
    pub const FLY_COUNT: usize = 12;
    pub const FLY_W: f32 = 40.0;
    pub const FLY_H: f32 = 40.0;
    pub const FLY_SPEED_MIN: f32 = 2.0;
    pub const FLY_SPEED_MAX: f32 = 4.0;
    pub const FLY_REDIRECT_MIN_TICKS: u32 = 30;
    pub const FLY_REDIRECT_MAX_TICKS: u32 = 120;
    /// Flies spawn at least this far from the play-area edges
    pub const FLY_SPAWN_MARGIN: f32 = 50.0;

    /// Round length
    pub const ROUND_SECONDS: u64 = 90;

    /// Tolerance band around a platform's top-rest position; while the
    /// character sits inside it, the side-wall resolver yields to the
    /// vertical resolver. Tunable, not derived from the original artwork.
    pub const REST_TOLERANCE: f32 = 15.0;
    /// Feet-catch band around a surface top. Must exceed one tick of fall
    /// at terminal approach speed or the character tunnels through.
    pub const CATCH_TOLERANCE: f32 = 10.0;

    /// Upward drift per tick of the dead character (visual only)
    pub const DEAD_ASCEND_SPEED: f32 = 2.0;
}

/// Convert a tick count to game-clock milliseconds
#[inline]
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks * 1000 / consts::TICK_HZ
}
