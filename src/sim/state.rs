//! Game state and core simulation types
//!
//! The `GameState` aggregate owns everything the update loop mutates:
//! character, flies, mode, clocks, score, and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::Level;
use crate::consts::*;
use crate::ticks_to_ms;

/// Current round mode. Only `Running` advances physics, the countdown, and
/// fly motion; the two terminal modes require an explicit restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Running,
    Paused,
    /// Countdown reached zero
    RoundEnded,
    /// The character fell into a hazard
    CharacterDead,
}

/// Which way the character faces (drives sprite selection only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Tongue probe state machine: Idle -> Extending -> (HoldingMax | Retracting)
/// -> Idle. The angle is frozen at trigger time for the whole extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tongue {
    Idle,
    Extending {
        angle: f32,
        length: f32,
        deadline_ms: u64,
    },
    /// Fully extended, waiting for the hold deadline
    HoldingMax { angle: f32, deadline_ms: u64 },
    Retracting { angle: f32, length: f32 },
}

impl Tongue {
    /// Current (angle, length) while the probe can still catch something
    pub fn live_reach(&self) -> Option<(f32, f32)> {
        match *self {
            Tongue::Extending { angle, length, .. } => Some((angle, length)),
            Tongue::HoldingMax { angle, .. } => Some((angle, TONGUE_MAX_LEN)),
            Tongue::Idle | Tongue::Retracting { .. } => None,
        }
    }

    /// Current length for rendering, zero when idle
    pub fn length(&self) -> f32 {
        match *self {
            Tongue::Idle => 0.0,
            Tongue::Extending { length, .. } | Tongue::Retracting { length, .. } => length,
            Tongue::HoldingMax { .. } => TONGUE_MAX_LEN,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Tongue::Idle)
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Top-left of the collision box
    pub pos: Vec2,
    pub vel_y: f32,
    pub on_ground: bool,
    pub on_platform: bool,
    /// One extra mid-air jump per unsupported window
    pub has_double_jump: bool,
    /// Game-clock ms before the double jump may fire again
    pub double_jump_ready_ms: u64,
    pub facing: Facing,
    pub tongue: Tongue,
}

impl Character {
    /// Spawn standing at the center of the ground line
    pub fn spawn(level: &Level) -> Self {
        Self {
            pos: Vec2::new(
                level.world_w / 2.0,
                level.ground_y - CHAR_H + FOOT_INSET,
            ),
            vel_y: 0.0,
            on_ground: false,
            on_platform: false,
            has_double_jump: true,
            double_jump_ready_ms: 0,
            facing: Facing::Right,
            tongue: Tongue::Idle,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(CHAR_W / 2.0, CHAR_H / 2.0)
    }

    #[inline]
    pub fn feet_y(&self) -> f32 {
        self.pos.y + CHAR_H
    }

    #[inline]
    pub fn supported(&self) -> bool {
        self.on_ground || self.on_platform
    }
}

/// An autonomously roaming fly
#[derive(Debug, Clone, PartialEq)]
pub struct Fly {
    /// Top-left of the fly's box
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks until the next random redirection
    pub redirect_ticks: u32,
}

impl Fly {
    /// Spawn at a random position with a random movement pattern
    pub fn spawn(rng: &mut Pcg32, level: &Level) -> Self {
        let pos = Vec2::new(
            rng.random_range(FLY_SPAWN_MARGIN..=level.world_w - FLY_W - FLY_SPAWN_MARGIN),
            rng.random_range(FLY_SPAWN_MARGIN..=level.ground_y - FLY_H - FLY_SPAWN_MARGIN),
        );
        let vel = Self::random_velocity(rng);
        Self {
            pos,
            vel,
            redirect_ticks: rng.random_range(FLY_REDIRECT_MIN_TICKS..=FLY_REDIRECT_MAX_TICKS),
        }
    }

    /// Uniform direction, uniform speed in the configured band
    pub fn random_velocity(rng: &mut Pcg32) -> Vec2 {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(FLY_SPEED_MIN..=FLY_SPEED_MAX);
        Vec2::new(angle.cos(), angle.sin()) * speed
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(FLY_W / 2.0, FLY_H / 2.0)
    }

    /// One tick of autonomous motion: countdown, redirect, move, reflect.
    /// The fly never leaves `[0, w - FLY_W] x [0, ground_y - FLY_H]`.
    pub fn advance(&mut self, rng: &mut Pcg32, level: &Level) {
        self.redirect_ticks = self.redirect_ticks.saturating_sub(1);
        if self.redirect_ticks == 0 {
            self.vel = Self::random_velocity(rng);
            self.redirect_ticks =
                rng.random_range(FLY_REDIRECT_MIN_TICKS..=FLY_REDIRECT_MAX_TICKS);
        }

        self.pos += self.vel;

        let max_x = level.world_w - FLY_W;
        let max_y = level.ground_y - FLY_H;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = -self.vel.x;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel.y = -self.vel.y;
        } else if self.pos.y > max_y {
            self.pos.y = max_y;
            self.vel.y = -self.vel.y;
        }
    }
}

/// Simulation events for the outside world (sound triggers, UI). Consumed
/// fire-and-forget; they never feed back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    /// Tongue trigger accepted
    CaptureAttempt,
    /// A fly was caught
    CaptureSuccess,
    Death,
    /// The countdown expired
    RoundOver,
}

/// Complete mutable game state, owned by the update loop
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: Mode,
    /// Total Running ticks; drives the game clock
    pub time_ticks: u64,
    /// Tick at which the current round started
    round_start_ticks: u64,
    pub score: u32,
    /// Session-lifetime maximum, survives round resets
    pub high_score: u32,
    pub character: Character,
    pub flies: Vec<Fly>,
    /// Events emitted since the last drain
    events: Vec<GameEvent>,
    pub(super) rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64, level: &Level) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let flies = (0..FLY_COUNT).map(|_| Fly::spawn(&mut rng, level)).collect();
        Self {
            seed,
            mode: Mode::Running,
            time_ticks: 0,
            round_start_ticks: 0,
            score: 0,
            high_score: 0,
            character: Character::spawn(level),
            flies,
            events: Vec::new(),
            rng,
        }
    }

    /// The monotonic game clock in milliseconds
    #[inline]
    pub fn now_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks)
    }

    /// Running seconds elapsed in the current round. Paused time never
    /// accumulates because the tick counter only advances while Running.
    pub fn round_elapsed_secs(&self) -> u64 {
        (self.time_ticks - self.round_start_ticks) / TICK_HZ
    }

    /// Whole seconds left on the countdown
    pub fn timer_remaining_secs(&self) -> u64 {
        ROUND_SECONDS.saturating_sub(self.round_elapsed_secs())
    }

    /// Start a fresh round: reset character, score, clock, and the fly
    /// population. The session high score is kept.
    pub fn reset_round(&mut self, level: &Level) {
        self.mode = Mode::Running;
        self.round_start_ticks = self.time_ticks;
        self.score = 0;
        self.character = Character::spawn(level);
        self.respawn_flies(level);
        self.events.clear();
    }

    /// Refill the population to the full count with fresh random flies
    pub(super) fn respawn_flies(&mut self, level: &Level) {
        self.flies.clear();
        for _ in 0..FLY_COUNT {
            let fly = Fly::spawn(&mut self.rng, level);
            self.flies.push(fly);
        }
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
