//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one 60 Hz step: input edges,
//! character physics, hazard checks, tongue capture, fly motion. Everything
//! completes synchronously inside the tick that triggered it.

use glam::Vec2;

use super::collision::{self, Support};
use super::level::Level;
use super::state::{Facing, Fly, GameEvent, GameState, Mode, Tongue};
use crate::consts::*;

/// Input snapshot for a single tick. Edge-style fields fire once per press.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal intent: -1, 0, or +1
    pub move_axis: f32,
    /// Jump press edge
    pub jump: bool,
    /// Tongue trigger edge with the aim point at trigger time
    pub capture_aim: Option<Vec2>,
    /// Pause toggle edge
    pub pause: bool,
    /// Restart edge (honored from the terminal modes)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, level: &Level, input: &TickInput) {
    if input.pause {
        state.mode = match state.mode {
            Mode::Running => Mode::Paused,
            Mode::Paused => Mode::Running,
            other => other,
        };
    }

    if input.restart && matches!(state.mode, Mode::RoundEnded | Mode::CharacterDead) {
        state.reset_round(level);
        return;
    }

    match state.mode {
        Mode::Paused | Mode::RoundEnded => return,
        Mode::CharacterDead => {
            // Visual ascend drift; the corpse has no hitbox anymore
            state.character.pos.y -= DEAD_ASCEND_SPEED;
            return;
        }
        Mode::Running => {}
    }

    state.time_ticks += 1;

    if state.round_elapsed_secs() >= ROUND_SECONDS {
        state.mode = Mode::RoundEnded;
        state.push_event(GameEvent::RoundOver);
        return;
    }

    let now = state.now_ms();

    // Jump edge. A press on support always jumps; airborne it consumes the
    // double-jump token, gated by the cooldown timestamp.
    if input.jump {
        let ch = &mut state.character;
        if ch.supported() {
            ch.vel_y = JUMP_SPEED;
            ch.on_ground = false;
            ch.on_platform = false;
            state.push_event(GameEvent::Jump);
        } else if ch.has_double_jump && now >= ch.double_jump_ready_ms {
            ch.vel_y = JUMP_SPEED;
            ch.has_double_jump = false;
            ch.double_jump_ready_ms = now + DOUBLE_JUMP_COOLDOWN_MS;
            state.push_event(GameEvent::Jump);
        }
    }

    // Horizontal movement, then wall/bounds resolution
    if input.move_axis != 0.0 {
        let ch = &mut state.character;
        ch.pos.x += input.move_axis.signum() * CHAR_SPEED;
        ch.facing = if input.move_axis < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        };
    }
    collision::resolve_horizontal(&mut state.character, level);

    // Vertical physics, then platform/ground resolution
    {
        let ch = &mut state.character;
        ch.vel_y += GRAVITY;
        ch.pos.y += ch.vel_y;
    }
    let support = collision::resolve_vertical(&mut state.character, level);
    {
        let ch = &mut state.character;
        ch.on_platform = matches!(support, Support::Platform(_));
        ch.on_ground = support != Support::None;
        if ch.supported() {
            // Regaining support refills the double jump unconditionally
            ch.has_double_jump = true;
        }
    }

    // Hazard check: unsupported over a pool with the bottom past its surface
    if support == Support::None {
        let center_x = state.character.center().x;
        let bottom = state.character.feet_y();
        if let Some(hz) = level.hazard_at(center_x) {
            if hz.is_lethal(center_x, bottom) {
                state.mode = Mode::CharacterDead;
                state.push_event(GameEvent::Death);
                return;
            }
        }
    }

    // Tongue trigger: accepted only while idle, angle frozen at this instant.
    // A trigger without an aim point is ignored.
    if let Some(aim) = input.capture_aim {
        if state.character.tongue.is_idle() {
            let to_aim = aim - state.character.center();
            state.character.tongue = Tongue::Extending {
                angle: to_aim.y.atan2(to_aim.x),
                length: 0.0,
                deadline_ms: now + TONGUE_HOLD_MS,
            };
            state.push_event(GameEvent::CaptureAttempt);
        }
    }

    state.character.tongue = advance_tongue(state.character.tongue, now);

    // Capture test runs every tick the probe is out and not retracting.
    // Exactly one fly per extension: nearest along the probe wins.
    if let Some((angle, length)) = state.character.tongue.live_reach() {
        let origin = state.character.center();
        if let Some(idx) = nearest_fly_on_probe(origin, angle, length, &state.flies) {
            state.flies.remove(idx);
            state.score += 1;
            if state.score > state.high_score {
                state.high_score = state.score;
            }
            state.push_event(GameEvent::CaptureSuccess);
            // Population refills only once it is fully emptied
            if state.flies.is_empty() {
                state.respawn_flies(level);
            }
            state.character.tongue = Tongue::Retracting { angle, length };
        }
    }

    // Fly motion last, so captures act on the positions the player saw
    for fly in state.flies.iter_mut() {
        fly.advance(&mut state.rng, level);
    }
}

/// Advance the tongue one step against the hold deadline
fn advance_tongue(tongue: Tongue, now_ms: u64) -> Tongue {
    match tongue {
        Tongue::Idle => Tongue::Idle,
        Tongue::Extending {
            angle,
            length,
            deadline_ms,
        } => {
            if now_ms >= deadline_ms {
                Tongue::Retracting { angle, length }
            } else {
                let length = length + TONGUE_EXTEND_SPEED;
                if length >= TONGUE_MAX_LEN {
                    Tongue::HoldingMax { angle, deadline_ms }
                } else {
                    Tongue::Extending {
                        angle,
                        length,
                        deadline_ms,
                    }
                }
            }
        }
        Tongue::HoldingMax { angle, deadline_ms } => {
            if now_ms >= deadline_ms {
                Tongue::Retracting {
                    angle,
                    length: TONGUE_MAX_LEN,
                }
            } else {
                Tongue::HoldingMax { angle, deadline_ms }
            }
        }
        Tongue::Retracting { angle, length } => {
            let length = length - TONGUE_RETRACT_SPEED;
            if length <= 0.0 {
                Tongue::Idle
            } else {
                Tongue::Retracting { angle, length }
            }
        }
    }
}

/// Project each fly onto the probe line; among those in line and within the
/// capture radius, return the one with the smallest forward projection.
fn nearest_fly_on_probe(origin: Vec2, angle: f32, length: f32, flies: &[Fly]) -> Option<usize> {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let mut best: Option<(usize, f32)> = None;
    for (i, fly) in flies.iter().enumerate() {
        let to_fly = fly.center() - origin;
        let along = to_fly.dot(dir);
        if along < 0.0 || along > length {
            continue;
        }
        let perp = dir.perp_dot(to_fly).abs();
        if perp < CAPTURE_RADIUS && best.map(|(_, d)| along < d).unwrap_or(true) {
            best = Some((i, along));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::PlatformRect;

    fn running_on_ground() -> (GameState, Level) {
        let level = Level::standard();
        let mut state = GameState::new(12345, &level);
        // One settling tick drops the character onto the ground
        tick(&mut state, &level, &TickInput::default());
        assert!(state.character.on_ground);
        state.drain_events();
        (state, level)
    }

    fn place_fly(state: &mut GameState, center: Vec2) {
        state.flies.push(Fly {
            pos: center - Vec2::new(FLY_W / 2.0, FLY_H / 2.0),
            vel: Vec2::ZERO,
            redirect_ticks: 10_000,
        });
    }

    #[test]
    fn test_jump_from_ground() {
        let (mut state, level) = running_on_ground();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &level, &input);
        // Jump speed applied, then one tick of gravity
        assert!((state.character.vel_y - (JUMP_SPEED + GRAVITY)).abs() < 1e-4);
        assert!(!state.character.on_ground);
        assert!(state.drain_events().contains(&GameEvent::Jump));
    }

    #[test]
    fn test_double_jump_consumable_exactly_once() {
        let (mut state, level) = running_on_ground();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &level, &jump);
        assert!(state.character.has_double_jump);

        // Airborne: the token buys one more jump
        tick(&mut state, &level, &jump);
        assert!(!state.character.has_double_jump);
        let vel_after_double = state.character.vel_y;
        assert!((vel_after_double - (JUMP_SPEED + GRAVITY)).abs() < 1e-4);

        // A third press before regaining support does nothing
        tick(&mut state, &level, &jump);
        assert!(state.character.vel_y > vel_after_double);

        // Falling back to the ground refills the token
        for _ in 0..200 {
            tick(&mut state, &level, &TickInput::default());
            if state.character.on_ground {
                break;
            }
        }
        assert!(state.character.on_ground);
        assert!(state.character.has_double_jump);
    }

    #[test]
    fn test_double_jump_respects_cooldown() {
        let (mut state, level) = running_on_ground();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &level, &jump);
        // Force the cooldown into the future: the token alone is not enough
        state.character.double_jump_ready_ms = state.now_ms() + 10_000;
        tick(&mut state, &level, &jump);
        assert!(state.character.has_double_jump);
    }

    #[test]
    fn test_capture_nearest_fly_wins() {
        let (mut state, level) = running_on_ground();
        state.flies.clear();
        let origin = state.character.center();
        // Both flies sit on the probe line within radius; the nearer one
        // (smaller forward projection) must be the one caught.
        place_fly(&mut state, origin + Vec2::new(45.0, 10.0));
        place_fly(&mut state, origin + Vec2::new(30.0, -12.0));

        let input = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &input);

        assert_eq!(state.score, 1);
        assert_eq!(state.flies.len(), 1);
        // The far fly survived
        let survivor = state.flies[0].center() - origin;
        assert!((survivor.x - 45.0).abs() < 1e-3);
        assert!(matches!(
            state.character.tongue,
            Tongue::Retracting { .. }
        ));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::CaptureAttempt));
        assert!(events.contains(&GameEvent::CaptureSuccess));
    }

    #[test]
    fn test_one_capture_per_extension() {
        let (mut state, level) = running_on_ground();
        state.flies.clear();
        let origin = state.character.center();
        place_fly(&mut state, origin + Vec2::new(30.0, 0.0));
        place_fly(&mut state, origin + Vec2::new(40.0, 0.0));

        let input = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &input);
        assert_eq!(state.score, 1);

        // The probe is retracting; further ticks catch nothing
        for _ in 0..20 {
            tick(&mut state, &level, &TickInput::default());
        }
        assert_eq!(state.score, 1);
        assert_eq!(state.flies.len(), 1);
        assert!(state.character.tongue.is_idle());
    }

    #[test]
    fn test_trigger_ignored_while_probe_out() {
        let (mut state, level) = running_on_ground();
        state.flies.clear();
        let origin = state.character.center();
        let first = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &first);
        let angle_before = match state.character.tongue {
            Tongue::Extending { angle, .. } => angle,
            ref other => panic!("expected extension, got {other:?}"),
        };
        state.drain_events();

        // A second trigger at a different aim point is dropped, not queued
        let second = TickInput {
            capture_aim: Some(origin + Vec2::new(0.0, -100.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &second);
        match state.character.tongue {
            Tongue::Extending { angle, .. } | Tongue::HoldingMax { angle, .. } => {
                assert!((angle - angle_before).abs() < 1e-6);
            }
            ref other => panic!("probe should still be out, got {other:?}"),
        }
        assert!(!state.drain_events().contains(&GameEvent::CaptureAttempt));
    }

    #[test]
    fn test_trigger_without_aim_is_rejected() {
        let (mut state, level) = running_on_ground();
        tick(&mut state, &level, &TickInput::default());
        assert!(state.character.tongue.is_idle());
        assert!(!state.drain_events().contains(&GameEvent::CaptureAttempt));
    }

    #[test]
    fn test_tongue_times_out_and_retracts() {
        let (mut state, level) = running_on_ground();
        state.flies.clear();
        let origin = state.character.center();
        let input = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &input);

        // Hold deadline is 300 ms = 18 ticks; retraction takes a few more
        for _ in 0..40 {
            tick(&mut state, &level, &TickInput::default());
        }
        assert!(state.character.tongue.is_idle());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_population_refills_only_when_empty() {
        let (mut state, level) = running_on_ground();
        state.flies.clear();
        let origin = state.character.center();
        place_fly(&mut state, origin + Vec2::new(40.0, 0.0));
        place_fly(&mut state, origin + Vec2::new(600.0, 400.0));

        let aim = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &aim);
        // One of two caught: no refill yet
        assert_eq!(state.flies.len(), 1);

        // Let the tongue come back, then eat the last one by teleporting it
        // onto the probe line
        for _ in 0..20 {
            tick(&mut state, &level, &TickInput::default());
        }
        let origin = state.character.center();
        state.flies[0].pos = origin + Vec2::new(50.0, 0.0) - Vec2::new(FLY_W / 2.0, FLY_H / 2.0);
        state.flies[0].vel = Vec2::ZERO;
        state.flies[0].redirect_ticks = 10_000;
        let aim = TickInput {
            capture_aim: Some(origin + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &level, &aim);
        tick(&mut state, &level, &TickInput::default());

        // Emptied: the whole population respawns
        assert_eq!(state.score, 2);
        assert_eq!(state.flies.len(), FLY_COUNT);
    }

    #[test]
    fn test_hazard_death_fires_exactly_once() {
        let level = Level::standard();
        let mut state = GameState::new(99, &level);
        // Unsupported over the swamp, bottom about to cross the surface
        state.character.pos = Vec2::new(SWAMP_START_X + 100.0, GROUND_Y - CHAR_H + 5.0);
        state.character.vel_y = 5.0;

        tick(&mut state, &level, &TickInput::default());
        assert_eq!(state.mode, Mode::CharacterDead);
        let deaths = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::Death)
            .count();
        assert_eq!(deaths, 1);

        // Already dead: no retrigger, corpse drifts upward, intent ignored
        let y_before = state.character.pos.y;
        let input = TickInput {
            move_axis: 1.0,
            jump: true,
            ..Default::default()
        };
        let x_before = state.character.pos.x;
        tick(&mut state, &level, &input);
        assert_eq!(state.mode, Mode::CharacterDead);
        assert!(state.character.pos.y < y_before);
        assert_eq!(state.character.pos.x, x_before);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_free_fall_is_monotonic() {
        let level = Level::standard();
        let mut state = GameState::new(5, &level);
        state.character.pos = Vec2::new(500.0, 200.0);
        state.character.vel_y = 0.0;

        let mut last_y = state.character.pos.y;
        for _ in 0..200 {
            tick(&mut state, &level, &TickInput::default());
            assert!(state.character.pos.y >= last_y, "fall must not reverse");
            last_y = state.character.pos.y;
            if state.character.on_ground {
                break;
            }
        }
        assert!(state.character.on_ground);
    }

    #[test]
    fn test_platform_catch_during_fall() {
        let p = PlatformRect::new(450.0, 600.0, 150.0, PLATFORM_HEIGHT);
        let level = Level::with_platforms(vec![p]);
        let mut state = GameState::new(5, &level);
        state.character.pos = Vec2::new(480.0, 400.0);
        state.character.vel_y = 0.0;

        for _ in 0..200 {
            tick(&mut state, &level, &TickInput::default());
            if state.character.on_platform {
                break;
            }
        }
        assert!(state.character.on_platform);
        assert_eq!(state.character.pos.y, p.rest_y(CHAR_H));
        assert_eq!(state.character.vel_y, 0.0);
    }

    #[test]
    fn test_timer_expiry_ends_round() {
        let (mut state, level) = running_on_ground();
        for _ in 0..(ROUND_SECONDS * TICK_HZ + 1) {
            tick(&mut state, &level, &TickInput::default());
        }
        assert_eq!(state.mode, Mode::RoundEnded);
        assert_eq!(state.timer_remaining_secs(), 0);
        let overs = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::RoundOver)
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_pause_excludes_time_from_countdown() {
        let (mut state, level) = running_on_ground();
        for _ in 0..60 {
            tick(&mut state, &level, &TickInput::default());
        }
        let remaining = state.timer_remaining_secs();

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &level, &pause);
        assert_eq!(state.mode, Mode::Paused);
        for _ in 0..300 {
            tick(&mut state, &level, &TickInput::default());
        }
        assert_eq!(state.timer_remaining_secs(), remaining);

        tick(&mut state, &level, &pause);
        assert_eq!(state.mode, Mode::Running);
    }

    #[test]
    fn test_restart_from_terminal_modes() {
        let (mut state, level) = running_on_ground();
        state.score = 4;
        state.high_score = 4;
        state.mode = Mode::RoundEnded;

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &level, &restart);
        assert_eq!(state.mode, Mode::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 4);
        assert_eq!(state.flies.len(), FLY_COUNT);
        assert_eq!(state.timer_remaining_secs(), ROUND_SECONDS);

        // Restart is not honored mid-round
        tick(&mut state, &level, &restart);
        assert_eq!(state.mode, Mode::Running);
    }

    #[test]
    fn test_determinism() {
        let level = Level::standard();
        let mut a = GameState::new(424242, &level);
        let mut b = GameState::new(424242, &level);

        let inputs = [
            TickInput {
                move_axis: 1.0,
                ..Default::default()
            },
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                move_axis: -1.0,
                capture_aim: Some(Vec2::new(1200.0, 400.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..120 {
            for input in &inputs {
                tick(&mut a, &level, input);
                tick(&mut b, &level, input);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.character, b.character);
        assert_eq!(a.flies, b.flies);
    }
}
