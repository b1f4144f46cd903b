//! Collision resolution for the character
//!
//! Three resolvers run in a fixed order each tick: platform catch, ground
//! catch, hazard check. Side walls are resolved during horizontal movement
//! by scanning their bitmap along the character's vertical extent.

use super::level::{Level, PlatformRect, SideWall, WallSide};
use super::state::Character;
use crate::consts::*;

/// Pixel sampling step for wall scans
const WALL_SAMPLE_STEP: f32 = 4.0;

/// What caught the character this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    None,
    Ground,
    Platform(usize),
}

/// Find the first platform that catches the falling character.
///
/// A platform catches when the character's horizontal span overlaps it, the
/// feet are inside the catch band around the platform top, the character is
/// not below the rest position, and it is falling or nearly stationary.
pub fn platform_catch(ch: &Character, platforms: &[PlatformRect]) -> Option<(usize, f32)> {
    let left = ch.pos.x;
    let right = ch.pos.x + CHAR_W;
    let feet = ch.feet_y();

    for (i, p) in platforms.iter().enumerate() {
        if !p.overlaps_x(left, right) {
            continue;
        }
        let rest = p.rest_y(CHAR_H);
        let in_band = feet >= p.y - CATCH_TOLERANCE && feet <= p.bottom() + CATCH_TOLERANCE;
        let not_below = ch.pos.y <= rest + CATCH_TOLERANCE;
        let falling = ch.vel_y >= 0.0 || ch.vel_y.abs() < 0.5;
        if in_band && not_below && falling {
            return Some((i, rest));
        }
    }
    None
}

/// Ground catch: the feet band test against the ground line. The caller is
/// responsible for skipping this while the character is over a hazard.
pub fn ground_catch(ch: &Character, ground_y: f32) -> Option<f32> {
    // The sprite's visual feet, not the box bottom, touch the ground line
    if ch.feet_y() - FOOT_INSET >= ground_y {
        Some(ground_y - CHAR_H + FOOT_INSET)
    } else {
        None
    }
}

/// True when the character's vertical position sits inside the top-rest
/// tolerance band of any platform it horizontally overlaps. The side-wall
/// resolver yields in that case so it doesn't fight the vertical resolver.
pub fn in_rest_band(ch: &Character, platforms: &[PlatformRect]) -> bool {
    let left = ch.pos.x;
    let right = ch.pos.x + CHAR_W;
    platforms.iter().any(|p| {
        p.overlaps_x(left, right) && (ch.pos.y - p.rest_y(CHAR_H)).abs() <= REST_TOLERANCE
    })
}

/// Scan a wall's pixels over the character's box; true on any solid sample
fn wall_overlaps(ch: &Character, wall: &SideWall) -> bool {
    let left = ch.pos.x.max(wall.origin_x);
    let right = (ch.pos.x + CHAR_W).min(wall.origin_x + wall.width());
    if left >= right {
        return false;
    }
    let mut y = ch.pos.y;
    while y < ch.feet_y() {
        let mut x = left;
        while x < right {
            if wall.solid_at(x, y) {
                return true;
            }
            x += WALL_SAMPLE_STEP;
        }
        y += WALL_SAMPLE_STEP;
    }
    false
}

/// Resolve the character against one side wall.
///
/// On contact the character snaps to the nearest non-collidable boundary
/// column, found by scanning the wall bitmap at the character's vertical
/// center. Returns the corrected x, or `None` when there is no contact.
pub fn resolve_wall(ch: &Character, wall: &SideWall) -> Option<f32> {
    if !wall_overlaps(ch, wall) {
        return None;
    }

    let mid_y = ch.pos.y + CHAR_H / 2.0;
    match wall.side {
        WallSide::Left => {
            // Push right of the rightmost solid column at the scan row
            let mut x = wall.origin_x + wall.width() - 1.0;
            while x >= wall.origin_x {
                if wall.solid_at(x, mid_y) {
                    return Some(x + WALL_SAMPLE_STEP);
                }
                x -= WALL_SAMPLE_STEP;
            }
            Some(wall.origin_x + wall.width())
        }
        WallSide::Right => {
            // Push left of the leftmost solid column at the scan row
            let mut x = wall.origin_x;
            while x < wall.origin_x + wall.width() {
                if wall.solid_at(x, mid_y) {
                    return Some(x - CHAR_W);
                }
                x += WALL_SAMPLE_STEP;
            }
            Some(wall.origin_x - CHAR_W)
        }
    }
}

/// Horizontal pass: walls, then world bounds. Skipped while the character
/// rests on a platform top (the vertical resolver owns that case).
pub fn resolve_horizontal(ch: &mut Character, level: &Level) {
    if !in_rest_band(ch, level.platforms()) {
        for wall in &level.walls {
            if let Some(x) = resolve_wall(ch, wall) {
                ch.pos.x = x;
            }
        }
    }
    ch.pos.x = ch.pos.x.clamp(0.0, level.world_w - CHAR_W);
}

/// Vertical pass: platforms first, then the ground line (unless the center
/// is over a hazard). Returns what caught the character; `Support::None`
/// with a hazard underneath is the caller's death condition.
pub fn resolve_vertical(ch: &mut Character, level: &Level) -> Support {
    if let Some((idx, rest)) = platform_catch(ch, level.platforms()) {
        ch.pos.y = rest;
        ch.vel_y = 0.0;
        return Support::Platform(idx);
    }

    let over_hazard = level.hazard_at(ch.center().x).is_some();
    if !over_hazard {
        if let Some(rest) = ground_catch(ch, level.ground_y) {
            ch.pos.y = rest;
            ch.vel_y = 0.0;
            return Support::Ground;
        }
    }

    Support::None
}
