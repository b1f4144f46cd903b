//! Static level geometry
//!
//! The ground line, hazard pools, side walls, and the cached platform set.
//! Everything here is built once at load time and read-only afterwards; a
//! level reload replaces the whole structure.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::extract::{Bitmap, Collidable, PixelGrid, ScanParams, extract_platforms};
use crate::consts::*;

/// An immutable axis-aligned platform rectangle, the unit of standable
/// collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlatformRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the horizontal interval `[left, right]` overlaps this rect
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        right > self.x && left < self.right()
    }

    /// The character top-left y at which its feet rest on this platform
    #[inline]
    pub fn rest_y(&self, char_height: f32) -> f32 {
        self.y - char_height + FOOT_INSET
    }
}

/// A region that kills the character when entered without support
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub x_start: f32,
    pub x_end: f32,
    /// Falling past this y while inside the interval is lethal
    pub y_top: f32,
}

impl HazardZone {
    pub fn new(x_start: f32, x_end: f32, y_top: f32) -> Self {
        Self {
            x_start,
            x_end,
            y_top,
        }
    }

    /// True when `x` lies inside the hazard's horizontal interval
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x_start && x <= self.x_end
    }

    /// Lethal-entry test for an unsupported character
    #[inline]
    pub fn is_lethal(&self, center_x: f32, bottom_y: f32) -> bool {
        self.spans(center_x) && bottom_y >= self.y_top
    }
}

/// Which world edge a wall hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// A solid side obstacle backed by bitmap pixels (tree trunk strips).
///
/// The bitmap tiles vertically over the whole world height; horizontal
/// resolution scans it along the character's vertical extent.
#[derive(Debug, Clone)]
pub struct SideWall {
    pub side: WallSide,
    /// World x of the bitmap's left edge
    pub origin_x: f32,
    pub bitmap: Bitmap,
}

impl SideWall {
    pub fn new(side: WallSide, origin_x: f32, bitmap: Bitmap) -> Self {
        Self {
            side,
            origin_x,
            bitmap,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.bitmap.width() as f32
    }

    /// Sample solidity at world coordinates (tiles vertically)
    pub fn solid_at(&self, world_x: f32, world_y: f32) -> bool {
        if world_x < self.origin_x || world_y < 0.0 {
            return false;
        }
        let x = (world_x - self.origin_x) as u32;
        let y = (world_y as u32) % self.bitmap.height().max(1);
        self.bitmap
            .pixel(x, y)
            .map(|px| Collidable::Alpha.matches(px))
            .unwrap_or(false)
    }
}

/// What a decorative layer contributes to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    /// Standable platform segments
    Platforms,
    /// A solid side obstacle
    Wall(WallSide),
}

/// One collidable decorative layer: a bitmap, where it sits in the world,
/// and how its pixels are interpreted.
#[derive(Debug, Clone)]
pub struct CollidableLayer {
    pub name: String,
    pub origin: Vec2,
    pub predicate: Collidable,
    pub params: ScanParams,
    pub role: LayerRole,
    pub bitmap: Bitmap,
}

/// The complete static geometry of a level
#[derive(Debug, Clone)]
pub struct Level {
    pub world_w: f32,
    pub world_h: f32,
    pub ground_y: f32,
    pub hazards: Vec<HazardZone>,
    pub walls: Vec<SideWall>,
    platforms: Vec<PlatformRect>,
}

impl Level {
    /// The default arena: swamp and left water pools, no bitmap layers.
    /// Used by tests and as the fallback when no assets are present.
    pub fn standard() -> Self {
        Self::build(Vec::new())
    }

    /// Build the level from explicit geometry plus extracted layers.
    /// This is the expensive load-time pass; the result is cached for the
    /// whole session.
    pub fn build(layers: Vec<CollidableLayer>) -> Self {
        let hazards = vec![
            // Right swamp: lethal at the ground line
            HazardZone::new(SWAMP_START_X, SWAMP_START_X + SWAMP_WIDTH, GROUND_Y),
            // Left water pool, sunk below the ground surface
            HazardZone::new(
                LEFT_WATER_START_X,
                LEFT_WATER_START_X + LEFT_WATER_WIDTH,
                WORLD_H - LEFT_WATER_DEPTH,
            ),
        ];

        let mut platforms: Vec<PlatformRect> = Vec::new();
        let mut walls = Vec::new();
        for layer in layers {
            match layer.role {
                LayerRole::Platforms => {
                    let segs = extract_platforms(
                        &layer.bitmap,
                        layer.predicate,
                        layer.origin,
                        layer.params,
                    );
                    log::info!("layer '{}': {} platform segments", layer.name, segs.len());
                    platforms.extend(segs);
                }
                LayerRole::Wall(side) => {
                    log::info!("layer '{}': side wall", layer.name);
                    walls.push(SideWall::new(side, layer.origin.x, layer.bitmap));
                }
            }
        }
        log::info!("level built: {} platforms, {} walls", platforms.len(), walls.len());

        Self {
            world_w: WORLD_W,
            world_h: WORLD_H,
            ground_y: GROUND_Y,
            hazards,
            walls,
            platforms,
        }
    }

    /// The immutable platform set (exposed for debug rendering)
    #[inline]
    pub fn platforms(&self) -> &[PlatformRect] {
        &self.platforms
    }

    /// Test-only: a level with hand-placed platforms
    #[cfg(test)]
    pub fn with_platforms(platforms: Vec<PlatformRect>) -> Self {
        let mut level = Self::standard();
        level.platforms = platforms;
        level
    }

    /// The hazard whose interval contains `center_x`, if any
    pub fn hazard_at(&self, center_x: f32) -> Option<&HazardZone> {
        self.hazards.iter().find(|h| h.spans(center_x))
    }
}
