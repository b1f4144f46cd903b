//! Bitmap asset loading with graceful fallback
//!
//! Decodes the collidable artwork layers (branches, vines, marker images,
//! trunk strips) into plain RGBA buffers and positions them in the world.
//! A missing or unreadable file logs a warning and contributes zero
//! geometry; collision never crashes over absent decoration.

use std::path::Path;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{
    Bitmap, Collidable, CollidableLayer, LayerRole, Level, PixelGrid, ScanParams, WallSide,
};

/// Vertical anchor (fraction of world height) and x nudge for a branch
struct BranchSlot {
    y_frac: f32,
    offset: f32,
}

const LEFT_BRANCHES: [BranchSlot; 4] = [
    BranchSlot { y_frac: 0.15, offset: 35.0 },
    BranchSlot { y_frac: 0.35, offset: 35.0 },
    BranchSlot { y_frac: 0.55, offset: 20.0 },
    BranchSlot { y_frac: 0.75, offset: 20.0 },
];

const RIGHT_BRANCHES: [BranchSlot; 4] = [
    BranchSlot { y_frac: 0.12, offset: -45.0 },
    BranchSlot { y_frac: 0.34, offset: -50.0 },
    BranchSlot { y_frac: 0.54, offset: -35.0 },
    BranchSlot { y_frac: 0.72, offset: -40.0 },
];

/// Horizontal anchors (fraction of world width) for the hanging vines
const VINE_ANCHORS: [f32; 3] = [0.15, 0.5, 0.85];

/// Decode a PNG into an owned RGBA bitmap. `None` on any failure.
pub fn load_bitmap(path: &Path) -> Option<Bitmap> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            Bitmap::from_rgba(w, h, rgba.into_raw())
        }
        Err(e) => {
            log::warn!("missing layer '{}': {e}", path.display());
            None
        }
    }
}

fn platform_layer(
    name: &str,
    origin: Vec2,
    predicate: Collidable,
    params: ScanParams,
    bitmap: Bitmap,
) -> CollidableLayer {
    CollidableLayer {
        name: name.to_string(),
        origin,
        predicate,
        params,
        role: LayerRole::Platforms,
        bitmap,
    }
}

/// Build the level from the artwork under `assets_dir`. Every layer is
/// optional; with nothing on disk this degrades to `Level::standard()`.
pub fn load_level(assets_dir: &Path) -> Level {
    let sprites = assets_dir.join("sprites");
    let trees = sprites.join("trees");
    let mut layers = Vec::new();

    // Trunk strips hug the world edges, tile vertically, and double as the
    // anchor the branches hang from.
    let trunk = load_bitmap(&trees.join("thumbnail_wood.png"));
    let trunk_w = trunk.as_ref().map(|b| b.width() as f32).unwrap_or(0.0);
    if let Some(bitmap) = trunk.clone() {
        layers.push(CollidableLayer {
            name: "trunk_left".to_string(),
            origin: Vec2::ZERO,
            predicate: Collidable::Alpha,
            params: ScanParams::SPRITE,
            role: LayerRole::Wall(WallSide::Left),
            bitmap,
        });
    }
    if let Some(bitmap) = trunk {
        layers.push(CollidableLayer {
            name: "trunk_right".to_string(),
            origin: Vec2::new(WORLD_W - trunk_w, 0.0),
            predicate: Collidable::Alpha,
            params: ScanParams::SPRITE,
            role: LayerRole::Wall(WallSide::Right),
            bitmap,
        });
    }

    // Branches only make sense with a trunk to hang from
    if trunk_w > 0.0 {
        for (i, slot) in LEFT_BRANCHES.iter().enumerate() {
            let path = trees
                .join("branches_left_separated")
                .join(format!("branches_left_part_{}.png", i + 1));
            if let Some(bitmap) = load_bitmap(&path) {
                let origin = Vec2::new(
                    trunk_w - bitmap.width() as f32 / 2.0 + slot.offset,
                    WORLD_H * slot.y_frac,
                );
                layers.push(platform_layer(
                    &format!("branch_left_{}", i + 1),
                    origin,
                    Collidable::Alpha,
                    ScanParams::SPRITE,
                    bitmap,
                ));
            }
        }
        let right_trunk_x = WORLD_W - trunk_w;
        for (i, slot) in RIGHT_BRANCHES.iter().enumerate() {
            let path = trees
                .join("branches_right_separated")
                .join(format!("branches_right_part_{}.png", i + 1));
            if let Some(bitmap) = load_bitmap(&path) {
                let origin = Vec2::new(
                    right_trunk_x + trunk_w - bitmap.width() as f32 / 2.0 + slot.offset,
                    WORLD_H * slot.y_frac,
                );
                layers.push(platform_layer(
                    &format!("branch_right_{}", i + 1),
                    origin,
                    Collidable::Alpha,
                    ScanParams::SPRITE,
                    bitmap,
                ));
            }
        }
    }

    // Hanging vines along the top of the screen
    for (i, &anchor) in VINE_ANCHORS.iter().enumerate() {
        let path = sprites
            .join("vines_separated")
            .join(format!("vines_part_{}.png", i + 1));
        if let Some(bitmap) = load_bitmap(&path) {
            let origin = Vec2::new(WORLD_W * anchor - bitmap.width() as f32 / 2.0, 0.0);
            layers.push(platform_layer(
                &format!("vines_{}", i + 1),
                origin,
                Collidable::Alpha,
                ScanParams::SPRITE,
                bitmap,
            ));
        }
    }

    // Red marker layers: invisible collision twins drawn behind artwork
    // that overlaps the water, so only the marked parts are standable.
    let left_water_end = LEFT_WATER_START_X + LEFT_WATER_WIDTH;
    let space_between = SWAMP_START_X - left_water_end;
    let rocks_w = load_bitmap(&sprites.join("rocks.png"))
        .map(|b| b.width() as f32)
        .unwrap_or(0.0);
    let rocks_x = left_water_end + space_between * 0.5 - rocks_w / 2.0;

    if let Some(bitmap) = load_bitmap(&assets_dir.join("red_rocks_v2.png")) {
        let origin = Vec2::new(rocks_x, GROUND_Y - bitmap.height() as f32);
        layers.push(platform_layer(
            "red_rocks",
            origin,
            Collidable::RedMarker,
            ScanParams::MARKER,
            bitmap,
        ));
    }

    if let Some(bitmap) = load_bitmap(&trees.join("small_plant_red.png")) {
        let origin = Vec2::new(
            left_water_end + (rocks_x - left_water_end) * 0.3 - bitmap.width() as f32 / 2.0,
            GROUND_Y - bitmap.height() as f32,
        );
        layers.push(platform_layer(
            "small_plant_red",
            origin,
            Collidable::RedMarker,
            ScanParams::MARKER,
            bitmap,
        ));
    }

    if let Some(bitmap) = load_bitmap(&trees.join("plant_for_water_big_red.png")) {
        let origin = Vec2::new(
            SWAMP_START_X + (SWAMP_WIDTH - bitmap.width() as f32) / 2.0,
            WORLD_H - bitmap.height() as f32,
        );
        layers.push(platform_layer(
            "plant_red",
            origin,
            Collidable::RedMarker,
            ScanParams::MARKER,
            bitmap,
        ));
    }

    Level::build(layers)
}
