//! Platform extraction from bitmap artwork
//!
//! Decorative layers (branches, vines, marker images) become standable
//! geometry by scanning their pixels: contiguous runs of "collidable"
//! samples along a scanline are emitted as platform rectangles.

use glam::Vec2;

use super::level::PlatformRect;
use crate::consts::PLATFORM_HEIGHT;

/// Alpha above this value counts as visible
pub const ALPHA_THRESHOLD: u8 = 128;

/// Per-pixel RGBA query over a bitmap.
///
/// Out-of-bounds queries return `None` and must never panic; the extractor
/// treats an unreadable pixel as empty space.
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]>;
}

/// An owned RGBA bitmap, the only pixel source the simulation itself holds.
///
/// Decoding lives in `assets`; the sim sees plain bytes.
#[derive(Debug, Clone, Default)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wrap raw RGBA bytes. Returns `None` when the byte count doesn't
    /// match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Build a bitmap from a solidity mask (test/demo helper): `true` cells
    /// become opaque white pixels.
    pub fn from_mask(width: u32, height: u32, mask: &[bool]) -> Self {
        let mut data = Vec::with_capacity(mask.len() * 4);
        for &solid in mask {
            let a = if solid { 255 } else { 0 };
            data.extend_from_slice(&[255, 255, 255, a]);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl PixelGrid for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Which pixels of a layer count as solid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collidable {
    /// Any sufficiently opaque pixel (sprite layers)
    Alpha,
    /// Red-dominant marker pixels (invisible collision layers drawn behind
    /// artwork that also overlaps hazards)
    RedMarker,
}

impl Collidable {
    #[inline]
    pub fn matches(self, [r, g, b, a]: [u8; 4]) -> bool {
        match self {
            Collidable::Alpha => a > ALPHA_THRESHOLD,
            Collidable::RedMarker => a > ALPHA_THRESHOLD && r > g && r > b && r > 100,
        }
    }
}

/// Scanline sampling parameters
#[derive(Debug, Clone, Copy)]
pub struct ScanParams {
    /// Step between sampled rows and columns
    pub stride: u32,
    /// Runs narrower than this are discarded as noise
    pub min_width: f32,
}

impl ScanParams {
    /// Dense scan for sprite-alpha layers (branches, vines)
    pub const SPRITE: Self = Self {
        stride: 2,
        min_width: 4.0,
    };
    /// Coarse scan for red marker layers (plants, rocks)
    pub const MARKER: Self = Self {
        stride: 4,
        min_width: 12.0,
    };
}

/// Run-length-encode collidable pixels of `grid` into platform rectangles.
///
/// Each sampled scanline is scanned left to right; a run closed mid-row gets
/// width `(x - run_start) + stride`, while a run still open at the row's last
/// sampled column closes with the remaining width to the image boundary.
/// Deterministic and idempotent; meant to run once per layer at load time.
pub fn extract_platforms(
    grid: &dyn PixelGrid,
    predicate: Collidable,
    origin: Vec2,
    params: ScanParams,
) -> Vec<PlatformRect> {
    let stride = params.stride.max(1);
    let (w, h) = (grid.width(), grid.height());
    let mut out = Vec::new();

    let mut y = 0;
    while y < h {
        let mut run_start: Option<u32> = None;
        let mut x = 0;
        while x < w {
            let solid = grid
                .pixel(x, y)
                .map(|px| predicate.matches(px))
                .unwrap_or(false);
            if solid {
                run_start.get_or_insert(x);
            } else if let Some(start) = run_start.take() {
                // Pad by one stride, clamped so the rect never leaves the bitmap
                let width = ((x - start) + stride).min(w - start) as f32;
                if width >= params.min_width {
                    out.push(PlatformRect::new(
                        origin.x + start as f32,
                        origin.y + y as f32,
                        width,
                        PLATFORM_HEIGHT,
                    ));
                }
            }
            x += stride;
        }
        // Run reaching the last sampled column closes at the image boundary
        if let Some(start) = run_start {
            let width = (w - start) as f32;
            if width >= params.min_width {
                out.push(PlatformRect::new(
                    origin.x + start as f32,
                    origin.y + y as f32,
                    width,
                    PLATFORM_HEIGHT,
                ));
            }
        }
        y += stride;
    }

    out
}
