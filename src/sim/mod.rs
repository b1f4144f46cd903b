//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies (bitmaps arrive as plain bytes)

pub mod collision;
pub mod extract;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{Support, platform_catch, resolve_horizontal, resolve_vertical};
pub use extract::{Bitmap, Collidable, PixelGrid, ScanParams, extract_platforms};
pub use level::{CollidableLayer, HazardZone, LayerRole, Level, PlatformRect, SideWall, WallSide};
pub use state::{Character, Facing, Fly, GameEvent, GameState, Mode, Tongue};
pub use tick::{TickInput, tick};
