//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for placed items, assigned by the scene loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Layer identifier for placed items. Layer 0 is the background layer.
pub type LayerId = u32;

/// Frame counter (one per composed frame)
pub type FrameNumber = u64;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other`, `t` clamped to `0.0..=1.0`.
    pub fn lerp(&self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl PxRect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Rectangle overlap test. Touching edges do not count as overlap.
    pub fn intersects(&self, other: &PxRect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Conservative circle test: the circle's bounding box must overlap.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius >= self.min.x
            && center.x - radius <= self.max.x
            && center.y + radius >= self.min.y
            && center.y - radius <= self.max.y
    }
}

/// Tile-index rectangle: inclusive start, exclusive end, clamped to the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

impl TileRect {
    pub fn new(x_start: i32, x_end: i32, y_start: i32, y_end: i32) -> Self {
        Self {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    pub fn width(&self) -> i32 {
        (self.x_end - self.x_start).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.y_end - self.y_start).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains_tile(&self, tx: i32, ty: i32) -> bool {
        tx >= self.x_start && tx < self.x_end && ty >= self.y_start && ty < self.y_end
    }

    /// The rectangle in pixel units.
    pub fn to_px(&self, tile_size: u32) -> PxRect {
        let ts = tile_size as f32;
        PxRect::new(
            Vec2::new(self.x_start as f32 * ts, self.y_start as f32 * ts),
            Vec2::new(self.x_end as f32 * ts, self.y_end as f32 * ts),
        )
    }
}
