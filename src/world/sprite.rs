//! Dynamic sprites
//!
//! Sprites are owned by gameplay logic; the compositor only reads position
//! and size to place them in the draw queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::types::PxRect;

/// Unique identifier for sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub Uuid);

impl SpriteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

/// A moving entity with continuous pixel position, independent of the grid
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub id: SpriteId,
    /// Top-left corner in world pixels
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            id: SpriteId::new(),
            position,
            width,
            height,
        }
    }

    pub fn px_rect(&self) -> PxRect {
        PxRect::from_pos_size(self.position, Vec2::new(self.width, self.height))
    }

    /// Bottom edge pixel coordinate, used as the sprite's z-index
    pub fn bottom_edge(&self) -> f32 {
        self.position.y + self.height
    }
}
