//! World state: scenes, placed items, and sprites

pub mod item;
pub mod scene;
pub mod sprite;

pub use item::{AnimState, PlacedItem, SwayState};
pub use scene::Scene;
pub use sprite::{Sprite, SpriteId};
