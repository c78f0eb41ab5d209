//! Per-frame render queue and z-ordering
//!
//! The queue is rebuilt every frame: one entry per visible placed item or
//! sprite, sorted by ascending z-index with a stable sort so equal keys
//! keep their enqueue order, then executed against a [`DrawTarget`].

use glam::Vec2;
use ordered_float::OrderedFloat;

use crate::compositor::lights::LightRender;
use crate::compositor::particles::ParticleRender;
use crate::core::types::{ItemId, Rgb};
use crate::world::sprite::SpriteId;

/// Painter's-algorithm z-index for one footprint tile.
///
/// Tie-break precedence:
/// - hint 0: always behind all sprites
/// - hint 1: behind sprites, above hint-0 tiles
/// - hint absent: the item's bottom-row pixel coordinate
/// - any other hint: bottom-row pixel coordinate plus the hint
pub fn tile_z_index(hint: Option<i32>, bottom_px: f32) -> f32 {
    match hint {
        Some(0) => 0.0,
        Some(1) => 1.0,
        None => bottom_px,
        Some(offset) => bottom_px + offset as f32,
    }
}

/// One tile of an item's draw action
#[derive(Debug, Clone, PartialEq)]
pub struct TileDraw {
    /// Frame index into the definition's sheet
    pub frame: u32,
    /// Top-left corner in world pixels
    pub pos: Vec2,
}

/// Deferred draw action carried by a queue entry
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// All visible tiles of one placed item
    Item {
        id: ItemId,
        sheet: String,
        rotation: f32,
        tiles: Vec<TileDraw>,
    },
    Sprite {
        id: SpriteId,
        pos: Vec2,
        size: Vec2,
    },
}

/// Queue entry: z key plus draw action
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub z: OrderedFloat<f32>,
    pub cmd: DrawCommand,
}

/// The per-frame draw queue, discarded after execution
pub struct RenderQueue {
    entries: Vec<QueueEntry>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, z: f32, cmd: DrawCommand) {
        self.entries.push(QueueEntry {
            z: OrderedFloat(z),
            cmd,
        });
    }

    /// Stable ascending sort: equal z keys keep their enqueue order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|entry| entry.z);
    }

    /// Execute every entry's draw action in queue order
    pub fn execute(&self, target: &mut dyn DrawTarget) {
        for entry in &self.entries {
            target.draw(&entry.cmd);
        }
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw execution seam. The GPU/window shell lives behind this trait;
/// tests use [`RecordingTarget`].
pub trait DrawTarget {
    /// Draw one queue entry (tiles or a sprite)
    fn draw(&mut self, cmd: &DrawCommand);
    /// Draw live particles, after the sorted queue
    fn draw_particles(&mut self, particles: &[ParticleRender]);
    /// Apply dynamic lights, after particles
    fn draw_lights(&mut self, lights: &[LightRender]);
    /// Apply the ambient day/night overlay last
    fn apply_ambient(&mut self, color: Rgb, opacity: f32);
}

/// Target that records everything it is asked to draw
#[derive(Default)]
pub struct RecordingTarget {
    pub commands: Vec<DrawCommand>,
    pub particles: Vec<ParticleRender>,
    pub lights: Vec<LightRender>,
    pub ambient: Option<(Rgb, f32)>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawTarget for RecordingTarget {
    fn draw(&mut self, cmd: &DrawCommand) {
        self.commands.push(cmd.clone());
    }

    fn draw_particles(&mut self, particles: &[ParticleRender]) {
        self.particles.extend_from_slice(particles);
    }

    fn draw_lights(&mut self, lights: &[LightRender]) {
        self.lights.extend_from_slice(lights);
    }

    fn apply_ambient(&mut self, color: Rgb, opacity: f32) {
        self.ambient = Some((color, opacity));
    }
}
