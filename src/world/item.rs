//! Placed items and their per-instance mutable state

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::WorldConfig;
use crate::core::types::{ItemId, LayerId};

/// Animation playback state, initialized lazily on first encounter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimState {
    /// Current frame within the definition's frame set
    pub current_frame: usize,
    /// Time accumulator for frame advancement
    pub elapsed_ms: f32,
}

impl AnimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update animation, returns true if the frame changed.
    pub fn update(&mut self, dt_ms: f32, frame_duration_ms: f32, frame_count: usize) -> bool {
        if frame_count <= 1 || frame_duration_ms <= 0.0 {
            return false;
        }

        self.elapsed_ms += dt_ms;

        let mut changed = false;
        while self.elapsed_ms >= frame_duration_ms {
            self.elapsed_ms -= frame_duration_ms;
            self.current_frame = (self.current_frame + 1) % frame_count;
            changed = true;
        }
        changed
    }
}

/// Wind sway state. Amplitude and period are drawn once when the instance
/// is first composed and never re-randomized; elapsed time accumulates only
/// while the item is in viewport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwayState {
    pub amplitude: f32,
    pub period_ms: f32,
    pub elapsed_ms: f32,
}

impl SwayState {
    /// Draw a fresh amplitude/period pair from the configured ranges
    pub fn randomize<R: Rng>(config: &WorldConfig, rng: &mut R) -> Self {
        Self {
            amplitude: rng.gen_range(config.sway_amplitude_min..=config.sway_amplitude_max),
            period_ms: rng.gen_range(config.sway_period_min_ms..=config.sway_period_max_ms),
            elapsed_ms: 0.0,
        }
    }

    pub fn accumulate(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms;
    }

    /// Current sway angle in radians
    pub fn angle(&self) -> f32 {
        (self.elapsed_ms / self.period_ms * TAU).sin() * self.amplitude
    }
}

/// An instance of a tile definition placed in the world
///
/// The footprint is the cartesian product of the x and y coordinate arrays:
/// a single tile, a line, or a grid. Tile positions are row-major (y outer,
/// x inner) for frame and depth-hint indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedItem {
    pub id: ItemId,
    /// Definition id in the registry
    pub def: String,
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
    pub layer: LayerId,
    pub visible: bool,
    /// Initialized by the compositor on first encounter
    #[serde(default)]
    pub anim: Option<AnimState>,
    #[serde(default)]
    pub sway: Option<SwayState>,
    /// Externally driven spin, applied when the definition allows it
    #[serde(default)]
    pub spin_angle: f32,
    /// Last z-index computed for this item
    #[serde(default)]
    pub z_index: f32,
}

impl PlacedItem {
    pub fn new(id: ItemId, def: impl Into<String>, xs: Vec<i32>, ys: Vec<i32>, layer: LayerId) -> Self {
        Self {
            id,
            def: def.into(),
            xs,
            ys,
            layer,
            visible: true,
            anim: None,
            sway: None,
            spin_angle: 0.0,
            z_index: 0.0,
        }
    }

    /// Footprint bounding box `(min_x, max_x, min_y, max_y)` in tile units
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let min_x = *self.xs.iter().min()?;
        let max_x = *self.xs.iter().max()?;
        let min_y = *self.ys.iter().min()?;
        let max_y = *self.ys.iter().max()?;
        Some((min_x, max_x, min_y, max_y))
    }

    /// Iterate footprint tiles row-major
    pub fn footprint(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }

    pub fn tile_count(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    /// Pixel coordinate of the bottom edge of the bottom tile row
    pub fn bottom_px(&self, tile_size: u32) -> Option<f32> {
        let (_, _, _, max_y) = self.bounds()?;
        Some((max_y + 1) as f32 * tile_size as f32)
    }

    /// Animation state, created on first access
    pub fn anim_mut(&mut self) -> &mut AnimState {
        self.anim.get_or_insert_with(AnimState::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(xs: Vec<i32>, ys: Vec<i32>) -> PlacedItem {
        PlacedItem::new(ItemId(1), "oak_tree", xs, ys, 1)
    }

    #[test]
    fn test_footprint_is_cartesian_product() {
        let grid = item(vec![2, 3], vec![5, 6]);
        let tiles: Vec<_> = grid.footprint().collect();
        assert_eq!(tiles, vec![(2, 5), (3, 5), (2, 6), (3, 6)]);
        assert_eq!(grid.tile_count(), 4);

        let line = item(vec![0, 1, 2], vec![4]);
        let tiles: Vec<_> = line.footprint().collect();
        assert_eq!(tiles, vec![(0, 4), (1, 4), (2, 4)]);
    }

    #[test]
    fn test_bounds_and_bottom_px() {
        let grid = item(vec![3, 2], vec![6, 5]);
        assert_eq!(grid.bounds(), Some((2, 3, 5, 6)));
        assert_eq!(grid.bottom_px(16), Some(112.0)); // (6 + 1) * 16

        let empty = item(vec![], vec![]);
        assert_eq!(empty.bounds(), None);
        assert_eq!(empty.bottom_px(16), None);
    }

    #[test]
    fn test_animation_advances_and_wraps() {
        let mut anim = AnimState::new();

        assert!(!anim.update(100.0, 150.0, 4));
        assert_eq!(anim.current_frame, 0);

        assert!(anim.update(60.0, 150.0, 4));
        assert_eq!(anim.current_frame, 1);

        // Large step wraps around the frame set
        assert!(anim.update(500.0, 150.0, 4));
        assert_eq!(anim.current_frame, 0);
    }

    #[test]
    fn test_static_definitions_never_animate() {
        let mut anim = AnimState::new();
        assert!(!anim.update(1000.0, 150.0, 1));
        assert_eq!(anim.current_frame, 0);
    }

    #[test]
    fn test_sway_angle_is_bounded() {
        let config = WorldConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut sway = SwayState::randomize(&config, &mut rng);

        assert!(sway.amplitude >= config.sway_amplitude_min);
        assert!(sway.amplitude <= config.sway_amplitude_max);

        for _ in 0..200 {
            sway.accumulate(16.0);
            assert!(sway.angle().abs() <= sway.amplitude + 1e-6);
        }
    }

    #[test]
    fn test_lazy_anim_init() {
        let mut i = item(vec![0], vec![0]);
        assert!(i.anim.is_none());
        i.anim_mut().current_frame = 2;
        assert_eq!(i.anim.as_ref().unwrap().current_frame, 2);
    }
}
