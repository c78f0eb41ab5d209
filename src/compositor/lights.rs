//! Dynamic light lifecycle
//!
//! Lights are ephemeral: one exists exactly while its gating predicate
//! (in viewport, night time) holds. Identity is derived from the owning
//! item plus the rounded absolute pixel position, so re-checking the
//! predicate every frame upserts rather than duplicates.

use std::f32::consts::TAU;

use ahash::AHashMap;
use glam::Vec2;
use rand::Rng;

use crate::core::types::{FrameNumber, ItemId, Rgb};
use crate::defs::{LightDef, LightShape};

/// Derived light identity: owning item + rounded pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightKey {
    pub item: ItemId,
    pub px: i32,
    pub py: i32,
}

impl LightKey {
    pub fn at(item: ItemId, pos: Vec2) -> Self {
        Self {
            item,
            px: pos.x.round() as i32,
            py: pos.y.round() as i32,
        }
    }
}

/// A live point light
#[derive(Debug, Clone)]
pub struct LightSource {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub shape: LightShape,
    /// Full intensity the light ramps toward at deep night
    pub base_intensity: f32,
    /// Intensity after the ceiling ramp and flicker for this frame
    pub intensity: f32,
    flicker_speed: f32,
    flicker_amount: f32,
    /// Random phase assigned once at creation so lights don't pulse in
    /// lockstep
    phase: f32,
    last_seen: FrameNumber,
}

/// Snapshot handed to the draw target
#[derive(Debug, Clone, Copy)]
pub struct LightRender {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub intensity: f32,
    pub shape: LightShape,
}

/// Arena of live lights keyed by derived identity
pub struct LightArena {
    lights: AHashMap<LightKey, LightSource>,
    owner: Option<LightKey>,
}

impl LightArena {
    pub fn new() -> Self {
        Self {
            lights: AHashMap::new(),
            owner: None,
        }
    }

    /// Upsert for one frame: an existing light is only marked as seen, a
    /// missing one is created with its intensity at the current ramped
    /// ceiling and a once-assigned random flicker phase.
    pub fn touch<R: Rng>(
        &mut self,
        key: LightKey,
        def: &LightDef,
        pos: Vec2,
        ceiling_factor: f32,
        frame: FrameNumber,
        rng: &mut R,
    ) {
        if let Some(light) = self.lights.get_mut(&key) {
            light.pos = pos;
            light.last_seen = frame;
            return;
        }

        self.lights.insert(
            key,
            LightSource {
                pos,
                radius: def.radius,
                color: def.color,
                shape: def.shape,
                base_intensity: def.intensity,
                intensity: def.intensity * ceiling_factor.clamp(0.0, 1.0),
                flicker_speed: def.flicker_speed,
                flicker_amount: def.flicker_amount,
                phase: rng.gen_range(0.0..TAU),
                last_seen: frame,
            },
        );
    }

    /// Remove every light not seen this frame. The owner light survives
    /// regardless; it is managed externally.
    pub fn sweep(&mut self, frame: FrameNumber) {
        let owner = self.owner;
        self.lights
            .retain(|key, light| light.last_seen == frame || Some(*key) == owner);
    }

    /// Per-frame intensity update: ceiling ramp plus flicker.
    ///
    /// `now_ms` is accumulated simulation time; flickering lights follow
    /// `clamp(ceiling + sin(now * speed + phase) * amount, 0, ceiling)`.
    pub fn update_intensity(&mut self, now_ms: f64, ceiling_factor: f32) {
        let factor = ceiling_factor.clamp(0.0, 1.0);
        for light in self.lights.values_mut() {
            let ceiling = light.base_intensity * factor;
            light.intensity = if light.flicker_amount > 0.0 {
                let wave = (now_ms as f32 * light.flicker_speed + light.phase).sin();
                (ceiling + wave * light.flicker_amount).clamp(0.0, ceiling)
            } else {
                ceiling
            };
        }
    }

    /// Mark one identity as the protected owner light
    pub fn set_owner(&mut self, key: Option<LightKey>) {
        self.owner = key;
    }

    pub fn owner(&self) -> Option<LightKey> {
        self.owner
    }

    /// Bulk invalidation on scene change: everything goes except the owner
    /// light. Safe to call repeatedly.
    pub fn clear_ephemeral(&mut self) {
        let owner = self.owner;
        self.lights.retain(|key, _| Some(*key) == owner);
    }

    pub fn contains(&self, key: &LightKey) -> bool {
        self.lights.contains_key(key)
    }

    pub fn get(&self, key: &LightKey) -> Option<&LightSource> {
        self.lights.get(key)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LightKey, &LightSource)> {
        self.lights.iter()
    }

    /// Snapshot for the draw target
    pub fn render_list(&self) -> Vec<LightRender> {
        self.lights
            .values()
            .map(|light| LightRender {
                pos: light.pos,
                radius: light.radius,
                color: light.color,
                intensity: light.intensity,
                shape: light.shape,
            })
            .collect()
    }
}

impl Default for LightArena {
    fn default() -> Self {
        Self::new()
    }
}
