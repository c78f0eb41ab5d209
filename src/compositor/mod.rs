//! Scene compositor
//!
//! Per-frame orchestration: cull the world to the camera viewport, resolve
//! z-order for every visible item and sprite, drive the light and particle
//! lifecycles, then execute the sorted draw queue against a [`DrawTarget`].
//! The compositor owns all ephemeral state (lights, emitters, the queue)
//! and never reaches into live gameplay data beyond the scene it is handed.

pub mod camera;
pub mod lights;
pub mod metrics;
pub mod particles;
pub mod queue;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::ambient::AmbientLevels;
use crate::core::clock::GameClock;
use crate::core::config::WorldConfig;
use crate::core::types::{FrameNumber, PxRect, TileRect};
use crate::defs::effects::EffectRegistry;
use crate::defs::registry::DefinitionRegistry;
use crate::defs::TileDefinition;
use crate::world::item::{AnimState, PlacedItem, SwayState};
use crate::world::scene::Scene;

use lights::LightArena;
use metrics::CompositorMetrics;
use particles::{EmitterArena, EmitterKey};
use queue::{tile_z_index, RenderQueue, TileDraw};

// Re-export commonly used types
pub use camera::Camera;
pub use lights::{LightKey, LightRender, LightSource};
pub use metrics::FrameCounters;
pub use particles::ParticleRender;
pub use queue::{DrawCommand, DrawTarget, RecordingTarget};

/// Night ambience collaborator. Edge-triggered: each hook fires exactly
/// once per transition, never per frame.
pub trait AmbientAudio {
    fn night_started(&mut self);
    fn night_ended(&mut self);
}

/// Per-frame scene compositor and owner of all ephemeral render state
pub struct SceneCompositor {
    config: WorldConfig,
    lights: LightArena,
    emitters: EmitterArena,
    queue: RenderQueue,
    metrics: CompositorMetrics,
    rng: StdRng,
    audio: Option<Box<dyn AmbientAudio>>,
    was_night: Option<bool>,
    frame: FrameNumber,
    sim_time_ms: f64,
}

impl SceneCompositor {
    pub fn new(config: WorldConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Deterministic construction for tests and replays
    pub fn with_seed(config: WorldConfig, seed: u64) -> Self {
        Self {
            config,
            lights: LightArena::new(),
            emitters: EmitterArena::new(),
            queue: RenderQueue::new(),
            metrics: CompositorMetrics::new(),
            rng: StdRng::seed_from_u64(seed),
            audio: None,
            was_night: None,
            frame: 0,
            sim_time_ms: 0.0,
        }
    }

    /// Attach the night ambience collaborator
    pub fn with_audio(mut self, audio: Box<dyn AmbientAudio>) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn counters(&self) -> &FrameCounters {
        &self.metrics.counters
    }

    pub fn metrics(&self) -> &CompositorMetrics {
        &self.metrics
    }

    pub fn lights(&self) -> &LightArena {
        &self.lights
    }

    pub fn emitters(&self) -> &EmitterArena {
        &self.emitters
    }

    pub fn frame(&self) -> FrameNumber {
        self.frame
    }

    /// Mark one light identity as the protected owner light
    pub fn set_owner_light(&mut self, key: Option<LightKey>) {
        self.lights.set_owner(key);
    }

    /// Scene-change reset hook: clears all ephemeral lights (except the
    /// owner light) and every particle emitter. Idempotent.
    pub fn reset_ephemeral(&mut self) {
        self.lights.clear_ephemeral();
        self.emitters.clear();
        tracing::debug!("ephemeral render state cleared");
    }

    /// One fixed logic step: advance the clock, tick animations and sway,
    /// integrate particles. The culled `view` is the one computed at the
    /// start of the displayed frame.
    pub fn step(
        &mut self,
        scene: &mut Scene,
        registry: &DefinitionRegistry,
        clock: &mut GameClock,
        view: &TileRect,
        dt_ms: f32,
    ) {
        clock.advance(dt_ms / 1000.0 * self.config.clock_scale);
        self.sim_time_ms += dt_ms as f64;
        self.check_night_edge(clock);

        let ts = self.config.tile_size;
        let view_px = view.to_px(ts);

        for item in scene.items_mut() {
            let Some(def) = registry.get(&item.def) else {
                continue;
            };

            if def.is_animated() {
                let frame_count = def.animation_len();
                let duration = def.frame_duration_ms;
                item.anim_mut().update(dt_ms, duration, frame_count);
            }

            if def.sway {
                let in_view = item_px_rect(item, ts)
                    .map(|rect| rect.intersects(&view_px))
                    .unwrap_or(false);
                if let Some(sway) = item.sway.as_mut() {
                    if in_view {
                        sway.accumulate(dt_ms);
                    }
                }
            }
        }

        self.emitters.update(dt_ms);
    }

    /// The render pass: build and execute the draw queue, synchronize the
    /// light and particle lifecycles against visibility and the clock.
    pub fn compose(
        &mut self,
        scene: &mut Scene,
        registry: &DefinitionRegistry,
        effects: &EffectRegistry,
        clock: &GameClock,
        view: &TileRect,
        target: &mut dyn DrawTarget,
    ) {
        self.metrics.begin_frame();
        self.metrics.counters.reset();
        self.queue.clear();
        self.frame += 1;

        let ambient = AmbientLevels::from_clock(clock);
        let night = clock.is_night();
        let ts = self.config.tile_size;
        let view_px = view.to_px(ts);

        for item in scene.items_mut() {
            if !item.visible {
                continue;
            }
            let Some(def) = registry.get(&item.def) else {
                tracing::debug!(definition = %item.def, "skipping item with missing definition");
                continue;
            };
            self.compose_item(item, def, effects, &view_px, night, ambient.light_ceiling);
        }

        for sprite in scene.sprites() {
            if !sprite.px_rect().intersects(&view_px) {
                continue;
            }
            self.queue.push(
                sprite.bottom_edge(),
                DrawCommand::Sprite {
                    id: sprite.id,
                    pos: sprite.position,
                    size: Vec2::new(sprite.width, sprite.height),
                },
            );
            self.metrics.counters.sprites += 1;
        }

        // Anything whose gating predicate did not hold this frame goes away
        self.lights.sweep(self.frame);
        self.emitters.sweep(self.frame);
        self.lights
            .update_intensity(self.sim_time_ms, ambient.light_ceiling);
        self.metrics.counters.lights = self.lights.len();
        self.metrics.counters.emitters = self.emitters.len();

        self.queue.sort();
        self.queue.execute(target);
        target.draw_particles(&self.emitters.render_list());
        target.draw_lights(&self.lights.render_list());
        target.apply_ambient(ambient.overlay_color, ambient.overlay_opacity);

        self.metrics.end_frame();
    }

    /// Compose one visible item: per-tile viewport tests, z-order, queue
    /// entry, and the light/particle lifecycle for its descriptors.
    fn compose_item(
        &mut self,
        item: &mut PlacedItem,
        def: &TileDefinition,
        effects: &EffectRegistry,
        view_px: &PxRect,
        night: bool,
        light_ceiling: f32,
    ) {
        let Some((min_x, _, min_y, max_y)) = item.bounds() else {
            return;
        };
        let ts = self.config.tile_size;
        let tsf = ts as f32;
        let bottom_px = (max_y + 1) as f32 * tsf;
        let origin = Vec2::new(min_x as f32 * tsf, min_y as f32 * tsf);

        // First encounter: randomize sway once, set up animation state
        if def.sway && item.sway.is_none() {
            item.sway = Some(SwayState::randomize(&self.config, &mut self.rng));
        }
        if def.is_animated() && item.anim.is_none() {
            item.anim = Some(AnimState::new());
        }

        let mut rotation = def.rotation;
        if def.sway {
            if let Some(sway) = &item.sway {
                rotation += sway.angle();
            }
        }
        if def.spin {
            rotation += item.spin_angle;
        }

        let anim_frame = item.anim.as_ref().map(|a| a.current_frame).unwrap_or(0);
        let background = item.layer == 0;

        let mut tiles = Vec::new();
        let mut max_z = f32::NEG_INFINITY;

        for (tile_index, (tx, ty)) in item.footprint().enumerate() {
            let tile_pos = Vec2::new(tx as f32 * tsf, ty as f32 * tsf);
            let tile_px = PxRect::from_pos_size(tile_pos, Vec2::splat(tsf));

            if tile_px.intersects(view_px) {
                if let Some(frame) = def.frame_at(anim_frame, tile_index) {
                    max_z = max_z.max(tile_z_index(def.depth_hint(tile_index), bottom_px));
                    tiles.push(TileDraw {
                        frame,
                        pos: tile_pos,
                    });
                    if background {
                        self.metrics.counters.background_tiles += 1;
                    } else {
                        self.metrics.counters.object_tiles += 1;
                    }
                } else {
                    tracing::debug!(
                        item = item.id.0,
                        tile = tile_index,
                        "no frame index for footprint tile"
                    );
                }
            }

            // Particle lifecycle: anchored per tile, visibility-gated only
            if let Some(link) = &def.effect {
                if let Some(anchor) = link.anchors.get(tile_index) {
                    if let Some(descriptor) = effects.get(&link.name) {
                        let pos = tile_pos + Vec2::new(anchor.x, anchor.y);
                        if view_px.contains_point(pos) {
                            let key = EmitterKey {
                                item: item.id,
                                tx,
                                ty,
                            };
                            self.emitters
                                .touch(key, descriptor, pos, self.frame, &mut self.rng);
                        }
                    }
                    // An unknown effect name never creates an emitter
                }
            }
        }

        // Light lifecycle: in-viewport and night-gated
        for light in &def.lights {
            let pos = origin + Vec2::new(light.offset_x, light.offset_y);
            if !pos.x.is_finite() || !pos.y.is_finite() || !light.radius.is_finite() {
                tracing::warn!(item = item.id.0, "skipping light with non-finite parameters");
                continue;
            }
            if night && view_px.intersects_circle(pos, light.radius) {
                self.lights.touch(
                    LightKey::at(item.id, pos),
                    light,
                    pos,
                    light_ceiling,
                    self.frame,
                    &mut self.rng,
                );
            }
        }

        // An item contributing zero visible tiles stays out of the queue
        if !tiles.is_empty() {
            item.z_index = max_z;
            self.queue.push(
                max_z,
                DrawCommand::Item {
                    id: item.id,
                    sheet: def.sheet.clone(),
                    rotation,
                    tiles,
                },
            );
        }
    }

    /// Explicit edge detection for the night ambience hooks. The first
    /// observation counts as an edge so a scene loaded at night starts its
    /// ambience.
    fn check_night_edge(&mut self, clock: &GameClock) {
        let night = clock.is_night();
        let fire = match self.was_night {
            None => night,
            Some(prev) => prev != night,
        };
        self.was_night = Some(night);

        if !fire {
            return;
        }
        if let Some(audio) = self.audio.as_mut() {
            if night {
                audio.night_started();
            } else {
                audio.night_ended();
            }
        }
    }
}

/// Item footprint bounding box in pixels
fn item_px_rect(item: &PlacedItem, tile_size: u32) -> Option<PxRect> {
    let (min_x, max_x, min_y, max_y) = item.bounds()?;
    let tsf = tile_size as f32;
    Some(PxRect::new(
        Vec2::new(min_x as f32 * tsf, min_y as f32 * tsf),
        Vec2::new((max_x + 1) as f32 * tsf, (max_y + 1) as f32 * tsf),
    ))
}
