//! Particle emitter lifecycle
//!
//! Emitters are ephemeral and purely visibility-gated: created with a full
//! burst of particles when their anchor enters the viewport, destroyed
//! wholesale the moment it leaves. Identity is the owning item plus the
//! anchor's tile coordinate.

use ahash::AHashMap;
use glam::Vec2;
use rand::Rng;

use crate::core::types::{FrameNumber, ItemId, Rgb};
use crate::defs::effects::{EffectDescriptor, ParticleShape};

/// Reference frame for particle integration: velocities and lifetimes are
/// authored in 16ms ticks.
pub const REFERENCE_FRAME_MS: f32 = 16.0;

/// Fraction of remaining life over which particles fade out
const FADE_PORTION: f32 = 0.2;

/// Derived emitter identity: owning item + anchor tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmitterKey {
    pub item: ItemId,
    pub tx: i32,
    pub ty: i32,
}

/// A single live particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in reference ticks
    pub life: f32,
    pub max_life: f32,
    pub color: Rgb,
    pub opacity: f32,
}

/// Snapshot handed to the draw target
#[derive(Debug, Clone, Copy)]
pub struct ParticleRender {
    pub pos: Vec2,
    pub color: Rgb,
    pub opacity: f32,
    pub size: f32,
    pub shape: ParticleShape,
    pub blur: f32,
    pub glow: f32,
}

/// A live emitter and its particles
pub struct ParticleEmitter {
    pub origin: Vec2,
    pub repeat: bool,
    pub shape: ParticleShape,
    pub size: f32,
    pub blur: f32,
    pub glow: f32,
    base_opacity: f32,
    particles: Vec<Particle>,
    last_seen: FrameNumber,
}

impl ParticleEmitter {
    /// Spawn the configured burst at `origin`.
    fn spawn<R: Rng>(descriptor: &EffectDescriptor, origin: Vec2, frame: FrameNumber, rng: &mut R) -> Self {
        let half_spread = descriptor.spread / 2.0;
        let mut particles = Vec::with_capacity(descriptor.count as usize);

        for _ in 0..descriptor.count {
            let angle = if half_spread > 0.0 {
                descriptor.angle + rng.gen_range(-half_spread..=half_spread)
            } else {
                descriptor.angle
            };
            let speed = if descriptor.speed > 0.0 {
                rng.gen_range(descriptor.speed * 0.5..=descriptor.speed)
            } else {
                0.0
            };
            let color = if descriptor.colors.is_empty() {
                Rgb::WHITE
            } else {
                descriptor.colors[rng.gen_range(0..descriptor.colors.len())]
            };

            particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: descriptor.life,
                max_life: descriptor.life,
                color,
                opacity: descriptor.opacity,
            });
        }

        Self {
            origin,
            repeat: descriptor.repeat,
            shape: descriptor.shape,
            size: descriptor.size,
            blur: descriptor.blur,
            glow: descriptor.glow,
            base_opacity: descriptor.opacity,
            particles,
            last_seen: frame,
        }
    }

    /// Advance every particle by `dt_ms` of simulation time.
    fn update(&mut self, dt_ms: f32) {
        let ticks = dt_ms / REFERENCE_FRAME_MS;
        let repeat = self.repeat;
        let origin = self.origin;
        let base_opacity = self.base_opacity;

        self.particles.retain_mut(|p| {
            p.pos += p.vel * ticks;
            p.life -= ticks;

            if p.life <= 0.0 {
                if repeat {
                    p.pos = origin;
                    p.life = p.max_life;
                    p.opacity = base_opacity;
                    return true;
                }
                return false;
            }

            let ratio = if p.max_life > 0.0 {
                p.life / p.max_life
            } else {
                0.0
            };
            p.opacity = if ratio >= FADE_PORTION {
                base_opacity
            } else {
                base_opacity * (ratio / FADE_PORTION)
            };
            true
        });
    }

    /// A non-repeating emitter with nothing left to show
    fn is_spent(&self) -> bool {
        !self.repeat && self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Arena of live emitters keyed by derived identity
pub struct EmitterArena {
    emitters: AHashMap<EmitterKey, ParticleEmitter>,
}

impl EmitterArena {
    pub fn new() -> Self {
        Self {
            emitters: AHashMap::new(),
        }
    }

    /// Upsert for one frame: a missing emitter spawns its burst, an
    /// existing one is only marked as seen.
    pub fn touch<R: Rng>(
        &mut self,
        key: EmitterKey,
        descriptor: &EffectDescriptor,
        origin: Vec2,
        frame: FrameNumber,
        rng: &mut R,
    ) {
        if let Some(emitter) = self.emitters.get_mut(&key) {
            emitter.last_seen = frame;
            return;
        }
        self.emitters
            .insert(key, ParticleEmitter::spawn(descriptor, origin, frame, rng));
    }

    /// Simulation tick for all live particles
    pub fn update(&mut self, dt_ms: f32) {
        for emitter in self.emitters.values_mut() {
            emitter.update(dt_ms);
        }
    }

    /// Hard cut: emitters not seen this frame are destroyed immediately,
    /// along with spent non-repeating ones.
    pub fn sweep(&mut self, frame: FrameNumber) {
        self.emitters
            .retain(|_, emitter| emitter.last_seen == frame && !emitter.is_spent());
    }

    /// Bulk invalidation on scene change
    pub fn clear(&mut self) {
        self.emitters.clear();
    }

    pub fn contains(&self, key: &EmitterKey) -> bool {
        self.emitters.contains_key(key)
    }

    pub fn get(&self, key: &EmitterKey) -> Option<&ParticleEmitter> {
        self.emitters.get(key)
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Total live particles across all emitters
    pub fn particle_count(&self) -> usize {
        self.emitters.values().map(|e| e.particles.len()).sum()
    }

    /// Snapshot for the draw target
    pub fn render_list(&self) -> Vec<ParticleRender> {
        let mut out = Vec::with_capacity(self.particle_count());
        for emitter in self.emitters.values() {
            for p in &emitter.particles {
                out.push(ParticleRender {
                    pos: p.pos,
                    color: p.color,
                    opacity: p.opacity,
                    size: emitter.size,
                    shape: emitter.shape,
                    blur: emitter.blur,
                    glow: emitter.glow,
                });
            }
        }
        out
    }
}

impl Default for EmitterArena {
    fn default() -> Self {
        Self::new()
    }
}
