//! Fixed-timestep frame loop
//!
//! Decouples simulation rate from display rate: each displayed frame runs
//! zero or more fixed logic steps, then exactly one compose pass using the
//! latest state. The culled viewport is computed once at the start of the
//! frame and reused by every step and by the compose pass.

use crate::compositor::queue::DrawTarget;
use crate::compositor::{Camera, SceneCompositor};
use crate::core::clock::GameClock;
use crate::core::config::WorldConfig;
use crate::core::error::{Result, SceneError};
use crate::core::types::TileRect;
use crate::defs::effects::EffectRegistry;
use crate::defs::registry::DefinitionRegistry;
use crate::world::scene::Scene;

/// Drives the compositor from the host's per-frame callback
pub struct FrameLoop {
    pub camera: Camera,
    pub clock: GameClock,
    compositor: SceneCompositor,
    accumulator_ms: f32,
}

impl FrameLoop {
    /// Create a loop with a fresh compositor, validating the config
    pub fn new(config: WorldConfig, camera: Camera) -> Result<Self> {
        config.validate().map_err(SceneError::InvalidConfig)?;
        Ok(Self {
            camera,
            clock: GameClock::new(),
            compositor: SceneCompositor::new(config),
            accumulator_ms: 0.0,
        })
    }

    /// Create a loop around an existing compositor and clock
    pub fn with_compositor(compositor: SceneCompositor, camera: Camera, clock: GameClock) -> Self {
        Self {
            camera,
            clock,
            compositor,
            accumulator_ms: 0.0,
        }
    }

    pub fn compositor(&self) -> &SceneCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut SceneCompositor {
        &mut self.compositor
    }

    /// Run one displayed frame: cull once, catch up fixed steps, compose.
    ///
    /// Returns the culled tile rectangle used throughout the frame.
    pub fn frame(
        &mut self,
        scene: &mut Scene,
        registry: &DefinitionRegistry,
        effects: &EffectRegistry,
        dt_ms: f32,
        target: &mut dyn DrawTarget,
    ) -> TileRect {
        let tile_size = self.compositor.config().tile_size;
        let view = self.camera.cull(scene.size_px(tile_size), tile_size);

        let step_ms = self.compositor.config().step_ms;
        let max_steps = self.compositor.config().max_steps_per_frame;

        self.accumulator_ms += dt_ms.max(0.0);
        let mut steps = 0;
        while self.accumulator_ms >= step_ms && steps < max_steps {
            self.compositor
                .step(scene, registry, &mut self.clock, &view, step_ms);
            self.accumulator_ms -= step_ms;
            steps += 1;
        }
        // After a long stall, drop the backlog instead of spiraling
        if self.accumulator_ms > step_ms {
            self.accumulator_ms = step_ms;
        }

        self.compositor
            .compose(scene, registry, effects, &self.clock, &view, target);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::RecordingTarget;

    fn setup() -> (FrameLoop, Scene, DefinitionRegistry, EffectRegistry) {
        let mut registry = DefinitionRegistry::new();
        registry
            .load_toml_str("[grass]\nsheet = \"terrain\"\nframes = 0")
            .unwrap();

        let mut scene = Scene::new(20, 20);
        scene.add_item("grass", vec![0], vec![0], 0);

        let config = WorldConfig {
            clock_scale: 1.0,
            ..Default::default()
        };
        let compositor = SceneCompositor::with_seed(config, 7);
        let frame_loop =
            FrameLoop::with_compositor(compositor, Camera::new(320.0, 240.0), GameClock::at(12, 0));
        (frame_loop, scene, registry, EffectRegistry::new())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WorldConfig {
            tile_size: 0,
            ..Default::default()
        };
        assert!(FrameLoop::new(config, Camera::new(320.0, 240.0)).is_err());
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let (mut frame_loop, mut scene, registry, effects) = setup();
        let mut target = RecordingTarget::new();

        // 40ms buys two 16ms steps, 8ms stays in the accumulator
        frame_loop.frame(&mut scene, &registry, &effects, 40.0, &mut target);
        assert!((frame_loop.clock.seconds() - 0.032).abs() < 1e-4);
        assert!((frame_loop.accumulator_ms - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_compose_runs_even_with_zero_steps() {
        let (mut frame_loop, mut scene, registry, effects) = setup();
        let mut target = RecordingTarget::new();

        frame_loop.frame(&mut scene, &registry, &effects, 4.0, &mut target);
        assert_eq!(frame_loop.compositor().frame(), 1);
        assert_eq!(target.commands.len(), 1);
        // No step ran, so the clock did not move
        assert_eq!(frame_loop.clock.seconds(), 0.0);
    }

    #[test]
    fn test_step_cap_bounds_catchup() {
        let (mut frame_loop, mut scene, registry, effects) = setup();
        let mut target = RecordingTarget::new();

        // A two-second stall: only max_steps_per_frame steps run and the
        // backlog is dropped to at most one step
        frame_loop.frame(&mut scene, &registry, &effects, 2000.0, &mut target);
        let max_ms = frame_loop.compositor().config().max_steps_per_frame as f32 * 16.0;
        assert!(frame_loop.clock.seconds() * 1000.0 <= max_ms + 1e-3);
        assert!(frame_loop.accumulator_ms <= 16.0 + 1e-3);
    }
}
