//! Camera and viewport culling

use glam::Vec2;

use crate::core::types::TileRect;

/// Top-left anchored camera over the pixel world
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World pixel position of the viewport's top-left corner
    pub position: Vec2,
    /// Magnification factor; higher values show less of the world
    pub zoom: f32,
    /// Viewport dimensions in screen pixels
    pub viewport_size: Vec2,
}

impl Camera {
    /// Create a camera at the world origin
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport_size: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Pan camera by delta in world pixels
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Zoom camera by factor. factor > 1.0 zooms in.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(0.1, 100.0);
    }

    /// Update viewport size (call on window resize)
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Vec2::new(width, height);
    }

    /// World pixels covered by the viewport at the current zoom
    pub fn visible_px(&self) -> Vec2 {
        self.viewport_size / self.zoom
    }

    /// Compute the visible tile rectangle, clamped to the world bounds.
    ///
    /// Start indices are inclusive, end indices are exclusive ceiling
    /// bounds; both are clamped to `[0, world_size / tile_size]`. The frame
    /// loop calls this exactly once per displayed frame and every
    /// downstream step reuses the result.
    pub fn cull(&self, world_px: Vec2, tile_size: u32) -> TileRect {
        let ts = tile_size as f32;
        let tiles_w = (world_px.x / ts).ceil() as i32;
        let tiles_h = (world_px.y / ts).ceil() as i32;
        let visible = self.visible_px();

        TileRect::new(
            ((self.position.x / ts).floor() as i32).clamp(0, tiles_w),
            (((self.position.x + visible.x) / ts).ceil() as i32).clamp(0, tiles_w),
            ((self.position.y / ts).floor() as i32).clamp(0, tiles_h),
            (((self.position.y + visible.y) / ts).ceil() as i32).clamp(0, tiles_h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cull_at_origin_with_zoom() {
        // 1280x944 viewport at 4x zoom over a 1280x944 world of 16px tiles:
        // 320x236 visible pixels -> 20 x 14.75 tiles -> [0,20) x [0,15)
        let camera = Camera {
            position: Vec2::ZERO,
            zoom: 4.0,
            viewport_size: Vec2::new(1280.0, 944.0),
        };

        let view = camera.cull(Vec2::new(1280.0, 944.0), 16);
        assert_eq!(view, TileRect::new(0, 20, 0, 15));
    }

    #[test]
    fn test_cull_clamps_to_world() {
        let mut camera = Camera::new(640.0, 480.0);

        // Negative camera position clamps the start to zero
        camera.set_position(Vec2::new(-100.0, -50.0));
        let view = camera.cull(Vec2::new(160.0, 160.0), 16);
        assert_eq!(view.x_start, 0);
        assert_eq!(view.y_start, 0);
        // World is only 10 tiles wide
        assert_eq!(view.x_end, 10);
        assert_eq!(view.y_end, 10);

        // Camera past the right edge yields an empty rectangle
        camera.set_position(Vec2::new(1000.0, 0.0));
        let view = camera.cull(Vec2::new(160.0, 160.0), 16);
        assert!(view.is_empty());
    }

    #[test]
    fn test_cull_interior_window() {
        let camera = Camera {
            position: Vec2::new(40.0, 24.0),
            zoom: 1.0,
            viewport_size: Vec2::new(64.0, 64.0),
        };

        // x: 40..104 px -> tiles 2..7, y: 24..88 px -> tiles 1..6
        let view = camera.cull(Vec2::new(1600.0, 1600.0), 16);
        assert_eq!(view, TileRect::new(2, 7, 1, 6));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::new(640.0, 480.0);
        camera.zoom_by(0.0001);
        assert!(camera.zoom >= 0.1);
        camera.zoom_by(1e6);
        assert!(camera.zoom <= 100.0);
    }
}
