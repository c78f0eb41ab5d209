//! Compositor metrics: visibility counters and frame timing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Read-only per-frame visibility counters for HUD/debug collaborators
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCounters {
    /// Visible tiles drawn from layer-0 items
    pub background_tiles: usize,
    /// Visible tiles drawn from items on any other layer
    pub object_tiles: usize,
    pub sprites: usize,
    pub lights: usize,
    pub emitters: usize,
}

impl FrameCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Tracks compose performance over time.
pub struct CompositorMetrics {
    frame_times: VecDeque<Duration>,
    last_frame_start: Instant,
    pub counters: FrameCounters,
}

impl Default for CompositorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositorMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            last_frame_start: Instant::now(),
            counters: FrameCounters::default(),
        }
    }

    /// Call at the start of each compose pass.
    pub fn begin_frame(&mut self) {
        self.last_frame_start = Instant::now();
    }

    /// Call at the end of each compose pass.
    pub fn end_frame(&mut self) {
        let elapsed = self.last_frame_start.elapsed();
        self.frame_times.push_back(elapsed);
        if self.frame_times.len() > 120 {
            self.frame_times.pop_front();
        }
    }

    /// Get average frame time in milliseconds (over last 120 frames).
    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.frame_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    /// Get current FPS (based on average frame time).
    pub fn fps(&self) -> f32 {
        let ms = self.avg_frame_time_ms();
        if ms > 0.0 {
            1000.0 / ms
        } else {
            0.0
        }
    }

    /// Get last frame time in milliseconds.
    pub fn last_frame_time_ms(&self) -> f32 {
        self.frame_times
            .back()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_counters_reset() {
        let mut counters = FrameCounters {
            background_tiles: 10,
            object_tiles: 4,
            sprites: 2,
            lights: 1,
            emitters: 1,
        };
        counters.reset();
        assert_eq!(counters.background_tiles, 0);
        assert_eq!(counters.emitters, 0);
    }

    #[test]
    fn test_frame_time_recording() {
        let mut metrics = CompositorMetrics::new();

        metrics.begin_frame();
        thread::sleep(Duration::from_millis(1));
        metrics.end_frame();

        assert!(metrics.last_frame_time_ms() >= 1.0);
        assert!(metrics.avg_frame_time_ms() >= 1.0);
        assert!(metrics.fps() > 0.0);
    }
}
