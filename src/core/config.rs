//! World configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other.

/// Configuration for the frame loop and compositor
///
/// These values have been tuned against the reference tile sheets.
/// Changing them affects pacing and visual feel.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    // === GRID ===
    /// Side length of a world tile in pixels
    ///
    /// Every world coordinate conversion (culling, footprint tests,
    /// light and emitter placement) goes through this constant.
    pub tile_size: u32,

    // === FRAME LOOP ===
    /// Duration of one fixed logic step in milliseconds
    ///
    /// The accumulator runs zero or more steps of this size per displayed
    /// frame, then exactly one compose pass. 16ms matches the reference
    /// frame used by particle velocity and lifetime scaling.
    pub step_ms: f32,

    /// Maximum logic steps per displayed frame
    ///
    /// Caps catch-up work after a long stall so a slow frame cannot
    /// trigger an ever-growing backlog of steps.
    pub max_steps_per_frame: u32,

    // === CLOCK ===
    /// Game-seconds advanced per real second at speed 1.0
    ///
    /// At the default (60.0), one real minute is one in-game hour.
    pub clock_scale: f32,

    // === SWAY ===
    /// Range for the per-instance sway amplitude, radians
    ///
    /// Each swaying instance draws an amplitude from this range once and
    /// keeps it for its lifetime.
    pub sway_amplitude_min: f32,
    pub sway_amplitude_max: f32,

    /// Range for the per-instance sway period, milliseconds
    pub sway_period_min_ms: f32,
    pub sway_period_max_ms: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,

            step_ms: 16.0,
            max_steps_per_frame: 5,

            clock_scale: 60.0,

            sway_amplitude_min: 0.02,
            sway_amplitude_max: 0.08,
            sway_period_min_ms: 2000.0,
            sway_period_max_ms: 5000.0,
        }
    }
}

impl WorldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be positive".into());
        }

        if self.step_ms <= 0.0 {
            return Err(format!("step_ms ({}) must be positive", self.step_ms));
        }

        if self.max_steps_per_frame == 0 {
            return Err("max_steps_per_frame must be at least 1".into());
        }

        if self.sway_amplitude_min > self.sway_amplitude_max {
            return Err(format!(
                "sway_amplitude_min ({}) should be <= sway_amplitude_max ({})",
                self.sway_amplitude_min, self.sway_amplitude_max
            ));
        }

        if self.sway_period_min_ms <= 0.0 || self.sway_period_min_ms > self.sway_period_max_ms {
            return Err(format!(
                "sway period range ({}..{}) is not a valid positive range",
                self.sway_period_min_ms, self.sway_period_max_ms
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_tile_size_rejected() {
        let config = WorldConfig {
            tile_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_sway_range_rejected() {
        let config = WorldConfig {
            sway_amplitude_min: 0.5,
            sway_amplitude_max: 0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
