//! Ambient day/night transition
//!
//! Derives the screen overlay (opacity + color) and the dynamic-light
//! ceiling from the clock. All ramps are linear over the phase boundaries
//! defined in [`crate::core::clock`].

use crate::core::clock::{DayPhase, GameClock, DAWN_START, DUSK_START};
use crate::core::types::Rgb;

/// Overlay color during full night
pub const NIGHT_COLOR: Rgb = Rgb::new(0.04, 0.06, 0.18);

/// Overlay color daylight fades toward at the end of dawn
pub const DAY_COLOR: Rgb = Rgb::new(1.0, 0.96, 0.88);

/// Per-frame ambient levels derived from the clock
///
/// `light_ceiling` is a factor in `0.0..=1.0`; each dynamic light's
/// effective ceiling is its base intensity multiplied by this factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLevels {
    pub overlay_opacity: f32,
    pub overlay_color: Rgb,
    pub light_ceiling: f32,
}

impl AmbientLevels {
    pub fn from_clock(clock: &GameClock) -> Self {
        Self::from_decimal_hour(clock.decimal_hour())
    }

    /// Levels for a decimal hour in `[0, 24)`
    pub fn from_decimal_hour(t: f32) -> Self {
        match DayPhase::from_decimal_hour(t) {
            DayPhase::Daylight => Self {
                overlay_opacity: 0.0,
                overlay_color: DAY_COLOR,
                light_ceiling: 0.0,
            },
            DayPhase::Dusk => {
                // Three-hour ramp from 21:00 to 24:00
                let f = ((t - DUSK_START) / 3.0).clamp(0.0, 1.0);
                Self {
                    overlay_opacity: f,
                    overlay_color: NIGHT_COLOR,
                    light_ceiling: f,
                }
            }
            DayPhase::Midnight => Self {
                overlay_opacity: 1.0,
                overlay_color: NIGHT_COLOR,
                light_ceiling: 1.0,
            },
            DayPhase::Dawn => {
                // One-hour ramp from 06:00 to 07:00
                let f = (t - DAWN_START).clamp(0.0, 1.0);
                Self {
                    overlay_opacity: 1.0 - f,
                    overlay_color: NIGHT_COLOR.lerp(DAY_COLOR, f),
                    light_ceiling: 1.0 - f,
                }
            }
        }
    }
}
