//! Game clock for time-of-day tracking
//!
//! Provides the day/night predicate that gates dynamic lights and the
//! decimal-hour phases consumed by the ambient transition.

use serde::{Deserialize, Serialize};

/// Hour at which the night predicate turns on
pub const NIGHT_START_HOUR: u32 = 22;

/// Hour at which the night predicate turns off
pub const NIGHT_END_HOUR: u32 = 7;

/// Decimal hour at which the dusk ramp begins
pub const DUSK_START: f32 = 21.0;

/// Decimal hour at which the dawn ramp begins
pub const DAWN_START: f32 = 6.0;

/// Decimal hour at which the dawn ramp completes
pub const DAWN_END: f32 = 7.0;

/// Regions of the day, keyed by decimal hour
///
/// `Dusk` (21-24) and `Midnight` (0-6) together form one continuous night
/// across the hour wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    /// 07:00-21:00 - full daylight, no overlay
    Daylight,
    /// 21:00-24:00 - overlay and light ceiling ramp up
    Dusk,
    /// 00:00-06:00 - overlay and light ceiling at full strength
    Midnight,
    /// 06:00-07:00 - overlay and light ceiling ramp back down
    Dawn,
}

impl DayPhase {
    /// Get the phase for a decimal hour in `[0, 24)`
    pub fn from_decimal_hour(t: f32) -> Self {
        if t < DAWN_START {
            DayPhase::Midnight
        } else if t < DAWN_END {
            DayPhase::Dawn
        } else if t < DUSK_START {
            DayPhase::Daylight
        } else {
            DayPhase::Dusk
        }
    }
}

/// Time-of-day state with a speed multiplier
///
/// Advances monotonically; seconds carry into minutes, minutes into hours,
/// hours into days at fixed 60/60/24 boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    hours: u32,
    minutes: u32,
    seconds: f32,
    day: u32,
    speed: f32,
}

impl GameClock {
    /// Create a clock at 08:00 on day 0
    pub fn new() -> Self {
        Self::at(8, 0)
    }

    /// Create a clock at an arbitrary time of day
    pub fn at(hours: u32, minutes: u32) -> Self {
        Self {
            hours: hours % 24,
            minutes: minutes % 60,
            seconds: 0.0,
            day: 0,
            speed: 1.0,
        }
    }

    /// Advance by `delta_seconds` of game time, scaled by the speed multiplier
    pub fn advance(&mut self, delta_seconds: f32) {
        if delta_seconds <= 0.0 {
            return;
        }
        self.seconds += delta_seconds * self.speed;
        while self.seconds >= 60.0 {
            self.seconds -= 60.0;
            self.minutes += 1;
        }
        while self.minutes >= 60 {
            self.minutes -= 60;
            self.hours += 1;
        }
        while self.hours >= 24 {
            self.hours -= 24;
            self.day += 1;
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed multiplier (clamped to non-negative)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Time of day as a decimal hour in `[0, 24)`
    pub fn decimal_hour(&self) -> f32 {
        self.hours as f32 + self.minutes as f32 / 60.0
    }

    /// Night predicate gating dynamic lights: `hour >= 22 || hour < 7`
    pub fn is_night(&self) -> bool {
        self.hours >= NIGHT_START_HOUR || self.hours < NIGHT_END_HOUR
    }

    pub fn phase(&self) -> DayPhase {
        DayPhase::from_decimal_hour(self.decimal_hour())
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_carry_into_minutes() {
        let mut clock = GameClock::at(10, 0);
        clock.advance(58.0);
        assert_eq!(clock.minutes(), 0);
        assert!((clock.seconds() - 58.0).abs() < 1e-3);

        // 58 + 4 = 62 -> minute + 1, seconds = 2
        clock.advance(4.0);
        assert_eq!(clock.minutes(), 1);
        assert!((clock.seconds() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_hour_and_day_carry() {
        let mut clock = GameClock::at(23, 59);
        clock.advance(120.0);
        assert_eq!(clock.hours(), 0);
        assert_eq!(clock.minutes(), 1);
        assert_eq!(clock.day(), 1);
    }

    #[test]
    fn test_speed_multiplier() {
        let mut clock = GameClock::at(0, 0);
        clock.set_speed(10.0);
        clock.advance(6.0);
        assert_eq!(clock.minutes(), 1);
    }

    #[test]
    fn test_night_predicate_boundaries() {
        assert!(GameClock::at(22, 0).is_night());
        assert!(GameClock::at(23, 59).is_night());
        assert!(GameClock::at(0, 0).is_night());
        assert!(GameClock::at(6, 59).is_night());
        assert!(!GameClock::at(7, 0).is_night());
        assert!(!GameClock::at(21, 59).is_night());
    }

    #[test]
    fn test_day_phase_from_hour() {
        assert_eq!(DayPhase::from_decimal_hour(0.0), DayPhase::Midnight);
        assert_eq!(DayPhase::from_decimal_hour(5.99), DayPhase::Midnight);
        assert_eq!(DayPhase::from_decimal_hour(6.0), DayPhase::Dawn);
        assert_eq!(DayPhase::from_decimal_hour(6.5), DayPhase::Dawn);
        assert_eq!(DayPhase::from_decimal_hour(7.0), DayPhase::Daylight);
        assert_eq!(DayPhase::from_decimal_hour(20.99), DayPhase::Daylight);
        assert_eq!(DayPhase::from_decimal_hour(21.0), DayPhase::Dusk);
        assert_eq!(DayPhase::from_decimal_hour(23.99), DayPhase::Dusk);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = GameClock::at(12, 30);
        clock.advance(-10.0);
        assert_eq!(clock.hours(), 12);
        assert_eq!(clock.minutes(), 30);
        assert_eq!(clock.seconds(), 0.0);
    }
}
