//! Particle effect descriptors
//!
//! Named templates for short-lived emitters. Definitions link to these by
//! name; the lookup is resolved against this registry once per emitter
//! creation, never by dispatching on strings in the update path.

use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Rgb;

/// Particle rendering shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    #[default]
    Circle,
    Square,
    Spark,
}

fn default_size() -> f32 {
    2.0
}

fn default_opacity() -> f32 {
    1.0
}

/// Template for one particle effect
///
/// Speeds and lifetimes are expressed in 16ms reference ticks, matching the
/// particle integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Particles spawned when an emitter is created
    pub count: u32,
    /// Base emission angle in radians
    #[serde(default)]
    pub angle: f32,
    /// Full spread arc in radians; each particle deviates up to half of it
    #[serde(default)]
    pub spread: f32,
    /// Base speed in pixels per reference tick; actual speed is drawn from
    /// half to full base
    pub speed: f32,
    /// Lifetime in reference ticks
    pub life: f32,
    /// Each particle picks one of these uniformly
    pub colors: Vec<Rgb>,
    #[serde(default)]
    pub shape: ParticleShape,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub blur: f32,
    #[serde(default)]
    pub glow: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Expired particles reset to the origin instead of despawning
    #[serde(default)]
    pub repeat: bool,
}

/// Registry of effect descriptors, keyed by name
pub struct EffectRegistry {
    effects: AHashMap<String, EffectDescriptor>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self {
            effects: AHashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: EffectDescriptor) {
        self.effects.insert(name.into(), descriptor);
    }

    /// Load a TOML document mapping names to descriptors
    pub fn load_toml_str(&mut self, content: &str) -> Result<usize> {
        let parsed: AHashMap<String, EffectDescriptor> = toml::from_str(content)?;
        let count = parsed.len();
        self.effects.extend(parsed);
        Ok(count)
    }

    /// Load a TOML effect file from disk
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.load_toml_str(&content)
    }

    pub fn get(&self, name: &str) -> Option<&EffectDescriptor> {
        self.effects.get(name)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_effects_from_toml() {
        let mut registry = EffectRegistry::new();
        let loaded = registry
            .load_toml_str(
                r#"
                [smoke]
                count = 8
                angle = 1.5708
                spread = 0.6
                speed = 0.4
                life = 90.0
                colors = [
                    { r = 0.6, g = 0.6, b = 0.6 },
                    { r = 0.4, g = 0.4, b = 0.4 },
                ]
                repeat = true

                [sparks]
                count = 12
                speed = 1.5
                life = 30.0
                colors = [{ r = 1.0, g = 0.8, b = 0.2 }]
                shape = "spark"
                "#,
            )
            .unwrap();

        assert_eq!(loaded, 2);

        let smoke = registry.get("smoke").unwrap();
        assert_eq!(smoke.count, 8);
        assert!(smoke.repeat);
        assert_eq!(smoke.colors.len(), 2);
        assert_eq!(smoke.shape, ParticleShape::Circle);
        assert_eq!(smoke.opacity, 1.0);

        let sparks = registry.get("sparks").unwrap();
        assert_eq!(sparks.shape, ParticleShape::Spark);
        assert!(!sparks.repeat);
    }

    #[test]
    fn test_unknown_effect_is_none() {
        let registry = EffectRegistry::new();
        assert!(registry.get("void").is_none());
    }
}
