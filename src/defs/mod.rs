//! Tile definition data model
//!
//! Definitions are immutable templates loaded once from TOML data. The
//! polymorphic authoring fields (frame indices, depth hints) are modeled as
//! untagged enums; [`frames::expand`] normalizes the frame field so the
//! per-frame hot path never re-parses range strings.

pub mod effects;
pub mod frames;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::core::types::Rgb;

/// Frame-index field as authored: a literal index, an inclusive range
/// string ("2-5", or "5-2" for descending), or one level of nested arrays
/// where each inner array is one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameField {
    Index(u32),
    Range(String),
    List(Vec<FrameField>),
}

/// Depth hint: a single value for the whole footprint, or one value per
/// footprint tile. The per-tile form is authoritative when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthField {
    Uniform(i32),
    PerTile(Vec<i32>),
}

/// Rendering hint for a point light's falloff shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightShape {
    #[default]
    Radial,
    Cone,
}

/// Point-light descriptor attached to a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDef {
    /// Pixel offset from the item's top-left corner
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    pub radius: f32,
    pub color: Rgb,
    pub intensity: f32,
    /// Flicker frequency in radians per millisecond; 0 disables flicker
    #[serde(default)]
    pub flicker_speed: f32,
    /// Flicker amplitude added on top of the ceiling
    #[serde(default)]
    pub flicker_amount: f32,
    #[serde(default)]
    pub shape: LightShape,
}

/// Pixel anchor within a footprint tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Link from a definition to a named particle effect descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectLink {
    pub name: String,
    /// One anchor per footprint tile; tiles without an anchor emit nothing
    #[serde(default)]
    pub anchors: Vec<Anchor>,
}

fn default_frame_duration() -> f32 {
    150.0
}

fn default_walkable() -> bool {
    true
}

/// Immutable tile template, keyed by id in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Sprite sheet this definition draws from
    pub sheet: String,
    pub frames: FrameField,
    #[serde(default)]
    pub depth: Option<DepthField>,
    /// Milliseconds per animation frame
    #[serde(default = "default_frame_duration")]
    pub frame_duration_ms: f32,
    /// Consumed by the pathfinding collaborator; carried as data only
    #[serde(default = "default_walkable")]
    pub walkable: bool,
    #[serde(default)]
    pub lights: Vec<LightDef>,
    #[serde(default)]
    pub effect: Option<EffectLink>,
    /// Wind sway: amplitude/period randomized once per placed instance
    #[serde(default)]
    pub sway: bool,
    /// Base rotation in radians
    #[serde(default)]
    pub rotation: f32,
    /// Whether externally driven spin applies to instances
    #[serde(default)]
    pub spin: bool,
}

impl TileDefinition {
    /// Whether the (expanded) frame field carries per-animation-frame groups
    pub fn is_animated(&self) -> bool {
        match &self.frames {
            FrameField::List(entries) => {
                entries.iter().any(|e| matches!(e, FrameField::List(_)))
            }
            _ => false,
        }
    }

    /// Number of animation frames (1 for static definitions)
    pub fn animation_len(&self) -> usize {
        match &self.frames {
            FrameField::List(entries) if self.is_animated() => entries.len().max(1),
            _ => 1,
        }
    }

    /// Resolve the sheet frame for one footprint tile.
    ///
    /// Animated definitions index by `anim_frame` modulo the frame count,
    /// then by tile position within the group; static definitions index by
    /// tile position directly. Out-of-range positions resolve to `None` and
    /// the tile is skipped by the compositor.
    pub fn frame_at(&self, anim_frame: usize, tile_index: usize) -> Option<u32> {
        match &self.frames {
            FrameField::Index(n) => Some(*n),
            FrameField::Range(_) => None,
            FrameField::List(entries) => {
                if self.is_animated() {
                    let group = entries.get(anim_frame % entries.len())?;
                    match group {
                        FrameField::Index(n) => Some(*n),
                        FrameField::List(g) => match g.get(tile_index)? {
                            FrameField::Index(n) => Some(*n),
                            _ => None,
                        },
                        FrameField::Range(_) => None,
                    }
                } else {
                    match entries.get(tile_index)? {
                        FrameField::Index(n) => Some(*n),
                        _ => None,
                    }
                }
            }
        }
    }

    /// Depth hint for one footprint tile. The per-tile array wins over the
    /// scalar form; a too-short array reads as "absent" for the tail tiles.
    pub fn depth_hint(&self, tile_index: usize) -> Option<i32> {
        match &self.depth {
            None => None,
            Some(DepthField::Uniform(h)) => Some(*h),
            Some(DepthField::PerTile(hints)) => hints.get(tile_index).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_def(toml_src: &str) -> TileDefinition {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn test_definition_from_toml() {
        let def = parse_def(
            r#"
            sheet = "props"
            frames = 5
            walkable = false

            [[lights]]
            radius = 48.0
            color = { r = 1.0, g = 0.7, b = 0.3 }
            intensity = 0.9
            flicker_speed = 0.01
            flicker_amount = 0.2
            "#,
        );

        assert_eq!(def.sheet, "props");
        assert_eq!(def.frames, FrameField::Index(5));
        assert!(!def.walkable);
        assert_eq!(def.lights.len(), 1);
        assert_eq!(def.lights[0].shape, LightShape::Radial);
        assert!(!def.sway);
    }

    #[test]
    fn test_polymorphic_frame_field() {
        let ranged = parse_def("sheet = \"a\"\nframes = \"2-5\"");
        assert_eq!(ranged.frames, FrameField::Range("2-5".into()));

        let nested = parse_def("sheet = \"a\"\nframes = [[0, 1], [2, 3]]");
        assert!(nested.is_animated());
        assert_eq!(nested.animation_len(), 2);
    }

    #[test]
    fn test_frame_resolution_static() {
        let def = parse_def("sheet = \"a\"\nframes = [7, 8, 9]");
        assert!(!def.is_animated());
        assert_eq!(def.frame_at(0, 0), Some(7));
        assert_eq!(def.frame_at(5, 2), Some(9)); // anim frame ignored
        assert_eq!(def.frame_at(0, 3), None); // past the footprint
    }

    #[test]
    fn test_frame_resolution_animated_wraps() {
        let def = parse_def("sheet = \"a\"\nframes = [[0, 1], [2, 3]]");
        assert_eq!(def.frame_at(0, 1), Some(1));
        assert_eq!(def.frame_at(1, 0), Some(2));
        // currentFrame is taken modulo the frame count
        assert_eq!(def.frame_at(2, 0), Some(0));
        assert_eq!(def.frame_at(3, 1), Some(3));
    }

    #[test]
    fn test_per_tile_depth_wins_over_scalar() {
        let def = parse_def("sheet = \"a\"\nframes = [0, 1]\ndepth = [0, 1]");
        assert_eq!(def.depth_hint(0), Some(0));
        assert_eq!(def.depth_hint(1), Some(1));
        assert_eq!(def.depth_hint(2), None);

        let scalar = parse_def("sheet = \"a\"\nframes = 0\ndepth = -4");
        assert_eq!(scalar.depth_hint(0), Some(-4));
        assert_eq!(scalar.depth_hint(9), Some(-4));

        let absent = parse_def("sheet = \"a\"\nframes = 0");
        assert_eq!(absent.depth_hint(0), None);
    }
}
