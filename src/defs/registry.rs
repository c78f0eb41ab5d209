//! Definition registry for loading and caching tile definitions
//!
//! Loads TOML definition sets, runs frame-field expansion once per
//! definition, and serves the normalized copies to the compositor. A
//! definition whose frame data fails to expand is dropped with a warning;
//! the rest of the set still loads.

use std::path::Path;

use ahash::AHashMap;

use crate::core::error::Result;
use crate::defs::{frames, TileDefinition};

/// Registry of expanded tile definitions, keyed by id
pub struct DefinitionRegistry {
    defs: AHashMap<String, TileDefinition>,
}

impl DefinitionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            defs: AHashMap::new(),
        }
    }

    /// Register one definition under `id`, expanding its frame field.
    ///
    /// The stored copy is the normalized one; it is cached here for the
    /// definition's lifetime so frames are never re-parsed per frame.
    pub fn insert(&mut self, id: impl Into<String>, mut def: TileDefinition) -> Result<()> {
        def.frames = frames::expand(&def.frames)?;
        self.defs.insert(id.into(), def);
        Ok(())
    }

    /// Load a TOML document mapping ids to definitions.
    ///
    /// Returns the number of definitions loaded. Definitions with malformed
    /// frame data are skipped with a diagnostic rather than failing the
    /// whole set.
    pub fn load_toml_str(&mut self, content: &str) -> Result<usize> {
        let parsed: AHashMap<String, TileDefinition> = toml::from_str(content)?;
        let mut loaded = 0;
        for (id, def) in parsed {
            match self.insert(id.clone(), def) {
                Ok(()) => loaded += 1,
                Err(e) => {
                    tracing::warn!(definition = %id, error = %e, "skipping definition");
                }
            }
        }
        Ok(loaded)
    }

    /// Load a TOML definition file from disk
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        self.load_toml_str(&content)
    }

    /// Get an expanded definition by id
    pub fn get(&self, id: &str) -> Option<&TileDefinition> {
        self.defs.get(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Iterate over (id, definition) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TileDefinition)> {
        self.defs.iter()
    }
}

impl Default for DefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::FrameField;

    const SAMPLE: &str = r#"
        [grass]
        sheet = "terrain"
        frames = "0-3"

        [oak_tree]
        sheet = "foliage"
        frames = [[4, 5], [6, 7]]
        frame_duration_ms = 200.0
        sway = true

        [broken]
        sheet = "terrain"
        frames = "not-a-range"
    "#;

    #[test]
    fn test_load_expands_and_skips_malformed() {
        let mut registry = DefinitionRegistry::new();
        let loaded = registry.load_toml_str(SAMPLE).unwrap();

        // "broken" is dropped, the other two load
        assert_eq!(loaded, 2);
        assert!(registry.get("broken").is_none());

        let grass = registry.get("grass").unwrap();
        assert_eq!(
            grass.frames,
            FrameField::List(vec![
                FrameField::Index(0),
                FrameField::Index(1),
                FrameField::Index(2),
                FrameField::Index(3),
            ])
        );
    }

    #[test]
    fn test_cached_copy_is_normalized() {
        let mut registry = DefinitionRegistry::new();
        registry.load_toml_str(SAMPLE).unwrap();

        let tree = registry.get("oak_tree").unwrap();
        assert!(tree.is_animated());
        assert_eq!(tree.animation_len(), 2);
        // The stored field is already in normal form
        assert_eq!(frames::expand(&tree.frames).unwrap(), tree.frames);
    }

    #[test]
    fn test_missing_definition_is_none() {
        let registry = DefinitionRegistry::new();
        assert!(registry.get("nothing").is_none());
        assert!(registry.is_empty());
    }
}
