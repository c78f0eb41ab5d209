//! Scene container and JSON scene loading
//!
//! A scene holds the placed items and sprites for one loaded map. Scene
//! files are JSON documents; placements referencing unknown definitions are
//! skipped with a diagnostic so one bad entry cannot block a map.

use glam::Vec2;
use serde::Deserialize;

use crate::core::error::Result;
use crate::core::types::{ItemId, LayerId};
use crate::defs::registry::DefinitionRegistry;
use crate::world::item::PlacedItem;
use crate::world::sprite::{Sprite, SpriteId};

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ItemPlacement {
    #[serde(default)]
    id: Option<String>,
    def: String,
    x: Vec<i32>,
    y: Vec<i32>,
    #[serde(default)]
    layer: LayerId,
    #[serde(default = "default_visible")]
    visible: bool,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    name: String,
    /// World dimensions in tiles
    width: u32,
    height: u32,
    items: Vec<ItemPlacement>,
}

/// One loaded map: placed items plus gameplay-owned sprites
pub struct Scene {
    pub name: String,
    width_tiles: u32,
    height_tiles: u32,
    items: Vec<PlacedItem>,
    sprites: Vec<Sprite>,
    next_item: u64,
}

impl Scene {
    /// Create an empty scene with the given tile dimensions
    pub fn new(width_tiles: u32, height_tiles: u32) -> Self {
        Self {
            name: String::new(),
            width_tiles,
            height_tiles,
            items: Vec::new(),
            sprites: Vec::new(),
            next_item: 1,
        }
    }

    /// Load a scene from a JSON document, validating definition references
    /// against the registry. Placements naming unknown definitions are
    /// skipped with a warning.
    pub fn from_json(json: &str, registry: &DefinitionRegistry) -> Result<Self> {
        let file: SceneFile = serde_json::from_str(json)?;
        let mut scene = Scene::new(file.width, file.height);
        scene.name = file.name;

        for placement in file.items {
            if registry.get(&placement.def).is_none() {
                tracing::warn!(
                    definition = %placement.def,
                    placement = placement.id.as_deref().unwrap_or("<unnamed>"),
                    "skipping placement with unknown definition"
                );
                continue;
            }

            let id = scene.add_item(placement.def, placement.x, placement.y, placement.layer);
            if !placement.visible {
                scene.set_visible(id, false);
            }
        }

        tracing::info!(
            scene = %scene.name,
            items = scene.items.len(),
            "scene loaded"
        );
        Ok(scene)
    }

    /// Add an item; returns its assigned id
    pub fn add_item(
        &mut self,
        def: impl Into<String>,
        xs: Vec<i32>,
        ys: Vec<i32>,
        layer: LayerId,
    ) -> ItemId {
        let id = ItemId(self.next_item);
        self.next_item += 1;
        self.items.push(PlacedItem::new(id, def, xs, ys, layer));
        id
    }

    /// Remove an item from the scene
    pub fn remove_item(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    pub fn item(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut PlacedItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn set_visible(&mut self, id: ItemId, visible: bool) {
        if let Some(item) = self.item_mut(id) {
            item.visible = visible;
        }
    }

    /// Items in placement order (the queue's insertion order)
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [PlacedItem] {
        &mut self.items
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        let id = sprite.id;
        self.sprites.push(sprite);
        id
    }

    pub fn remove_sprite(&mut self, id: SpriteId) {
        self.sprites.retain(|sprite| sprite.id != id);
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn width_tiles(&self) -> u32 {
        self.width_tiles
    }

    pub fn height_tiles(&self) -> u32 {
        self.height_tiles
    }

    /// World dimensions in pixels
    pub fn size_px(&self, tile_size: u32) -> Vec2 {
        Vec2::new(
            (self.width_tiles * tile_size) as f32,
            (self.height_tiles * tile_size) as f32,
        )
    }
}
