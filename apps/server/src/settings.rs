//! Typed views of the lobby's configuration document.

use lobby::config::{AdapterRegistry, Configurable, SerdeAdapter};
use serde::Deserialize;
use std::fmt;

/// A location in the lobby world, read from an inline table such as
/// `{ x = 0.5, y = 65.0, z = 0.5, yaw = 180.0 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Position {
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Registers adapters for the lobby's own value types.
pub fn register_adapters(registry: &AdapterRegistry) {
    registry.register(SerdeAdapter::<Position>::new());
}

#[derive(Debug, Clone, PartialEq, Configurable)]
pub struct WorldSettings {
    #[value("world.name")]
    pub name: String,
    /// Fixed time of day, in ticks.
    #[value("world.time")]
    pub time: i64,
    #[value("world.max_players")]
    pub max_players: i32,
    #[value("world.spawn")]
    pub spawn: Position,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self { name: "lobby".to_owned(), time: 6000, max_players: 100, spawn: Position::default() }
    }
}

/// Layout and behavior of the server-selection menu.
#[derive(Debug, Clone, PartialEq, Configurable)]
pub struct MenuSettings {
    #[value("menu.npcPosition")]
    pub npc_position: Position,
    #[value("menu.cameraPosition")]
    pub camera_position: Position,
    #[value("menu.portalPosition")]
    pub portal_position: Position,
    /// Camera animation length, in ticks.
    #[value("menu.animationDuration")]
    pub animation_duration: i32,
    #[value("menu.npcDisplayName")]
    pub npc_display_name: bool,
    #[value("menu.npcSkin")]
    pub npc_skin: bool,
    #[value("menu.targetServer")]
    pub target_server: String,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            npc_position: Position::default(),
            camera_position: Position::default(),
            portal_position: Position::default(),
            animation_duration: 40,
            npc_display_name: true,
            npc_skin: true,
            target_server: "survival".to_owned(),
        }
    }
}
