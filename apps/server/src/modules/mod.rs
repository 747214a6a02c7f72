mod menu;
mod world;

pub use menu::{MenuLayout, PlayerMenuModule};
pub use world::WorldModule;
