use crate::settings::WorldSettings;
use lobby::modules::{Module, ModuleError, ModuleId};
use tracing::info;

const DAY_LENGTH: i64 = 24_000;

/// The lobby world every other module builds on.
#[derive(Debug)]
pub struct WorldModule {
    settings: WorldSettings,
    loaded: bool,
}

impl WorldModule {
    pub const ID: ModuleId = ModuleId::new("world");

    #[must_use]
    pub const fn new(settings: WorldSettings) -> Self {
        Self { settings, loaded: false }
    }

    #[must_use]
    pub const fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    fn validate(&self) -> Result<(), ModuleError> {
        if self.settings.name.trim().is_empty() {
            return Err("world.name must not be empty".into());
        }
        if self.settings.max_players <= 0 {
            let players = self.settings.max_players;
            return Err(format!("world.max_players must be positive, got {players}").into());
        }
        Ok(())
    }
}

impl Module for WorldModule {
    fn id(&self) -> ModuleId {
        Self::ID
    }

    fn enable(&mut self) -> Result<(), ModuleError> {
        self.validate()?;
        self.loaded = true;
        info!(
            world = %self.settings.name,
            spawn = %self.settings.spawn,
            time = self.settings.time.rem_euclid(DAY_LENGTH),
            max_players = self.settings.max_players,
            "World loaded"
        );
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ModuleError> {
        self.loaded = false;
        info!(world = %self.settings.name, "World unloaded");
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ModuleError> {
        self.validate()
    }

    fn is_ready(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unnamed_worlds() {
        let mut world =
            WorldModule::new(WorldSettings { name: " ".to_owned(), ..WorldSettings::default() });
        assert!(world.enable().is_err());
        assert!(!world.is_ready());
    }

    #[test]
    fn enabling_loads_the_world() {
        let mut world = WorldModule::new(WorldSettings::default());
        world.enable().unwrap();
        assert!(world.is_ready());
        world.disable().unwrap();
        assert!(!world.is_ready());
    }
}
