use super::WorldModule;
use crate::settings::MenuSettings;
use lobby::modules::{Module, ModuleError, ModuleId};
use tracing::{debug, info};

/// Values derived from [`MenuSettings`] when the menu is enabled or reloaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    /// Camera travel per animation tick.
    pub camera_step: f64,
    pub portal_distance: f64,
}

impl MenuLayout {
    fn compute(settings: &MenuSettings) -> Result<Self, ModuleError> {
        if settings.animation_duration <= 0 {
            return Err(format!(
                "menu.animationDuration must be positive, got {}",
                settings.animation_duration
            )
            .into());
        }
        if settings.target_server.trim().is_empty() {
            return Err("menu.targetServer must not be empty".into());
        }

        let travel = settings.camera_position.distance(&settings.npc_position);
        Ok(Self {
            camera_step: travel / f64::from(settings.animation_duration),
            portal_distance: settings.npc_position.distance(&settings.portal_position),
        })
    }
}

/// Server-selection menu: an NPC, a camera animation and a portal to the target server.
#[derive(Debug)]
pub struct PlayerMenuModule {
    settings: MenuSettings,
    layout: Option<MenuLayout>,
}

impl PlayerMenuModule {
    pub const ID: ModuleId = ModuleId::new("player-menu");

    #[must_use]
    pub const fn new(settings: MenuSettings) -> Self {
        Self { settings, layout: None }
    }

    #[must_use]
    pub const fn layout(&self) -> Option<&MenuLayout> {
        self.layout.as_ref()
    }
}

impl Module for PlayerMenuModule {
    fn id(&self) -> ModuleId {
        Self::ID
    }

    fn dependencies(&self) -> Vec<ModuleId> {
        vec![WorldModule::ID]
    }

    fn enable(&mut self) -> Result<(), ModuleError> {
        let layout = MenuLayout::compute(&self.settings)?;
        self.layout = Some(layout);
        info!(
            npc = %self.settings.npc_position,
            portal = %self.settings.portal_position,
            target = %self.settings.target_server,
            "Player menu ready"
        );
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ModuleError> {
        self.layout = None;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), ModuleError> {
        let layout = MenuLayout::compute(&self.settings)?;
        debug!(?layout, "Player menu layout recomputed");
        self.layout = Some(layout);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.layout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Position;

    #[test]
    fn depends_on_the_world() {
        let menu = PlayerMenuModule::new(MenuSettings::default());
        assert_eq!(menu.dependencies(), [WorldModule::ID]);
    }

    #[test]
    fn layout_follows_the_settings() {
        let settings = MenuSettings {
            npc_position: Position { x: 4.0, ..Position::default() },
            camera_position: Position { x: 4.0, z: 20.0, ..Position::default() },
            portal_position: Position { x: 7.0, y: 4.0, ..Position::default() },
            animation_duration: 40,
            ..MenuSettings::default()
        };
        let mut menu = PlayerMenuModule::new(settings);
        menu.enable().unwrap();

        let layout = menu.layout().copied().unwrap();
        assert!((layout.camera_step - 0.5).abs() < 1e-9);
        assert!((layout.portal_distance - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut menu = PlayerMenuModule::new(MenuSettings {
            animation_duration: 0,
            ..MenuSettings::default()
        });
        assert!(menu.enable().is_err());
        assert!(!menu.is_ready());
    }
}
