use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use crate::interaction::InteractionPolicy;

/// Settings file, relative to the game directory.
pub const SETTINGS_PATH: &str = "config/forbiddenblocks.toml";

/// Global client settings. Shared by every world and server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Whether to echo blocks and toggles in chat.
    pub show_messages: bool,
    /// Keys for the client actions.
    pub bindings: KeyBindings,
    /// Targets that still accept a forbidden item.
    pub interaction: InteractionPolicy,
}

/// Key names bound to the client actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forbid: String,
    pub toggle_messages: String,
}

/// Actions that can be bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Forbid or allow the item in the main hand.
    Forbid,
    /// Show or hide chat feedback.
    ToggleMessages,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            show_messages: true,
            bindings: KeyBindings::default(),
            interaction: InteractionPolicy::default(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forbid: "key.keyboard.o".to_string(),
            toggle_messages: "key.keyboard.m".to_string(),
        }
    }
}

impl KeyBindings {
    /// Key bound to `action`.
    pub fn get(&self, action: KeyAction) -> &str {
        match action {
            KeyAction::Forbid => &self.forbid,
            KeyAction::ToggleMessages => &self.toggle_messages,
        }
    }

    fn set(&mut self, action: KeyAction, key: String) {
        match action {
            KeyAction::Forbid => self.forbid = key,
            KeyAction::ToggleMessages => self.toggle_messages = key,
        }
    }
}

impl ClientSettings {
    /// Load settings from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ClientSettings>(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ClientSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings not found at {}. Using defaults", path.display());
                ClientSettings::default()
            }
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                ClientSettings::default()
            }
        }
    }

    /// Save settings to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

/// Process-wide settings handle.
///
/// Every change is a read-modify-write followed by a save, done under one
/// lock so concurrent toggles cannot lose updates.
#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    current: Mutex<ClientSettings>,
}

impl Settings {
    /// Load settings stored at `<game_dir>/config/forbiddenblocks.toml`.
    pub fn load(game_dir: &Path) -> Self {
        Self::load_from_path(game_dir.join(SETTINGS_PATH))
    }

    /// Load settings stored at `path`.
    pub fn load_from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = ClientSettings::load_from_path(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Settings file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current settings.
    pub fn get(&self) -> ClientSettings {
        self.current.lock().clone()
    }

    /// Whether chat feedback is enabled.
    pub fn show_messages(&self) -> bool {
        self.current.lock().show_messages
    }

    /// Flip chat feedback and persist. Returns the new value.
    pub fn toggle_messages(&self) -> bool {
        let mut current = self.current.lock();
        current.show_messages = !current.show_messages;
        let show = current.show_messages;
        self.persist(&current);
        info!("Messages are now {}", if show { "enabled" } else { "disabled" });
        show
    }

    /// Key bound to `action`.
    pub fn binding(&self, action: KeyAction) -> String {
        self.current.lock().bindings.get(action).to_string()
    }

    /// Rebind `action` and persist.
    pub fn set_binding(&self, action: KeyAction, key: impl Into<String>) {
        let mut current = self.current.lock();
        let key = key.into();
        info!("Binding {action:?} to {key}");
        current.bindings.set(action, key);
        self.persist(&current);
    }

    /// Bypass rules for forbidden items.
    pub fn interaction_policy(&self) -> InteractionPolicy {
        self.current.lock().interaction.clone()
    }

    fn persist(&self, settings: &ClientSettings) {
        if let Err(err) = settings.save_to_path(&self.path) {
            error!("Failed to save settings to {}: {err:#}", self.path.display());
        }
    }
}
