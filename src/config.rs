use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::state::{MAX_SCROLL_SPEED, MIN_SCROLL_SPEED};

/// Startup defaults loaded from `Config.toml`.
///
/// The file seeds the initial combos, speed, and UI flags; changes made at
/// runtime are deliberately never written back.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub show_tray_icon: bool,
    pub show_notifications: bool,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_scroll_up_keys")]
    pub scroll_up_keys: Vec<String>,
    #[serde(default = "default_scroll_down_keys")]
    pub scroll_down_keys: Vec<String>,
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: u32,
}

fn default_true() -> bool {
    true
}
fn default_scroll_up_keys() -> Vec<String> {
    vec!["ScrollLock".to_string()]
}
fn default_scroll_down_keys() -> Vec<String> {
    vec!["Pause".to_string()]
}
fn default_scroll_speed() -> u32 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_tray_icon: true,
            show_notifications: true,
            dark_mode: true,
            scroll_up_keys: default_scroll_up_keys(),
            scroll_down_keys: default_scroll_down_keys(),
            scroll_speed: default_scroll_speed(),
        }
    }
}

impl AppConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;

        if !(MIN_SCROLL_SPEED..=MAX_SCROLL_SPEED).contains(&config.scroll_speed) {
            anyhow::bail!(
                "Invalid scroll_speed {}: must be between {} and {}",
                config.scroll_speed,
                MIN_SCROLL_SPEED,
                MAX_SCROLL_SPEED
            );
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        // Add comments to make the config file more readable
        let commented = format!(
            "show_tray_icon = {}        # Show system tray icon on startup\n\
             show_notifications = {}   # Enable/disable balloon notifications\n\
             dark_mode = {}             # Use dark theme (false = light theme, true = dark theme)\n\n\
             # Startup key combinations. Keys are named the way the GUI shows them:\n\
             # \"ScrollLock\", \"Pause\", \"CapsLock\", \"LCtrl\", \"F5\", \"A\", \"[\", ...\n\
             # Generic \"Ctrl\"/\"Shift\"/\"Alt\" match either side. An empty list\n\
             # disables that scroll direction.\n\
             scroll_up_keys = {:?}\n\
             scroll_down_keys = {:?}\n\n\
             # Wheel notches emitted per key repeat (1-10)\n\
             scroll_speed = {}\n",
            self.show_tray_icon,
            self.show_notifications,
            self.dark_mode,
            self.scroll_up_keys,
            self.scroll_down_keys,
            self.scroll_speed,
        );

        fs::write(path, commented)?;
        Ok(())
    }
}
