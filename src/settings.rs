//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen flash on a missed egg
    pub flash_effects: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Behavior ===
    /// Pause automatically when the tab is hidden or the window loses focus
    pub auto_pause_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (suppress flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flash_effects: true,
            show_fps: false,
            auto_pause_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective flash setting (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash_effects && !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "eggfall_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip_json() {
        let mut settings = Settings::default();
        settings.show_fps = true;
        settings.reduced_motion = true;
        let json = serde_json::to_string(&settings).unwrap();
        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert!(restored.show_fps);
        assert!(restored.reduced_motion);
        assert!(restored.flash_effects);
        assert!(restored.auto_pause_on_blur);
    }

    #[test]
    fn test_reduced_motion_suppresses_flash() {
        let mut settings = Settings::default();
        assert!(settings.effective_flash());
        settings.reduced_motion = true;
        assert!(!settings.effective_flash());
        settings.reduced_motion = false;
        settings.flash_effects = false;
        assert!(!settings.effective_flash());
    }
}
