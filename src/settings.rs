//! Player settings and preferences
//!
//! Persisted in LocalStorage, separately from tuning.

use serde::{Deserialize, Serialize};

use crate::leaderboard::Endpoint;
use crate::name::validate_player_name;
use crate::platform::storage;

/// Same-origin leaderboard API root
pub const DEFAULT_LEADERBOARD_ENDPOINT: &str = "/api/kv";
/// Key-value namespace the scores live under
pub const DEFAULT_LEADERBOARD_KEY: &str = "gang";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name used for leaderboard submissions, asked for once
    pub player_name: Option<String>,

    // === Leaderboard ===
    pub leaderboard_endpoint: String,
    pub leaderboard_key: String,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,
            leaderboard_endpoint: DEFAULT_LEADERBOARD_ENDPOINT.to_string(),
            leaderboard_key: DEFAULT_LEADERBOARD_KEY.to_string(),
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "fall_dodge_settings";

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.leaderboard_endpoint, &self.leaderboard_key)
    }

    /// Remember a validated name; invalid names are ignored
    pub fn remember_name(&mut self, name: &str) -> bool {
        if validate_player_name(name).is_err() {
            return false;
        }
        if self.player_name.as_deref() != Some(name) {
            self.player_name = Some(name.to_string());
        }
        true
    }

    /// Drop a stored name that no longer passes validation
    fn sanitize(mut self) -> Self {
        if let Some(name) = &self.player_name {
            if validate_player_name(name).is_err() {
                log::warn!("Discarding invalid stored player name {:?}", name);
                self.player_name = None;
            }
        }
        self
    }

    /// Load settings from LocalStorage, falling back to defaults
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings.sanitize()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.player_name, None);
        assert_eq!(settings.endpoint().scores_url(), "/api/kv/gang/scores");
    }

    #[test]
    fn test_remember_name_validates() {
        let mut settings = Settings::default();
        assert!(!settings.remember_name("No Spaces"));
        assert_eq!(settings.player_name, None);
        assert!(settings.remember_name("kim"));
        assert_eq!(settings.player_name.as_deref(), Some("kim"));
    }

    #[test]
    fn test_sanitize_drops_bad_name() {
        let settings: Settings =
            serde_json::from_str(r#"{ "player_name": "TOO LONG NAME!!" }"#).unwrap();
        let settings = settings.sanitize();
        assert_eq!(settings.player_name, None);
        assert_eq!(settings.leaderboard_key, DEFAULT_LEADERBOARD_KEY);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_load_is_default() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
