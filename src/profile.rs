//! Player names and theme
//!
//! Persisted per browser in LocalStorage as one JSON document. Older pages
//! stored the two names under separate `name1`/`name2` keys; those are read
//! when no profile document exists yet.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::match_state::{DEFAULT_PLAYER1, DEFAULT_PLAYER2, MatchConfig, PlayerSlot};

/// Longest accepted display name, in characters
pub const NAME_MAX_CHARS: usize = 20;

const LEGACY_NAME_KEYS: [&str; 2] = ["name1", "name2"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Имя не может быть пустым")]
    Empty,
    #[error("Имя длиннее {} символов", NAME_MAX_CHARS)]
    TooLong,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Rejected(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Page color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Key-value string storage
pub trait NameStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl NameStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn open() -> Result<Self, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl NameStore for LocalStorageStore {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{e:?}")))
    }
}

/// Check and trim a display name
pub fn validate_name(name: &str) -> Result<String, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(NameError::TooLong);
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub player1: String,
    pub player2: String,
    pub theme: Theme,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            player1: DEFAULT_PLAYER1.to_string(),
            player2: DEFAULT_PLAYER2.to_string(),
            theme: Theme::default(),
        }
    }
}

impl PlayerProfile {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "duo_arcade_profile";

    pub fn name(&self, slot: PlayerSlot) -> &str {
        match slot {
            PlayerSlot::One => &self.player1,
            PlayerSlot::Two => &self.player2,
        }
    }

    /// Rename a player; invalid names leave the profile unchanged
    pub fn set_name(&mut self, slot: PlayerSlot, name: &str) -> Result<(), NameError> {
        let name = validate_name(name)?;
        match slot {
            PlayerSlot::One => self.player1 = name,
            PlayerSlot::Two => self.player2 = name,
        }
        Ok(())
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig::new(self.player1.clone(), self.player2.clone())
    }

    /// Load from storage; anything missing or malformed falls back to defaults
    pub fn load(store: &dyn NameStore) -> Self {
        if let Some(json) = store.read(Self::STORAGE_KEY) {
            match serde_json::from_str::<Self>(&json) {
                Ok(mut profile) => {
                    profile.sanitize();
                    return profile;
                }
                Err(e) => log::warn!("Ignoring malformed profile: {e}"),
            }
        }

        let mut profile = Self::default();
        for (slot, key) in PlayerSlot::BOTH.into_iter().zip(LEGACY_NAME_KEYS) {
            if let Some(name) = store.read(key) {
                let _ = profile.set_name(slot, &name);
            }
        }
        profile
    }

    pub fn save(&self, store: &mut dyn NameStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.write(Self::STORAGE_KEY, &json)?;
        log::debug!("Profile saved");
        Ok(())
    }

    fn sanitize(&mut self) {
        let defaults = Self::default();
        if validate_name(&self.player1).is_err() {
            self.player1 = defaults.player1;
        }
        if validate_name(&self.player2).is_err() {
            self.player2 = defaults.player2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_uses_placeholder_names() {
        let profile = PlayerProfile::load(&MemoryStore::default());
        assert_eq!(profile.player1, "Красный");
        assert_eq!(profile.player2, "Синий");
        assert_eq!(profile.theme, Theme::Dark);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::default();
        let mut profile = PlayerProfile::default();
        profile.set_name(PlayerSlot::One, "  Аня ").unwrap();
        profile.theme = Theme::Light;
        profile.save(&mut store).unwrap();

        let loaded = PlayerProfile::load(&store);
        assert_eq!(loaded.name(PlayerSlot::One), "Аня");
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.match_config().player1, "Аня");
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut profile = PlayerProfile::default();
        assert_eq!(profile.set_name(PlayerSlot::Two, "   "), Err(NameError::Empty));
        let long = "я".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(profile.set_name(PlayerSlot::Two, &long), Err(NameError::TooLong));
        assert_eq!(profile.player2, "Синий");
    }

    #[test]
    fn test_legacy_keys_and_bad_json() {
        let mut store = MemoryStore::default();
        store.write("name1", "Петя").unwrap();
        store.write(PlayerProfile::STORAGE_KEY, "{not json").unwrap();
        let profile = PlayerProfile::load(&store);
        assert_eq!(profile.player1, "Петя");
        assert_eq!(profile.player2, "Синий");
    }

    #[test]
    fn test_blank_stored_name_replaced() {
        let mut store = MemoryStore::default();
        store
            .write(PlayerProfile::STORAGE_KEY, r#"{"player1":"","theme":"Light"}"#)
            .unwrap();
        let profile = PlayerProfile::load(&store);
        assert_eq!(profile.player1, "Красный");
        assert_eq!(profile.theme, Theme::Light);
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!(Theme::parse("LIGHT"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
