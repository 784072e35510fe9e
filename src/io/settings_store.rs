// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings load/save boundary.
//!
//! The store owns the live [`AppSettings`]. Edits go through
//! [`SettingsStore::update`] and stay in memory until [`SettingsStore::save`]
//! writes the whole record under [`SETTINGS_KEY`].

use super::storage::KeyValueStore;
use crate::error::StorageError;
use crate::models::settings::{AppSettings, SettingsPatch};

/// Storage key of the settings record.
pub const SETTINGS_KEY: &str = "spermAnalysisSettings";

pub struct SettingsStore<S: KeyValueStore> {
    storage: S,
    current: AppSettings,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Load settings from `storage`. A missing or unreadable record yields
    /// the defaults.
    pub fn load(storage: S) -> Self {
        let current = match storage.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings are unreadable, using defaults: {}", e);
                    AppSettings::default()
                }
            },
            Ok(None) => {
                log::info!("No stored settings, using defaults");
                AppSettings::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings, using defaults: {}", e);
                AppSettings::default()
            }
        };
        Self { storage, current }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.current
    }

    /// Merge `patch` into the live settings. Nothing is written.
    pub fn update(&mut self, patch: SettingsPatch) {
        if patch.is_empty() {
            return;
        }
        log::debug!("Updating settings: {:?}", patch);
        patch.apply(&mut self.current);
    }

    /// Write the full live record, replacing whatever was stored.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.current)?;
        self.storage.set(SETTINGS_KEY, json)?;
        log::info!("Saved settings");
        Ok(())
    }

    /// Restore the defaults as the live (and next saved) settings.
    pub fn reset(&mut self) -> &AppSettings {
        self.current = AppSettings::default();
        log::info!("Settings reset to defaults");
        &self.current
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStore;

    #[test]
    fn test_missing_key_uses_defaults() {
        let store = SettingsStore::load(MemoryStore::new());
        assert_eq!(store.settings(), &AppSettings::default());
    }

    #[test]
    fn test_garbled_record_uses_defaults() {
        let mut storage = MemoryStore::new();
        storage.set(SETTINGS_KEY, "{\"videoFps\": 30}".to_string()).unwrap();
        let store = SettingsStore::load(storage);
        assert_eq!(store.settings(), &AppSettings::default());
    }

    #[test]
    fn test_update_is_not_persisted_until_save() {
        let mut store = SettingsStore::load(MemoryStore::new());
        store.update(SettingsPatch {
            dark_mode: Some(true),
            video_fps: Some(45),
            ..Default::default()
        });

        assert!(store.settings().dark_mode);
        assert_eq!(store.storage().get(SETTINGS_KEY).unwrap(), None);

        store.save().unwrap();
        let stored = store.storage().get(SETTINGS_KEY).unwrap().unwrap();
        let parsed: AppSettings = serde_json::from_str(&stored).unwrap();
        assert_eq!(&parsed, store.settings());
    }

    #[test]
    fn test_save_then_load_round_trips_through_storage() {
        let mut store = SettingsStore::load(MemoryStore::new());
        store.update(SettingsPatch {
            language: Some("en".to_string()),
            ..Default::default()
        });
        store.save().unwrap();

        let SettingsStore { storage, .. } = store;
        let reloaded = SettingsStore::load(storage);
        assert_eq!(reloaded.settings().language, "en");
    }

    #[test]
    fn test_reset_yields_literal_defaults() {
        let mut store = SettingsStore::load(MemoryStore::new());
        store.update(SettingsPatch {
            auto_analysis: Some(false),
            save_results: Some(false),
            sound_notifications: Some(true),
            analysis_quality: Some(50),
            video_fps: Some(60),
            max_file_size_mb: Some(500),
            dark_mode: Some(true),
            language: Some("en".to_string()),
        });

        let reset = store.reset().clone();
        let json = serde_json::to_value(&reset).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "autoAnalysis": true,
                "saveResults": true,
                "soundNotifications": false,
                "analysisQuality": [85],
                "videoFps": [30],
                "maxFileSize": [100],
                "darkMode": false,
                "language": "ar"
            })
        );

        // The reset record is what the next save writes
        store.save().unwrap();
        let stored = store.storage().get(SETTINGS_KEY).unwrap().unwrap();
        assert_eq!(serde_json::from_str::<AppSettings>(&stored).unwrap(), reset);
    }
}
