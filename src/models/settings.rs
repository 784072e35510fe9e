// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User preferences.
//!
//! [`AppSettings`] is serialized in the same shape the stored record has
//! always had: camelCase keys, and slider values wrapped in one-element
//! arrays (`"analysisQuality": [85]`).

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const ANALYSIS_QUALITY_RANGE: RangeInclusive<u32> = 50..=100;
pub const ANALYSIS_QUALITY_STEP: u32 = 5;
pub const VIDEO_FPS_RANGE: RangeInclusive<u32> = 15..=60;
pub const VIDEO_FPS_STEP: u32 = 5;
pub const MAX_FILE_SIZE_RANGE: RangeInclusive<u32> = 10..=500;
pub const MAX_FILE_SIZE_STEP: u32 = 10;

/// Selectable interface languages (code, display name).
pub const LANGUAGES: [(&str, &str); 2] = [("ar", "Arabic"), ("en", "English")];

/// Persisted user-configurable preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub auto_analysis: bool,
    pub save_results: bool,
    pub sound_notifications: bool,
    #[serde(with = "slider")]
    pub analysis_quality: u32,
    #[serde(with = "slider")]
    pub video_fps: u32,
    #[serde(rename = "maxFileSize", with = "slider")]
    pub max_file_size_mb: u32,
    pub dark_mode: bool,
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_analysis: true,
            save_results: true,
            sound_notifications: false,
            analysis_quality: 85,
            video_fps: 30,
            max_file_size_mb: 100,
            dark_mode: false,
            language: "ar".to_string(),
        }
    }
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub auto_analysis: Option<bool>,
    pub save_results: Option<bool>,
    pub sound_notifications: Option<bool>,
    pub analysis_quality: Option<u32>,
    pub video_fps: Option<u32>,
    pub max_file_size_mb: Option<u32>,
    pub dark_mode: Option<bool>,
    pub language: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Merge this patch into `settings`.
    pub fn apply(self, settings: &mut AppSettings) {
        if let Some(v) = self.auto_analysis {
            settings.auto_analysis = v;
        }
        if let Some(v) = self.save_results {
            settings.save_results = v;
        }
        if let Some(v) = self.sound_notifications {
            settings.sound_notifications = v;
        }
        if let Some(v) = self.analysis_quality {
            settings.analysis_quality = v;
        }
        if let Some(v) = self.video_fps {
            settings.video_fps = v;
        }
        if let Some(v) = self.max_file_size_mb {
            settings.max_file_size_mb = v;
        }
        if let Some(v) = self.dark_mode {
            settings.dark_mode = v;
        }
        if let Some(v) = self.language {
            settings.language = v;
        }
    }
}

/// Slider values are stored as one-element arrays.
mod slider {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        [*value].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let values = Vec::<u32>::deserialize(deserializer)?;
        values
            .first()
            .copied()
            .ok_or_else(|| D::Error::custom("slider value array is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_record_shape() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
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
    }

    #[test]
    fn test_parse_stored_record() {
        let stored = r#"{"autoAnalysis":false,"saveResults":true,"soundNotifications":true,
            "analysisQuality":[70],"videoFps":[45],"maxFileSize":[250],"darkMode":true,"language":"en"}"#;
        let settings: AppSettings = serde_json::from_str(stored).unwrap();

        assert!(!settings.auto_analysis);
        assert!(settings.sound_notifications);
        assert_eq!(settings.analysis_quality, 70);
        assert_eq!(settings.video_fps, 45);
        assert_eq!(settings.max_file_size_mb, 250);
        assert!(settings.dark_mode);
        assert_eq!(settings.language, "en");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"darkMode":true}"#).unwrap();
        assert!(settings.dark_mode);
        assert_eq!(settings.video_fps, 30);
        assert_eq!(settings.language, "ar");
    }

    #[test]
    fn test_empty_slider_is_rejected() {
        let result = serde_json::from_str::<AppSettings>(r#"{"videoFps":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut settings = AppSettings::default();
        let patch = SettingsPatch {
            video_fps: Some(60),
            dark_mode: Some(true),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut settings);

        assert_eq!(settings.video_fps, 60);
        assert!(settings.dark_mode);
        assert_eq!(settings.analysis_quality, 85);
        assert!(settings.auto_analysis);
    }
}
