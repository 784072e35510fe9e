// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings screen.
//!
//! Widgets edit a copy of the live settings; the changed fields come back
//! as a [`SettingsPatch`] for the app to merge.

use crate::models::settings::{
    AppSettings, SettingsPatch, ANALYSIS_QUALITY_RANGE, ANALYSIS_QUALITY_STEP, LANGUAGES,
    MAX_FILE_SIZE_RANGE, MAX_FILE_SIZE_STEP, VIDEO_FPS_RANGE, VIDEO_FPS_STEP,
};

/// Action requested from the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    Update(SettingsPatch),
    Save,
    Reset,
}

/// Fields of `edited` that differ from `current`.
pub fn diff(current: &AppSettings, edited: &AppSettings) -> SettingsPatch {
    fn changed<T: PartialEq + Clone>(current: &T, edited: &T) -> Option<T> {
        (current != edited).then(|| edited.clone())
    }
    SettingsPatch {
        auto_analysis: changed(&current.auto_analysis, &edited.auto_analysis),
        save_results: changed(&current.save_results, &edited.save_results),
        sound_notifications: changed(&current.sound_notifications, &edited.sound_notifications),
        analysis_quality: changed(&current.analysis_quality, &edited.analysis_quality),
        video_fps: changed(&current.video_fps, &edited.video_fps),
        max_file_size_mb: changed(&current.max_file_size_mb, &edited.max_file_size_mb),
        dark_mode: changed(&current.dark_mode, &edited.dark_mode),
        language: changed(&current.language, &edited.language),
    }
}

/// Display the settings screen.
pub fn show(ui: &mut egui::Ui, settings: &AppSettings) -> SettingsAction {
    let mut draft = settings.clone();
    let mut action = SettingsAction::None;

    ui.heading("⚙ Settings");
    ui.label(egui::RichText::new("Customize the application and analysis").weak());
    ui.separator();

    section(ui, "🧠 Analysis", "AI analysis and processing options", |ui| {
        toggle_row(
            ui,
            &mut draft.auto_analysis,
            "Automatic analysis",
            "Start the analysis as soon as a file is selected",
        );
        ui.add_space(6.0);
        ui.strong("Analysis quality");
        ui.add(
            egui::Slider::new(&mut draft.analysis_quality, ANALYSIS_QUALITY_RANGE)
                .step_by(ANALYSIS_QUALITY_STEP as f64)
                .suffix("%"),
        );
        ui.label(
            egui::RichText::new("Higher quality gives more accurate results but takes longer")
                .small()
                .weak(),
        );
        ui.add_space(6.0);
        ui.strong("Video frame rate");
        ui.add(
            egui::Slider::new(&mut draft.video_fps, VIDEO_FPS_RANGE)
                .step_by(VIDEO_FPS_STEP as f64)
                .suffix(" fps"),
        );
        ui.add_space(6.0);
        ui.strong("Maximum file size");
        ui.add(
            egui::Slider::new(&mut draft.max_file_size_mb, MAX_FILE_SIZE_RANGE)
                .step_by(MAX_FILE_SIZE_STEP as f64)
                .suffix(" MB"),
        );
    });

    section(ui, "🖥 Application", "General application preferences", |ui| {
        toggle_row(
            ui,
            &mut draft.save_results,
            "Save results automatically",
            "Keep this session's results on the analytics screen",
        );
        toggle_row(
            ui,
            &mut draft.sound_notifications,
            "Sound notifications",
            "Play a sound when an analysis completes",
        );
        toggle_row(ui, &mut draft.dark_mode, "Dark mode", "Use the dark theme");
        ui.horizontal(|ui| {
            ui.strong("Language");
            let selected = LANGUAGES
                .iter()
                .find(|(code, _)| *code == draft.language)
                .map(|(_, name)| *name)
                .unwrap_or("Unknown");
            egui::ComboBox::from_id_source("language")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (code, name) in LANGUAGES {
                        ui.selectable_value(&mut draft.language, code.to_string(), name);
                    }
                });
        });
    });

    section(ui, "ℹ Important information", "", |ui| {
        for line in [
            "Results are for research purposes only",
            "Always consult a specialist physician",
            "Data is stored locally on your device",
            "Analysis accuracy depends on sample quality",
        ] {
            ui.label(format!("• {}", line));
        }
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("💾 Save settings").clicked() {
            action = SettingsAction::Save;
        }
        if ui.button("⟲ Reset to defaults").clicked() {
            action = SettingsAction::Reset;
        }
    });

    if action == SettingsAction::None {
        let patch = diff(settings, &draft);
        if !patch.is_empty() {
            action = SettingsAction::Update(patch);
        }
    }
    action
}

fn section(ui: &mut egui::Ui, title: &str, description: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        if !description.is_empty() {
            ui.label(egui::RichText::new(description).weak());
        }
        ui.add_space(4.0);
        add_contents(ui);
    });
    ui.add_space(8.0);
}

fn toggle_row(ui: &mut egui::Ui, value: &mut bool, title: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.checkbox(value, "");
        ui.vertical(|ui| {
            ui.strong(title);
            ui.label(egui::RichText::new(description).small().weak());
        });
    });
}
