// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Home screen: media selection, preview, camera and the analyze action.

use super::camera::{CameraAction, CameraView};
use super::media_view::{self, TextureBackend};
use super::notifications::Notifications;
use crate::analysis::engine::AnalysisEngine;
use crate::analysis::runner::AnalysisRunner;
use crate::error::AnalysisError;
use crate::io::media::{media_file_from_dropped, read_media_file, MEDIA_EXTENSIONS};
use crate::models::analysis::AnalysisResult;
use crate::models::media::{MediaAsset, MediaKind};
use crate::models::settings::AppSettings;
use crate::navigation::Route;
use crate::preview::PreviewRenderer;
use crate::selection::MediaSelection;
use std::sync::Arc;

const PREVIEW_HEIGHT: f32 = 300.0;

/// What the app should do after the home screen was drawn.
pub enum HomeAction {
    None,
    Navigate(Route),
    /// Analysis finished; show the results.
    Analyzed {
        asset: MediaAsset,
        result: AnalysisResult,
    },
}

pub struct HomeScreen {
    selection: MediaSelection,
    preview: PreviewRenderer<TextureBackend>,
    runner: AnalysisRunner,
    camera: Option<CameraView>,
}

impl HomeScreen {
    pub fn new(ctx: &egui::Context, engine: Arc<dyn AnalysisEngine>, settings: &AppSettings) -> Self {
        Self {
            selection: MediaSelection::new(),
            preview: PreviewRenderer::new(TextureBackend::new(ctx, settings.video_fps)),
            runner: AnalysisRunner::new(engine),
            camera: None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.runner.is_analyzing()
    }

    pub fn selected(&self) -> Option<&MediaAsset> {
        self.selection.selected()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        settings: &AppSettings,
        notifications: &mut Notifications,
    ) -> HomeAction {
        let mut action = self.poll_analysis(notifications);

        self.preview.backend_mut().set_fps(settings.video_fps);
        if self.camera.is_none() {
            self.handle_dropped_files(ui.ctx(), settings, notifications);
        }

        if let Some(route) = header(ui) {
            action = HomeAction::Navigate(route);
        }
        ui.add_space(12.0);

        if let Some(camera) = &mut self.camera {
            match camera.show(ui, notifications) {
                CameraAction::Captured(asset) => {
                    self.camera = None;
                    self.selection.select_asset(asset);
                    self.on_selected(settings, notifications);
                }
                CameraAction::Close => self.camera = None,
                CameraAction::None => {}
            }
            return action;
        }

        feature_cards(ui);
        ui.add_space(12.0);

        ui.columns(2, |columns| {
            self.upload_panel(&mut columns[0], settings, notifications);
            self.preview_panel(&mut columns[1]);
            tips_card(&mut columns[1]);
        });

        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("This application uses AI for research purposes only").strong());
            ui.label(
                egui::RichText::new(
                    "Results must not replace a specialist medical evaluation. \
                     All data stays on this device and is not shared.",
                )
                .weak(),
            );
        });

        if self.runner.is_analyzing() {
            ui.ctx().request_repaint();
        }
        action
    }

    fn poll_analysis(&mut self, notifications: &mut Notifications) -> HomeAction {
        let Some(completed) = self.runner.poll() else {
            return HomeAction::None;
        };
        match completed.outcome {
            Ok(result) => {
                notifications.info("Analysis started", "The analysis process started successfully");
                HomeAction::Analyzed {
                    asset: completed.asset,
                    result,
                }
            }
            Err(AnalysisError::Cancelled) => HomeAction::None,
            Err(e) => {
                notifications.error("Analysis failed", format!("An error occurred during analysis ({}). Please try again.", e));
                HomeAction::None
            }
        }
    }

    fn handle_dropped_files(
        &mut self,
        ctx: &egui::Context,
        settings: &AppSettings,
        notifications: &mut Notifications,
    ) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() || self.runner.is_analyzing() {
            return;
        }
        let files = dropped.iter().filter_map(|file| match media_file_from_dropped(file) {
            Ok(media) => Some(media),
            Err(e) => {
                log::debug!("Skipping dropped file: {}", e);
                None
            }
        });
        if self.selection.select_first(files) {
            self.on_selected(settings, notifications);
        }
    }

    fn browse(&mut self, settings: &AppSettings, notifications: &mut Notifications) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images and videos", &MEDIA_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        match read_media_file(&path) {
            Ok(file) => {
                if self.selection.select(file) {
                    self.on_selected(settings, notifications);
                }
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                notifications.error("Cannot open file", e.to_string());
            }
        }
    }

    fn on_selected(&mut self, settings: &AppSettings, notifications: &mut Notifications) {
        self.camera = None;
        if settings.auto_analysis {
            self.analyze(notifications);
        }
    }

    fn analyze(&mut self, notifications: &mut Notifications) {
        match self.runner.start(self.selection.selected()) {
            Ok(()) => {}
            Err(AnalysisError::InvalidArgument) => notifications.error(
                "No file selected",
                "Please choose a video or image file to analyze.",
            ),
            Err(e) => log::debug!("Analyze ignored: {}", e),
        }
    }

    fn upload_panel(&mut self, ui: &mut egui::Ui, settings: &AppSettings, notifications: &mut Notifications) {
        let analyzing = self.runner.is_analyzing();
        let drag_over = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if drag_over || !self.selection.is_empty() {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.add_enabled_ui(!analyzing, |ui| {
                    ui.vertical_centered(|ui| {
                        if drag_over {
                            ui.heading("⬇ Drop the file here");
                            return;
                        }
                        let mut cleared = false;
                        match self.selection.selected() {
                            Some(asset) => {
                                let icon = match asset.kind() {
                                    MediaKind::Video => "🎞",
                                    MediaKind::Image => "🖼",
                                };
                                ui.heading(format!("{} {}", icon, asset.name()));
                                ui.label(format!("{:.2} MB • {}", asset.size_mb(), asset.kind()));
                                if ui.button("✖ Remove file").clicked() {
                                    cleared = true;
                                }
                                ui.label(egui::RichText::new("You can start the analysis now").small().weak());
                            }
                            None => {
                                ui.heading("⬆ Upload media for analysis");
                                ui.label("Drag and drop a video or image here, or browse");
                                ui.label(egui::RichText::new("MP4 • AVI • JPG • PNG").weak());
                                ui.add_space(8.0);
                                if ui.button("📂 Choose file").clicked() {
                                    self.browse(settings, notifications);
                                }
                                ui.label(
                                    egui::RichText::new("or use the camera to capture a sample directly")
                                        .small()
                                        .weak(),
                                );
                            }
                        }
                        if cleared {
                            self.selection.clear();
                            log::info!("Selection cleared");
                        }
                    });
                });
            });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            if !self.selection.is_empty() {
                let label = if analyzing { "Analyzing..." } else { "Start analysis" };
                let button = ui.add_enabled(!analyzing, egui::Button::new(label).min_size(egui::vec2(160.0, 32.0)));
                if analyzing {
                    ui.spinner();
                }
                if button.clicked() {
                    self.analyze(notifications);
                }
            } else if ui.button("📷 Use camera").clicked() {
                self.camera = Some(CameraView::new(settings.video_fps));
            }
        });
    }

    fn preview_panel(&mut self, ui: &mut egui::Ui) {
        self.preview.sync(self.selection.selected());
        media_view::step(ui.ctx(), &mut self.preview);
        let analyzing = self.runner.is_analyzing();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong("👁 Media preview");
                let is_video = self.selection.selected().is_some_and(MediaAsset::is_video);
                if is_video {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        media_view::playback_controls(ui, self.preview.playback_mut(), !analyzing);
                    });
                }
            });

            let Some(asset) = self.selection.selected() else {
                ui.add_space(40.0);
                ui.vertical_centered(|ui| {
                    ui.label("No media selected for preview");
                    ui.label(egui::RichText::new("Choose a file or use the camera to start").weak());
                });
                ui.add_space(40.0);
                return;
            };

            media_view::show(ui, self.preview.handle(), self.preview.playback(), &[], PREVIEW_HEIGHT);
            if analyzing {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing frames, please wait...");
                });
            }
            ui.horizontal(|ui| {
                ui.label(format!("{} • {} • {:.2} MB", asset.name(), asset.kind(), asset.size_mb()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new("Ready for analysis").weak());
                });
            });
        });
    }
}

fn header(ui: &mut egui::Ui) -> Option<Route> {
    let mut picked = None;
    ui.horizontal(|ui| {
        ui.heading("🔬 SpermVision AI");
        ui.label(egui::RichText::new("Advanced AI-assisted sperm analysis").weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⚙ Settings").clicked() {
                picked = Some(Route::Settings);
            }
            if ui.button("📈 Charts").clicked() {
                picked = Some(Route::Analytics);
            }
        });
    });
    picked
}

fn feature_cards(ui: &mut egui::Ui) {
    let cards = [
        ("🧠", "AI detection", "An advanced YOLOv8 model detects and counts sperm cells with high accuracy"),
        ("⚡", "Real-time analysis", "Fast processing of videos and images with instant results and confidence scores"),
        ("🔬", "Medical grade", "Professional analysis tools designed for research and medical use"),
    ];
    ui.columns(cards.len(), |columns| {
        for (column, (icon, title, description)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(column.style()).show(column, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.heading(icon);
                    ui.strong(title);
                    ui.label(egui::RichText::new(description).weak());
                });
            });
        }
    });
}

fn tips_card(ui: &mut egui::Ui) {
    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong("Tips for the best results");
        for tip in [
            "Use good, clear lighting",
            "Make sure the image or video is sharp",
            "Avoid excessive movement while recording",
            "Use a suitable magnification for the sample",
            "Pick the clearest part of the sample",
        ] {
            ui.label(format!("• {}", tip));
        }
    });
}
