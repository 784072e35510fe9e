// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analysis results screen.
//!
//! Shows the analyzed sample next to its result. When entered without a
//! result, the live progress simulation runs first (with the detection
//! overlay) and produces one when it completes.

use super::media_view::{self, TextureBackend};
use crate::analysis::progress::ProgressSimulation;
use crate::models::analysis::{AnalysisResult, CountStatus, DetectionBox, QualityLabel};
use crate::models::media::MediaAsset;
use crate::models::settings::AppSettings;
use crate::navigation::{ResultsState, Route};
use crate::preview::PreviewRenderer;
use egui::Color32;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

const PREVIEW_HEIGHT: f32 = 360.0;

const GREEN: Color32 = Color32::from_rgb(22, 163, 74);
const BLUE: Color32 = Color32::from_rgb(37, 99, 235);
const YELLOW: Color32 = Color32::from_rgb(202, 138, 4);
const RED: Color32 = Color32::from_rgb(220, 38, 38);
const GRAY: Color32 = Color32::from_rgb(107, 114, 128);

/// Badge color of a quality label.
pub fn quality_color(quality: QualityLabel) -> Color32 {
    match quality {
        QualityLabel::Excellent => GREEN,
        QualityLabel::Good => BLUE,
        QualityLabel::Fair => YELLOW,
        QualityLabel::Poor => RED,
    }
}

pub fn status_color(status: CountStatus) -> Color32 {
    match status {
        CountStatus::NoneDetected => GRAY,
        CountStatus::Low => RED,
        CountStatus::Moderate => YELLOW,
        CountStatus::High => GREEN,
    }
}

pub enum ResultsAction {
    None,
    Navigate(Route),
    /// The progress simulation produced a result.
    Completed(AnalysisResult),
}

pub struct ResultsScreen {
    asset: MediaAsset,
    preview: PreviewRenderer<TextureBackend>,
    progress: Option<ProgressSimulation<StdRng>>,
    result: Option<AnalysisResult>,
}

impl ResultsScreen {
    pub fn new(ctx: &egui::Context, state: &ResultsState, settings: &AppSettings) -> Self {
        let progress = match state.result {
            Some(_) => None,
            None => Some(ProgressSimulation::new(StdRng::from_os_rng())),
        };
        Self {
            asset: state.asset.clone(),
            preview: PreviewRenderer::new(TextureBackend::new(ctx, settings.video_fps)),
            progress,
            result: state.result,
        }
    }

    /// The asset this screen was opened for.
    pub fn asset(&self) -> &MediaAsset {
        &self.asset
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ResultsAction {
        let mut action = self.advance_progress(ui.ctx());

        ui.horizontal(|ui| {
            if ui.button("⬅ Back").clicked() {
                action = ResultsAction::Navigate(Route::Home);
            }
            ui.vertical(|ui| {
                ui.heading("Analysis results");
                ui.label(egui::RichText::new("AI sample analysis").weak());
            });
        });
        ui.separator();

        ui.columns(2, |columns| {
            self.sample_panel(&mut columns[0]);
            if let Some(route) = self.result_panel(&mut columns[1]) {
                action = ResultsAction::Navigate(route);
            }
        });
        action
    }

    fn advance_progress(&mut self, ctx: &egui::Context) -> ResultsAction {
        let Some(progress) = &mut self.progress else {
            return ResultsAction::None;
        };
        let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt).max(0.0));
        ctx.request_repaint();
        match progress.advance(dt) {
            Some(result) => {
                log::info!(
                    "Progress analysis of {} finished: {} cells",
                    self.asset.name(),
                    result.count
                );
                self.progress = None;
                self.result = Some(result);
                ResultsAction::Completed(result)
            }
            None => ResultsAction::None,
        }
    }

    fn sample_panel(&mut self, ui: &mut egui::Ui) {
        self.preview.sync(Some(&self.asset));
        media_view::step(ui.ctx(), &mut self.preview);

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.strong("Sample view");
                if self.asset.is_video() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        media_view::playback_controls(ui, self.preview.playback_mut(), true);
                    });
                }
            });

            let boxes: Vec<DetectionBox> = self
                .progress
                .as_ref()
                .map(|p| p.boxes().copied().collect())
                .unwrap_or_default();
            media_view::show(ui, self.preview.handle(), self.preview.playback(), &boxes, PREVIEW_HEIGHT);
            if self.progress.is_some() {
                ui.label(egui::RichText::new("⚡ AI is analyzing...").color(BLUE));
            }
        });

        if let Some(progress) = &self.progress {
            ui.add_space(8.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.strong("Analysis progress");
                ui.horizontal(|ui| {
                    ui.label("Processing frames");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{}%", progress.percent()));
                    });
                });
                ui.add(egui::ProgressBar::new(progress.percent() as f32 / 100.0));
                ui.horizontal(|ui| {
                    ui.label(format!("Time remaining: {:.1}s", progress.remaining_secs()));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{} frames processed", progress.frames_processed()));
                    });
                });
            });
        }
    }

    fn result_panel(&self, ui: &mut egui::Ui) -> Option<Route> {
        let mut picked = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            let Some(result) = self.result else {
                ui.strong("Waiting for results");
                ui.label(egui::RichText::new("The sample is being processed by the AI").weak());
                ui.add_space(60.0);
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label("Processing data...");
                });
                ui.add_space(60.0);
                return;
            };

            ui.label(egui::RichText::new("👁 Final results").strong().color(BLUE));
            ui.label(egui::RichText::new("The analysis completed successfully").weak());
            ui.add_space(8.0);

            let status = CountStatus::from_count(result.count);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(result.count.to_string()).size(40.0).strong().color(BLUE));
                ui.label("sperm cells detected");
                ui.label(
                    egui::RichText::new(format!("Count: {}", status.label()))
                        .color(status_color(status)),
                );
            });

            ui.add_space(8.0);
            ui.label(format!("Analysis confidence: {}%", result.confidence.round()));
            ui.add(
                egui::ProgressBar::new((result.confidence / 100.0) as f32)
                    .text(format!("{:.1}%", result.confidence)),
            );

            ui.add_space(8.0);
            ui.columns(2, |columns| {
                columns[0].vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.1}s", result.duration_seconds))
                            .size(22.0)
                            .strong(),
                    );
                    ui.label(egui::RichText::new("Analysis time").weak());
                });
                columns[1].vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(result.quality.display_name())
                            .size(18.0)
                            .strong()
                            .color(quality_color(result.quality)),
                    );
                    ui.label(egui::RichText::new("Sample quality").weak());
                });
            });

            ui.add_space(8.0);
            egui::Frame::group(ui.style())
                .fill(ui.visuals().faint_bg_color)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.strong("Clinical reference");
                    ui.label(
                        egui::RichText::new(
                            "Normal sperm concentration: 15+ million/ml. This analysis is for \
                             research purposes only and must not replace a specialist medical \
                             evaluation.",
                        )
                        .small(),
                    );
                });

            ui.add_space(8.0);
            let button = egui::Button::new("Analyze new sample").min_size(egui::vec2(ui.available_width(), 32.0));
            if ui.add(button).clicked() {
                picked = Some(Route::Home);
            }
        });
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_colors() {
        assert_eq!(quality_color(QualityLabel::Excellent), GREEN);
        assert_eq!(quality_color(QualityLabel::Good), BLUE);
        assert_eq!(quality_color(QualityLabel::Fair), YELLOW);
        assert_eq!(quality_color(QualityLabel::Poor), RED);
    }

    #[test]
    fn test_status_colors_follow_count() {
        assert_eq!(status_color(CountStatus::from_count(0)), GRAY);
        assert_eq!(status_color(CountStatus::from_count(9)), RED);
        assert_eq!(status_color(CountStatus::from_count(10)), YELLOW);
        assert_eq!(status_color(CountStatus::from_count(50)), GREEN);
    }
}
