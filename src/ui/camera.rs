// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera capture panel.
//!
//! Owns a [`CaptureAdapter`] for as long as the panel is shown. Dropping
//! the panel releases the camera.

use super::notifications::Notifications;
use crate::capture::{self, CaptureAdapter, CaptureState, OpenOptions};
use crate::error::CaptureError;
use crate::models::media::MediaAsset;
use crate::util::geometry::fit_rect;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Photo,
    Video,
}

pub enum CameraAction {
    None,
    /// A photo or recording is ready; the panel should close.
    Captured(MediaAsset),
    Close,
}

pub struct CameraView {
    adapter: CaptureAdapter,
    mode: CaptureMode,
    /// Capture rate, also the playback rate of recordings.
    fps: u32,
    texture: Option<egui::TextureHandle>,
    frame_size: [usize; 2],
}

impl CameraView {
    pub fn new(fps: u32) -> Self {
        Self {
            adapter: CaptureAdapter::new(capture::default_camera()),
            mode: CaptureMode::Photo,
            fps,
            texture: None,
            frame_size: [0, 0],
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, notifications: &mut Notifications) -> CameraAction {
        let mut action = CameraAction::None;

        ui.horizontal(|ui| {
            ui.heading("Camera capture");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(!self.adapter.is_recording(), |ui| {
                    if ui
                        .selectable_label(self.mode == CaptureMode::Video, "🎥 Video")
                        .clicked()
                    {
                        self.mode = CaptureMode::Video;
                    }
                    if ui
                        .selectable_label(self.mode == CaptureMode::Photo, "📷 Photo")
                        .clicked()
                    {
                        self.mode = CaptureMode::Photo;
                    }
                });
            });
        });

        if let Err(e) = self.pull_frame(ui.ctx()) {
            self.fail(notifications, e);
        }
        if self.adapter.is_recording_full() {
            notifications.info(
                "Recording limit reached",
                format!("Recordings are limited to {} seconds", capture::MAX_RECORDING.as_secs()),
            );
            action = self.finish_recording(notifications);
        }
        self.paint_live_view(ui);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            match self.adapter.state() {
                CaptureState::Idle | CaptureState::PhotoCaptured => {
                    if ui.button("📷 Start camera").clicked() {
                        let options = OpenOptions {
                            want_audio: self.mode == CaptureMode::Video,
                            fps: self.fps,
                            ..Default::default()
                        };
                        if let Err(e) = self.adapter.open(options) {
                            self.fail(notifications, e);
                        }
                    }
                }
                CaptureState::Active => match self.mode {
                    CaptureMode::Photo => {
                        if ui.button("📷 Take photo").clicked() {
                            match self.adapter.capture_photo() {
                                Ok(asset) => {
                                    notifications.info("Photo captured", "The photo will be analyzed now");
                                    action = CameraAction::Captured(asset);
                                }
                                Err(e) => self.fail(notifications, e),
                            }
                        }
                    }
                    CaptureMode::Video => {
                        if ui.button("⏺ Start recording").clicked() {
                            if let Err(e) = self.adapter.start_recording() {
                                self.fail(notifications, e);
                            }
                        }
                    }
                },
                CaptureState::Recording => {
                    ui.label(format!("⏺ {} frames", self.adapter.recorded_frames()));
                    let stop = egui::Button::new("⏹ Stop recording")
                        .fill(egui::Color32::from_rgb(220, 38, 38));
                    if ui.add(stop).clicked() {
                        action = self.finish_recording(notifications);
                    }
                }
                CaptureState::Stopped => {}
            }

            if ui.button("Cancel").clicked() {
                action = CameraAction::Close;
            }
        });

        if matches!(action, CameraAction::Close) {
            self.adapter.close();
        }
        if self.adapter.is_holding_device() {
            // Wake up for the next frame from the capture thread
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f32(1.0 / self.fps.max(1) as f32));
        }
        action
    }

    fn finish_recording(&mut self, notifications: &mut Notifications) -> CameraAction {
        match self.adapter.stop_recording() {
            Ok(asset) => {
                self.adapter.close();
                notifications.info("Video recorded", "The video will be analyzed now");
                CameraAction::Captured(asset)
            }
            Err(e) => {
                self.fail(notifications, e);
                CameraAction::None
            }
        }
    }

    /// Upload the newest frame from the capture thread, if any.
    fn pull_frame(&mut self, ctx: &egui::Context) -> Result<(), CaptureError> {
        let Some(frame) = self.adapter.poll_frame()? else {
            return Ok(());
        };
        let size = [frame.width as usize, frame.height as usize];
        if frame.rgb.len() != size[0] * size[1] * 3 {
            return Err(CaptureError::Encode(format!(
                "frame buffer of {} bytes does not match {}x{}",
                frame.rgb.len(),
                frame.width,
                frame.height
            )));
        }
        let image = egui::ColorImage::from_rgb(size, &frame.rgb);
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("camera", image, egui::TextureOptions::LINEAR));
            }
        }
        self.frame_size = size;
        Ok(())
    }

    fn paint_live_view(&self, ui: &mut egui::Ui) {
        let (area, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 320.0),
            egui::Sense::hover(),
        );
        let painter = ui.painter_at(area);
        painter.rect_filled(area, 8.0, egui::Color32::BLACK);

        match &self.texture {
            Some(texture) if self.adapter.is_holding_device() => {
                let rect = fit_rect(area, self.frame_size[0] as f32, self.frame_size[1] as f32);
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            _ => {
                painter.text(
                    area.center(),
                    egui::Align2::CENTER_CENTER,
                    "Camera is off",
                    egui::FontId::proportional(16.0),
                    egui::Color32::from_gray(160),
                );
            }
        }
    }

    fn fail(&mut self, notifications: &mut Notifications, error: CaptureError) {
        log::error!("Camera failure: {}", error);
        let message = match error {
            CaptureError::PermissionDenied => {
                "Cannot access the camera. Make sure access is allowed.".to_string()
            }
            other => other.to_string(),
        };
        notifications.error("Camera error", message);
        self.adapter.close();
    }
}
