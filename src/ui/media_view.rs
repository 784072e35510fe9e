// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media display area.
//!
//! This module turns assets into egui textures (the preview display
//! handles) and paints them, fitted to the available space, with an
//! optional detection overlay.

use crate::io::media::{decode_image, motion_jpeg_frames};
use crate::models::analysis::DetectionBox;
use crate::models::media::{MediaAsset, MediaKind, MOTION_JPEG_MIME};
use crate::preview::{Playback, PreviewBackend, PreviewRenderer};
use crate::util::geometry::{fit_rect, percent_rect};
use std::ops::Range;
use std::time::Duration;

/// Display handle of one asset. Dropping it frees the texture.
pub enum PreviewHandle {
    Still {
        texture: egui::TextureHandle,
        size: [usize; 2],
    },
    /// Motion-JPEG recording. Only the frame being shown is decoded; the
    /// texture is rewritten when playback moves to another frame.
    Frames {
        asset: MediaAsset,
        frames: Vec<Range<usize>>,
        texture: egui::TextureHandle,
        shown: usize,
        size: [usize; 2],
        fps: u32,
    },
    /// Nothing to draw; the reason is shown instead.
    Unavailable { reason: String },
}

impl PreviewHandle {
    fn current(&self) -> Option<(&egui::TextureHandle, [usize; 2])> {
        match self {
            PreviewHandle::Still { texture, size } | PreviewHandle::Frames { texture, size, .. } => {
                Some((texture, *size))
            }
            PreviewHandle::Unavailable { .. } => None,
        }
    }

    /// Show the recording frame at `position`.
    pub fn seek(&mut self, position: Duration) {
        let PreviewHandle::Frames {
            asset,
            frames,
            texture,
            shown,
            size,
            fps,
        } = self
        else {
            return;
        };
        let index = frame_index(position, *fps, frames.len());
        if index == *shown {
            return;
        }
        *shown = index;
        match decode_image(&asset.bytes()[frames[index].clone()]) {
            Ok(decoded) => {
                *size = [decoded.width as usize, decoded.height as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(*size, &decoded.pixels);
                texture.set(image, egui::TextureOptions::LINEAR);
            }
            Err(e) => log::warn!("Skipping frame {} of {}: {}", index, asset.name(), e),
        }
    }
}

/// Index of the frame shown at `position`, clamped to the last frame.
fn frame_index(position: Duration, fps: u32, count: usize) -> usize {
    let index = (position.as_secs_f64() * fps as f64) as usize;
    index.min(count.saturating_sub(1))
}

/// Creates textures on the egui context.
pub struct TextureBackend {
    ctx: egui::Context,
    fps: u32,
}

impl TextureBackend {
    pub fn new(ctx: &egui::Context, fps: u32) -> Self {
        Self {
            ctx: ctx.clone(),
            fps: fps.max(1),
        }
    }

    /// Playback rate for recordings acquired from now on.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
    }

    fn texture(&self, name: &str, bytes: &[u8]) -> Result<(egui::TextureHandle, [usize; 2]), String> {
        let decoded = decode_image(bytes).map_err(|e| e.to_string())?;
        let size = [decoded.width as usize, decoded.height as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, &decoded.pixels);
        Ok((self.ctx.load_texture(name, image, egui::TextureOptions::LINEAR), size))
    }

    fn recording(&self, asset: &MediaAsset) -> Result<PreviewHandle, String> {
        let frames = motion_jpeg_frames(asset.bytes());
        let first = frames
            .first()
            .cloned()
            .ok_or_else(|| "The recording contains no frames".to_string())?;
        let (texture, size) = self.texture(asset.name(), &asset.bytes()[first])?;
        Ok(PreviewHandle::Frames {
            asset: asset.clone(),
            frames,
            texture,
            shown: 0,
            size,
            fps: self.fps,
        })
    }
}

impl PreviewBackend for TextureBackend {
    type Handle = PreviewHandle;

    fn acquire(&mut self, asset: &MediaAsset) -> PreviewHandle {
        let handle = match asset.kind() {
            MediaKind::Image => self
                .texture(asset.name(), asset.bytes())
                .map(|(texture, size)| PreviewHandle::Still { texture, size }),
            MediaKind::Video if asset.mime() == MOTION_JPEG_MIME => self.recording(asset),
            MediaKind::Video => Err(format!(
                "In-app playback of {} is not supported. The file can still be analyzed.",
                asset.mime()
            )),
        };
        match handle {
            Ok(handle) => {
                log::info!("Created preview for {}", asset.name());
                handle
            }
            Err(reason) => {
                log::warn!("No preview for {}: {}", asset.name(), reason);
                PreviewHandle::Unavailable { reason }
            }
        }
    }

    fn release(&mut self, handle: PreviewHandle) {
        if !matches!(handle, PreviewHandle::Unavailable { .. }) {
            log::debug!("Released preview textures");
        }
        drop(handle);
    }

    fn playback_length(&self, handle: &PreviewHandle) -> Option<Duration> {
        match handle {
            PreviewHandle::Frames { frames, fps, .. } => {
                Some(Duration::from_secs_f64(frames.len() as f64 / *fps as f64))
            }
            _ => None,
        }
    }
}

/// Paint `handle` into a region of `height` points, with the detection
/// boxes drawn on top.
pub fn show(
    ui: &mut egui::Ui,
    handle: Option<&PreviewHandle>,
    playback: &Playback,
    boxes: &[DetectionBox],
    height: f32,
) {
    let (area, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), height),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(area);
    painter.rect_filled(area, 8.0, egui::Color32::BLACK);

    let Some(handle) = handle else {
        return;
    };

    match handle.current() {
        Some((texture, [w, h])) => {
            let image_rect = fit_rect(area, w as f32, h as f32);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            draw_boxes(&painter, image_rect, boxes);
        }
        None => {
            let reason = match handle {
                PreviewHandle::Unavailable { reason } => reason.as_str(),
                _ => "",
            };
            painter.text(
                area.center(),
                egui::Align2::CENTER_CENTER,
                format!("▶ {:.1}s\n{}", playback.position().as_secs_f32(), reason),
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(180),
            );
            draw_boxes(&painter, area, boxes);
        }
    }
}

/// Play/pause and restart buttons of a video preview.
pub fn playback_controls(ui: &mut egui::Ui, playback: &mut Playback, enabled: bool) {
    ui.add_enabled_ui(enabled, |ui| {
        let toggle = if playback.is_playing() { "⏸" } else { "▶" };
        if ui.button(toggle).on_hover_text("Play / pause").clicked() {
            playback.toggle();
        }
        if ui.button("⟲").on_hover_text("Restart").clicked() {
            playback.restart();
        }
        let position = playback.position().as_secs_f32();
        match playback.length() {
            Some(length) => ui.label(format!("{:.1}s / {:.1}s", position, length.as_secs_f32())),
            None => ui.label(format!("{:.1}s", position)),
        };
    });
}

/// Advance the playback clock by the frame time and show the matching
/// recording frame.
pub fn step(ctx: &egui::Context, preview: &mut PreviewRenderer<TextureBackend>) {
    let playback = preview.playback_mut();
    if playback.is_playing() {
        let dt = ctx.input(|i| i.stable_dt);
        playback.advance(Duration::from_secs_f32(dt.max(0.0)));
        ctx.request_repaint();
    }
    let position = preview.playback().position();
    if let Some(handle) = preview.handle_mut() {
        handle.seek(position);
    }
}

fn draw_boxes(painter: &egui::Painter, frame: egui::Rect, boxes: &[DetectionBox]) {
    let stroke = egui::Stroke::new(2.0, egui::Color32::from_rgb(59, 130, 246));
    for detection in boxes {
        painter.rect_stroke(percent_rect(frame, detection), 2.0, stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;
    use crate::io::media::encode_jpeg;
    use crate::models::media::MediaFile;

    fn recording(sizes: &[(u32, u32)]) -> MediaAsset {
        let mut bytes = Vec::new();
        for &(width, height) in sizes {
            let frame = Frame {
                width,
                height,
                rgb: vec![120; (width * height * 3) as usize],
            };
            bytes.extend(encode_jpeg(&frame, 90).unwrap());
        }
        MediaAsset::from_file(MediaFile::new("rec.mjpeg", MOTION_JPEG_MIME, bytes)).unwrap()
    }

    #[test]
    fn test_recording_decodes_shown_frame_only() {
        let ctx = egui::Context::default();
        let mut backend = TextureBackend::new(&ctx, 10);
        let mut handle = backend.acquire(&recording(&[(4, 4), (6, 2), (8, 8)]));

        let length = backend.playback_length(&handle).unwrap();
        assert!((length.as_secs_f64() - 0.3).abs() < 1e-6);
        match &handle {
            PreviewHandle::Frames { frames, shown, size, .. } => {
                assert_eq!(frames.len(), 3);
                assert_eq!((*shown, *size), (0, [4, 4]));
            }
            _ => panic!("expected a frame sequence"),
        }

        handle.seek(Duration::from_millis(150));
        match &handle {
            PreviewHandle::Frames { shown, size, .. } => assert_eq!((*shown, *size), (1, [6, 2])),
            _ => panic!("expected a frame sequence"),
        }

        handle.seek(Duration::from_secs(5));
        assert_eq!(handle.current().map(|(_, size)| size), Some([8, 8]));
    }

    #[test]
    fn test_frame_index_follows_playback_clock() {
        assert_eq!(frame_index(Duration::ZERO, 30, 90), 0);
        assert_eq!(frame_index(Duration::from_millis(500), 30, 90), 15);
        assert_eq!(frame_index(Duration::from_millis(1999), 30, 90), 59);
        // Past the end shows the last frame
        assert_eq!(frame_index(Duration::from_secs(10), 30, 90), 89);
        assert_eq!(frame_index(Duration::from_secs(1), 30, 0), 0);
    }
}
