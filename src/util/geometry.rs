// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the layout math for fitting media into the
//! available area and placing percent-based overlays on top of it.

use crate::models::analysis::DetectionBox;

/// Largest rectangle with the content's aspect ratio that fits in
/// `available`, centered.
pub fn fit_rect(available: egui::Rect, content_width: f32, content_height: f32) -> egui::Rect {
    if content_width <= 0.0 || content_height <= 0.0 || available.height() <= 0.0 {
        return available;
    }
    let content_aspect = content_width / content_height;
    let available_aspect = available.width() / available.height();

    let size = if content_aspect > available_aspect {
        // Content is wider - fit to width
        egui::vec2(available.width(), available.width() / content_aspect)
    } else {
        // Content is taller - fit to height
        egui::vec2(available.height() * content_aspect, available.height())
    };
    egui::Rect::from_center_size(available.center(), size)
}

/// Convert a percent-based box to screen coordinates within `frame`.
pub fn percent_rect(frame: egui::Rect, detection: &DetectionBox) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(
            frame.min.x + detection.x / 100.0 * frame.width(),
            frame.min.y + detection.y / 100.0 * frame.height(),
        ),
        egui::vec2(
            detection.width / 100.0 * frame.width(),
            detection.height / 100.0 * frame.height(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
    }

    #[test]
    fn test_fit_wide_content() {
        let fitted = fit_rect(rect(0.0, 0.0, 800.0, 800.0), 1920.0, 1080.0);
        assert!((fitted.width() - 800.0).abs() < 0.001);
        assert!((fitted.height() - 450.0).abs() < 0.001);
        assert!((fitted.min.y - 175.0).abs() < 0.001);
    }

    #[test]
    fn test_fit_tall_content() {
        let fitted = fit_rect(rect(10.0, 20.0, 400.0, 200.0), 100.0, 200.0);
        assert!((fitted.height() - 200.0).abs() < 0.001);
        assert!((fitted.width() - 100.0).abs() < 0.001);
        assert_eq!(fitted.center(), egui::pos2(210.0, 120.0));
    }

    #[test]
    fn test_fit_degenerate_content() {
        let available = rect(0.0, 0.0, 100.0, 50.0);
        assert_eq!(fit_rect(available, 0.0, 10.0), available);
    }

    #[test]
    fn test_percent_rect_corners() {
        let frame = rect(100.0, 50.0, 200.0, 100.0);

        let full = percent_rect(frame, &DetectionBox { x: 0.0, y: 0.0, width: 100.0, height: 100.0 });
        assert_eq!(full, frame);

        let quarter = percent_rect(frame, &DetectionBox { x: 50.0, y: 50.0, width: 10.0, height: 10.0 });
        assert_eq!(quarter.min, egui::pos2(200.0, 100.0));
        assert_eq!(quarter.size(), egui::vec2(20.0, 10.0));
    }
}
