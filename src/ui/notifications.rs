// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notifications shown in the corner of the window.

use std::time::{Duration, Instant};

const LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub description: String,
    created: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    notices: Vec<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Level::Info, title.into(), description.into());
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Level::Error, title.into(), description.into());
    }

    fn push(&mut self, level: Level, title: String, description: String) {
        match level {
            Level::Info => log::info!("{}: {}", title, description),
            Level::Error => log::warn!("{}: {}", title, description),
        }
        self.notices.push(Notice {
            level,
            title,
            description,
            created: Instant::now(),
        });
    }

    /// Drop notices older than their lifetime.
    pub fn prune(&mut self, now: Instant) {
        self.notices
            .retain(|notice| now.saturating_duration_since(notice.created) < LIFETIME);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Draw the live notices and expire old ones.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.notices.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (index, notice) in self.notices.iter().enumerate() {
                    let accent = match notice.level {
                        Level::Info => egui::Color32::from_rgb(59, 130, 246),
                        Level::Error => egui::Color32::from_rgb(220, 38, 38),
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, accent))
                        .show(ui, |ui| {
                            ui.set_max_width(280.0);
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(&notice.title).strong().color(accent));
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    if ui.small_button("✖").clicked() {
                                        dismissed = Some(index);
                                    }
                                });
                            });
                            ui.label(&notice.description);
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }
        // Keep repainting so notices expire on time
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_expire() {
        let mut notifications = Notifications::new();
        notifications.info("Captured", "capture-1.jpg");
        notifications.error("Camera error", "denied");
        assert_eq!(notifications.iter().count(), 2);

        notifications.prune(Instant::now());
        assert_eq!(notifications.iter().count(), 2);

        notifications.prune(Instant::now() + LIFETIME + Duration::from_millis(1));
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_dismiss() {
        let mut notifications = Notifications::new();
        notifications.info("a", "1");
        notifications.error("b", "2");
        notifications.dismiss(0);
        let left: Vec<_> = notifications.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(left, vec!["b"]);
        assert_eq!(notifications.iter().next().unwrap().level, Level::Error);

        // Out of range is ignored
        notifications.dismiss(5);
        assert_eq!(notifications.iter().count(), 1);
    }
}
