// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analytics screen: summary cards, charts, session history and export.

use super::notifications::Notifications;
use super::results::quality_color;
use crate::io::export::{export_records, DEFAULT_EXPORT_NAME};
use crate::models::analytics::{
    quality_distribution, sample_records, weekly_trends, AnalysisRecord, ResultHistory, Summary,
    TimeRange,
};
use crate::models::settings::AppSettings;

const CHART_HEIGHT: f32 = 180.0;
const BAR_COLOR: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const LINE_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 64, 175);

#[derive(Debug, Default)]
pub struct AnalyticsScreen {
    time_range: TimeRange,
}

impl AnalyticsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        history: &ResultHistory,
        settings: &AppSettings,
        notifications: &mut Notifications,
    ) {
        let records = sample_records();

        ui.horizontal(|ui| {
            ui.heading("📈 Analytics");
            ui.label(egui::RichText::new("Statistics across analysis results").weak());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("💾 Export data").clicked() {
                    let mut rows = records.clone();
                    if settings.save_results {
                        rows.extend(history.to_records());
                    }
                    export(&rows, notifications);
                }
                for range in TimeRange::ALL.iter().rev() {
                    if ui
                        .selectable_label(self.time_range == *range, range.label())
                        .clicked()
                    {
                        self.time_range = *range;
                    }
                }
            });
        });
        ui.separator();

        summary_cards(ui, &Summary::from_records(&records));
        ui.add_space(12.0);

        ui.columns(2, |columns| {
            chart_card(&mut columns[0], "Cell count trend", "Change in cell count over time", |ui| {
                let bars: Vec<_> = records
                    .iter()
                    .map(|r| (short_date(&r.date), r.count as f32, BAR_COLOR))
                    .collect();
                bar_chart(ui, &bars, 250.0);
            });
            chart_card(&mut columns[1], "Sample quality distribution", "Share of analyses per quality", |ui| {
                let bars: Vec<_> = quality_distribution()
                    .iter()
                    .map(|s| (s.quality.display_name().to_string(), s.percent as f32, quality_color(s.quality)))
                    .collect();
                bar_chart(ui, &bars, 100.0);
            });
        });
        ui.add_space(8.0);
        ui.columns(2, |columns| {
            chart_card(&mut columns[0], "Analysis confidence", "Accuracy of the AI results", |ui| {
                let bars: Vec<_> = records
                    .iter()
                    .map(|r| (short_date(&r.date), r.confidence as f32, quality_color(r.quality)))
                    .collect();
                bar_chart(ui, &bars, 100.0);
            });
            chart_card(&mut columns[1], "Weekly averages", "Week over week comparison", |ui| {
                let points: Vec<_> = weekly_trends()
                    .iter()
                    .map(|w| (format!("Week {}", w.week), w.avg_count as f32))
                    .collect();
                line_chart(ui, &points, 200.0);
            });
        });

        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.strong("Recent analyses");
            ui.label(egui::RichText::new("Latest completed analyses").weak());
            ui.add_space(4.0);
            recent_table(ui, &records);
        });

        if settings.save_results {
            ui.add_space(12.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.strong("This session");
                if history.is_empty() {
                    ui.label(egui::RichText::new("No analyses yet").weak());
                }
                for entry in history.iter() {
                    ui.horizontal(|ui| {
                        ui.label(entry.recorded_at.format("%H:%M:%S").to_string());
                        ui.label(&entry.asset_name);
                        ui.label(format!("{} cells", entry.result.count));
                        ui.label(format!("{:.1}%", entry.result.confidence));
                        ui.label(
                            egui::RichText::new(entry.result.quality.display_name())
                                .color(quality_color(entry.result.quality)),
                        );
                    });
                }
            });
        }
    }
}

fn export(records: &[AnalysisRecord], notifications: &mut Notifications) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("YAML", &["yaml", "yml"])
        .set_file_name(DEFAULT_EXPORT_NAME)
        .save_file()
    else {
        return;
    };
    match export_records(records, &path) {
        Ok(()) => {
            log::info!("Exported {} records to {}", records.len(), path.display());
            notifications.info("Data exported", path.display().to_string());
        }
        Err(e) => {
            log::error!("Failed to export records: {}", e);
            notifications.error("Export failed", e.to_string());
        }
    }
}

/// `2024-01-05` becomes `01-05`.
fn short_date(date: &str) -> String {
    date.get(5..).unwrap_or(date).to_string()
}

fn summary_cards(ui: &mut egui::Ui, summary: &Summary) {
    let cards = [
        ("Total analyses", summary.total.to_string()),
        ("Average cell count", summary.avg_count.to_string()),
        ("Average confidence", format!("{}%", summary.avg_confidence)),
        ("Excellent quality", summary.excellent.to_string()),
    ];
    ui.columns(cards.len(), |columns| {
        for (column, (title, value)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(column.style()).show(column, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(title).weak());
                ui.label(egui::RichText::new(value).size(26.0).strong());
            });
        }
    });
}

fn chart_card(ui: &mut egui::Ui, title: &str, description: &str, add_chart: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.label(egui::RichText::new(description).weak());
        ui.add_space(4.0);
        add_chart(ui);
    });
}

/// Vertical bars scaled against `max`, labelled underneath.
fn bar_chart(ui: &mut egui::Ui, bars: &[(String, f32, egui::Color32)], max: f32) {
    let (area, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), CHART_HEIGHT),
        egui::Sense::hover(),
    );
    if bars.is_empty() || max <= 0.0 {
        return;
    }
    let painter = ui.painter_at(area);
    let text_color = ui.visuals().text_color();
    let plot = egui::Rect::from_min_max(area.min, egui::pos2(area.max.x, area.max.y - 16.0));
    let slot = plot.width() / bars.len() as f32;

    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        egui::Stroke::new(1.0, ui.visuals().weak_text_color()),
    );
    for (i, (label, value, color)) in bars.iter().enumerate() {
        let height = (value / max).clamp(0.0, 1.0) * (plot.height() - 14.0);
        let center_x = plot.min.x + slot * (i as f32 + 0.5);
        let bar = egui::Rect::from_min_max(
            egui::pos2(center_x - slot * 0.3, plot.max.y - height),
            egui::pos2(center_x + slot * 0.3, plot.max.y),
        );
        painter.rect_filled(bar, 2.0, *color);
        painter.text(
            egui::pos2(center_x, bar.min.y - 2.0),
            egui::Align2::CENTER_BOTTOM,
            format!("{}", value),
            egui::FontId::proportional(10.0),
            text_color,
        );
        painter.text(
            egui::pos2(center_x, area.max.y),
            egui::Align2::CENTER_BOTTOM,
            label,
            egui::FontId::proportional(10.0),
            text_color,
        );
    }
}

/// Connected points scaled against `max`, labelled underneath.
fn line_chart(ui: &mut egui::Ui, points: &[(String, f32)], max: f32) {
    let (area, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), CHART_HEIGHT),
        egui::Sense::hover(),
    );
    if points.is_empty() || max <= 0.0 {
        return;
    }
    let painter = ui.painter_at(area);
    let text_color = ui.visuals().text_color();
    let plot = egui::Rect::from_min_max(
        egui::pos2(area.min.x, area.min.y + 14.0),
        egui::pos2(area.max.x, area.max.y - 16.0),
    );
    let slot = plot.width() / points.len() as f32;

    let positions: Vec<egui::Pos2> = points
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            egui::pos2(
                plot.min.x + slot * (i as f32 + 0.5),
                plot.max.y - (value / max).clamp(0.0, 1.0) * plot.height(),
            )
        })
        .collect();

    painter.add(egui::Shape::line(
        positions.clone(),
        egui::Stroke::new(2.0, LINE_COLOR),
    ));
    for (pos, (label, value)) in positions.iter().zip(points) {
        painter.circle_filled(*pos, 4.0, LINE_COLOR);
        painter.text(
            *pos - egui::vec2(0.0, 6.0),
            egui::Align2::CENTER_BOTTOM,
            format!("{}", value),
            egui::FontId::proportional(10.0),
            text_color,
        );
        painter.text(
            egui::pos2(pos.x, area.max.y),
            egui::Align2::CENTER_BOTTOM,
            label,
            egui::FontId::proportional(10.0),
            text_color,
        );
    }
}

fn recent_table(ui: &mut egui::Ui, records: &[AnalysisRecord]) {
    egui::Grid::new("recent_analyses")
        .num_columns(4)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Date");
            ui.strong("Cell count");
            ui.strong("Confidence");
            ui.strong("Quality");
            ui.end_row();

            for record in records.iter().rev() {
                ui.label(&record.date);
                ui.label(record.count.to_string());
                ui.label(format!("{}%", record.confidence));
                ui.label(
                    egui::RichText::new(record.quality.display_name())
                        .color(quality_color(record.quality)),
                );
                ui.end_row();
            }
        });
}
