// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bottom navigation bar.

use crate::navigation::Route;

fn icon(route: Route) -> &'static str {
    match route {
        Route::Home => "🏠",
        Route::AnalysisResults => "🔬",
        Route::Analytics => "📈",
        Route::Settings => "⚙",
    }
}

/// Display the navigation bar. Returns the route the user picked, if any.
///
/// Picking results without a pending analysis lands back on home.
pub fn show(ui: &mut egui::Ui, current: Route) -> Option<Route> {
    let mut picked = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        for route in Route::ALL {
            let text = format!("{} {}", icon(route), route.label());
            if ui.selectable_label(current == route, text).clicked() && current != route {
                picked = Some(route);
            }
        }
    });
    picked
}
