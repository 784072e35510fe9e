// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SpermVision AI
//!
//! A desktop application for selecting or capturing microscopy images and
//! videos and running a (simulated) AI sperm-count analysis on them.

mod analysis;
mod app;
mod capture;
mod error;
mod io;
mod models;
mod navigation;
mod preview;
mod selection;
mod ui;
mod util;

use anyhow::Result;
use app::SpermVisionApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("SpermVision AI")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "SpermVision",
        options,
        Box::new(|_cc| Ok(Box::new(SpermVisionApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
