// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the settings, the navigation state and the screens,
//! and routes each frame to the screen of the current route. Screens live
//! only while their route is shown; leaving a route drops its screen and
//! with it any camera, preview or analysis it held.

use crate::analysis::engine::{AnalysisEngine, MockAnalysisEngine};
use crate::io::settings_store::SettingsStore;
use crate::io::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::models::analysis::AnalysisResult;
use crate::models::analytics::ResultHistory;
use crate::models::media::MediaAsset;
use crate::navigation::{Navigator, ResultsState, Route};
use crate::ui::analytics::AnalyticsScreen;
use crate::ui::home::{HomeAction, HomeScreen};
use crate::ui::notifications::Notifications;
use crate::ui::results::{ResultsAction, ResultsScreen};
use crate::ui::settings::SettingsAction;
use crate::ui::{nav, settings};
use std::sync::Arc;

/// Navigation requested by a screen.
enum Transition {
    To(Route),
    Results(ResultsState),
}

/// Main application state.
pub struct SpermVisionApp {
    /// Live settings and their persistent storage
    settings: SettingsStore<Box<dyn KeyValueStore>>,

    navigator: Navigator,

    engine: Arc<dyn AnalysisEngine>,

    home: Option<HomeScreen>,
    results: Option<ResultsScreen>,
    analytics: AnalyticsScreen,

    /// Results produced during this session
    history: ResultHistory,

    notifications: Notifications,

    /// Theme currently applied to the context
    applied_dark_mode: Option<bool>,
}

impl Default for SpermVisionApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SpermVisionApp {
    /// Create a new application instance with settings from the default
    /// storage location.
    pub fn new() -> Self {
        let (storage, problem) = open_storage();
        let mut app = Self::with_parts(storage, Arc::new(MockAnalysisEngine::new()));
        if let Some(problem) = problem {
            app.notifications.error(
                "Settings will not be kept",
                format!("Changes last only until the app closes ({})", problem),
            );
        }
        app
    }

    pub fn with_parts(storage: Box<dyn KeyValueStore>, engine: Arc<dyn AnalysisEngine>) -> Self {
        Self {
            settings: SettingsStore::load(storage),
            navigator: Navigator::new(),
            engine,
            home: None,
            results: None,
            analytics: AnalyticsScreen::new(),
            history: ResultHistory::default(),
            notifications: Notifications::new(),
            applied_dark_mode: None,
        }
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        let dark = self.settings.settings().dark_mode;
        if self.applied_dark_mode != Some(dark) {
            ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.applied_dark_mode = Some(dark);
        }
    }

    /// Drop the screens of routes that are not shown.
    fn tear_down_hidden_screens(&mut self, route: Route) {
        if route != Route::Home && self.home.take().is_some() {
            log::debug!("Closed home screen");
        }
        if route != Route::AnalysisResults && self.results.take().is_some() {
            log::debug!("Closed results screen");
        }
    }

    /// Navigate from the navigation bar. Results opened from there run the
    /// live analysis of the media selected on the home screen, if any.
    fn go(&mut self, route: Route) {
        if route == Route::AnalysisResults {
            let selected = self
                .home
                .as_ref()
                .filter(|home| !home.is_analyzing())
                .and_then(HomeScreen::selected);
            if let Some(asset) = selected {
                let state = ResultsState {
                    asset: asset.clone(),
                    result: None,
                };
                self.navigator.navigate_with_state(route, state);
                return;
            }
        }
        self.navigator.navigate(route);
    }

    fn record(&mut self, asset: &MediaAsset, result: AnalysisResult) {
        if self.settings.settings().save_results {
            self.history.record(asset.name(), result);
        }
    }

    fn show_route(&mut self, ui: &mut egui::Ui, route: Route) -> Option<Transition> {
        let ctx = ui.ctx().clone();
        match route {
            Route::Home => {
                let engine = &self.engine;
                let settings = self.settings.settings();
                let home = self
                    .home
                    .get_or_insert_with(|| HomeScreen::new(&ctx, Arc::clone(engine), settings));
                match home.show(ui, settings, &mut self.notifications) {
                    HomeAction::None => None,
                    HomeAction::Navigate(route) => Some(Transition::To(route)),
                    HomeAction::Analyzed { asset, result } => {
                        self.record(&asset, result);
                        Some(Transition::Results(ResultsState {
                            asset,
                            result: Some(result),
                        }))
                    }
                }
            }
            Route::AnalysisResults => {
                let state = self.navigator.state()?;
                let stale = self
                    .results
                    .as_ref()
                    .map_or(true, |screen| screen.asset().id() != state.asset.id());
                if stale {
                    self.results = Some(ResultsScreen::new(&ctx, state, self.settings.settings()));
                }
                let screen = self.results.as_mut()?;
                match screen.show(ui) {
                    ResultsAction::None => None,
                    ResultsAction::Navigate(route) => Some(Transition::To(route)),
                    ResultsAction::Completed(result) => {
                        let asset = screen.asset().clone();
                        self.record(&asset, result);
                        None
                    }
                }
            }
            Route::Analytics => {
                self.analytics.show(
                    ui,
                    &self.history,
                    self.settings.settings(),
                    &mut self.notifications,
                );
                None
            }
            Route::Settings => {
                match settings::show(ui, self.settings.settings()) {
                    SettingsAction::None => {}
                    SettingsAction::Update(patch) => self.settings.update(patch),
                    SettingsAction::Save => match self.settings.save() {
                        Ok(()) => self
                            .notifications
                            .info("Settings saved", "All settings were saved successfully"),
                        Err(e) => {
                            log::error!("Failed to save settings: {}", e);
                            self.notifications.error("Saving failed", e.to_string());
                        }
                    },
                    SettingsAction::Reset => {
                        self.settings.reset();
                        self.notifications
                            .info("Settings reset", "Default settings were restored");
                    }
                }
                None
            }
        }
    }
}

/// File-backed storage, or an in-memory one when no file can be used. The
/// second value says why settings will not persist.
fn open_storage() -> (Box<dyn KeyValueStore>, Option<String>) {
    match FileStore::default_path().map(FileStore::open) {
        Some(Ok(store)) => (Box::new(store), None),
        Some(Err(e)) => {
            log::error!("Failed to open settings storage, settings will not persist: {}", e);
            (Box::new(MemoryStore::new()), Some(e.to_string()))
        }
        None => {
            log::warn!("No configuration directory, settings will not persist");
            (
                Box::new(MemoryStore::new()),
                Some("no configuration directory".to_string()),
            )
        }
    }
}

impl eframe::App for SpermVisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);

        let route = self.navigator.resolve();
        self.tear_down_hidden_screens(route);

        // Bottom navigation
        let picked = egui::TopBottomPanel::bottom("navigation")
            .show(ctx, |ui| nav::show(ui, route))
            .inner;

        // Current screen
        let transition = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.show_route(ui, route))
                    .inner
            })
            .inner;

        self.notifications.show(ctx);

        match transition {
            Some(Transition::To(route)) => self.go(route),
            Some(Transition::Results(state)) => {
                self.navigator.navigate_with_state(Route::AnalysisResults, state)
            }
            None => {}
        }
        if let Some(route) = picked {
            self.go(route);
        }
        if self.navigator.route() != route {
            ctx.request_repaint();
        }
    }
}
