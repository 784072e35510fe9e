// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route table and in-memory navigation state.
//!
//! The results route receives the analyzed asset (and, when available,
//! its result) as ephemeral state. Nothing here is persisted.

use crate::models::analysis::AnalysisResult;
use crate::models::media::MediaAsset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    AnalysisResults,
    Analytics,
    Settings,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Home,
        Route::AnalysisResults,
        Route::Analytics,
        Route::Settings,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::AnalysisResults => "/analysis-results",
            Route::Analytics => "/analytics",
            Route::Settings => "/settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::AnalysisResults => "Results",
            Route::Analytics => "Analytics",
            Route::Settings => "Settings",
        }
    }
}

/// State carried into the results route.
#[derive(Debug, Clone)]
pub struct ResultsState {
    pub asset: MediaAsset,
    pub result: Option<AnalysisResult>,
}

#[derive(Debug)]
pub struct Navigator {
    route: Route,
    state: Option<ResultsState>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            route: Route::Home,
            state: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Plain navigation; any carried state is dropped.
    pub fn navigate(&mut self, route: Route) {
        if route != self.route {
            log::info!("Navigating {} -> {}", self.route.path(), route.path());
        }
        self.route = route;
        self.state = None;
    }

    pub fn navigate_with_state(&mut self, route: Route, state: ResultsState) {
        log::info!(
            "Navigating {} -> {} with {}",
            self.route.path(),
            route.path(),
            state.asset.name()
        );
        self.route = route;
        self.state = Some(state);
    }

    pub fn state(&self) -> Option<&ResultsState> {
        self.state.as_ref()
    }

    /// The route to render. The results route without state redirects to
    /// the root route.
    pub fn resolve(&mut self) -> Route {
        if self.route == Route::AnalysisResults && self.state.is_none() {
            log::info!("No analysis state, redirecting to {}", Route::Home.path());
            self.route = Route::Home;
        }
        self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaFile;

    fn state() -> ResultsState {
        ResultsState {
            asset: MediaAsset::from_file(MediaFile::new("a.jpg", "image/jpeg", vec![0u8; 2])).unwrap(),
            result: None,
        }
    }

    #[test]
    fn test_route_paths() {
        let paths: Vec<_> = Route::ALL.iter().map(Route::path).collect();
        assert_eq!(paths, vec!["/", "/analysis-results", "/analytics", "/settings"]);
    }

    #[test]
    fn test_results_without_state_redirects_home() {
        let mut navigator = Navigator::new();
        navigator.navigate(Route::AnalysisResults);
        assert_eq!(navigator.resolve(), Route::Home);
        assert_eq!(navigator.route(), Route::Home);
    }

    #[test]
    fn test_results_with_state_stays() {
        let mut navigator = Navigator::new();
        navigator.navigate_with_state(Route::AnalysisResults, state());
        assert_eq!(navigator.resolve(), Route::AnalysisResults);
        assert_eq!(navigator.state().unwrap().asset.name(), "a.jpg");

        // Leaving drops the carried state; coming back redirects
        navigator.navigate(Route::Analytics);
        assert!(navigator.state().is_none());
        navigator.navigate(Route::AnalysisResults);
        assert_eq!(navigator.resolve(), Route::Home);
    }

    #[test]
    fn test_other_routes_resolve_as_is() {
        let mut navigator = Navigator::new();
        for route in [Route::Analytics, Route::Settings, Route::Home] {
            navigator.navigate(route);
            assert_eq!(navigator.resolve(), route);
        }
    }
}
