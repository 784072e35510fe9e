// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: media, analysis results, settings and analytics.

pub mod analysis;
pub mod analytics;
pub mod media;
pub mod settings;
