// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the SpermVision application.

pub mod analytics;
pub mod camera;
pub mod home;
pub mod media_view;
pub mod nav;
pub mod notifications;
pub mod results;
pub mod settings;
