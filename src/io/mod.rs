// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: media files, settings storage and data export.

pub mod export;
pub mod media;
pub mod settings_store;
pub mod storage;
