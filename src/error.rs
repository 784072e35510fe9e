// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared across the application.
//!
//! Every error here is recoverable: screens catch them, log them and show
//! a notification. Nothing is fatal to the process.

use thiserror::Error;

/// Failures of the camera capture path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The user or the OS refused camera access.
    #[error("camera access was denied")]
    PermissionDenied,
    /// No usable camera, or the backend could not open it.
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),
    /// Operation needs an open camera.
    #[error("camera is not active")]
    NotActive,
    /// `stop_recording` called without a recording in progress.
    #[error("no recording in progress")]
    NotRecording,
    /// A captured frame could not be encoded.
    #[error("failed to encode captured frame: {0}")]
    Encode(String),
}

/// Failures of an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Analysis requested with no selected media.
    #[error("no media selected for analysis")]
    InvalidArgument,
    /// An analysis is already in flight.
    #[error("an analysis is already running")]
    Busy,
    /// The request was cancelled before it produced a result.
    #[error("analysis was cancelled")]
    Cancelled,
}

/// Failures of the key-value settings storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage record is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures while reading or decoding media.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read media: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported media type: {0}")]
    UnsupportedFile(String),
    #[error("failed to decode media: {0}")]
    Decode(String),
}
