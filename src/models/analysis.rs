// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analysis result data structures.
//!
//! This module defines the record produced by an analysis pass, the
//! qualitative labels attached to it, and the count status thresholds
//! used by the results screen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative image quality reported with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    pub const ALL: [QualityLabel; 4] = [
        QualityLabel::Excellent,
        QualityLabel::Good,
        QualityLabel::Fair,
        QualityLabel::Poor,
    ];

    /// Lowercase wire name (`excellent`, `good`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "excellent",
            QualityLabel::Good => "good",
            QualityLabel::Fair => "fair",
            QualityLabel::Poor => "poor",
        }
    }

    /// Capitalized name for badges.
    pub fn display_name(&self) -> &'static str {
        match self {
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Good => "Good",
            QualityLabel::Fair => "Fair",
            QualityLabel::Poor => "Poor",
        }
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("unknown quality label: {s}"))
    }
}

/// Output of one analysis pass. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Number of detected cells.
    pub count: u32,
    /// Confidence percentage in [0, 100].
    pub confidence: f64,
    /// Reported processing time in seconds.
    pub duration_seconds: f64,
    pub quality: QualityLabel,
}

/// Qualitative status derived from the detected count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStatus {
    NoneDetected,
    Low,
    Moderate,
    High,
}

impl CountStatus {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => CountStatus::NoneDetected,
            1..=9 => CountStatus::Low,
            10..=49 => CountStatus::Moderate,
            _ => CountStatus::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CountStatus::NoneDetected => "none detected",
            CountStatus::Low => "low",
            CountStatus::Moderate => "moderate",
            CountStatus::High => "high",
        }
    }
}

/// A cosmetic detection rectangle, in percent of the media area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
