// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analytics dataset and session history.
//!
//! The analytics screen charts a fixed sample dataset. Results produced
//! during the current session are kept in a bounded, most-recent-first
//! [`ResultHistory`] and shown next to it.

use super::analysis::{AnalysisResult, QualityLabel};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One row of the analytics dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub date: String,
    pub count: u32,
    pub quality: QualityLabel,
    /// Confidence percentage, rounded.
    pub confidence: u32,
}

impl AnalysisRecord {
    pub fn new(date: &str, count: u32, quality: QualityLabel, confidence: u32) -> Self {
        Self {
            date: date.to_string(),
            count,
            quality,
            confidence,
        }
    }
}

/// The built-in sample dataset shown on the analytics screen.
pub fn sample_records() -> Vec<AnalysisRecord> {
    use QualityLabel::*;
    vec![
        AnalysisRecord::new("2024-01-01", 120, Excellent, 92),
        AnalysisRecord::new("2024-01-02", 85, Good, 88),
        AnalysisRecord::new("2024-01-03", 150, Excellent, 95),
        AnalysisRecord::new("2024-01-04", 67, Fair, 82),
        AnalysisRecord::new("2024-01-05", 200, Excellent, 96),
        AnalysisRecord::new("2024-01-06", 95, Good, 87),
        AnalysisRecord::new("2024-01-07", 180, Excellent, 94),
    ]
}

/// Share of analyses per quality label, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityShare {
    pub quality: QualityLabel,
    pub percent: u32,
}

pub fn quality_distribution() -> [QualityShare; 4] {
    [
        QualityShare { quality: QualityLabel::Excellent, percent: 45 },
        QualityShare { quality: QualityLabel::Good, percent: 30 },
        QualityShare { quality: QualityLabel::Fair, percent: 20 },
        QualityShare { quality: QualityLabel::Poor, percent: 5 },
    ]
}

/// Weekly averages for the trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTrend {
    pub week: u32,
    pub avg_count: u32,
    pub avg_confidence: u32,
}

pub fn weekly_trends() -> [WeeklyTrend; 4] {
    [
        WeeklyTrend { week: 1, avg_count: 120, avg_confidence: 88 },
        WeeklyTrend { week: 2, avg_count: 135, avg_confidence: 91 },
        WeeklyTrend { week: 3, avg_count: 110, avg_confidence: 85 },
        WeeklyTrend { week: 4, avg_count: 155, avg_confidence: 93 },
    ]
}

/// Range selector on the analytics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Quarter,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::Quarter];

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
        }
    }
}

/// Headline numbers of the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub avg_count: u32,
    pub avg_confidence: u32,
    pub excellent: usize,
}

impl Summary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let total = records.len();
        let count_sum: u64 = records.iter().map(|r| r.count as u64).sum();
        let confidence_sum: u64 = records.iter().map(|r| r.confidence as u64).sum();
        Self {
            total,
            avg_count: (count_sum as f64 / total as f64).round() as u32,
            avg_confidence: (confidence_sum as f64 / total as f64).round() as u32,
            excellent: records
                .iter()
                .filter(|r| r.quality == QualityLabel::Excellent)
                .count(),
        }
    }
}

/// A result produced during this session.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Local>,
    pub asset_name: String,
    pub result: AnalysisResult,
}

impl HistoryEntry {
    pub fn to_record(&self) -> AnalysisRecord {
        AnalysisRecord {
            date: self.recorded_at.format("%Y-%m-%d").to_string(),
            count: self.result.count,
            quality: self.result.quality,
            confidence: self.result.confidence.round() as u32,
        }
    }
}

/// In-memory list of recent results, newest first.
#[derive(Debug, Clone)]
pub struct ResultHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for ResultHistory {
    fn default() -> Self {
        Self::with_capacity(20)
    }
}

impl ResultHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, asset_name: &str, result: AnalysisResult) {
        self.entries.push_front(HistoryEntry {
            recorded_at: Local::now(),
            asset_name: asset_name.to_string(),
            result,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Session results as dataset rows, oldest first.
    pub fn to_records(&self) -> Vec<AnalysisRecord> {
        self.entries.iter().rev().map(HistoryEntry::to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(count: u32) -> AnalysisResult {
        AnalysisResult {
            count,
            confidence: 90.4,
            duration_seconds: 3.0,
            quality: QualityLabel::Good,
        }
    }

    #[test]
    fn test_sample_summary() {
        let summary = Summary::from_records(&sample_records());
        assert_eq!(summary.total, 7);
        assert_eq!(summary.avg_count, 128); // 897 / 7
        assert_eq!(summary.avg_confidence, 91); // 634 / 7
        assert_eq!(summary.excellent, 4);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(Summary::from_records(&[]), Summary::default());
    }

    #[test]
    fn test_distribution_sums_to_hundred() {
        let total: u32 = quality_distribution().iter().map(|s| s.percent).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut history = ResultHistory::with_capacity(3);
        for count in 1..=5 {
            history.record(&format!("sample-{count}.jpg"), result(count));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().unwrap().result.count, 5);
        let counts: Vec<u32> = history.iter().map(|e| e.result.count).collect();
        assert_eq!(counts, vec![5, 4, 3]);

        let records = history.to_records();
        assert_eq!(records.first().unwrap().count, 3);
        assert_eq!(records.last().unwrap().confidence, 90);
    }
}
