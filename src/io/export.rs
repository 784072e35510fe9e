// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analytics data export.
//!
//! This module writes the analytics dataset as CSV, JSON or YAML. The
//! format is picked from the file extension.

use crate::models::analytics::AnalysisRecord;
use anyhow::{bail, Result};
use std::path::Path;

/// CSV header: date, cell count, confidence, quality.
pub const CSV_HEADER: &str = "التاريخ,عدد الخلايا,الثقة,الجودة";

/// Suggested file name for the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "sperm_analysis_data.csv";

/// Render records as CSV text, one line per record after the header.
pub fn to_csv(records: &[AnalysisRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(records.iter().map(|r| {
        format!("{},{},{}%,{}", r.date, r.count, r.confidence, r.quality)
    }));
    lines.join("\n")
}

/// Export records to CSV format.
pub fn export_csv(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    std::fs::write(path, to_csv(records))?;
    Ok(())
}

/// Export records to JSON format.
pub fn export_json(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export records to YAML format.
pub fn export_yaml(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(records)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export records in the format matching the extension of `path`.
pub fn export_records(records: &[AnalysisRecord], path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") => export_csv(records, path),
        Some("json") => export_json(records, path),
        Some("yaml") | Some("yml") => export_yaml(records, path),
        other => bail!("Unsupported export extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::QualityLabel;
    use crate::models::analytics::sample_records;

    #[test]
    fn test_csv_layout() {
        let records = vec![
            AnalysisRecord::new("2024-01-01", 120, QualityLabel::Excellent, 92),
            AnalysisRecord::new("2024-01-04", 67, QualityLabel::Fair, 82),
        ];
        assert_eq!(
            to_csv(&records),
            "التاريخ,عدد الخلايا,الثقة,الجودة\n2024-01-01,120,92%,excellent\n2024-01-04,67,82%,fair"
        );
    }

    #[test]
    fn test_csv_of_empty_dataset_is_header_only() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn test_export_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_records();

        let csv = dir.path().join("data.csv");
        export_records(&records, &csv).unwrap();
        assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 8);

        let json = dir.path().join("data.json");
        export_records(&records, &json).unwrap();
        let parsed: Vec<AnalysisRecord> =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed, records);

        let yaml = dir.path().join("data.YML");
        export_records(&records, &yaml).unwrap();
        let parsed: Vec<AnalysisRecord> =
            serde_yaml::from_str(&std::fs::read_to_string(&yaml).unwrap()).unwrap();
        assert_eq!(parsed.len(), 7);

        assert!(export_records(&records, &dir.path().join("data.txt")).is_err());
    }
}
