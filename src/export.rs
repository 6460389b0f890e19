//! # Export
//!
//! Writing a run's results to disk for downstream consumers (the tabular
//! catalog build and the search-index loader both read these files):
//!
//! - canonical records as JSON Lines, in the engine's deterministic sort
//!   order, multi-valued fields serialized as ordered arrays
//! - the conflict report as pretty-printed JSON, for curator review
//! - run statistics and field coverage as one JSON summary document

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde_json::json;

use crate::conflicts::ConflictReport;
use crate::error::{Error, Result};
use crate::model::CanonicalRecord;
use crate::stats::{CoverageSummary, RunStats};

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|err| Error::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(BufWriter::new(file))
}

/// Write canonical records as JSON Lines, one record per line.
pub fn write_records(records: &[CanonicalRecord], path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write the conflict report as pretty JSON.
pub fn write_conflicts(conflicts: &ConflictReport, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, conflicts)?;
    writer.flush()?;
    info!(
        "wrote {} conflict entries to {}",
        conflicts.len(),
        path.display()
    );
    Ok(())
}

/// Write run statistics and coverage as one summary document.
pub fn write_summary(stats: &RunStats, coverage: &CoverageSummary, path: &Path) -> Result<()> {
    let summary = json!({
        "run": stats,
        "coverage": coverage,
    });
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writer.flush()?;
    info!("wrote summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataSource;
    use std::fs;
    use tempfile::TempDir;

    fn sample_record() -> CanonicalRecord {
        CanonicalRecord {
            unified_id: Some("1111-2222".to_string()),
            issn_l: Some("1111-2222".to_string()),
            title: Some("Alpha".to_string()),
            subjects: vec!["Medicine".to_string(), "Biology".to_string()],
            sources: vec![DataSource::Doaj],
            all_issns: vec!["1111-2222".to_string()],
            ..CanonicalRecord::default()
        }
    }

    #[test]
    fn test_records_round_trip_through_jsonl() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("unified.jsonl");
        write_records(&[sample_record()], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: CanonicalRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.unified_id.as_deref(), Some("1111-2222"));
        // Multi-valued fields come back as ordered arrays
        assert_eq!(parsed.subjects, vec!["Medicine", "Biology"]);
        assert_eq!(parsed.sources, vec![DataSource::Doaj]);
    }

    #[test]
    fn test_summary_contains_run_and_coverage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let stats = RunStats {
            records_total: 10,
            unified_total: 7,
            ..RunStats::default()
        };
        let coverage = CoverageSummary::from_records(&[sample_record()]);
        write_summary(&stats, &coverage, &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["run"]["records_total"], 10);
        assert_eq!(parsed["coverage"]["total"], 1);
    }

    #[test]
    fn test_export_to_unwritable_path_fails_with_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("unified.jsonl");
        let err = write_records(&[], &path).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
    }
}
