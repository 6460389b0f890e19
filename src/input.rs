//! # Record and Link Table Input
//!
//! Reading the engine's two inputs from disk:
//!
//! - **Source records**: JSON Lines, one normalized [`JournalRecord`] per
//!   line, typically one file per source under an input directory. Files
//!   are read in lexicographic name order so a run over the same directory
//!   always sees the same input order (which the merge policy is sensitive
//!   to). Malformed lines are warned about and skipped; a malformed line
//!   must never abort a run over millions of good ones.
//!
//! - **Link table**: a single JSON object mapping each ISSN to its linking
//!   ISSN.
//!
//! The loaders that *produce* these files (per-source acquisition and
//! value normalization) are external to this crate.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::LinkTable;
use crate::error::{Error, Result};
use crate::model::JournalRecord;

fn input_error(path: &Path, err: impl ToString) -> Error {
    Error::InputRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// List the `.jsonl` record files under a directory, in lexicographic
/// order.
pub fn list_record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| input_error(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| input_error(dir, err))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one JSON Lines record file, skipping malformed lines with a
/// warning.
pub fn read_records_file(path: &Path) -> Result<Vec<JournalRecord>> {
    let file = File::open(path).map_err(|err| input_error(path, err))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| input_error(path, err))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<JournalRecord>(&line) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(
                    "{}:{}: skipping malformed record: {}",
                    path.display(),
                    index + 1,
                    err
                );
                skipped += 1;
            }
        }
    }

    debug!(
        "{}: {} records read, {} skipped",
        path.display(),
        records.len(),
        skipped
    );
    Ok(records)
}

/// Read every `.jsonl` file under a directory into one record list,
/// file by file in lexicographic order.
pub fn read_records_dir(dir: &Path) -> Result<Vec<JournalRecord>> {
    let mut records = Vec::new();
    for path in list_record_files(dir)? {
        records.extend(read_records_file(&path)?);
    }
    Ok(records)
}

/// Read the ISSN link table: a JSON object mapping ISSN to linking ISSN.
pub fn read_link_table(path: &Path) -> Result<LinkTable> {
    let data = fs::read_to_string(path).map_err(|err| Error::LinkTable {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let links: HashMap<String, String> =
        serde_json::from_str(&data).map_err(|err| Error::LinkTable {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(LinkTable::from_map(links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_records_file_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "doaj.jsonl",
            concat!(
                "{\"source\": \"doaj\", \"title\": \"Alpha\"}\n",
                "not json at all\n",
                "\n",
                "{\"source\": \"doaj\", \"title\": \"Beta\"}\n",
            ),
        );

        let records = read_records_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Alpha"));
        assert_eq!(records[1].title.as_deref(), Some("Beta"));
    }

    #[test]
    fn test_read_records_dir_is_ordered_by_file_name() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "b_crossref.jsonl",
            "{\"source\": \"crossref\", \"title\": \"Second\"}\n",
        );
        write_file(
            dir.path(),
            "a_doaj.jsonl",
            "{\"source\": \"doaj\", \"title\": \"First\"}\n",
        );
        // Non-jsonl files are ignored
        write_file(dir.path(), "notes.txt", "not a record file\n");

        let records = read_records_dir(dir.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("First"));
        assert_eq!(records[1].title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_read_records_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = read_records_dir(&missing).unwrap_err();
        assert!(matches!(err, Error::InputRead { .. }));
    }

    #[test]
    fn test_read_link_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "links.json",
            r#"{"3333-4444": "1111-2222", "1111-2222": "1111-2222"}"#,
        );

        let links = read_link_table(&path).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links.resolve("3333-4444"), Some("1111-2222"));
    }

    #[test]
    fn test_read_link_table_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "links.json", "[1, 2, 3]");
        let err = read_link_table(&path).unwrap_err();
        assert!(matches!(err, Error::LinkTable { .. }));
    }
}
