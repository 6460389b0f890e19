//! Phase 4: Synthetic identifier assignment
//!
//! The fourth phase of the unification pipeline. Every record left in the
//! title-keyed working set still lacks a linking ISSN; this phase gives
//! each of them a unified identifier, in strict preference order:
//!
//! 1. linking ISSN, should one have arrived through a late merge - adopted
//!    directly, no synthetic prefix
//! 2. registry id -> `REG-<id>`
//! 3. an ISBN-13 stored in the abbreviation field -> `ISBN-<isbn>`
//! 4. external source id -> `EXT-<id>`
//! 5. normalized title hash -> `TITLE-<hash8>`
//!
//! A record satisfying none of these has nothing to be addressed by and is
//! dropped (logged and counted, not fatal).

use log::debug;

use crate::model::{external_identifier, is_isbn, isbn_identifier, registry_identifier};
use crate::stats::RunStats;
use crate::title::{normalize_title, title_identifier};

use super::CanonicalMap;

/// Execute Phase 4: assign unified identifiers to the title-keyed working
/// set, dropping records no strategy applies to.
pub fn execute(working_set: &mut CanonicalMap, stats: &mut RunStats) {
    working_set.retain(|_, record| {
        if let Some(issn_l) = &record.issn_l {
            record.unified_id = Some(issn_l.clone());
            return true;
        }

        if let Some(registry_id) = &record.registry_id {
            record.unified_id = Some(registry_identifier(registry_id));
            stats.synthetic_registry += 1;
            return true;
        }

        if let Some(isbn) = record.abbreviation.as_deref().filter(|value| is_isbn(value)) {
            record.unified_id = Some(isbn_identifier(isbn));
            stats.synthetic_isbn += 1;
            return true;
        }

        if let Some(external_id) = &record.external_id {
            record.unified_id = Some(external_identifier(external_id));
            stats.synthetic_external += 1;
            return true;
        }

        if let Some(title) = record.title.as_deref().and_then(normalize_title) {
            record.unified_id = Some(title_identifier(&title));
            stats.synthetic_title += 1;
            return true;
        }

        debug!("dropping record with no assignable identifier");
        stats.dropped += 1;
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalRecord, DataSource};

    fn working_record(title: Option<&str>) -> CanonicalRecord {
        CanonicalRecord {
            title: title.map(str::to_string),
            sources: vec![DataSource::Reference],
            ..CanonicalRecord::default()
        }
    }

    fn run(record: CanonicalRecord) -> (CanonicalMap, RunStats) {
        let mut working_set = CanonicalMap::new();
        working_set.insert("key".to_string(), record);
        let mut stats = RunStats::default();
        execute(&mut working_set, &mut stats);
        (working_set, stats)
    }

    #[test]
    fn test_registry_id_preferred_over_external_and_title() {
        let mut record = working_record(Some("Alpha"));
        record.registry_id = Some("1234567".to_string());
        record.external_id = Some("S99".to_string());

        let (working_set, stats) = run(record);
        assert_eq!(
            working_set["key"].unified_id.as_deref(),
            Some("REG-1234567")
        );
        assert_eq!(stats.synthetic_registry, 1);
        assert_eq!(stats.synthetic_external, 0);
        assert_eq!(stats.synthetic_title, 0);
    }

    #[test]
    fn test_isbn_in_abbreviation_beats_external_id() {
        let mut record = working_record(Some("Alpha"));
        record.abbreviation = Some("978-3-16-148410-0".to_string());
        record.external_id = Some("S99".to_string());

        let (working_set, stats) = run(record);
        assert_eq!(
            working_set["key"].unified_id.as_deref(),
            Some("ISBN-978-3-16-148410-0")
        );
        assert_eq!(stats.synthetic_isbn, 1);
    }

    #[test]
    fn test_non_isbn_abbreviation_is_ignored() {
        let mut record = working_record(Some("Alpha"));
        record.abbreviation = Some("Acta Med.".to_string());
        record.external_id = Some("S99".to_string());

        let (working_set, stats) = run(record);
        assert_eq!(working_set["key"].unified_id.as_deref(), Some("EXT-S99"));
        assert_eq!(stats.synthetic_external, 1);
    }

    #[test]
    fn test_title_hash_is_last_resort() {
        let (working_set, stats) = run(working_record(Some("Alpha")));
        let id = working_set["key"].unified_id.clone().unwrap();
        assert!(id.starts_with("TITLE-"));
        assert_eq!(stats.synthetic_title, 1);
    }

    #[test]
    fn test_linking_issn_adopted_directly() {
        let mut record = working_record(Some("Alpha"));
        record.issn_l = Some("1111-2222".to_string());
        record.registry_id = Some("500".to_string());

        let (working_set, stats) = run(record);
        assert_eq!(working_set["key"].unified_id.as_deref(), Some("1111-2222"));
        assert_eq!(stats.synthetic_registry, 0);
    }

    #[test]
    fn test_record_with_nothing_is_dropped() {
        let (working_set, stats) = run(working_record(None));
        assert!(working_set.is_empty());
        assert_eq!(stats.dropped, 1);
    }
}
