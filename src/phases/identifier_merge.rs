//! Phase 2: Identifier-keyed fold
//!
//! The second phase of the unification pipeline. Every identifier-bearing
//! record is resolved to its canonical key through the registered resolver
//! and folded into the canonical record for that key: first sight of a key
//! creates the record (and fixes its `unified_id` to the key), every later
//! record for the same key merges under the field merge policy.
//!
//! Records whose key cannot be resolved are skipped and counted, never
//! fatal.

use log::debug;

use crate::config::SourcePriorities;
use crate::merge::{create_canonical, merge_record};
use crate::model::JournalRecord;
use crate::resolver::KeyResolver;
use crate::stats::RunStats;

use super::CanonicalMap;

/// Execute Phase 2: fold identifier-bearing records by canonical key.
pub fn execute(
    records: &[JournalRecord],
    resolver: &KeyResolver<'_>,
    priorities: &SourcePriorities,
    stats: &mut RunStats,
) -> CanonicalMap {
    let mut unified = CanonicalMap::new();

    for record in records {
        let Some(key) = resolver.canonical_key(record) else {
            debug!("skipping record without resolvable key: {:?}", record.title);
            stats.unkeyed += 1;
            continue;
        };

        match unified.get_mut(&key) {
            Some(existing) => merge_record(existing, record, priorities),
            None => {
                let mut canonical = create_canonical(record);
                canonical.unified_id = Some(key.clone());
                unified.insert(key, canonical);
            }
        }
    }

    stats.identifier_records = unified.len();
    unified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkTable;
    use crate::model::DataSource;
    use crate::phases::phase1;

    fn record(source: DataSource, pissn: Option<&str>, eissn: Option<&str>) -> JournalRecord {
        JournalRecord {
            issn_print: pissn.map(str::to_string),
            issn_electronic: eissn.map(str::to_string),
            title: Some("Test Journal".to_string()),
            ..JournalRecord::new(source)
        }
    }

    #[test]
    fn test_phase2_creates_one_record_per_key() {
        let links = LinkTable::new();
        let priorities = SourcePriorities::default();
        let mut stats = RunStats::default();

        let records = vec![
            record(DataSource::Doaj, Some("1111-2222"), None),
            record(DataSource::Crossref, Some("3333-4444"), None),
        ];
        let resolver = phase1::execute(&records, &links);
        let unified = execute(&records, &resolver, &priorities, &mut stats);

        assert_eq!(unified.len(), 2);
        assert_eq!(
            unified["1111-2222"].unified_id.as_deref(),
            Some("1111-2222")
        );
        assert_eq!(stats.unkeyed, 0);
    }

    #[test]
    fn test_phase2_folds_records_sharing_a_key() {
        let mut links = LinkTable::new();
        links.insert("3333-4444", "1111-2222");
        links.insert("1111-2222", "1111-2222");
        let priorities = SourcePriorities::default();
        let mut stats = RunStats::default();

        let records = vec![
            record(DataSource::Doaj, Some("1111-2222"), None),
            record(DataSource::Crossref, None, Some("3333-4444")),
        ];
        let resolver = phase1::execute(&records, &links);
        let unified = execute(&records, &resolver, &priorities, &mut stats);

        assert_eq!(unified.len(), 1);
        let merged = &unified["1111-2222"];
        assert_eq!(merged.sources.len(), 2);
        assert_eq!(merged.issn_print.as_deref(), Some("1111-2222"));
        assert_eq!(merged.issn_electronic.as_deref(), Some("3333-4444"));
    }

    #[test]
    fn test_phase2_preserves_input_order_of_keys() {
        let links = LinkTable::new();
        let priorities = SourcePriorities::default();
        let mut stats = RunStats::default();

        let records = vec![
            record(DataSource::Doaj, Some("9999-0000"), None),
            record(DataSource::Doaj, Some("1111-2222"), None),
        ];
        let resolver = phase1::execute(&records, &links);
        let unified = execute(&records, &resolver, &priorities, &mut stats);

        let keys: Vec<&String> = unified.keys().collect();
        assert_eq!(keys, vec!["9999-0000", "1111-2222"]);
    }
}
