//! Property-based tests for the unification engine.
//!
//! These tests use proptest to generate random record collections and
//! verify the engine's core invariants over all of them. Records are
//! sampled from a small universe of consistent journals (each with a fixed
//! print/electronic ISSN pair and a link table entry for both), the shape
//! real registry data has; identifier pairings that contradict the
//! registry are covered by the directed resolver and pipeline tests
//! instead.

#[cfg(test)]
mod proptest_tests {
    use crate::config::{LinkTable, SourcePriorities};
    use crate::model::{CanonicalRecord, DataSource, JournalRecord};
    use crate::phases::orchestrator::unify;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const JOURNALS: usize = 5;

    fn print_issn(journal: usize) -> String {
        format!("{journal:04}-1111")
    }

    fn electronic_issn(journal: usize) -> String {
        format!("{journal:04}-2222")
    }

    /// Link table pairing each journal's ISSNs under its print ISSN.
    fn link_table() -> LinkTable {
        let mut links = LinkTable::new();
        for journal in 0..JOURNALS {
            links.insert(print_issn(journal), print_issn(journal));
            links.insert(electronic_issn(journal), print_issn(journal));
        }
        links
    }

    fn source_strategy() -> impl Strategy<Value = DataSource> {
        (0usize..DataSource::KNOWN.len()).prop_map(|index| DataSource::KNOWN[index].clone())
    }

    /// One observation of one journal: a non-empty subset of its ISSNs plus
    /// per-source metadata.
    fn record_strategy() -> impl Strategy<Value = JournalRecord> {
        (
            0usize..JOURNALS,
            source_strategy(),
            prop_oneof![Just((true, false)), Just((false, true)), Just((true, true))],
            proptest::option::of("[A-Z][a-z]{2,8}"),
        )
            .prop_map(|(journal, source, (with_print, with_electronic), publisher)| {
                JournalRecord {
                    issn_print: with_print.then(|| print_issn(journal)),
                    issn_electronic: with_electronic.then(|| electronic_issn(journal)),
                    title: Some(format!("Journal {journal}")),
                    publisher,
                    ..JournalRecord::new(source)
                }
            })
    }

    fn records_strategy() -> impl Strategy<Value = Vec<JournalRecord>> {
        proptest::collection::vec(record_strategy(), 1..24)
    }

    /// Treat a canonical record as a single-source record, as a downstream
    /// re-ingestion would.
    fn as_source_record(record: &CanonicalRecord) -> JournalRecord {
        JournalRecord {
            source: record.sources.first().cloned().unwrap_or_default(),
            issn_l: record.issn_l.clone(),
            issn_print: record.issn_print.clone(),
            issn_electronic: record.issn_electronic.clone(),
            registry_id: record.registry_id.clone(),
            external_id: record.external_id.clone(),
            title: record.title.clone(),
            publisher: record.publisher.clone(),
            alternative_titles: record.alternative_titles.clone(),
            subjects: record.subjects.clone(),
            ..JournalRecord::default()
        }
    }

    proptest! {
        /// Property: no two output records share an ISSN. The generated
        /// records carry no registry ids, so no reuse split can justify an
        /// overlap.
        #[test]
        fn output_identifier_sets_are_disjoint(records in records_strategy()) {
            let links = link_table();
            let priorities = SourcePriorities::default();
            let outcome = unify(records, &links, &priorities).unwrap();
            prop_assert!(outcome.conflicts.reuse_splits.is_empty());

            let mut seen: HashSet<String> = HashSet::new();
            for record in &outcome.records {
                for issn in &record.all_issns {
                    prop_assert!(
                        seen.insert(issn.clone()),
                        "ISSN {} appears in two canonical records",
                        issn
                    );
                }
            }
        }

        /// Property: every output record has a unified id, and the ids are
        /// unique.
        #[test]
        fn output_unified_ids_are_unique(records in records_strategy()) {
            let links = link_table();
            let priorities = SourcePriorities::default();
            let outcome = unify(records, &links, &priorities).unwrap();

            let ids: Vec<&str> = outcome
                .records
                .iter()
                .filter_map(|record| record.unified_id.as_deref())
                .collect();
            prop_assert_eq!(ids.len(), outcome.records.len());
            let distinct: HashSet<&str> = ids.iter().copied().collect();
            prop_assert_eq!(distinct.len(), ids.len());
        }

        /// Property: re-running the engine over its own output, with the
        /// same link table, yields the same canonical records (same keys,
        /// same field values) with no duplicated sources.
        #[test]
        fn re_unification_is_idempotent(records in records_strategy()) {
            let links = link_table();
            let priorities = SourcePriorities::default();
            let first = unify(records, &links, &priorities).unwrap();

            let again: Vec<JournalRecord> =
                first.records.iter().map(as_source_record).collect();
            let second = unify(again, &links, &priorities).unwrap();

            let first_ids: HashSet<String> = first
                .records
                .iter()
                .filter_map(|record| record.unified_id.clone())
                .collect();
            let second_ids: HashSet<String> = second
                .records
                .iter()
                .filter_map(|record| record.unified_id.clone())
                .collect();
            prop_assert_eq!(&first_ids, &second_ids);

            for record in &second.records {
                let distinct: HashSet<&DataSource> = record.sources.iter().collect();
                prop_assert_eq!(distinct.len(), record.sources.len());

                let original = first
                    .records
                    .iter()
                    .find(|candidate| candidate.unified_id == record.unified_id);
                prop_assert!(original.is_some());
                let original = original.unwrap();
                prop_assert_eq!(&original.title, &record.title);
                prop_assert_eq!(&original.publisher, &record.publisher);
                // List order is input-order dependent; compare as sets
                let first_issns: HashSet<&String> = original.all_issns.iter().collect();
                let second_issns: HashSet<&String> = record.all_issns.iter().collect();
                prop_assert_eq!(first_issns, second_issns);
            }
        }
    }
}
