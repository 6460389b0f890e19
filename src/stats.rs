//! # Run Statistics
//!
//! Counters describing what a unification run did, threaded explicitly
//! through the engine and returned alongside the result. There is no
//! global collector, so two runs in one process can never bleed into each
//! other.
//!
//! [`RunStats`] counts engine decisions (records partitioned, merged,
//! skipped, synthetic ids assigned). [`CoverageSummary`] is computed from
//! the final output and reports field coverage per the curated catalog's
//! reporting conventions: how many records carry a title, a license,
//! metrics, how many came from multiple sources, and so on.

use std::collections::BTreeMap;

use log::info;
use serde::Serialize;

use crate::model::CanonicalRecord;

/// Counters filled in as the engine runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Source records supplied to the run.
    pub records_total: usize,
    /// Records carrying at least one ISSN.
    pub records_with_issn: usize,
    /// Records without any ISSN.
    pub records_without_issn: usize,

    /// Identifier-bearing records whose key could not be resolved.
    pub unkeyed: usize,
    /// Canonical records produced by the identifier-keyed fold.
    pub identifier_records: usize,

    /// Identifier-less records folded into an identifier-keyed record by
    /// title match.
    pub merged_by_title: usize,
    /// New title-keyed records created for unmatched identifier-less
    /// records.
    pub new_without_issn: usize,
    /// Identifier-less records with no usable title key.
    pub unidentifiable: usize,

    /// Synthetic identifiers assigned per strategy.
    pub synthetic_registry: usize,
    pub synthetic_isbn: usize,
    pub synthetic_external: usize,
    pub synthetic_title: usize,
    /// Title-keyed records dropped because no identifier strategy applied.
    pub dropped: usize,

    /// Key collisions logged during registration.
    pub collisions: usize,
    /// ISSN reuse splits logged during registration.
    pub reuse_splits: usize,

    /// Canonical records in the final output.
    pub unified_total: usize,
}

impl RunStats {
    /// Log a one-screen account of the run.
    pub fn log_summary(&self) {
        info!(
            "input: {} records ({} with ISSN, {} without)",
            self.records_total, self.records_with_issn, self.records_without_issn
        );
        info!(
            "identifier merge: {} canonical records ({} unkeyed skips)",
            self.identifier_records, self.unkeyed
        );
        info!(
            "title merge: {} merged into existing records, {} new, {} unidentifiable",
            self.merged_by_title, self.new_without_issn, self.unidentifiable
        );
        info!(
            "synthetic ids: {} registry, {} isbn, {} external, {} title-hash, {} dropped",
            self.synthetic_registry,
            self.synthetic_isbn,
            self.synthetic_external,
            self.synthetic_title,
            self.dropped
        );
        if self.collisions > 0 || self.reuse_splits > 0 {
            info!(
                "conflicts: {} collisions, {} reuse splits",
                self.collisions, self.reuse_splits
            );
        }
        info!("unified into {} canonical records", self.unified_total);
    }
}

/// Field coverage over the final canonical records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageSummary {
    pub total: usize,
    pub with_issn_l: usize,
    pub with_issn_print: usize,
    pub with_issn_electronic: usize,
    pub with_title: usize,
    pub with_publisher: usize,
    pub with_country: usize,
    pub with_journal_url: usize,
    pub with_license: usize,
    pub with_subjects: usize,
    pub with_language: usize,
    pub with_apc: usize,
    pub with_works_count: usize,
    pub with_cited_by_count: usize,
    pub with_h_index: usize,
    /// Records flagged open access.
    pub open_access: usize,
    /// Records merged from more than one source.
    pub multi_source: usize,
    /// Record count per contributing source tag.
    pub source_counts: BTreeMap<String, usize>,
}

impl CoverageSummary {
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            summary.with_issn_l += usize::from(record.issn_l.is_some());
            summary.with_issn_print += usize::from(record.issn_print.is_some());
            summary.with_issn_electronic += usize::from(record.issn_electronic.is_some());
            summary.with_title += usize::from(record.title.is_some());
            summary.with_publisher += usize::from(record.publisher.is_some());
            summary.with_country += usize::from(record.country.is_some());
            summary.with_journal_url += usize::from(record.journal_url.is_some());
            summary.with_license += usize::from(record.license.is_some());
            summary.with_subjects += usize::from(!record.subjects.is_empty());
            summary.with_language += usize::from(!record.language.is_empty());
            summary.with_apc += usize::from(record.apc_amount.is_some());
            summary.with_works_count += usize::from(record.works_count.is_some());
            summary.with_cited_by_count += usize::from(record.cited_by_count.is_some());
            summary.with_h_index += usize::from(record.h_index.is_some());
            summary.open_access += usize::from(record.is_oa == Some(true));
            summary.multi_source += usize::from(record.sources.len() > 1);

            for source in &record.sources {
                *summary
                    .source_counts
                    .entry(source.as_str().to_string())
                    .or_default() += 1;
            }
        }

        summary
    }

    /// Log coverage percentages for the main fields.
    pub fn log_summary(&self) {
        info!("coverage over {} records:", self.total);
        if self.total == 0 {
            return;
        }
        let pct = |count: usize| count as f64 / self.total as f64 * 100.0;
        info!("  title: {} ({:.1}%)", self.with_title, pct(self.with_title));
        info!(
            "  publisher: {} ({:.1}%)",
            self.with_publisher,
            pct(self.with_publisher)
        );
        info!(
            "  license: {} ({:.1}%)",
            self.with_license,
            pct(self.with_license)
        );
        info!(
            "  subjects: {} ({:.1}%)",
            self.with_subjects,
            pct(self.with_subjects)
        );
        info!(
            "  open access: {} ({:.1}%)",
            self.open_access,
            pct(self.open_access)
        );
        info!(
            "  multi-source: {} ({:.1}%)",
            self.multi_source,
            pct(self.multi_source)
        );
        for (source, count) in &self.source_counts {
            info!("  from {}: {} ({:.1}%)", source, count, pct(*count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataSource;

    #[test]
    fn test_coverage_counts_fields_and_sources() {
        let mut first = CanonicalRecord {
            title: Some("Alpha".to_string()),
            issn_l: Some("1111-2222".to_string()),
            is_oa: Some(true),
            subjects: vec!["Medicine".to_string()],
            sources: vec![DataSource::Doaj, DataSource::Crossref],
            ..CanonicalRecord::default()
        };
        first.unified_id = Some("1111-2222".to_string());

        let second = CanonicalRecord {
            title: Some("Beta".to_string()),
            sources: vec![DataSource::Crossref],
            ..CanonicalRecord::default()
        };

        let summary = CoverageSummary::from_records(&[first, second]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.with_title, 2);
        assert_eq!(summary.with_issn_l, 1);
        assert_eq!(summary.with_subjects, 1);
        assert_eq!(summary.open_access, 1);
        assert_eq!(summary.multi_source, 1);
        assert_eq!(summary.source_counts.get("crossref"), Some(&2));
        assert_eq!(summary.source_counts.get("doaj"), Some(&1));
    }

    #[test]
    fn test_coverage_empty_output() {
        let summary = CoverageSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.source_counts.is_empty());
    }
}
