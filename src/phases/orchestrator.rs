//! Orchestrator for the complete unification run
//!
//! This module coordinates all phases to provide a single entry point for
//! the engine: records in, canonical records + conflict report + run
//! statistics out. No I/O happens here; inputs are fully materialized
//! before phase 1 and outputs are returned in memory after phase 4.

use std::cmp::Ordering;

use log::info;

use crate::config::{LinkTable, SourcePriorities};
use crate::conflicts::ConflictReport;
use crate::error::{Error, Result};
use crate::model::{CanonicalRecord, JournalRecord};
use crate::stats::RunStats;

use super::{phase1, phase2, phase3, phase4};

/// Everything a unification run produces.
#[derive(Debug)]
pub struct UnifyOutcome {
    /// Canonical records, deterministically sorted, each with a non-empty
    /// `unified_id`.
    pub records: Vec<CanonicalRecord>,
    /// Collision and reuse audit entries; empty when no anomalies occurred.
    pub conflicts: ConflictReport,
    /// Counters describing what the run did.
    pub stats: RunStats,
}

/// Execute the complete unification pipeline (Phases 1-4 plus
/// finalization).
///
/// 1. Register every identifier-bearing record with the key resolver
/// 2. Fold identifier-bearing records by canonical key
/// 3. Fold identifier-less records by normalized title
/// 4. Assign synthetic identifiers to the title-keyed remainder
///
/// Finalization merges the title-keyed records into the main output and
/// sorts by linking, print, then electronic ISSN (absent values last).
///
/// The only fatal condition is an empty `records`: a run over nothing
/// reports [`Error::NoData`] instead of succeeding with empty output.
pub fn unify(
    records: Vec<JournalRecord>,
    links: &LinkTable,
    priorities: &SourcePriorities,
) -> Result<UnifyOutcome> {
    if records.is_empty() {
        return Err(Error::NoData);
    }

    let mut stats = RunStats {
        records_total: records.len(),
        ..RunStats::default()
    };

    let (with_issn, without_issn): (Vec<_>, Vec<_>) =
        records.into_iter().partition(JournalRecord::has_issn);
    stats.records_with_issn = with_issn.len();
    stats.records_without_issn = without_issn.len();
    info!(
        "unifying {} records ({} with ISSN, {} without)",
        stats.records_total, stats.records_with_issn, stats.records_without_issn
    );

    // Phase 1: Registration
    let resolver = phase1::execute(&with_issn, links);
    resolver.log_stats();

    // Phase 2: Identifier-keyed fold
    let mut unified = phase2::execute(&with_issn, &resolver, priorities, &mut stats);
    info!("phase 2: {} records from identifier merge", unified.len());

    // Phase 3: Title-keyed fold
    let mut working_set = phase3::execute(&mut unified, &without_issn, priorities, &mut stats);
    info!(
        "phase 3: {} merged by title, {} new records without ISSN",
        stats.merged_by_title, stats.new_without_issn
    );

    // Phase 4: Synthetic identifier assignment
    phase4::execute(&mut working_set, &mut stats);
    info!(
        "phase 4: assigned {} registry, {} isbn, {} external, {} title-based ids",
        stats.synthetic_registry,
        stats.synthetic_isbn,
        stats.synthetic_external,
        stats.synthetic_title
    );

    // Finalization: fold the title-keyed records in under their unified id
    for (_, record) in working_set {
        if let Some(unified_id) = record.unified_id.clone() {
            unified.insert(unified_id, record);
        }
    }

    let conflicts = resolver.into_conflicts();
    stats.collisions = conflicts.collisions.len();
    stats.reuse_splits = conflicts.reuse_splits.len();

    let mut records: Vec<CanonicalRecord> = unified.into_values().collect();
    records.sort_by(compare_records);
    stats.unified_total = records.len();
    info!("unified into {} canonical records", stats.unified_total);

    Ok(UnifyOutcome {
        records,
        conflicts,
        stats,
    })
}

/// Deterministic output order: linking, print, electronic ISSN with absent
/// values last, then unified id as the full tie-breaker.
fn compare_records(a: &CanonicalRecord, b: &CanonicalRecord) -> Ordering {
    compare_optional(a.issn_l.as_deref(), b.issn_l.as_deref())
        .then_with(|| compare_optional(a.issn_print.as_deref(), b.issn_print.as_deref()))
        .then_with(|| {
            compare_optional(a.issn_electronic.as_deref(), b.issn_electronic.as_deref())
        })
        .then_with(|| a.unified_id.cmp(&b.unified_id))
}

fn compare_optional(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
