//! Phase 3: Title-keyed fold
//!
//! The third phase of the unification pipeline, covering records that carry
//! no ISSN at all. Exact equality on the normalized title key is the only
//! linkage here (fuzzy matching belongs to the downstream reference
//! filter, not the engine).
//!
//! ## Process
//!
//! 1. Build a title index over the phase-2 output: the primary title plus
//!    every alternative title of every canonical record, normalized with
//!    the same key function the incoming records use.
//!
//! 2. For each identifier-less record, in input order: a title-index hit
//!    folds the record into that canonical record - the only way an
//!    identifier-less record can join an identifier-bearing one. A miss
//!    folds it into a separate title-keyed working set instead, creating
//!    a new entry on first sight. A match against the index is final for
//!    that record; it is not re-resolved against the working set.
//!
//! Records with no usable title key are unidentifiable at this point and
//! are skipped and counted.

use std::collections::HashMap;

use log::debug;

use crate::config::SourcePriorities;
use crate::merge::{create_canonical, merge_record};
use crate::model::JournalRecord;
use crate::stats::RunStats;
use crate::title::normalize_title_key;

use super::CanonicalMap;

/// Execute Phase 3: fold identifier-less records by normalized title.
///
/// Folds title matches directly into `unified` (the phase-2 output) and
/// returns the working set of records that matched nothing.
pub fn execute(
    unified: &mut CanonicalMap,
    records: &[JournalRecord],
    priorities: &SourcePriorities,
    stats: &mut RunStats,
) -> CanonicalMap {
    // Title index over the phase-2 output. Later records overwrite earlier
    // ones for the primary title; alternative titles only fill gaps.
    let mut title_to_key: HashMap<String, String> = HashMap::new();
    for (key, record) in unified.iter() {
        if let Some(title_key) = record.title.as_deref().and_then(normalize_title_key) {
            title_to_key.insert(title_key, key.clone());
        }
        for alt_title in &record.alternative_titles {
            if let Some(alt_key) = normalize_title_key(alt_title) {
                title_to_key.entry(alt_key).or_insert_with(|| key.clone());
            }
        }
    }

    let mut working_set = CanonicalMap::new();

    for record in records {
        let Some(title_key) = record.title.as_deref().and_then(normalize_title_key) else {
            debug!("skipping unidentifiable record from {}", record.source);
            stats.unidentifiable += 1;
            continue;
        };

        // The index is built from unified's own keys; the lookup cannot miss.
        if let Some(existing) = title_to_key.get(&title_key).and_then(|key| unified.get_mut(key)) {
            merge_record(existing, record, priorities);
            stats.merged_by_title += 1;
        } else if let Some(existing) = working_set.get_mut(&title_key) {
            merge_record(existing, record, priorities);
        } else {
            working_set.insert(title_key, create_canonical(record));
            stats.new_without_issn += 1;
        }
    }

    working_set
}
