//! Phase 1: Registration
//!
//! The first phase of the unification pipeline. Runs the key resolver's
//! registration pass over every identifier-bearing record, in input order.
//!
//! Input order matters here in one narrow way: it decides which record's
//! registry id wins first-seen status for a key, which in turn decides
//! which side of an ISSN reuse split is reported as "existing" in the
//! conflict log. The final identifier sets do not depend on it.
//!
//! The resolver this phase returns is the only component allowed to answer
//! key lookups for the rest of the run.

use crate::config::LinkTable;
use crate::model::JournalRecord;
use crate::resolver::KeyResolver;

/// Execute Phase 1: register all identifier-bearing records.
///
/// `records` must already be filtered to identifier-bearing records; the
/// resolver treats a record without ISSNs as registry-only or invisible,
/// so passing the full set is harmless but wasteful.
pub fn execute<'a>(records: &[JournalRecord], links: &'a LinkTable) -> KeyResolver<'a> {
    let mut resolver = KeyResolver::new(links);
    for record in records {
        resolver.register(record);
    }
    resolver
}
