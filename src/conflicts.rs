//! # Conflict Reporting
//!
//! Audit records for the anomalies the engine detects but recovers from.
//! Conflict records are write-only: the engine appends them during key
//! resolution and hands the report to the caller, but never reads them
//! back. They exist so a curator can audit why two records merged (or
//! refused to merge) after the fact.
//!
//! Severity ordering:
//!
//! - [`KeyCollision`] (low): a record's identifiers resolved to a key that
//!   differs from a previously bound key. The records merged anyway; the
//!   entry records which key won.
//! - [`IssnReuse`] (high): the same ISSN appeared bound to two different
//!   registry ids, meaning the ISSN was historically reassigned to a
//!   different journal. The records were deliberately kept separate.
//!
//! [`link_consistency`] is a pre-engine audit over raw records: it flags
//! records whose print and electronic ISSNs resolve to *different* linking
//! ISSNs, i.e. records that combine ISSNs from two different journals.

use serde::Serialize;

use crate::config::LinkTable;
use crate::model::{DataSource, JournalRecord};

/// A record's identifiers resolved to a different key than the one some of
/// them were already bound to. Merged under the previously bound key.
#[derive(Debug, Clone, Serialize)]
pub struct KeyCollision {
    /// All ISSNs of the triggering record.
    pub issns: Vec<String>,
    /// The key the record would have resolved to on its own.
    pub candidate_key: String,
    /// The previously bound key the record was merged under.
    pub resolved_key: String,
    /// Title of the triggering record, for the audit trail.
    pub title: Option<String>,
}

/// The same ISSN was seen bound to two different registry ids: two
/// historically distinct journals reusing one ISSN. Not merged.
#[derive(Debug, Clone, Serialize)]
pub struct IssnReuse {
    /// The reused ISSN.
    pub issn: String,
    /// The canonical key the ISSN was already bound to.
    pub existing_key: String,
    /// Registry id tracked for the existing key.
    pub existing_registry_id: String,
    /// Registry id of the incoming record, split into its own key.
    pub new_registry_id: String,
    /// Title of the incoming record.
    pub new_title: Option<String>,
}

/// All conflicts observed during one run. Empty when no anomalies occurred.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictReport {
    pub collisions: Vec<KeyCollision>,
    pub reuse_splits: Vec<IssnReuse>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty() && self.reuse_splits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.collisions.len() + self.reuse_splits.len()
    }
}

/// A single record claiming print and electronic ISSNs that belong to two
/// different journals according to the link table.
#[derive(Debug, Clone, Serialize)]
pub struct LinkInconsistency {
    pub source: DataSource,
    pub title: Option<String>,
    pub issn_print: String,
    pub issn_electronic: String,
    pub issn_l_print: String,
    pub issn_l_electronic: String,
}

/// Detect records whose print and electronic ISSNs resolve to different
/// linking ISSNs.
///
/// Purely an audit: the engine still processes such records (the key
/// resolver logs a collision when the mismatch surfaces during
/// registration), but the upstream data quality issue is worth reporting
/// on its own.
pub fn link_consistency(
    records: &[JournalRecord],
    links: &LinkTable,
) -> Vec<LinkInconsistency> {
    let mut inconsistencies = Vec::new();

    for record in records {
        let (Some(pissn), Some(eissn)) =
            (record.issn_print.as_deref(), record.issn_electronic.as_deref())
        else {
            continue;
        };
        if let (Some(link_p), Some(link_e)) = (links.resolve(pissn), links.resolve(eissn)) {
            if link_p != link_e {
                inconsistencies.push(LinkInconsistency {
                    source: record.source.clone(),
                    title: record.title.clone(),
                    issn_print: pissn.to_string(),
                    issn_electronic: eissn.to_string(),
                    issn_l_print: link_p.to_string(),
                    issn_l_electronic: link_e.to_string(),
                });
            }
        }
    }

    inconsistencies
}
