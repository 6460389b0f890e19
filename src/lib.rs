//! # Journal Unification Library
//!
//! This library unifies journal metadata collected from up to nine
//! independent bibliographic sources (DOAJ, the NLM catalog, the MEDLINE
//! serials list, OpenAlex, Crossref, J-STAGE, PMC, Wikidata, and a
//! title-only reference source) into one canonical record per real-world
//! journal. It is used by the `journal-unify` command-line tool but can be
//! embedded in any application that needs the record-linkage engine.
//!
//! ## Quick Example
//!
//! ```
//! use journal_unify::config::{LinkTable, SourcePriorities};
//! use journal_unify::model::{DataSource, JournalRecord};
//! use journal_unify::phases::orchestrator;
//!
//! let mut record = JournalRecord::new(DataSource::Doaj);
//! record.issn_print = Some("1111-2222".to_string());
//! record.title = Some("Alpha".to_string());
//!
//! let links = LinkTable::new();
//! let priorities = SourcePriorities::default();
//! let outcome = orchestrator::unify(vec![record], &links, &priorities).unwrap();
//!
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.records[0].unified_id.as_deref(), Some("1111-2222"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Records (`model`)**: `JournalRecord` is one observation from one
//!   source; `CanonicalRecord` is the merged result for one journal.
//! - **Configuration (`config`)**: the source priority table (which source
//!   wins field conflicts) and the ISSN link table (which ISSNs belong to
//!   the same journal), both read-only during a run.
//! - **Key Resolution (`resolver`)**: assigns a stable canonical key to
//!   every identifier-bearing record, detecting identifier collisions and
//!   identifier-reuse-by-distinct-journal conflicts.
//! - **Field Merging (`merge`)**: pure per-field rules for folding a record
//!   into a canonical record by source priority.
//! - **Phases (`phases`)**: the strictly ordered batch pipeline -
//!   registration, identifier-keyed fold, title-keyed fold, synthetic
//!   identifier assignment - coordinated by `phases::orchestrator`.
//! - **Reporting (`conflicts`, `stats`)**: write-only audit records and
//!   explicit run statistics, returned alongside the result.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator::unify`, which executes
//! the following high-level steps:
//!
//! 1. **Registration**: register every identifier-bearing record, in input
//!    order, building the global ISSN-to-key binding table.
//! 2. **Identifier merge**: fold identifier-bearing records into canonical
//!    records keyed by canonical key.
//! 3. **Title merge**: link identifier-less records to existing canonical
//!    records by normalized title, or group them by title.
//! 4. **Synthetic identifiers**: give every remaining record a unified
//!    identifier (registry, ISBN, external, or title hash), dropping the
//!    unidentifiable remainder.
//! 5. **Finalization**: merge, sort deterministically, and return records,
//!    conflict report and statistics together.
//!
//! The engine is single-threaded and deterministic by construction: each
//! phase completes before the next begins, and within a phase records are
//! processed strictly in input order.

pub mod config;
pub mod conflicts;
pub mod error;
pub mod export;
pub mod input;
pub mod merge;
pub mod model;
pub mod phases;
pub mod resolver;
pub mod stats;
pub mod title;

#[cfg(test)]
mod merge_proptest;
