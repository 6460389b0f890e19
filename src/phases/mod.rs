//! Implementation of the 4 phases of the unification engine.
//!
//! ## Overview
//!
//! Unification is a strictly ordered batch pipeline; each phase completes
//! before the next begins and no phase is re-entrant:
//!
//! 1. Registration - register every identifier-bearing record with the key
//!    resolver, in input order (collision and reuse detection is global, so
//!    lookups are only trusted after the full pass)
//! 2. Identifier-keyed fold - group identifier-bearing records by resolved
//!    canonical key and fold them under the field merge policy
//! 3. Title-keyed fold - link identifier-less records to phase-2 output by
//!    normalized title, or collect them into a title-keyed working set
//! 4. Synthetic identifier assignment - give every remaining working-set
//!    record a unified identifier, or drop it as unidentifiable
//!
//! The orchestrator runs all four phases, merges the working set into the
//! phase-2 output, and sorts the result deterministically.
//!
//! Records are processed strictly in input order within each phase: the
//! merge policy's outcome depends on what has already been folded into a
//! key (best-prior-priority comparisons, first-seen-wins ties, first-seen
//! list order), so the canonical maps preserve insertion order too.

use indexmap::IndexMap;

use crate::model::CanonicalRecord;

// Phase modules
pub mod identifier_merge;
pub mod orchestrator;
pub mod registration;
pub mod synthetic;
pub mod title_merge;

// Re-export phase modules to make call sites read in pipeline order
pub use identifier_merge as phase2;
pub use registration as phase1;
pub use synthetic as phase4;
pub use title_merge as phase3;

/// Canonical records keyed by canonical key (phase 2) or normalized title
/// key (phase 3 working set). Insertion-ordered: iteration order is part of
/// the engine's determinism contract.
pub type CanonicalMap = IndexMap<String, CanonicalRecord>;
