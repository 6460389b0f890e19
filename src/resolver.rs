//! # Key Resolution
//!
//! The key resolver assigns a stable canonical key to every
//! identifier-bearing record, detecting two distinct anomaly classes along
//! the way.
//!
//! ## Process
//!
//! 1. **Registration**: every identifier-bearing record is registered, in
//!    input order. Registration computes a candidate key (linking ISSN via
//!    the link table, else linking > print > electronic), checks whether
//!    any of the record's ISSNs is already bound to a different key, and
//!    binds all of the record's ISSNs to the resolved key.
//!
//! 2. **Reuse detection**: when an ISSN is already bound to a key tracking
//!    a *different* registry id than the incoming record's, the ISSN was
//!    historically reassigned to a different journal. The incoming record
//!    gets its own registry-based key (`REG-<id>`) instead of merging, and
//!    the reuse is logged. Later rebinding never silently moves an ISSN
//!    away from a key whose registry id differs from the new key's, which
//!    protects already-separated reuse groups from recombination.
//!
//! 3. **Lookup**: after all registrations, [`KeyResolver::canonical_key`]
//!    is a read-only lookup. Resolution is global, not streaming: a later
//!    record can reveal that an ISSN was reused, changing how an earlier
//!    record must be keyed, so no lookup is trusted before the full
//!    registration pass has completed.

use std::collections::{BTreeSet, HashMap};

use log::{info, warn};

use crate::config::LinkTable;
use crate::conflicts::{ConflictReport, IssnReuse, KeyCollision};
use crate::model::{is_registry_key, registry_identifier, JournalRecord};

/// Resolves journal records to canonical keys, ensuring ISSN uniqueness
/// across the output.
pub struct KeyResolver<'a> {
    links: &'a LinkTable,
    /// Any ISSN to its canonical key.
    issn_to_key: HashMap<String, String>,
    /// Which ISSNs ended up under each key.
    key_to_issns: HashMap<String, BTreeSet<String>>,
    /// Registry id tracked per canonical key, for reuse detection.
    key_to_registry: HashMap<String, String>,
    /// Registry id to its key, for records split out by the reuse path.
    registry_to_key: HashMap<String, String>,
    conflicts: ConflictReport,
}

impl<'a> KeyResolver<'a> {
    pub fn new(links: &'a LinkTable) -> Self {
        Self {
            links,
            issn_to_key: HashMap::new(),
            key_to_issns: HashMap::new(),
            key_to_registry: HashMap::new(),
            registry_to_key: HashMap::new(),
            conflicts: ConflictReport::default(),
        }
    }

    /// Register a record's identifiers, building the canonical key mapping.
    pub fn register(&mut self, record: &JournalRecord) {
        let issns: Vec<String> = record.issns().into_iter().map(str::to_string).collect();
        let registry_id = record.registry_id.as_deref();

        // No ISSNs: bind the registry id to a registry-based key and stop.
        // Such records are resolved lazily by canonical_key.
        if issns.is_empty() {
            if let Some(reg) = registry_id {
                let key = registry_identifier(reg);
                self.registry_to_key.insert(reg.to_string(), key.clone());
                self.key_to_registry.insert(key, reg.to_string());
            }
            return;
        }

        let Some(candidate) = self.candidate_key(record) else {
            return;
        };

        // Is any of the record's ISSNs already bound?
        let existing = issns.iter().find_map(|issn| {
            self.issn_to_key
                .get(issn)
                .map(|key| (key.clone(), issn.clone()))
        });

        let final_key = match existing {
            Some((existing_key, conflicting_issn)) => {
                let existing_registry = self.key_to_registry.get(&existing_key).cloned();
                match (existing_registry, registry_id) {
                    // Both sides have registry ids and they differ: the ISSN
                    // was reused by a distinct journal. Keep them separate.
                    (Some(existing_reg), Some(new_reg)) if existing_reg != new_reg => {
                        self.conflicts.reuse_splits.push(IssnReuse {
                            issn: conflicting_issn,
                            existing_key: existing_key.clone(),
                            existing_registry_id: existing_reg,
                            new_registry_id: new_reg.to_string(),
                            new_title: record.title.clone(),
                        });
                        let key = registry_identifier(new_reg);
                        self.registry_to_key.insert(new_reg.to_string(), key.clone());
                        key
                    }
                    // Plain collision: adopt the existing key for
                    // consistency, note when the candidate disagreed.
                    _ => {
                        if existing_key != candidate {
                            self.conflicts.collisions.push(KeyCollision {
                                issns: issns.clone(),
                                candidate_key: candidate,
                                resolved_key: existing_key.clone(),
                                title: record.title.clone(),
                            });
                        }
                        existing_key
                    }
                }
            }
            None => candidate,
        };

        // Track the registry id for this key; first-seen wins.
        if let Some(reg) = registry_id {
            self.key_to_registry
                .entry(final_key.clone())
                .or_insert_with(|| reg.to_string());
            self.registry_to_key
                .entry(reg.to_string())
                .or_insert_with(|| final_key.clone());
        }

        // Bind every ISSN to the resolved key, except that an ISSN bound to
        // a key with a different registry id stays where it is: moving it
        // would recombine a reuse group that an earlier record separated.
        for issn in &issns {
            if let Some(bound_key) = self.issn_to_key.get(issn).cloned() {
                if bound_key != final_key {
                    let bound_registry = self.key_to_registry.get(&bound_key).cloned();
                    let final_registry = self
                        .key_to_registry
                        .get(&final_key)
                        .cloned()
                        .or_else(|| registry_id.map(str::to_string));
                    if let (Some(bound_reg), Some(final_reg)) = (bound_registry, final_registry) {
                        if bound_reg != final_reg {
                            // The ISSN belongs to a different journal, but it
                            // is still associated with this record's registry
                            // key for lookup.
                            if let Some(reg_key) =
                                registry_id.and_then(|reg| self.registry_to_key.get(reg)).cloned()
                            {
                                self.key_to_issns
                                    .entry(reg_key)
                                    .or_default()
                                    .insert(issn.clone());
                            }
                            continue;
                        }
                    }
                }
            }
            self.issn_to_key.insert(issn.clone(), final_key.clone());
        }

        let bucket = self.key_to_issns.entry(final_key.clone()).or_default();
        for issn in issns {
            if self.issn_to_key.get(&issn).is_some_and(|key| *key == final_key) {
                bucket.insert(issn);
            }
        }
    }

    /// The canonical key for a record. Only valid after every
    /// identifier-bearing record has been registered.
    ///
    /// Records whose registry id was split out by the reuse path resolve to
    /// their dedicated registry-based key; everything else resolves through
    /// the ISSN binding table, falling back to a direct candidate
    /// computation for records that were never registered.
    pub fn canonical_key(&self, record: &JournalRecord) -> Option<String> {
        if let Some(reg) = record.registry_id.as_deref() {
            if let Some(key) = self.registry_to_key.get(reg) {
                // Only dedicated registry-based keys force a separate
                // record; a registry id attached to a normal ISSN key does
                // not override the ISSN lookup.
                if is_registry_key(key) {
                    return Some(key.clone());
                }
            }
        }

        for issn in record.issns() {
            if let Some(key) = self.issn_to_key.get(issn) {
                return Some(key.clone());
            }
        }

        self.candidate_key(record)
    }

    /// The key this record would resolve to in isolation: the linking ISSN
    /// (direct or via the link table), else print, else electronic.
    fn candidate_key(&self, record: &JournalRecord) -> Option<String> {
        let linked = record.issn_l.clone().or_else(|| {
            record
                .issn_print
                .as_deref()
                .and_then(|issn| self.links.resolve(issn))
                .or_else(|| {
                    record
                        .issn_electronic
                        .as_deref()
                        .and_then(|issn| self.links.resolve(issn))
                })
                .map(str::to_string)
        });

        linked
            .or_else(|| record.issn_print.clone())
            .or_else(|| record.issn_electronic.clone())
    }

    /// Number of ISSNs bound to a key.
    pub fn bound_issns(&self) -> usize {
        self.issn_to_key.len()
    }

    /// Number of distinct canonical keys.
    pub fn key_count(&self) -> usize {
        self.key_to_issns.len()
    }

    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }

    pub fn into_conflicts(self) -> ConflictReport {
        self.conflicts
    }

    /// Log resolution statistics after the registration pass.
    pub fn log_stats(&self) {
        info!(
            "key resolver: {} ISSNs bound to {} keys",
            self.bound_issns(),
            self.key_count()
        );
        if !self.conflicts.collisions.is_empty() {
            warn!(
                "key resolver: {} key collisions detected",
                self.conflicts.collisions.len()
            );
        }
        if !self.conflicts.reuse_splits.is_empty() {
            warn!(
                "key resolver: {} ISSN reuse conflicts (differing registry ids)",
                self.conflicts.reuse_splits.len()
            );
            for reuse in self.conflicts.reuse_splits.iter().take(5) {
                warn!(
                    "  ISSN {}: registry {} vs {}",
                    reuse.issn, reuse.existing_registry_id, reuse.new_registry_id
                );
            }
        }
    }
}
