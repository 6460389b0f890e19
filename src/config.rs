//! # Run Configuration
//!
//! This module defines the two static tables the engine consumes alongside
//! the source records, both read-only for the duration of a run:
//!
//! - **`SourcePriorities`**: maps each source tag to a non-negative integer
//!   priority. Higher priority wins field-value conflicts during merging.
//!   Compiled-in defaults rank curated sources above aggregated ones; an
//!   optional YAML file can override individual entries.
//!
//! - **`LinkTable`**: maps any ISSN to its linking ISSN (many-to-one). The
//!   table is supplied externally (the ISSN registry publishes it) and is
//!   only ever consulted, never modified, by the engine.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::DataSource;

/// Default priority per source (higher = preferred).
///
/// Principle: curated sources beat aggregated sources. Unlisted and unknown
/// tags rank 0.
const DEFAULT_PRIORITIES: [(DataSource, i64); 9] = [
    (DataSource::Medline, 7),
    (DataSource::Doaj, 6),
    (DataSource::Nlm, 6),
    (DataSource::OpenAlex, 5),
    (DataSource::Crossref, 4),
    (DataSource::Jstage, 4),
    (DataSource::Pmc, 3),
    (DataSource::Wikidata, 2),
    (DataSource::Reference, 0),
];

/// Source-to-priority table used to break field conflicts.
#[derive(Debug, Clone)]
pub struct SourcePriorities {
    table: HashMap<DataSource, i64>,
}

impl Default for SourcePriorities {
    fn default() -> Self {
        Self {
            table: DEFAULT_PRIORITIES.into_iter().collect(),
        }
    }
}

/// Shape of the YAML override file: a plain `source: priority` mapping.
#[derive(Debug, Deserialize)]
struct PriorityOverrides(HashMap<String, i64>);

impl SourcePriorities {
    /// The priority of a source; 0 for sources without an entry.
    pub fn priority(&self, source: &DataSource) -> i64 {
        self.table.get(source).copied().unwrap_or(0)
    }

    /// Set or replace the priority for one source.
    pub fn set(&mut self, source: DataSource, priority: i64) {
        self.table.insert(source, priority);
    }

    /// Parse a YAML override file on top of the defaults.
    ///
    /// The file is a flat mapping from source tag to priority, e.g.:
    ///
    /// ```yaml
    /// doaj: 8
    /// wikidata: 1
    /// ```
    ///
    /// Unknown tags and negative priorities are rejected so a typo cannot
    /// silently demote a curated source to the default rank.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let overrides: PriorityOverrides = serde_yaml::from_str(yaml)?;
        let mut priorities = Self::default();

        for (tag, priority) in overrides.0 {
            let source = DataSource::from(tag.clone());
            if matches!(source, DataSource::Unknown(_)) {
                return Err(Error::ConfigParse {
                    message: format!("unknown source tag '{tag}'"),
                    hint: Some(format!(
                        "valid tags: {}",
                        DataSource::KNOWN.map(|s| s.as_str().to_string()).join(", ")
                    )),
                });
            }
            if priority < 0 {
                return Err(Error::ConfigParse {
                    message: format!("negative priority {priority} for source '{tag}'"),
                    hint: Some("priorities must be non-negative integers".to_string()),
                });
            }
            priorities.set(source, priority);
        }

        Ok(priorities)
    }
}

/// Static many-to-one mapping from any ISSN to its linking ISSN.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    links: HashMap<String, String>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(links: HashMap<String, String>) -> Self {
        Self { links }
    }

    /// Register one ISSN → linking-ISSN entry.
    pub fn insert(&mut self, issn: impl Into<String>, issn_l: impl Into<String>) {
        self.links.insert(issn.into(), issn_l.into());
    }

    /// The linking ISSN an ISSN belongs to, if the table knows it.
    pub fn resolve(&self, issn: &str) -> Option<&str> {
        self.links.get(issn).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
