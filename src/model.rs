//! # Data Model
//!
//! This module defines the record types exchanged by the unification engine,
//! the closed vocabularies used by those records, and the synthetic
//! identifier formats assigned to journals that lack a linking ISSN.
//!
//! ## Key Components
//!
//! - **`JournalRecord`**: one journal observation from one source, as
//!   produced by the (external) loaders. All fields except `source` are
//!   optional; every field is an explicit struct member so that adding or
//!   removing a field is a compile-time event.
//!
//! - **`CanonicalRecord`**: the merged result for one canonical key. Carries
//!   the same descriptive fields plus provenance (`sources`), the full ISSN
//!   lookup set (`all_issns`), and the final `unified_id`.
//!
//! - **`DataSource`**, **`ReviewProcess`**, **`PreservationService`**:
//!   closed string vocabularies modeled as enums with an explicit fallback
//!   variant, round-tripping through their canonical lowercase tags.
//!
//! ## Identifier Formats
//!
//! Records without a linking ISSN eventually receive a synthetic unified
//! identifier in one of four formats, in preference order:
//!
//! 1. `REG-<id>` from a registry (catalog) identifier
//! 2. `ISBN-<isbn13>` from an ISBN-13 found in the abbreviation field
//! 3. `EXT-<id>` from a source-specific external identifier
//! 4. `TITLE-<hash8>` from a hash of the normalized title (see `title`)

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bibliographic data sources feeding the unification engine.
///
/// The vocabulary is closed: every loader tags its records with one of the
/// known variants. Tags read from serialized data that match none of them
/// are preserved in `Unknown` rather than dropped, and rank below every
/// known source when priorities are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    /// Directory of Open Access Journals (curated OA metadata).
    Doaj,
    /// NLM catalog (librarian-maintained biomedical data).
    Nlm,
    /// MEDLINE serials list, including historical/ceased titles.
    Medline,
    /// OpenAlex sources (broad coverage, metrics, subjects).
    OpenAlex,
    /// Crossref journal list (publisher-reported).
    Crossref,
    /// J-STAGE (Japanese academic e-journals).
    Jstage,
    /// PMC journal list (deposit agreements).
    Pmc,
    /// Wikidata journals (gap-filling).
    Wikidata,
    /// Title-only journal references from the downstream citation index.
    Reference,
    /// Any tag outside the closed vocabulary.
    Unknown(String),
}

impl DataSource {
    /// The canonical lowercase tag for this source.
    pub fn as_str(&self) -> &str {
        match self {
            DataSource::Doaj => "doaj",
            DataSource::Nlm => "nlm",
            DataSource::Medline => "medline",
            DataSource::OpenAlex => "openalex",
            DataSource::Crossref => "crossref",
            DataSource::Jstage => "jstage",
            DataSource::Pmc => "pmc",
            DataSource::Wikidata => "wikidata",
            DataSource::Reference => "reference",
            DataSource::Unknown(tag) => tag,
        }
    }

    /// All members of the closed vocabulary, i.e. every variant except
    /// `Unknown`.
    pub const KNOWN: [DataSource; 9] = [
        DataSource::Doaj,
        DataSource::Nlm,
        DataSource::Medline,
        DataSource::OpenAlex,
        DataSource::Crossref,
        DataSource::Jstage,
        DataSource::Pmc,
        DataSource::Wikidata,
        DataSource::Reference,
    ];
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Unknown(String::new())
    }
}

impl From<String> for DataSource {
    fn from(tag: String) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "doaj" => DataSource::Doaj,
            "nlm" => DataSource::Nlm,
            "medline" => DataSource::Medline,
            "openalex" => DataSource::OpenAlex,
            "crossref" => DataSource::Crossref,
            "jstage" => DataSource::Jstage,
            "pmc" => DataSource::Pmc,
            "wikidata" => DataSource::Wikidata,
            "reference" => DataSource::Reference,
            _ => DataSource::Unknown(tag),
        }
    }
}

impl From<DataSource> for String {
    fn from(source: DataSource) -> Self {
        source.as_str().to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Peer review process types (controlled vocabulary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewProcess {
    /// Author and reviewer identities hidden from each other.
    DoubleBlind,
    /// Author identity hidden from reviewers.
    SingleBlind,
    /// Author, reviewer and editor identities all hidden.
    TripleBlind,
    /// All identities known (transparent review).
    Open,
    /// Review by editors or the editorial board.
    Editorial,
    /// Review by committee.
    Committee,
    /// Generic peer review of unspecified type.
    PeerReview,
    /// Review after publication.
    PostPublication,
    /// No peer review.
    NoReview,
    /// Any value outside the controlled vocabulary.
    Other(String),
}

impl ReviewProcess {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewProcess::DoubleBlind => "double-blind",
            ReviewProcess::SingleBlind => "single-blind",
            ReviewProcess::TripleBlind => "triple-blind",
            ReviewProcess::Open => "open",
            ReviewProcess::Editorial => "editorial",
            ReviewProcess::Committee => "committee",
            ReviewProcess::PeerReview => "peer-review",
            ReviewProcess::PostPublication => "post-publication",
            ReviewProcess::NoReview => "none",
            ReviewProcess::Other(value) => value,
        }
    }
}

impl From<String> for ReviewProcess {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "double-blind" => ReviewProcess::DoubleBlind,
            "single-blind" => ReviewProcess::SingleBlind,
            "triple-blind" => ReviewProcess::TripleBlind,
            "open" => ReviewProcess::Open,
            "editorial" => ReviewProcess::Editorial,
            "committee" => ReviewProcess::Committee,
            "peer-review" => ReviewProcess::PeerReview,
            "post-publication" => ReviewProcess::PostPublication,
            "none" => ReviewProcess::NoReview,
            _ => ReviewProcess::Other(value),
        }
    }
}

impl From<ReviewProcess> for String {
    fn from(value: ReviewProcess) -> Self {
        value.as_str().to_string()
    }
}

/// Digital preservation services (controlled vocabulary).
///
/// Covers the services reported by the curated sources; regional services
/// outside this list survive round-trips through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreservationService {
    Lockss,
    Clockss,
    PkpPn,
    Portico,
    Jstor,
    InternetArchive,
    Pmc,
    EuropePmc,
    HathiTrust,
    BritishLibrary,
    LibraryOfCongress,
    Bnf,
    Dnb,
    Kb,
    Nla,
    Cines,
    Zenodo,
    Cariniana,
    Other(String),
}

impl PreservationService {
    pub fn as_str(&self) -> &str {
        match self {
            PreservationService::Lockss => "LOCKSS",
            PreservationService::Clockss => "CLOCKSS",
            PreservationService::PkpPn => "PKP PN",
            PreservationService::Portico => "Portico",
            PreservationService::Jstor => "JSTOR",
            PreservationService::InternetArchive => "Internet Archive",
            PreservationService::Pmc => "PMC",
            PreservationService::EuropePmc => "Europe PMC",
            PreservationService::HathiTrust => "HathiTrust",
            PreservationService::BritishLibrary => "British Library",
            PreservationService::LibraryOfCongress => "Library of Congress",
            PreservationService::Bnf => "BnF",
            PreservationService::Dnb => "DNB",
            PreservationService::Kb => "KB",
            PreservationService::Nla => "NLA",
            PreservationService::Cines => "CINES",
            PreservationService::Zenodo => "Zenodo",
            PreservationService::Cariniana => "Cariniana",
            PreservationService::Other(value) => value,
        }
    }
}

impl From<String> for PreservationService {
    fn from(value: String) -> Self {
        for service in [
            PreservationService::Lockss,
            PreservationService::Clockss,
            PreservationService::PkpPn,
            PreservationService::Portico,
            PreservationService::Jstor,
            PreservationService::InternetArchive,
            PreservationService::Pmc,
            PreservationService::EuropePmc,
            PreservationService::HathiTrust,
            PreservationService::BritishLibrary,
            PreservationService::LibraryOfCongress,
            PreservationService::Bnf,
            PreservationService::Dnb,
            PreservationService::Kb,
            PreservationService::Nla,
            PreservationService::Cines,
            PreservationService::Zenodo,
            PreservationService::Cariniana,
        ] {
            if service.as_str().eq_ignore_ascii_case(value.trim()) {
                return service;
            }
        }
        PreservationService::Other(value)
    }
}

impl From<PreservationService> for String {
    fn from(value: PreservationService) -> Self {
        value.as_str().to_string()
    }
}

/// One journal observation from one source, with already-normalized field
/// values.
///
/// ISSN identifiers:
/// - `issn_print` (p-ISSN): ISSN of the print edition
/// - `issn_electronic` (e-ISSN): ISSN of the online edition
/// - `issn_l` (linking ISSN): groups all editions as "the same journal".
///   A journal may carry several ISSNs, but one ISSN-L links them together,
///   which is what makes deduplication across sources possible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Source this observation came from.
    pub source: DataSource,

    // Core identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_print: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_electronic: Option<String>,
    /// Registry (catalog) identifier, usable as a fallback key when no
    /// shared ISSN exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    /// Source-specific external identifier (e.g. `S4306530189`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    // Basic metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// journal, book series, conference, repository, ebook platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Official title abbreviation. For book-series records some catalogs
    /// store an ISBN-13 here, which phase 4 picks up as an identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_titles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_organisations: Vec<String>,

    // Indexing / deposit status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deposited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deposit_year: Option<i32>,
    /// Embargo period in months; 0 means immediate release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo_months: Option<i32>,

    // Subjects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_oa: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_subfield: Option<String>,

    // Publishing economics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apc_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apc_currency: Option<String>,

    /// ISO 639-1 language codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_url: Option<String>,

    // Licensing
    /// SPDX identifier (e.g. CC-BY-4.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,

    // Editorial
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_process: Vec<ReviewProcess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_process_url: Option<String>,

    // Preservation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preservation_services: Vec<PreservationService>,

    // Copyright and quality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_author: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_screening: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deposit_policy: Vec<String>,

    // Metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub works_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_by_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_index: Option<i32>,

    // Journal relationships (title changes, splits, mergers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predecessor_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub successor_ids: Vec<String>,
}

impl JournalRecord {
    /// An empty record tagged with `source`.
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Whether the record carries at least one ISSN.
    pub fn has_issn(&self) -> bool {
        self.issn_l.is_some() || self.issn_print.is_some() || self.issn_electronic.is_some()
    }

    /// All ISSNs present on the record, linking ISSN first.
    pub fn issns(&self) -> Vec<&str> {
        [&self.issn_l, &self.issn_print, &self.issn_electronic]
            .into_iter()
            .filter_map(|issn| issn.as_deref())
            .collect()
    }
}

/// The merged record for one canonical key.
///
/// Created on first sight of a key, then mutated in place by every
/// subsequent merge into that key. Once `unified_id` is assigned, the
/// record's identity never changes, only its content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Unified identifier: the canonical key for identifier-bearing
    /// records, a synthetic identifier otherwise. Always populated in
    /// engine output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unified_id: Option<String>,

    // Identifiers (union of everything seen for this key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_print: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn_electronic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Every ISSN ever observed for this record, for lookup. First-seen
    /// order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_issns: Vec<String>,

    /// Sources that contributed to this record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<DataSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_titles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_organisations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_indexed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deposited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deposit_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo_months: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_oa: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_subfield: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apc_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apc_currency: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_process: Vec<ReviewProcess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_process_url: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preservation_services: Vec<PreservationService>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_author: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_screening: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deposit_policy: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub works_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cited_by_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_index: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub predecessor_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub successor_ids: Vec<String>,
}

impl CanonicalRecord {
    /// All ISSNs present in the three ISSN fields, linking ISSN first.
    pub fn issns(&self) -> Vec<&str> {
        [&self.issn_l, &self.issn_print, &self.issn_electronic]
            .into_iter()
            .filter_map(|issn| issn.as_deref())
            .collect()
    }

    /// Every identifier bound to this record: the ISSN lookup set plus the
    /// registry and external identifiers. Used by the disjointness checks.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.all_issns.iter().map(String::as_str).collect();
        for id in [&self.registry_id, &self.external_id] {
            if let Some(id) = id.as_deref() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

fn isbn_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ISBN-13 shape only; checksum validation belongs to the normalization
    // layer upstream of the engine.
    PATTERN.get_or_init(|| Regex::new(r"^97[89]-[\d-]+$").expect("static pattern"))
}

/// Whether a value looks like an ISBN-13.
pub fn is_isbn(value: &str) -> bool {
    isbn_pattern().is_match(value)
}

/// Synthetic identifier from a registry (catalog) id.
pub fn registry_identifier(registry_id: &str) -> String {
    format!("REG-{registry_id}")
}

/// Whether a canonical key is a registry-based key.
pub fn is_registry_key(key: &str) -> bool {
    key.starts_with("REG-")
}

/// Synthetic identifier from an ISBN-13.
pub fn isbn_identifier(isbn: &str) -> String {
    format!("ISBN-{isbn}")
}

/// Synthetic identifier from a source-specific external id.
///
/// Accepts either a bare id (`S4306530189`) or a URL form; URL prefixes are
/// stripped so both spellings produce the same identifier.
pub fn external_identifier(external_id: &str) -> String {
    let id = if external_id.starts_with("http://") || external_id.starts_with("https://") {
        external_id.rsplit('/').next().unwrap_or(external_id)
    } else {
        external_id
    };
    format!("EXT-{id}")
}
