//! # Field Merge Policy
//!
//! Pure field-level rules for folding a source record into a canonical
//! record. The policy is applied per canonical key every time another
//! record arrives for a key that already has a record.
//!
//! Per field kind:
//!
//! | Field kind   | Rule                                                       |
//! |--------------|------------------------------------------------------------|
//! | Scalar       | overwrite when empty or when the incoming source priority  |
//! |              | strictly exceeds the best already-merged priority; ties     |
//! |              | keep the first value seen                                  |
//! | Boolean      | `true` wins regardless of priority; otherwise fill-if-empty|
//! | Multi-valued | ordered union, duplicates suppressed, first-seen order     |
//! | Identifiers  | fill-if-empty only, never overwritten                      |
//! | Sources      | append-if-absent, priority-blind                           |
//! | `all_issns`  | union of every ISSN field ever observed                    |
//!
//! The "best already-merged priority" excludes the incoming source's own
//! prior contributions, so priority comparisons are always against
//! genuinely different sources.

use crate::config::SourcePriorities;
use crate::model::{CanonicalRecord, JournalRecord};

/// Scalar rule: fill when empty, overwrite on strictly higher priority.
fn merge_scalar<T: Clone>(existing: &mut Option<T>, incoming: &Option<T>, should_update: bool) {
    if let Some(value) = incoming {
        if existing.is_none() || should_update {
            *existing = Some(value.clone());
        }
    }
}

/// Boolean rule: `true` dominates; `false` only fills an empty slot.
fn merge_flag(existing: &mut Option<bool>, incoming: Option<bool>) {
    match incoming {
        Some(true) => *existing = Some(true),
        Some(false) if existing.is_none() => *existing = Some(false),
        _ => {}
    }
}

/// Identifier rule: identifiers are facts, not opinions. Never overwrite.
fn fill_identifier(existing: &mut Option<String>, incoming: &Option<String>) {
    if existing.is_none() {
        existing.clone_from(incoming);
    }
}

/// Ordered union preserving first-seen order.
fn union_into<T: PartialEq + Clone>(existing: &mut Vec<T>, incoming: &[T]) {
    for value in incoming {
        if !existing.contains(value) {
            existing.push(value.clone());
        }
    }
}

/// Ordered union for string lists, skipping empty values.
fn union_strings(existing: &mut Vec<String>, incoming: &[String]) {
    for value in incoming {
        if !value.is_empty() && !existing.contains(value) {
            existing.push(value.clone());
        }
    }
}

/// Create a fresh canonical record from the first source record seen for a
/// key. List fields start from the record's values; `all_issns` collects
/// whatever ISSNs the record carries.
pub fn create_canonical(record: &JournalRecord) -> CanonicalRecord {
    let mut all_issns: Vec<String> = Vec::new();
    for issn in record.issns() {
        if !all_issns.iter().any(|seen| seen == issn) {
            all_issns.push(issn.to_string());
        }
    }

    CanonicalRecord {
        unified_id: None,
        issn_l: record.issn_l.clone(),
        issn_print: record.issn_print.clone(),
        issn_electronic: record.issn_electronic.clone(),
        registry_id: record.registry_id.clone(),
        external_id: record.external_id.clone(),
        all_issns,
        sources: vec![record.source.clone()],
        title: record.title.clone(),
        publisher: record.publisher.clone(),
        country: record.country.clone(),
        source_type: record.source_type.clone(),
        abbreviation: record.abbreviation.clone(),
        alternative_titles: record.alternative_titles.clone(),
        other_organisations: record.other_organisations.clone(),
        is_indexed: record.is_indexed,
        is_deposited: record.is_deposited,
        agreement_status: record.agreement_status.clone(),
        last_deposit_year: record.last_deposit_year,
        embargo_months: record.embargo_months,
        is_oa: record.is_oa,
        subjects: record.subjects.clone(),
        subject_domain: record.subject_domain.clone(),
        subject_field: record.subject_field.clone(),
        subject_subfield: record.subject_subfield.clone(),
        apc_amount: record.apc_amount,
        apc_currency: record.apc_currency.clone(),
        language: record.language.clone(),
        journal_url: record.journal_url.clone(),
        license: record.license.clone(),
        license_url: record.license_url.clone(),
        review_process: record.review_process.clone(),
        review_process_url: record.review_process_url.clone(),
        preservation_services: record.preservation_services.clone(),
        copyright_author: record.copyright_author,
        copyright_url: record.copyright_url.clone(),
        plagiarism_screening: record.plagiarism_screening,
        deposit_policy: record.deposit_policy.clone(),
        works_count: record.works_count,
        cited_by_count: record.cited_by_count,
        h_index: record.h_index,
        predecessor_ids: record.predecessor_ids.clone(),
        successor_ids: record.successor_ids.clone(),
    }
}

/// Fold `record` into `existing` under the field merge policy.
///
/// Updates `existing` in place. The incoming source's priority is compared
/// against the best priority among the *other* sources already merged into
/// the record; absent any other source, the comparison succeeds.
pub fn merge_record(
    existing: &mut CanonicalRecord,
    record: &JournalRecord,
    priorities: &SourcePriorities,
) {
    let source = record.source.clone();
    if !existing.sources.contains(&source) {
        existing.sources.push(source.clone());
    }

    let max_other_priority = existing
        .sources
        .iter()
        .filter(|merged| **merged != source)
        .map(|merged| priorities.priority(merged))
        .max()
        .unwrap_or(-1);
    let should_update = priorities.priority(&source) > max_other_priority;

    // Scalar text fields
    merge_scalar(&mut existing.title, &record.title, should_update);
    merge_scalar(&mut existing.publisher, &record.publisher, should_update);
    merge_scalar(&mut existing.country, &record.country, should_update);
    merge_scalar(&mut existing.source_type, &record.source_type, should_update);
    merge_scalar(&mut existing.abbreviation, &record.abbreviation, should_update);
    merge_scalar(
        &mut existing.agreement_status,
        &record.agreement_status,
        should_update,
    );
    merge_scalar(
        &mut existing.subject_domain,
        &record.subject_domain,
        should_update,
    );
    merge_scalar(
        &mut existing.subject_field,
        &record.subject_field,
        should_update,
    );
    merge_scalar(
        &mut existing.subject_subfield,
        &record.subject_subfield,
        should_update,
    );
    merge_scalar(&mut existing.apc_currency, &record.apc_currency, should_update);
    merge_scalar(&mut existing.journal_url, &record.journal_url, should_update);
    merge_scalar(&mut existing.license, &record.license, should_update);
    merge_scalar(&mut existing.license_url, &record.license_url, should_update);
    merge_scalar(
        &mut existing.review_process_url,
        &record.review_process_url,
        should_update,
    );
    merge_scalar(
        &mut existing.copyright_url,
        &record.copyright_url,
        should_update,
    );

    // Boolean fields
    merge_flag(&mut existing.is_oa, record.is_oa);
    merge_flag(&mut existing.is_indexed, record.is_indexed);
    merge_flag(&mut existing.is_deposited, record.is_deposited);
    merge_flag(&mut existing.copyright_author, record.copyright_author);
    merge_flag(&mut existing.plagiarism_screening, record.plagiarism_screening);

    // Numeric fields follow the scalar rule
    merge_scalar(&mut existing.apc_amount, &record.apc_amount, should_update);
    merge_scalar(&mut existing.works_count, &record.works_count, should_update);
    merge_scalar(
        &mut existing.cited_by_count,
        &record.cited_by_count,
        should_update,
    );
    merge_scalar(&mut existing.h_index, &record.h_index, should_update);
    merge_scalar(
        &mut existing.last_deposit_year,
        &record.last_deposit_year,
        should_update,
    );
    merge_scalar(
        &mut existing.embargo_months,
        &record.embargo_months,
        should_update,
    );

    // Multi-valued fields
    union_strings(&mut existing.alternative_titles, &record.alternative_titles);
    union_strings(&mut existing.other_organisations, &record.other_organisations);
    union_strings(&mut existing.subjects, &record.subjects);
    union_strings(&mut existing.language, &record.language);
    union_strings(&mut existing.deposit_policy, &record.deposit_policy);
    union_strings(&mut existing.predecessor_ids, &record.predecessor_ids);
    union_strings(&mut existing.successor_ids, &record.successor_ids);
    union_into(&mut existing.review_process, &record.review_process);
    union_into(
        &mut existing.preservation_services,
        &record.preservation_services,
    );

    // Identifiers: fill once, never rewrite
    fill_identifier(&mut existing.issn_l, &record.issn_l);
    fill_identifier(&mut existing.issn_print, &record.issn_print);
    fill_identifier(&mut existing.issn_electronic, &record.issn_electronic);
    fill_identifier(&mut existing.registry_id, &record.registry_id);
    fill_identifier(&mut existing.external_id, &record.external_id);

    // ISSN lookup set: union of everything ever observed
    let incoming_issns: Vec<String> = record.issns().iter().map(|s| s.to_string()).collect();
    union_strings(&mut existing.all_issns, &incoming_issns);
}
