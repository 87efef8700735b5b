//! Workload profile normalization
//!
//! Converts each of the three accepted request shapes into one canonical
//! `WorkloadProfile`, surfacing field-level validation errors before the
//! sizing engine is ever invoked.

use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{FieldError, NormalizeError};
use crate::models::{RecommendationRequest, RowProfile, SourceKind, WorkloadProfile};
use crate::tabular;

/// Normalize a request into a canonical profile.
///
/// Validation short-circuits: a request with bad explicit fields never
/// reaches the engine. Present-but-unparseable hardware specs are allowed
/// through; deep parsing is the engine's job.
pub fn normalize(request: RecommendationRequest) -> Result<WorkloadProfile, NormalizeError> {
    match request {
        RecommendationRequest::FromScratch {
            total_users,
            workload_type,
            user_concurrency,
        } => normalize_from_scratch(&total_users, &workload_type, &user_concurrency),
        RecommendationRequest::Existing {
            cpu,
            ram,
            hard_disk,
        } => normalize_existing(&cpu, &ram, &hard_disk),
        RecommendationRequest::File { file_name, content } => {
            normalize_file(&file_name, &content)
        }
    }
}

fn normalize_from_scratch(
    total_users: &str,
    workload_type: &str,
    user_concurrency: &str,
) -> Result<WorkloadProfile, NormalizeError> {
    let mut errors = Vec::new();

    let users = require_positive_number("total_users", total_users, &mut errors);
    let concurrency = require_positive_number("user_concurrency", user_concurrency, &mut errors);

    let category = workload_type.trim().to_lowercase();
    if category.is_empty() {
        errors.push(FieldError::new(
            "workload_type",
            "Type of workload is required",
        ));
    }

    if !errors.is_empty() {
        return Err(NormalizeError::Validation(errors));
    }

    Ok(WorkloadProfile {
        source_kind: SourceKind::FromScratch,
        user_count: users,
        concurrency,
        workload_category: Some(category),
        observed_cpu: None,
        observed_ram: None,
        observed_storage: None,
    })
}

fn normalize_existing(
    cpu: &str,
    ram: &str,
    hard_disk: &str,
) -> Result<WorkloadProfile, NormalizeError> {
    let mut errors = Vec::new();

    let cpu = require_text("cpu", cpu, "CPU information is required", &mut errors);
    let ram = require_text("ram", ram, "RAM information is required", &mut errors);
    let disk = require_text(
        "hard_disk",
        hard_disk,
        "Hard disk information is required",
        &mut errors,
    );

    if !errors.is_empty() {
        return Err(NormalizeError::Validation(errors));
    }

    Ok(WorkloadProfile {
        source_kind: SourceKind::Existing,
        user_count: None,
        concurrency: None,
        workload_category: None,
        observed_cpu: cpu,
        observed_ram: ram,
        observed_storage: disk,
    })
}

fn normalize_file(file_name: &str, content: &str) -> Result<WorkloadProfile, NormalizeError> {
    let bytes = general_purpose::STANDARD
        .decode(content)
        .map_err(|e| NormalizeError::Parse(crate::error::ParseError::Malformed(e.to_string())))?;

    let rows = tabular::parse(&bytes, file_name)?;
    let profile = aggregate_rows(&rows);

    if profile.is_blank() {
        return Err(NormalizeError::Insufficient);
    }
    Ok(profile)
}

/// Fold row profiles into one fleet-level profile: users are summed,
/// concurrency is averaged, the most frequent category wins (ties broken
/// by first occurrence), and the first non-empty observed spec is kept
/// per field.
pub fn aggregate_rows(rows: &[RowProfile]) -> WorkloadProfile {
    let mut profile = WorkloadProfile::empty(SourceKind::FileDerived);

    let user_total: u64 = rows.iter().filter_map(|r| r.users).sum();
    if rows.iter().any(|r| r.users.is_some()) {
        profile.user_count = Some(user_total);
    }

    let concurrency_values: Vec<u64> = rows.iter().filter_map(|r| r.concurrency).collect();
    if !concurrency_values.is_empty() {
        let sum: u64 = concurrency_values.iter().sum();
        let avg = (sum as f64 / concurrency_values.len() as f64).round() as u64;
        profile.concurrency = Some(avg);
    }

    profile.workload_category = most_frequent_category(rows);
    profile.observed_cpu = first_text(rows, |r| r.cpu.as_deref());
    profile.observed_ram = first_text(rows, |r| r.ram.as_deref());
    profile.observed_storage = first_text(rows, |r| r.disk.as_deref());

    debug!(
        rows = rows.len(),
        user_count = ?profile.user_count,
        concurrency = ?profile.concurrency,
        category = ?profile.workload_category,
        "Aggregated file rows into profile"
    );
    profile
}

fn most_frequent_category(rows: &[RowProfile]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for row in rows {
        if let Some(w) = &row.workload {
            let normalized = w.trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            let count = counts.entry(normalized.clone()).or_insert(0);
            if *count == 0 {
                order.push(normalized);
            }
            *count += 1;
        }
    }

    // First occurrence wins ties: only a strictly higher count displaces
    // the current leader
    let mut best: Option<(String, usize)> = None;
    for category in order {
        let count = counts[&category];
        if best.as_ref().map_or(true, |(_, n)| count > *n) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category)
}

fn first_text<'a>(
    rows: &'a [RowProfile],
    get: impl Fn(&'a RowProfile) -> Option<&'a str>,
) -> Option<String> {
    rows.iter()
        .filter_map(|r| get(r))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn require_positive_number(
    field: &str,
    value: &str,
    errors: &mut Vec<FieldError>,
) -> Option<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => Some(n as u64),
        _ => {
            errors.push(FieldError::new(field, "Please enter a valid number"));
            None
        }
    }
}

fn require_text(
    field: &str,
    value: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, message));
        None
    } else {
        Some(trimmed.to_string())
    }
}
