//! Student performance aggregation.
//!
//! This module provides the pure functions that turn raw per-strand
//! competence/progress records into the derived metrics shown throughout
//! the views: overall progress, modal competence, completion counts,
//! per-strand cohorts, and class-level analytics.
//!
//! Every function here is a total, stateless map from an immutable
//! snapshot to a fresh result. No I/O, no shared state, no suspension.

use crate::catalog::{Strand, StrandCatalog};
use crate::error::AggregationError;
use crate::models::{CompetenceLevel, StudentRecord};
use std::collections::{BTreeMap, HashSet};

/// Validate a freshly fetched roster before any aggregation runs.
///
/// Rejects duplicate ids and out-of-range progress values. Out-of-range
/// progress is rejected rather than clamped: a value above 100 is bad
/// source data and silently clamping would distort every average built
/// on top of it.
pub fn validate_roster(roster: &[StudentRecord]) -> Result<(), AggregationError> {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for student in roster {
        if !seen_ids.insert(&student.id) {
            return Err(AggregationError::DuplicateStudentId(student.id.clone()));
        }
        validate_student(student)?;
    }

    Ok(())
}

/// Validate a single student's records, for paths that fetch one record
/// instead of a full roster. Same out-of-range policy as
/// [`validate_roster`]; duplicate-id checks do not apply to one record.
pub fn validate_student(student: &StudentRecord) -> Result<(), AggregationError> {
    for (key, record) in &student.strands {
        if record.progress > 100 {
            return Err(AggregationError::ProgressOutOfRange {
                student_id: student.id.clone(),
                strand_key: key.clone(),
                progress: record.progress,
            });
        }
    }

    Ok(())
}

/// Average progress across the full catalog, rounded half up.
///
/// Strands absent from the student's record contribute 0 to the sum but
/// still count in the divisor: a student assessed on one of four strands
/// at 100% has overall progress 25, not 100.
pub fn overall_progress(
    student: &StudentRecord,
    catalog: &StrandCatalog,
) -> Result<u8, AggregationError> {
    if catalog.is_empty() {
        return Err(AggregationError::EmptyStrandCatalog);
    }

    let total: u32 = catalog
        .iter()
        .map(|strand| u32::from(student.progress_for(&strand.key)))
        .sum();

    Ok(round_half_up(total, catalog.len() as u32))
}

/// Occurrences of each competence level across the catalog.
///
/// All four levels are present in the result (zero-filled); only strands
/// with an assigned competence are counted. Absence never defaults to BE
/// here, unlike the badge-rendering fallback.
pub fn competence_tally(
    student: &StudentRecord,
    catalog: &StrandCatalog,
) -> BTreeMap<CompetenceLevel, usize> {
    let mut tally: BTreeMap<CompetenceLevel, usize> =
        CompetenceLevel::ALL.iter().map(|&l| (l, 0)).collect();

    for strand in catalog.iter() {
        if let Some(level) = student.competence_for(&strand.key) {
            *tally.entry(level).or_insert(0) += 1;
        }
    }

    tally
}

/// The student's modal competence level across assigned strands.
///
/// Ties break to the first level in the fixed enumeration order
/// `BE, AE, ME, EE` reaching the maximum count: two strands at ME and
/// two at EE yield ME. A student with no assigned competences at all
/// ties everything at zero and gets BE, the deliberate lowest default.
pub fn overall_competence(student: &StudentRecord, catalog: &StrandCatalog) -> CompetenceLevel {
    let tally = competence_tally(student, catalog);

    let mut best = CompetenceLevel::BE;
    let mut best_count = 0usize;
    for level in CompetenceLevel::ALL {
        let count = tally[&level];
        // Strictly greater, so the earliest level keeps ties.
        if count > best_count {
            best = level;
            best_count = count;
        }
    }

    best
}

/// Strands where progress is exactly 100.
///
/// Distinct from overall progress: a student can average 87 and still
/// have two completed strands.
pub fn completed_strand_count(student: &StudentRecord, catalog: &StrandCatalog) -> usize {
    catalog
        .iter()
        .filter(|strand| student.progress_for(&strand.key) == 100)
        .count()
}

/// Students with an assigned competence for the given strand.
///
/// Order-preserving over the input roster. Progress is ignored: a
/// student at 90% progress with no assessed competence is not in the
/// cohort.
pub fn strand_cohort<'a>(roster: &'a [StudentRecord], strand: &Strand) -> Vec<&'a StudentRecord> {
    roster
        .iter()
        .filter(|s| s.competence_for(&strand.key).is_some())
        .collect()
}

/// Whether a student matches a search query: case-insensitive substring
/// of the name or the id. An empty query matches everything.
pub fn matches_query(student: &StudentRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    student.name.to_lowercase().contains(&needle) || student.id.to_lowercase().contains(&needle)
}

/// Filter a roster by a search query, preserving roster order.
pub fn filter_roster<'a>(roster: &'a [StudentRecord], query: &str) -> Vec<&'a StudentRecord> {
    roster.iter().filter(|s| matches_query(s, query)).collect()
}

/// Mean of per-student overall progress, rounded half up.
/// An empty roster averages to 0.
pub fn class_average_progress(
    roster: &[StudentRecord],
    catalog: &StrandCatalog,
) -> Result<u8, AggregationError> {
    if catalog.is_empty() {
        return Err(AggregationError::EmptyStrandCatalog);
    }
    if roster.is_empty() {
        return Ok(0);
    }

    let total: u32 = roster
        .iter()
        .map(|s| overall_progress(s, catalog).map(u32::from))
        .sum::<Result<u32, _>>()?;

    Ok(round_half_up(total, roster.len() as u32))
}

/// Students tallied by their overall competence, all levels zero-filled.
pub fn class_competence_distribution(
    roster: &[StudentRecord],
    catalog: &StrandCatalog,
) -> BTreeMap<CompetenceLevel, usize> {
    let mut dist: BTreeMap<CompetenceLevel, usize> =
        CompetenceLevel::ALL.iter().map(|&l| (l, 0)).collect();

    for student in roster {
        *dist.entry(overall_competence(student, catalog)).or_insert(0) += 1;
    }

    dist
}

/// Percentage of students whose overall competence is ME or EE.
/// An empty roster yields 0.
pub fn meeting_expectation_share(roster: &[StudentRecord], catalog: &StrandCatalog) -> u8 {
    if roster.is_empty() {
        return 0;
    }

    let meeting = roster
        .iter()
        .filter(|s| {
            matches!(
                overall_competence(s, catalog),
                CompetenceLevel::ME | CompetenceLevel::EE
            )
        })
        .count() as u32;

    round_half_up(meeting * 100, roster.len() as u32)
}

/// Mean progress for one strand across the roster, rounded half up.
/// Absent records contribute 0; an empty roster yields 0.
pub fn strand_average_progress(roster: &[StudentRecord], strand: &Strand) -> u8 {
    if roster.is_empty() {
        return 0;
    }

    let total: u32 = roster
        .iter()
        .map(|s| u32::from(s.progress_for(&strand.key)))
        .sum();

    round_half_up(total, roster.len() as u32)
}

/// Integer division rounding half up, matching standard `round` semantics
/// rather than truncation. Inputs are small percentage sums, well inside
/// `u32`.
fn round_half_up(sum: u32, divisor: u32) -> u8 {
    ((sum * 2 + divisor) / (2 * divisor)) as u8
}
