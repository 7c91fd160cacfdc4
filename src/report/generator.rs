//! Report generation.
//!
//! Three output shapes: a plain-text per-student performance report (the
//! shareable export), a Markdown class report, and a JSON dump of the
//! same class report for downstream tooling. The text format is
//! human-readable, not a stable wire format.

use crate::analysis::{
    class_competence_distribution, competence_tally, completed_strand_count, overall_competence,
    overall_progress, strand_cohort,
};
use crate::catalog::StrandCatalog;
use crate::error::AggregationError;
use crate::models::{
    ClassProfile, ClassReport, CompetenceLevel, ReportMetadata, StudentRecord, StudentSummary,
};
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Build the class report view-model from a validated snapshot.
pub fn build_class_report(
    roster: &[StudentRecord],
    profile: Option<&ClassProfile>,
    catalog: &StrandCatalog,
    source: &str,
    generated_at: DateTime<Utc>,
) -> Result<ClassReport, AggregationError> {
    let students = roster
        .iter()
        .map(|student| {
            Ok(StudentSummary {
                id: student.id.clone(),
                name: student.name.clone(),
                overall_progress: overall_progress(student, catalog)?,
                overall_competence: overall_competence(student, catalog),
                completed_strands: completed_strand_count(student, catalog),
                tally: competence_tally(student, catalog),
            })
        })
        .collect::<Result<Vec<_>, AggregationError>>()?;

    Ok(ClassReport {
        metadata: ReportMetadata {
            source: source.to_string(),
            generated_at,
            student_count: roster.len(),
            strand_count: catalog.len(),
        },
        students,
        strand_coverage: profile.map(|p| p.strands.clone()).unwrap_or_default(),
        distribution: class_competence_distribution(roster, catalog),
    })
}

/// Generate the per-student performance report as plain text.
///
/// Strands the student has no record for are skipped in the detail
/// section; they still count toward the averaged summary up top.
pub fn generate_student_report(
    student: &StudentRecord,
    catalog: &StrandCatalog,
    generated_at: DateTime<Utc>,
) -> Result<String, AggregationError> {
    let average = overall_progress(student, catalog)?;
    let completed = completed_strand_count(student, catalog);

    let mut report = String::new();
    report.push_str("Student Performance Report\n");
    report.push_str("========================\n\n");
    report.push_str(&format!("Student Name: {}\n", student.name));
    report.push_str(&format!("Student ID: {}\n", student.id));
    report.push_str(&format!(
        "Report Date: {}\n\n",
        generated_at.format("%Y-%m-%d")
    ));

    report.push_str("Overall Performance Summary:\n");
    report.push_str(&format!("- Average Progress: {}%\n", average));
    report.push_str(&format!("- Total Strands: {}\n", catalog.len()));
    report.push_str(&format!("- Completed Strands: {}\n\n", completed));

    report.push_str("Detailed Strand Performance:\n");
    report.push_str("===========================\n\n");

    for strand in catalog.iter() {
        let Some(record) = student.strand(&strand.key) else {
            continue;
        };
        // Badge fallback: an unassessed strand renders as BE here, while
        // tallies and cohorts keep treating it as absent.
        let level = student.badge_competence_for(&strand.key);

        report.push_str(&format!("{}:\n", strand.name));
        report.push_str(&format!(
            "  Competence Level: {} ({})\n",
            level.label(),
            level.code()
        ));
        report.push_str(&format!("  Work Progress: {}%\n", record.progress));
        report.push_str(&format!("  Description: {}\n\n", level.description()));
    }

    Ok(report)
}

/// Generate a complete Markdown class report.
pub fn generate_markdown_report(
    report: &ClassReport,
    roster: &[StudentRecord],
    catalog: &StrandCatalog,
) -> String {
    let mut output = String::new();

    output.push_str("# Class Performance Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_mastery_key_section());
    output.push_str(&generate_strand_section(report, roster, catalog));
    output.push_str(&generate_roster_section(report));
    output.push_str(&generate_distribution_section(report));

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Students:** {}\n", metadata.student_count));
    section.push_str(&format!("- **Strands:** {}\n", metadata.strand_count));
    section.push('\n');

    section
}

fn generate_mastery_key_section() -> String {
    let mut section = String::new();

    section.push_str("## Mastery Key\n\n");
    section.push_str("| Code | Level | Description |\n");
    section.push_str("|:---:|:---|:---|\n");
    for level in CompetenceLevel::ALL {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            level.code(),
            level.label(),
            level.description()
        ));
    }
    section.push('\n');

    section
}

fn generate_strand_section(
    report: &ClassReport,
    roster: &[StudentRecord],
    catalog: &StrandCatalog,
) -> String {
    let mut section = String::new();

    section.push_str("## Strands\n\n");
    section.push_str("| Strand | Work Covered | Assessed Students |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for strand in catalog.iter() {
        let covered = report
            .strand_coverage
            .iter()
            .find(|c| c.strand == strand.name)
            .map(|c| c.work_covered)
            .unwrap_or(0);
        let cohort_size = strand_cohort(roster, strand).len();

        section.push_str(&format!(
            "| {} | {}% | {} |\n",
            strand.name, covered, cohort_size
        ));
    }
    section.push('\n');

    section
}

fn generate_roster_section(report: &ClassReport) -> String {
    let mut section = String::new();

    section.push_str("## Students\n\n");

    if report.students.is_empty() {
        section.push_str("No students in the roster.\n\n");
        return section;
    }

    section.push_str("| Student | ID | Overall Progress | Overall Competence | Completed |\n");
    section.push_str("|:---|:---|:---:|:---:|:---:|\n");

    for student in &report.students {
        section.push_str(&format!(
            "| {} | `{}` | {}% | {} | {} |\n",
            student.name,
            student.id,
            student.overall_progress,
            student.overall_competence.code(),
            student.completed_strands
        ));
    }
    section.push('\n');

    section
}

fn generate_distribution_section(report: &ClassReport) -> String {
    let mut section = String::new();

    section.push_str("## Competence Distribution\n\n");
    section.push_str("| Level | Students |\n");
    section.push_str("|:---|:---:|\n");

    for level in CompetenceLevel::ALL {
        let count = report.distribution.get(&level).copied().unwrap_or(0);
        section.push_str(&format!("| {} ({}) | {} |\n", level.label(), level.code(), count));
    }
    section.push('\n');

    section
}

/// Generate a JSON class report.
pub fn generate_json_report(report: &ClassReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
