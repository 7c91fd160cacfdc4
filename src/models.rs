//! Data models for the class profile analyzer.
//!
//! This module contains all the core data structures used throughout
//! the application for representing students, strand records, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Competence level of a student for one learning strand.
///
/// The four grades are ordered `BE < AE < ME < EE`. The system never
/// compares levels directly; the order only fixes the enumeration used
/// for tallies and tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompetenceLevel {
    /// Below Expectation
    BE,
    /// Approaching Expectation
    AE,
    /// Meeting Expectation
    ME,
    /// Exceeding Expectation
    EE,
}

impl fmt::Display for CompetenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl CompetenceLevel {
    /// Fixed enumeration order. Tally iteration and the mode tie-break
    /// both follow this order; changing it changes tie-break results.
    pub const ALL: [CompetenceLevel; 4] = [
        CompetenceLevel::BE,
        CompetenceLevel::AE,
        CompetenceLevel::ME,
        CompetenceLevel::EE,
    ];

    /// Returns the two-letter grade code.
    pub fn code(&self) -> &'static str {
        match self {
            CompetenceLevel::BE => "BE",
            CompetenceLevel::AE => "AE",
            CompetenceLevel::ME => "ME",
            CompetenceLevel::EE => "EE",
        }
    }

    /// Returns the full display label.
    pub fn label(&self) -> &'static str {
        match self {
            CompetenceLevel::BE => "Below Expectation",
            CompetenceLevel::AE => "Approaching Expectation",
            CompetenceLevel::ME => "Meeting Expectation",
            CompetenceLevel::EE => "Exceeding Expectation",
        }
    }

    /// Returns the color token used for badges and progress bars.
    #[allow(dead_code)] // Consumed by GUI front ends, not the terminal views
    pub fn color(&self) -> &'static str {
        match self {
            CompetenceLevel::BE => "#FF6B6B",
            CompetenceLevel::AE => "#FFD93D",
            CompetenceLevel::ME => "#6BCF7F",
            CompetenceLevel::EE => "#1C91FC",
        }
    }

    /// Returns the teacher-facing description of the grade.
    pub fn description(&self) -> &'static str {
        match self {
            CompetenceLevel::BE => "Needs significant support",
            CompetenceLevel::AE => "Developing with some support needed",
            CompetenceLevel::ME => "Consistently meets standards",
            CompetenceLevel::EE => "Advanced mastery achieved",
        }
    }
}

/// One student's state for one learning strand.
///
/// `competence` is genuinely optional: a strand can be in progress without
/// having been assessed yet. That absence is modeled, never defaulted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandRecord {
    /// Assigned competence grade, absent if the strand is unassessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competence: Option<CompetenceLevel>,
    /// Percentage of curriculum work covered for this strand (0-100).
    pub progress: u8,
}

/// A single student in the fetched roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique identifier within a roster.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Per-strand records keyed by strand key (e.g. `letterIdentification`).
    /// Not required to cover every strand in the catalog.
    #[serde(default)]
    pub strands: HashMap<String, StrandRecord>,
}

impl StudentRecord {
    /// Returns the record for a strand key, if the student has one.
    pub fn strand(&self, key: &str) -> Option<&StrandRecord> {
        self.strands.get(key)
    }

    /// Progress for a strand key; an absent strand contributes 0.
    ///
    /// This is the single place where "absent" resolves to a number,
    /// so averages stay distinct from present-but-zero records.
    pub fn progress_for(&self, key: &str) -> u8 {
        self.strand(key).map(|r| r.progress).unwrap_or(0)
    }

    /// Assigned competence for a strand key. Absence stays absent;
    /// tallies and cohorts must never see a defaulted grade.
    pub fn competence_for(&self, key: &str) -> Option<CompetenceLevel> {
        self.strand(key).and_then(|r| r.competence)
    }

    /// Competence for badge rendering, falling back to `BE` when the
    /// strand is unassessed. Display-only: distinct from `competence_for`,
    /// which is what aggregation consumes.
    pub fn badge_competence_for(&self, key: &str) -> CompetenceLevel {
        self.competence_for(key).unwrap_or(CompetenceLevel::BE)
    }
}

/// Class-wide curriculum coverage for one strand, as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrandCoverage {
    /// Strand display name (matches the catalog's `name`).
    pub strand: String,
    /// Percentage of the curriculum covered class-wide (0-100).
    /// Teacher-set, independent of individual student progress.
    pub work_covered: u8,
}

/// Aggregate class snapshot fetched from `GET /class_profile`.
///
/// Replaced wholesale on refetch; never partially updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassProfile {
    #[serde(default)]
    pub strands: Vec<StrandCoverage>,
}

impl ClassProfile {
    /// Work-covered percentage for a strand by display name.
    pub fn work_covered_for(&self, strand_name: &str) -> Option<u8> {
        self.strands
            .iter()
            .find(|s| s.strand == strand_name)
            .map(|s| s.work_covered)
    }
}

/// Metadata about a generated class report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the snapshot came from (API base URL).
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of students in the roster snapshot.
    pub student_count: usize,
    /// Number of strands in the catalog.
    pub strand_count: usize,
}

/// Derived metrics for one student, as shown in list and detail views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    /// Average progress across the full catalog (absent strands count 0).
    pub overall_progress: u8,
    /// Modal competence across assigned strands.
    pub overall_competence: CompetenceLevel,
    /// Strands at exactly 100% progress.
    pub completed_strands: usize,
    /// Full competence distribution, all four levels zero-filled.
    pub tally: BTreeMap<CompetenceLevel, usize>,
}

/// The complete class report: metadata plus per-student derived metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassReport {
    pub metadata: ReportMetadata,
    /// Per-student summaries in roster order.
    pub students: Vec<StudentSummary>,
    /// Class-wide curriculum coverage per strand, if a profile was fetched.
    #[serde(default)]
    pub strand_coverage: Vec<StrandCoverage>,
    /// Students tallied by overall competence.
    pub distribution: BTreeMap<CompetenceLevel, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_matches_enumeration() {
        assert!(CompetenceLevel::BE < CompetenceLevel::AE);
        assert!(CompetenceLevel::AE < CompetenceLevel::ME);
        assert!(CompetenceLevel::ME < CompetenceLevel::EE);
        assert_eq!(CompetenceLevel::ALL[0], CompetenceLevel::BE);
        assert_eq!(CompetenceLevel::ALL[3], CompetenceLevel::EE);
    }

    #[test]
    fn test_level_metadata() {
        assert_eq!(CompetenceLevel::ME.code(), "ME");
        assert_eq!(CompetenceLevel::ME.label(), "Meeting Expectation");
        assert_eq!(CompetenceLevel::BE.color(), "#FF6B6B");
        assert_eq!(
            CompetenceLevel::EE.description(),
            "Advanced mastery achieved"
        );
    }

    #[test]
    fn test_level_wire_format() {
        let json = serde_json::to_string(&CompetenceLevel::AE).unwrap();
        assert_eq!(json, "\"AE\"");
        let level: CompetenceLevel = serde_json::from_str("\"EE\"").unwrap();
        assert_eq!(level, CompetenceLevel::EE);
    }

    #[test]
    fn test_absent_strand_resolution() {
        let student = StudentRecord {
            id: "stu-001".to_string(),
            name: "Anne Smith".to_string(),
            strands: [(
                "letterNaming".to_string(),
                StrandRecord {
                    competence: None,
                    progress: 40,
                },
            )]
            .into_iter()
            .collect(),
        };

        // Unassessed-but-present and absent both keep competence absent.
        assert_eq!(student.progress_for("letterNaming"), 40);
        assert_eq!(student.progress_for("letterFormation"), 0);
        assert_eq!(student.competence_for("letterNaming"), None);
        assert_eq!(student.competence_for("letterFormation"), None);

        // Badge fallback defaults to BE, unlike the tally path.
        assert_eq!(
            student.badge_competence_for("letterFormation"),
            CompetenceLevel::BE
        );
    }

    #[test]
    fn test_parse_student_fixture() {
        let students: Vec<StudentRecord> =
            serde_json::from_str(include_str!("../fixtures/students.json")).unwrap();
        assert_eq!(students.len(), 4);

        let anne = &students[0];
        assert_eq!(anne.id, "ann-003");
        assert_eq!(anne.name, "Anne Smith");
        assert_eq!(
            anne.competence_for("letterIdentification"),
            Some(CompetenceLevel::ME)
        );
        assert_eq!(anne.progress_for("phonemicAwareness"), 100);

        // One student in the fixture has a sparse strand map.
        let sparse = &students[3];
        assert!(sparse.strand("letterFormation").is_none());
    }

    #[test]
    fn test_parse_class_profile_fixture() {
        let profile: ClassProfile =
            serde_json::from_str(include_str!("../fixtures/class_profile.json")).unwrap();
        assert_eq!(profile.strands.len(), 4);
        assert_eq!(profile.work_covered_for("Letter Identification"), Some(70));
        assert_eq!(profile.work_covered_for("Unknown Strand"), None);
    }
}
