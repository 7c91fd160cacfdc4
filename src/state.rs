//! Application snapshot state.
//!
//! Explicit, typed state with named transition functions. The roster and
//! class profile are set wholesale after each fetch and treated as
//! immutable snapshots; there is no partial-update path.

use crate::analysis::{filter_roster, strand_cohort, validate_roster};
use crate::catalog::StrandCatalog;
use crate::error::AggregationError;
use crate::models::{ClassProfile, StudentRecord};

/// State for one screen session: the fetched snapshot plus the user's
/// current search query and strand selection.
#[derive(Debug, Default)]
pub struct AppState {
    class_profile: Option<ClassProfile>,
    roster: Vec<StudentRecord>,
    search_query: String,
    selected_strand: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster with a freshly fetched snapshot.
    ///
    /// The roster is validated before it is accepted; a roster with
    /// duplicate ids or out-of-range progress never enters the state.
    pub fn set_roster(&mut self, roster: Vec<StudentRecord>) -> Result<(), AggregationError> {
        validate_roster(&roster)?;
        self.roster = roster;
        Ok(())
    }

    /// Replace the class profile with a freshly fetched snapshot.
    pub fn set_class_profile(&mut self, profile: ClassProfile) {
        self.class_profile = Some(profile);
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    #[allow(dead_code)] // Transition kept for interactive callers
    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Select a strand by display name for drill-down views.
    pub fn select_strand(&mut self, strand_name: &str) {
        self.selected_strand = Some(strand_name.to_string());
    }

    #[allow(dead_code)] // Transition kept for interactive callers
    pub fn clear_strand(&mut self) {
        self.selected_strand = None;
    }

    pub fn roster(&self) -> &[StudentRecord] {
        &self.roster
    }

    pub fn class_profile(&self) -> Option<&ClassProfile> {
        self.class_profile.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Roster filtered by the current search query, in roster order.
    pub fn visible_students(&self) -> Vec<&StudentRecord> {
        filter_roster(&self.roster, &self.search_query)
    }

    /// Cohort for the selected strand, or an empty list when no strand
    /// is selected or the name is not in the catalog.
    pub fn selected_cohort(&self, catalog: &StrandCatalog) -> Vec<&StudentRecord> {
        self.selected_strand
            .as_deref()
            .and_then(|name| catalog.by_name(name))
            .map(|strand| strand_cohort(&self.roster, strand))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompetenceLevel, StrandRecord};
    use std::collections::HashMap;

    fn roster() -> Vec<StudentRecord> {
        let assessed: HashMap<String, StrandRecord> = [(
            "letterNaming".to_string(),
            StrandRecord {
                competence: Some(CompetenceLevel::ME),
                progress: 60,
            },
        )]
        .into_iter()
        .collect();

        vec![
            StudentRecord {
                id: "ann-003".to_string(),
                name: "Anne Smith".to_string(),
                strands: assessed,
            },
            StudentRecord {
                id: "stu-001".to_string(),
                name: "Brian Otieno".to_string(),
                strands: HashMap::new(),
            },
        ]
    }

    #[test]
    fn test_set_roster_validates() {
        let mut state = AppState::new();
        assert!(state.set_roster(roster()).is_ok());
        assert_eq!(state.roster().len(), 2);

        let mut dupes = roster();
        dupes.push(dupes[0].clone());
        let err = state.set_roster(dupes).unwrap_err();
        assert_eq!(
            err,
            AggregationError::DuplicateStudentId("ann-003".to_string())
        );
        // Rejected roster never replaced the accepted one.
        assert_eq!(state.roster().len(), 2);
    }

    #[test]
    fn test_search_transitions() {
        let mut state = AppState::new();
        state.set_roster(roster()).unwrap();

        state.set_search_query("ann");
        let visible = state.visible_students();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "ann-003");

        state.clear_search();
        assert_eq!(state.visible_students().len(), 2);
    }

    #[test]
    fn test_strand_selection() {
        let catalog = StrandCatalog::default();
        let mut state = AppState::new();
        state.set_roster(roster()).unwrap();

        state.select_strand("Letter Naming");
        let cohort = state.selected_cohort(&catalog);
        assert_eq!(cohort.len(), 1);
        assert_eq!(cohort[0].id, "ann-003");

        state.select_strand("No Such Strand");
        assert!(state.selected_cohort(&catalog).is_empty());

        state.clear_strand();
        assert!(state.selected_cohort(&catalog).is_empty());
    }
}
