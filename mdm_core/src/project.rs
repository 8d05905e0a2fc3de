//! # Project Data Structures
//!
//! The `Project` struct is the root container a front end keeps its work
//! in: job metadata plus a set of named analysis cases, each holding one
//! raw payload. The container is a plain JSON-serializable document; the
//! caller decides where (and whether) it lives; the solver never touches
//! storage.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! └── cases: HashMap<Uuid, AnalysisCase> (named payloads)
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::input::RawStructureInput;

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One named structure awaiting (or re-awaiting) a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisCase {
    /// User label for this case (e.g., "Frame at grid 3")
    pub label: String,

    /// The raw payload as assembled by the front end
    pub input: RawStructureInput,
}

/// Root project container.
///
/// Cases are stored in a flat UUID-keyed map: O(1) lookup, no duplicate-id
/// issues, stable references when the front end reorders its list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// All analysis cases, keyed by UUID
    pub cases: HashMap<Uuid, AnalysisCase>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdm_core::project::Project;
    ///
    /// let project = Project::new("Jane Engineer", "26-014", "Acme Construction");
    /// assert_eq!(project.meta.engineer, "Jane Engineer");
    /// assert_eq!(project.case_count(), 0);
    /// ```
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            cases: HashMap::new(),
        }
    }

    /// Add an analysis case; returns the UUID assigned to it.
    pub fn add_case(&mut self, label: impl Into<String>, input: RawStructureInput) -> Uuid {
        let id = Uuid::new_v4();
        self.cases.insert(
            id,
            AnalysisCase {
                label: label.into(),
                input,
            },
        );
        self.touch();
        id
    }

    /// Remove a case by UUID; returns it if it existed.
    pub fn remove_case(&mut self, id: &Uuid) -> Option<AnalysisCase> {
        let case = self.cases.remove(id);
        if case.is_some() {
            self.touch();
        }
        case
    }

    /// Get a case by UUID.
    pub fn get_case(&self, id: &Uuid) -> Option<&AnalysisCase> {
        self.cases.get(id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of cases in the project.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "26-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "26-001");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_add_remove_case() {
        let mut project = Project::new("Engineer", "26-001", "Client");
        let input = crate::presets::by_name("two-span-beam").unwrap().input.clone();

        let id = project.add_case("CB-1", input);
        assert_eq!(project.case_count(), 1);
        assert_eq!(project.get_case(&id).unwrap().label, "CB-1");

        let removed = project.remove_case(&id);
        assert!(removed.is_some());
        assert_eq!(project.case_count(), 0);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "26-042", "Test Client");
        let input = crate::presets::by_name("portal-frame").unwrap().input.clone();
        project.add_case("Frame at grid B", input);

        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("Frame at grid B"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.case_count(), 1);
    }
}
