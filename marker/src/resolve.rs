//! Resolution boundary for grading configuration.
//!
//! The pipeline and assignment construction depend only on the
//! [`ConfigSource`] trait: synchronous lookups with an explicit not-found
//! error. [`JsonConfigSource`] is the bundled adapter, deserializing a
//! single JSON document with `rubrics`, `assignments`, and `tests` maps.
//! Records are parsed one at a time so a malformed record is skipped and
//! logged while the rest of the configuration still loads.

use crate::date::Date;
use crate::error::MarkerError;
use crate::rubric::Rubric;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A resolved assignment record: description, due date, and the name of
/// the rubric to grade with.
#[derive(Debug, Clone)]
pub struct AssignmentRecord {
    pub description: String,
    pub due_date: Date,
    pub rubric: String,
}

/// A resolved rubric record: parallel pattern and weight lists.
///
/// Weights are kept signed as read from configuration; conversion to a
/// [`Rubric`] rejects negatives rather than silently accepting them.
#[derive(Debug, Clone)]
pub struct RubricRecord {
    pub patterns: Vec<String>,
    pub weights: Vec<i64>,
}

impl RubricRecord {
    pub fn into_rubric(self) -> Result<Rubric, MarkerError> {
        let weights = self
            .weights
            .into_iter()
            .map(|w| {
                u32::try_from(w)
                    .map_err(|_| MarkerError::RubricMismatch(format!("negative weight {}", w)))
            })
            .collect::<Result<Vec<u32>, _>>()?;
        Rubric::new(self.patterns, weights)
    }
}

/// Read-only lookup of grading configuration.
///
/// Every method returns [`MarkerError::LookupNotFound`] for a missing key;
/// none of them may substitute an empty-but-valid default.
pub trait ConfigSource {
    /// Names of all configured assignments, in a stable order.
    fn assignment_ids(&self) -> Vec<String>;
    fn resolve_assignment(&self, id: &str) -> Result<AssignmentRecord, MarkerError>;
    fn resolve_rubric(&self, name: &str) -> Result<RubricRecord, MarkerError>;
    /// Ordered test-input lines for the assignment, later joined with
    /// newlines to form the sandbox's input stream.
    fn resolve_test_inputs(&self, id: &str) -> Result<Vec<String>, MarkerError>;
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    rubrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    assignments: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    tests: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawRubric {
    patterns: Vec<String>,
    weights: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct RawAssignment {
    #[serde(default)]
    description: String,
    due_date: String,
    rubric: String,
}

/// [`ConfigSource`] backed by one JSON configuration document.
#[derive(Debug, Default)]
pub struct JsonConfigSource {
    assignments: BTreeMap<String, AssignmentRecord>,
    rubrics: BTreeMap<String, RubricRecord>,
    tests: BTreeMap<String, Vec<String>>,
}

impl JsonConfigSource {
    pub fn from_file(path: &Path) -> Result<Self, MarkerError> {
        let text = fs::read_to_string(path)
            .map_err(|e| MarkerError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_str(&text)
    }

    /// Parses the document, keeping every well-formed record and skipping
    /// malformed ones with a logged warning.
    ///
    /// Duplicate keys within one document are last-write-wins (JSON map
    /// behavior); nothing currently distinguishes an update from a
    /// conflicting redefinition.
    pub fn from_str(text: &str) -> Result<Self, MarkerError> {
        let doc: RawDocument = serde_json::from_str(text)
            .map_err(|e| MarkerError::InvalidConfig(format!("config document: {}", e)))?;

        let mut source = JsonConfigSource::default();

        for (name, value) in doc.rubrics {
            match serde_json::from_value::<RawRubric>(value) {
                Ok(raw) => {
                    if raw.patterns.len() != raw.weights.len() {
                        log::warn!(
                            "skipping rubric '{}': {} patterns but {} weights",
                            name,
                            raw.patterns.len(),
                            raw.weights.len()
                        );
                        continue;
                    }
                    if let Some(w) = raw.weights.iter().find(|w| **w < 0) {
                        log::warn!("skipping rubric '{}': negative weight {}", name, w);
                        continue;
                    }
                    source.rubrics.insert(
                        name,
                        RubricRecord {
                            patterns: raw.patterns,
                            weights: raw.weights,
                        },
                    );
                }
                Err(e) => log::warn!("skipping malformed rubric '{}': {}", name, e),
            }
        }

        for (name, value) in doc.assignments {
            match serde_json::from_value::<RawAssignment>(value) {
                Ok(raw) => {
                    let due_date = match Date::parse(&raw.due_date) {
                        Ok(d) => d,
                        Err(e) => {
                            log::warn!(
                                "assignment '{}': {}; using fail-closed default date",
                                name,
                                e
                            );
                            Date::default()
                        }
                    };
                    source.assignments.insert(
                        name,
                        AssignmentRecord {
                            description: raw.description,
                            due_date,
                            rubric: raw.rubric,
                        },
                    );
                }
                Err(e) => log::warn!("skipping malformed assignment '{}': {}", name, e),
            }
        }

        for (name, value) in doc.tests {
            match serde_json::from_value::<Vec<String>>(value) {
                Ok(inputs) => {
                    source.tests.insert(name, inputs);
                }
                Err(e) => log::warn!("skipping malformed test record '{}': {}", name, e),
            }
        }

        Ok(source)
    }
}

impl ConfigSource for JsonConfigSource {
    fn assignment_ids(&self) -> Vec<String> {
        self.assignments.keys().cloned().collect()
    }

    fn resolve_assignment(&self, id: &str) -> Result<AssignmentRecord, MarkerError> {
        self.assignments
            .get(id)
            .cloned()
            .ok_or_else(|| MarkerError::LookupNotFound(format!("assignment '{}'", id)))
    }

    fn resolve_rubric(&self, name: &str) -> Result<RubricRecord, MarkerError> {
        self.rubrics
            .get(name)
            .cloned()
            .ok_or_else(|| MarkerError::LookupNotFound(format!("rubric '{}'", name)))
    }

    fn resolve_test_inputs(&self, id: &str) -> Result<Vec<String>, MarkerError> {
        self.tests
            .get(id)
            .cloned()
            .ok_or_else(|| MarkerError::LookupNotFound(format!("test inputs for '{}'", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
    {
        "rubrics": {
            "autograder1": { "patterns": ["Hello Frodo!"], "weights": [100] }
        },
        "assignments": {
            "A1": { "description": "First assignment", "due_date": "2025-10-15", "rubric": "autograder1" }
        },
        "tests": {
            "A1": ["Frodo"]
        }
    }
    "#;

    #[test]
    fn test_loads_all_record_kinds() {
        let source = JsonConfigSource::from_str(SAMPLE).unwrap();

        let assignment = source.resolve_assignment("A1").unwrap();
        assert_eq!(assignment.description, "First assignment");
        assert_eq!(assignment.due_date, Date::new(2025, 10, 15));
        assert_eq!(assignment.rubric, "autograder1");

        let rubric = source.resolve_rubric("autograder1").unwrap();
        assert_eq!(rubric.patterns, vec!["Hello Frodo!"]);
        assert_eq!(rubric.weights, vec![100]);

        assert_eq!(source.resolve_test_inputs("A1").unwrap(), vec!["Frodo"]);
        assert_eq!(source.assignment_ids(), vec!["A1"]);
    }

    #[test]
    fn test_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = JsonConfigSource::from_file(&path).unwrap();
        assert!(source.resolve_assignment("A1").is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonConfigSource::from_file(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(MarkerError::IoError(_))));
    }

    #[test]
    fn test_missing_lookups_are_explicit() {
        let source = JsonConfigSource::from_str(SAMPLE).unwrap();
        assert!(matches!(
            source.resolve_assignment("A9"),
            Err(MarkerError::LookupNotFound(_))
        ));
        assert!(matches!(
            source.resolve_rubric("ghost"),
            Err(MarkerError::LookupNotFound(_))
        ));
        assert!(matches!(
            source.resolve_test_inputs("A9"),
            Err(MarkerError::LookupNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_record_skipped_rest_loads() {
        let text = r#"
        {
            "rubrics": {
                "bad": { "patterns": ["a", "b"], "weights": [50] },
                "negative": { "patterns": ["a"], "weights": [-1] },
                "good": { "patterns": ["ok"], "weights": [10] }
            },
            "assignments": {
                "broken": { "rubric": "good" },
                "A1": { "description": "d", "due_date": "2025-10-15", "rubric": "good" }
            }
        }
        "#;
        let source = JsonConfigSource::from_str(text).unwrap();
        assert!(source.resolve_rubric("bad").is_err());
        assert!(source.resolve_rubric("negative").is_err());
        assert!(source.resolve_rubric("good").is_ok());
        assert!(source.resolve_assignment("broken").is_err());
        assert!(source.resolve_assignment("A1").is_ok());
    }

    #[test]
    fn test_bad_due_date_falls_back_to_sentinel() {
        let text = r#"
        {
            "assignments": {
                "A1": { "due_date": "next tuesday", "rubric": "r" }
            }
        }
        "#;
        let source = JsonConfigSource::from_str(text).unwrap();
        let record = source.resolve_assignment("A1").unwrap();
        assert_eq!(record.due_date, Date::default());
    }

    #[test]
    fn test_rubric_record_conversion_rejects_negative() {
        let record = RubricRecord {
            patterns: vec!["a".into()],
            weights: vec![-5],
        };
        assert!(matches!(
            record.into_rubric(),
            Err(MarkerError::RubricMismatch(_))
        ));
    }
}
