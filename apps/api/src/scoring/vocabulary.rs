use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse vocabulary file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{table} vocabulary is empty")]
    Empty { table: &'static str },

    #[error("{table} key '{key}' must be non-empty and lower-case")]
    InvalidKey { table: &'static str, key: String },

    #[error("{table} key '{key}' has invalid weight {weight}; must be finite and > 0")]
    InvalidWeight {
        table: &'static str,
        key: String,
        weight: f64,
    },
}

/// Read-only lookup tables used by the skill and education extractors.
///
/// Built once at startup (defaults or JSON file) and handed to the engine.
/// Keys are matched as substrings of normalized text, so they must be lower-case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// skill name → importance weight
    pub skills: BTreeMap<String, f64>,
    /// education keyword → ordinal level (higher = more senior credential)
    pub education: BTreeMap<String, f64>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            skills: table(&[
                ("python", 2.0),
                ("java", 2.0),
                ("javascript", 2.0),
                ("sql", 2.0),
                ("react", 1.8),
                ("node", 1.8),
                ("aws", 1.8),
                ("azure", 1.8),
                ("gcp", 1.8),
                ("machine learning", 2.0),
                ("ai", 2.0),
                ("data science", 2.0),
                ("kubernetes", 1.8),
                ("docker", 1.8),
                ("git", 1.5),
            ]),
            education: table(&[
                ("phd", 3.0),
                ("masters", 2.5),
                ("mba", 2.5),
                ("bachelor", 2.0),
                ("btech", 2.0),
                ("bsc", 2.0),
                ("diploma", 1.0),
                ("certification", 1.5),
            ]),
        }
    }
}

impl Vocabulary {
    /// Builds a validated vocabulary from explicit tables.
    pub fn new(
        skills: BTreeMap<String, f64>,
        education: BTreeMap<String, f64>,
    ) -> Result<Self, VocabularyError> {
        let vocabulary = Self { skills, education };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Loads `{"skills": {...}, "education": {...}}` from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VocabularyError> {
        let Vocabulary { skills, education } = serde_json::from_str(raw)?;
        Self::new(skills, education)
    }

    pub fn validate(&self) -> Result<(), VocabularyError> {
        validate_table("skills", &self.skills)?;
        validate_table("education", &self.education)
    }
}

fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(key, weight)| (key.to_string(), *weight))
        .collect()
}

fn validate_table(name: &'static str, table: &BTreeMap<String, f64>) -> Result<(), VocabularyError> {
    if table.is_empty() {
        return Err(VocabularyError::Empty { table: name });
    }
    for (key, &weight) in table {
        if key.trim().is_empty() || key.to_lowercase() != *key {
            return Err(VocabularyError::InvalidKey {
                table: name,
                key: key.clone(),
            });
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(VocabularyError::InvalidWeight {
                table: name,
                key: key.clone(),
                weight,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_is_valid() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.validate().is_ok());
        assert_eq!(vocabulary.skills.len(), 15);
        assert_eq!(vocabulary.education.len(), 8);
    }

    #[test]
    fn default_education_levels_are_ordered_by_seniority() {
        let edu = Vocabulary::default().education;
        assert!(edu["phd"] > edu["masters"]);
        assert!(edu["masters"] > edu["bachelor"]);
        assert!(edu["bachelor"] > edu["certification"]);
        assert!(edu["certification"] > edu["diploma"]);
    }

    #[test]
    fn parses_json_vocabulary() {
        let raw = r#"{
            "skills": {"rust": 2.0, "tokio": 1.5},
            "education": {"phd": 3.0, "bachelor": 2.0}
        }"#;
        let vocabulary = Vocabulary::from_json_str(raw).unwrap();
        assert_eq!(vocabulary.skills["rust"], 2.0);
        assert_eq!(vocabulary.education.len(), 2);
    }

    #[test]
    fn rejects_upper_case_keys() {
        let raw = r#"{"skills": {"Rust": 2.0}, "education": {"phd": 3.0}}"#;
        let err = Vocabulary::from_json_str(raw).unwrap_err();
        assert!(matches!(err, VocabularyError::InvalidKey { table: "skills", .. }));
    }

    #[test]
    fn rejects_non_positive_weights() {
        let raw = r#"{"skills": {"rust": 0.0}, "education": {"phd": 3.0}}"#;
        let err = Vocabulary::from_json_str(raw).unwrap_err();
        assert!(matches!(err, VocabularyError::InvalidWeight { .. }));
    }

    #[test]
    fn rejects_empty_tables() {
        let err = Vocabulary::new(BTreeMap::new(), table(&[("phd", 3.0)])).unwrap_err();
        assert!(matches!(err, VocabularyError::Empty { table: "skills" }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Vocabulary::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, VocabularyError::Parse(_)));
    }
}
