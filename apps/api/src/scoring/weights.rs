use serde::{Deserialize, Serialize};

use crate::scoring::ScoringError;

/// Allowed drift of the weight sum from exactly 1.0.
const SUM_TOLERANCE: f64 = 1e-9;

/// Combiner weights for the five feature scores. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub semantic: f64,
    pub lexical: f64,
    pub skills: f64,
    pub education: f64,
    pub experience: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            semantic: 0.35,
            lexical: 0.20,
            skills: 0.25,
            education: 0.12,
            experience: 0.08,
        }
    }
}

impl FeatureWeights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.lexical + self.skills + self.education + self.experience
    }

    /// Checked once when the engine is built; a bad table never reaches scoring.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let all = [
            ("semantic", self.semantic),
            ("lexical", self.lexical),
            ("skills", self.skills),
            ("education", self.education),
            ("experience", self.experience),
        ];
        if let Some((name, w)) = all.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ScoringError::InvalidWeights(format!(
                "{name} weight must be finite and non-negative, got {w}"
            )));
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = FeatureWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let w = FeatureWeights {
            semantic: 0.5,
            ..FeatureWeights::default()
        };
        let err = w.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn rejects_negative_weights() {
        let w = FeatureWeights {
            semantic: 0.55,
            lexical: -0.2,
            skills: 0.45,
            education: 0.12,
            experience: 0.08,
        };
        let err = w.validate().unwrap_err();
        assert!(err.to_string().contains("lexical"));
    }

    #[test]
    fn rejects_nan() {
        let w = FeatureWeights {
            experience: f64::NAN,
            ..FeatureWeights::default()
        };
        assert!(w.validate().is_err());
    }
}
