//! Neutral defaults substituted when a feature cannot be computed.
//!
//! Ranking must always produce a comparable number, so extractors never fail:
//! they degrade to one of these values instead.
//!
//! | extractor  | condition                              | value |
//! |------------|----------------------------------------|-------|
//! | semantic   | text empty after normalization         | 0.0   |
//! | semantic   | zero-norm vector on either side        | 0.0   |
//! | semantic   | the two vectors differ in length       | 0.0   |
//! | semantic   | embedder returned an error             | 0.5   |
//! | lexical    | empty vocabulary after stop-word pass  | 0.5   |
//! | skills     | job text names no vocabulary skill     | 0.5   |
//! | education  | job text names no education keyword    | 0.8   |
//! | experience | job text states no year count          | 0.8   |

/// Degenerate (empty or zero-norm) embedding: "no similarity".
pub const SEMANTIC_DEGENERATE: f64 = 0.0;

/// Embedding capability failed: "indeterminate".
pub const SEMANTIC_UNAVAILABLE: f64 = 0.5;

/// TF-IDF had no terms to work with.
pub const LEXICAL_INDETERMINATE: f64 = 0.5;

pub const SKILLS_NO_REQUIREMENT: f64 = 0.5;

/// Benefit of the doubt when the job text states no credential.
pub const EDUCATION_NO_REQUIREMENT: f64 = 0.8;

pub const EXPERIENCE_NO_REQUIREMENT: f64 = 0.8;
