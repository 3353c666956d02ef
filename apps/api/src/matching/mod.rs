// Matching API: session uploads, concurrent ranking and downloads.
// Scoring itself lives in crate::scoring; this layer only moves text in and records out.

pub mod handlers;
pub mod ranker;
