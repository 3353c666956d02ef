/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm, and on a length mismatch
/// (logged, never propagated). The raw value is not clamped; callers decide.
pub fn cosine_similarity<T>(a: &[T], b: &[T]) -> f64
where
    T: Copy + Into<f64>,
{
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "vector dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y): (f64, f64) = (x.into(), y.into());
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let a = [1.0_f32, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = [1.0_f64, 0.0];
        let b = [0.0_f64, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn zero_vectors_score_exactly_zero() {
        let zero = [0.0_f32; 4];
        let sim = cosine_similarity(&zero, &zero);
        assert_eq!(sim, 0.0);
        assert!(!sim.is_nan());
    }

    #[test]
    fn one_zero_side_scores_zero() {
        let a = [0.0_f64, 0.0];
        let b = [0.3_f64, 0.4];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn dimension_mismatch_scores_zero() {
        let a = [1.0_f32, 0.0, 0.0];
        let b = [1.0_f32, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn opposite_vectors_are_negative() {
        let a = [1.0_f64, 1.0];
        let b = [-1.0_f64, -1.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-12);
    }
}
