use super::ScoringError;

/// Cosine similarity of two equal-length vectors.
///
/// Accumulates in `f64`. Returns `0.0` when either vector has zero magnitude (including empty
/// vectors) or when the result is not finite (non-finite components). The result is clamped
/// to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.len() != b.len() {
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| (f64::from(x), f64::from(y)))
        .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        return Ok(0.0);
    }

    Ok((score as f32).clamp(-1.0, 1.0))
}
