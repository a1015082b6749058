//! Cosine similarity between embedding vectors

/// Cosine similarity of two vectors.
///
/// Degenerate inputs (zero magnitude, mismatched or empty lengths) score
/// 0.0 rather than erroring, so a missing embedding degrades a dimension
/// score instead of failing the whole match.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
