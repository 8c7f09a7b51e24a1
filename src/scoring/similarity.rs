/// Cosine similarity of two vectors.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom > 0.0 { dot / denom } else { 0.0 }
}

/// Max-pools similarity over `inputs` for every competency vector.
///
/// Equivalent to the column-wise maximum of the `inputs × competencies` cosine matrix.
/// Results are clamped into `[0, 1]`.
pub fn max_pool(inputs: &[Vec<f32>], competencies: &[&[f32]]) -> Vec<f32> {
    competencies
        .iter()
        .map(|competency| {
            inputs
                .iter()
                .map(|input| cosine(input, competency))
                .fold(f32::NEG_INFINITY, f32::max)
                .clamp(0.0, 1.0)
        })
        .collect()
}
