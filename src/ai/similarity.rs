fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

fn norm(v: &[f32]) -> f64 {
    dot_product(v, v).sqrt()
}

/// Cosine similarity in [-1, 1]. Zero vectors compare as 0.0.
///
/// Accumulates in f64 and snaps values within 1e-9 of ±1 so identical
/// embeddings compare as exactly 1.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot = dot_product(a, b);
    let norm_a = norm(a);
    let norm_b = norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let sim = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    if (1.0 - sim.abs()) < 1e-9 {
        sim.signum()
    } else {
        sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = [0.3_f32, 0.1, 0.7, 0.2];
        assert_eq!(cosine_similarity(&v, &v), 1.0);
    }

    #[test]
    fn test_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_opposite_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]), -1.0);
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
