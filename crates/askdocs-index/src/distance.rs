/// Inner product. Equals cosine similarity for unit vectors.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut chunks_a = a.chunks_exact(4);
    let mut chunks_b = b.chunks_exact(4);
    let mut acc = [0f32; 4];
    for (x, y) in (&mut chunks_a).zip(&mut chunks_b) {
        acc[0] += x[0] * y[0];
        acc[1] += x[1] * y[1];
        acc[2] += x[2] * y[2];
        acc[3] += x[3] * y[3];
    }
    let tail: f32 = chunks_a.remainder().iter().zip(chunks_b.remainder()).map(|(x, y)| x * y).sum();
    acc[0] + acc[1] + acc[2] + acc[3] + tail
}

pub fn l2_norm(v: &[f32]) -> f32 { dot(v, v).sqrt() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_handles_remainder() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.0, 1.0, 1.0, 1.0, 2.0];
        assert_eq!(dot(&a, &b), 20.0);
    }

    #[test]
    fn unit_vector_norm() {
        assert!((l2_norm(&[0.6, 0.8]) - 1.0).abs() < 1e-6);
    }
}
