//! Pattern similarity: how alike two packet-timing sequences (inter-arrival
//! deltas in milliseconds) are, when both sides captured them.

const EPSILON: f64 = 1e-9;

/// Score similarity of two optional packet-timing sequences. Symmetric in
/// its arguments; returns the neutral score when either side is missing.
pub fn score(entry_timings: Option<&[f64]>, exit_timings: Option<&[f64]>) -> (f64, String) {
    let (a, b) = match (entry_timings, exit_timings) {
        (Some(a), Some(b)) => (a, b),
        _ => return (50.0, "pattern data unavailable".to_string()),
    };

    let count_ratio = if a.is_empty() && b.is_empty() {
        1.0
    } else {
        let (lo, hi) = min_max(a.len(), b.len());
        if hi == 0 {
            1.0
        } else {
            lo as f64 / hi as f64
        }
    };

    let (mean_a, std_a) = mean_and_std_dev(a);
    let (mean_b, std_b) = mean_and_std_dev(b);

    let mean_similarity = 1.0 - normalized_diff(mean_a, mean_b);
    let std_similarity = 1.0 - normalized_diff(std_a, std_b);

    let combined = (count_ratio + mean_similarity + std_similarity) / 3.0;
    let score = (100.0 * combined).clamp(0.0, 100.0);

    let bucket = if score >= 80.0 {
        "highly similar timing pattern"
    } else if score >= 50.0 {
        "moderately similar timing pattern"
    } else {
        "dissimilar timing pattern"
    };

    (
        score,
        format!("{bucket} (count_ratio={count_ratio:.2})"),
    )
}

fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn normalized_diff(a: f64, b: f64) -> f64 {
    let denom = a.abs().max(b.abs()).max(EPSILON);
    ((a - b).abs() / denom).clamp(0.0, 1.0)
}

fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_either_side_is_neutral() {
        let (score, explanation) = score(None, Some(&[1.0, 2.0]));
        assert_eq!(score, 50.0);
        assert_eq!(explanation, "pattern data unavailable");

        let (score, _) = score(Some(&[1.0, 2.0]), None);
        assert_eq!(score, 50.0);
    }

    #[test]
    fn identical_sequences_score_100() {
        let timings = vec![10.0, 12.0, 9.0, 11.0, 10.5];
        let (score, _) = score(Some(&timings), Some(&timings));
        assert!((score - 100.0).abs() < 1e-6, "expected 100, got {score}");
    }

    #[test]
    fn symmetric_in_argument_order() {
        let a = vec![10.0, 12.0, 9.0];
        let b = vec![50.0, 5.0, 30.0, 8.0];
        let (s1, _) = score(Some(&a), Some(&b));
        let (s2, _) = score(Some(&b), Some(&a));
        assert!((s1 - s2).abs() < 1e-9);
    }

    #[test]
    fn very_different_sequences_score_low() {
        let a = vec![1.0, 1.0, 1.0, 1.0];
        let b = vec![500.0, 600.0, 550.0, 20.0, 30.0, 25.0, 10.0, 900.0];
        let (score, _) = score(Some(&a), Some(&b));
        assert!(score < 50.0, "expected low similarity, got {score}");
    }
}
