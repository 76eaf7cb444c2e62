//! Time correlation: how close together, in wall-clock terms, two observed
//! timestamps are.

/// Score the time proximity of an entry/exit pair.
///
/// `window_seconds` clips the score to zero beyond that delta. Returns
/// `(score in [0,100], explanation)`; monotonically non-increasing in delta.
pub fn score(t_entry_us: u64, t_exit_us: u64, window_seconds: u64) -> (f64, String) {
    let delta_us = t_entry_us.abs_diff(t_exit_us);
    let delta_s = delta_us as f64 / 1_000_000.0;
    let window_s = window_seconds as f64;

    if delta_s > window_s {
        return (0.0, "outside correlation window".to_string());
    }

    let score = 100.0 * (-delta_s / window_s).exp();
    let bucket = if delta_s <= 1.0 {
        "nearly simultaneous"
    } else if delta_s <= 10.0 {
        "closely aligned"
    } else if delta_s <= 60.0 {
        "within typical latency variance"
    } else {
        "loose correlation"
    };

    (score, format!("{bucket} (\u{394}t = {delta_s:.3}s)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_near_100() {
        let (score, explanation) = score(1_000_000_000, 1_000_000_000, 300);
        assert!(score > 99.9, "expected near-100, got {score}");
        assert!(explanation.contains("nearly simultaneous"));
    }

    #[test]
    fn beyond_window_is_zero() {
        let (score, explanation) = score(1_000_000_000, 1_000_000_000 + 600_000_000, 300);
        assert_eq!(score, 0.0);
        assert_eq!(explanation, "outside correlation window");
    }

    #[test]
    fn monotonic_non_increasing_in_delta() {
        let window = 300;
        let mut previous = f64::MAX;
        for delta_s in 0..=window {
            let (score, _) = score(0, delta_s * 1_000_000, window);
            assert!(
                score <= previous + 1e-9,
                "score increased at delta_s={delta_s}: {score} > {previous}"
            );
            previous = score;
        }
    }

    #[test]
    fn symmetric_in_argument_order() {
        let (a, _) = score(1_000_000_000, 1_000_000_800, 300);
        let (b, _) = score(1_000_000_800, 1_000_000_000, 300);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn tight_match_scenario() {
        // Δt = 0.8s on a 300s window should decay only slightly from 100.
        let (score, _) = score(1_000_000_000, 1_000_000_000 + 800_000, 300);
        assert!((score - 99.7).abs() < 0.1, "expected ~99.7, got {score}");
    }
}
