//! Volume similarity: how close the byte counts on each side of the overlay
//! network are to each other.

/// Score byte-volume similarity of an entry/exit pair. Symmetric in its arguments.
pub fn score(v_entry: u64, v_exit: u64) -> (f64, String) {
    if v_entry == 0 && v_exit == 0 {
        return (0.0, "no volume data".to_string());
    }

    let (lo, hi) = if v_entry <= v_exit {
        (v_entry, v_exit)
    } else {
        (v_exit, v_entry)
    };
    let score = 100.0 * (lo as f64 / hi as f64);

    let d = (v_entry as f64 - v_exit as f64).abs() / hi as f64;
    let bucket = if d <= 0.05 {
        "nearly identical"
    } else if d <= 0.20 {
        "similar within TOR overhead"
    } else if d <= 1.00 {
        "moderate difference"
    } else {
        "significant volume difference"
    };

    (score, format!("{bucket} ({v_entry}B vs {v_exit}B)"))
}
