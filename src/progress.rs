//! Funding Progress
//!
//! Derives a clamped completion percentage from two canonical decimal
//! strings. Total, not per-donation: the ledger reports the running
//! collected amount independently of the donation list.

/// Percentage of `target` covered by `collected`, always in `[0, 100]`.
///
/// A non-positive or unparseable target yields `0.0`; the result is never
/// NaN or infinite. Over-funded campaigns cap at `100.0`.
pub fn progress(collected: &str, target: &str) -> f64 {
    let target: f64 = target.trim().parse().unwrap_or(0.0);
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }

    let collected: f64 = collected.trim().parse().unwrap_or(0.0);
    if !collected.is_finite() {
        return 0.0;
    }

    ((collected / target) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_basic() {
        assert_eq!(progress("0.5000", "2.0000"), 25.0);
        assert_eq!(progress("2.0000", "2.0000"), 100.0);
        assert_eq!(progress("0.0000", "2.0000"), 0.0);
    }

    #[test]
    fn test_zero_target_never_divides() {
        assert_eq!(progress("5.0000", "0.0000"), 0.0);
        assert_eq!(progress("5.0000", "0"), 0.0);
        assert_eq!(progress("0.0000", "0.0000"), 0.0);
    }

    #[test]
    fn test_overfunded_clamps_to_100() {
        assert_eq!(progress("3.0000", "2.0000"), 100.0);
    }

    #[test]
    fn test_unparseable_input_yields_zero() {
        assert_eq!(progress("abc", "2.0000"), 0.0);
        assert_eq!(progress("1.0000", "abc"), 0.0);
        assert_eq!(progress("", ""), 0.0);
    }

    #[test]
    fn test_result_is_always_finite_and_bounded() {
        let values = ["0", "0.0001", "1", "1000000", "0.000000000000000001"];
        for collected in values {
            for target in values {
                let pct = progress(collected, target);
                assert!(pct.is_finite());
                assert!((0.0..=100.0).contains(&pct), "{}/{} -> {}", collected, target, pct);
            }
        }
    }
}
