//! Human-readable number formatting.

/// Suffixes for thousands, millions, billions and trillions.
const SUFFIXES: [&str; 4] = ["K", "M", "B", "T"];

/// Abbreviate a count for display, e.g. `12345` becomes `"12.3K"`.
///
/// Counts below 1000 are printed as is. Larger counts get one decimal and
/// a suffix; a value that rounds up to 1000 moves to the next suffix, so
/// `999_950` is `"1.0M"` rather than `"1000.0K"`.
pub fn abbreviate(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }

    let mut value = count as f64 / 1000.0;
    let mut idx = 0;

    loop {
        let rounded = (value * 10.0).round() / 10.0;
        if rounded >= 1000.0 && idx + 1 < SUFFIXES.len() {
            value /= 1000.0;
            idx += 1;
            continue;
        }
        return format!("{:.1}{}", rounded, SUFFIXES[idx]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_counts_unchanged() {
        assert_eq!(abbreviate(0), "0");
        assert_eq!(abbreviate(7), "7");
        assert_eq!(abbreviate(999), "999");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(abbreviate(1000), "1.0K");
        assert_eq!(abbreviate(12345), "12.3K");
        assert_eq!(abbreviate(150_000), "150.0K");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(abbreviate(1_500_000), "1.5M");
        assert_eq!(abbreviate(283_000_000), "283.0M");
        assert_eq!(abbreviate(2_100_000_000), "2.1B");
        assert_eq!(abbreviate(4_000_000_000_000), "4.0T");
    }

    #[test]
    fn test_rounding_rolls_over_to_next_unit() {
        assert_eq!(abbreviate(999_950), "1.0M");
        assert_eq!(abbreviate(999_949), "999.9K");
    }
}
