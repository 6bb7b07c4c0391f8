//! Thresholds and geometry shared by the detector modules

// ============================================================
// CANDLESTICK THRESHOLDS
// ============================================================

/// Doji: body / range below this
pub const DOJI_BODY_RATIO: f64 = 0.1;
/// Hammer / Shooting Star: long wick exceeds body * this
pub const LONG_WICK_FACTOR: f64 = 2.0;
/// Hammer / Shooting Star: opposite wick stays under body * this
pub const SHORT_WICK_FACTOR: f64 = 0.5;
/// Morning / Evening Star: middle body under first body * this
pub const STAR_BODY_FACTOR: f64 = 0.3;

// ============================================================
// CLASSICAL THRESHOLDS
// ============================================================

/// Bars on each side a swing point must strictly exceed
pub const EXTREMA_RADIUS: usize = 2;
/// Head and Shoulders: shoulder heights within this relative distance
pub const SHOULDER_TOLERANCE: f64 = 0.05;
/// Double Top / Bottom: extremes within this relative distance
pub const DOUBLE_TOLERANCE: f64 = 0.02;
/// Trendline slope (price per bar) counted as steep
pub const STEEP_SLOPE: f64 = 0.1;
/// Trendline slope (price per bar) counted as flat
pub const FLAT_SLOPE: f64 = 0.05;

// ============================================================
// HELPER FUNCTIONS
// ============================================================

/// Indices whose value strictly beats every neighbour within `radius`.
///
/// `beats(a, b)` is `a > b` for peaks and `a < b` for troughs.
pub fn swing_points(values: &[f64], radius: usize, beats: impl Fn(f64, f64) -> bool) -> Vec<usize> {
    if radius == 0 || values.len() < 2 * radius + 1 {
        return Vec::new();
    }

    (radius..values.len() - radius)
        .filter(|&i| {
            (1..=radius).all(|k| beats(values[i], values[i - k]) && beats(values[i], values[i + k]))
        })
        .collect()
}

/// Local highs
#[inline]
pub fn peaks(highs: &[f64], radius: usize) -> Vec<usize> {
    swing_points(highs, radius, |a, b| a > b)
}

/// Local lows
#[inline]
pub fn troughs(lows: &[f64], radius: usize) -> Vec<usize> {
    swing_points(lows, radius, |a, b| a < b)
}

/// `|a - b| / a < tolerance`, false when `a` is zero
#[inline]
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    a != 0.0 && (a - b).abs() / a.abs() < tolerance
}

/// Slope of the line through `(x0, values[x0])` and `(x1, values[x1])`
#[inline]
pub fn slope(values: &[f64], x0: usize, x1: usize) -> f64 {
    if x1 == x0 {
        return 0.0;
    }
    (values[x1] - values[x0]) / (x1 as f64 - x0 as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks_and_troughs() {
        let v = [1.0, 2.0, 5.0, 2.0, 1.0, 0.5, 1.0, 4.0, 1.0];
        assert_eq!(peaks(&v, 2), vec![2]);
        assert_eq!(troughs(&v, 2), vec![5]);
    }

    #[test]
    fn test_plateau_is_not_a_peak() {
        let v = [1.0, 2.0, 5.0, 5.0, 2.0, 1.0];
        assert!(peaks(&v, 2).is_empty());
    }

    #[test]
    fn test_short_input() {
        assert!(peaks(&[1.0, 3.0, 1.0], 2).is_empty());
        assert!(peaks(&[1.0, 3.0, 1.0], 0).is_empty());
    }

    #[test]
    fn test_tolerance_and_slope() {
        assert!(within_tolerance(100.0, 101.0, 0.02));
        assert!(!within_tolerance(100.0, 103.0, 0.02));
        assert!(!within_tolerance(0.0, 0.0, 0.02));
        assert_eq!(slope(&[10.0, 0.0, 0.0, 16.0], 0, 3), 2.0);
        assert_eq!(slope(&[10.0], 0, 0), 0.0);
    }
}
