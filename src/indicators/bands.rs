//! Bollinger Bands and historical volatility.

use super::moving_average::sma;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;

/// Bands around the trailing SMA, `width` as a percentage of the middle band
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

/// Bollinger Bands over the trailing `period` closes.
///
/// The deviation uses the values actually available, so a short series still
/// yields `lower <= middle <= upper`. An empty series yields all zeros.
pub fn bollinger(closes: &[f64], period: usize) -> BollingerBands {
    if closes.is_empty() {
        return BollingerBands::default();
    }
    let middle = sma(closes, period);
    let window = &closes[closes.len() - period.clamp(1, closes.len())..];
    let variance =
        window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / window.len() as f64;
    let spread = BOLLINGER_WIDTH * variance.sqrt();

    let upper = middle + spread;
    let lower = middle - spread;
    let width = if middle != 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };

    BollingerBands {
        upper,
        middle,
        lower,
        width,
    }
}

/// Population standard deviation of simple returns, in percent.
///
/// Returns against a zero price are skipped.
pub fn volatility(closes: &[f64]) -> f64 {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let closes = [50.0; 25];
        let bands = bollinger(&closes, 20);
        assert_eq!(bands.upper, 50.0);
        assert_eq!(bands.middle, 50.0);
        assert_eq!(bands.lower, 50.0);
        assert_eq!(bands.width, 0.0);
    }

    #[test]
    fn test_bollinger_known_values() {
        // mean 5, population sd 2
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger(&closes, 8);
        assert!((bands.middle - 5.0).abs() < 1e-12);
        assert!((bands.upper - 9.0).abs() < 1e-12);
        assert!((bands.lower - 1.0).abs() < 1e-12);
        assert!((bands.width - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_short_and_empty() {
        let bands = bollinger(&[10.0], 20);
        assert_eq!(bands.middle, 10.0);
        assert_eq!(bands.upper, 10.0);
        assert_eq!(bollinger(&[], 20), BollingerBands::default());
    }

    #[test]
    fn test_volatility() {
        assert_eq!(volatility(&[100.0]), 0.0);
        assert!(volatility(&[100.0, 110.0, 121.0]).abs() < 1e-9);
        // returns +10% and -10%: sd 10%
        assert!((volatility(&[100.0, 110.0, 99.0]) - 10.0).abs() < 1e-9);
    }
}
