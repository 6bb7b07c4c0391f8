//! Price levels: Fibonacci retracements, standard pivot points and percentile
//! support/resistance.

use crate::OHLCV;

/// Bars spanned by the retracement range.
pub const FIB_LOOKBACK: usize = 30;

/// Retracement ratios, low to high.
pub const FIB_RATIOS: [(&str, f64); 7] = [
    ("0% (Low)", 0.0),
    ("23.6%", 0.236),
    ("38.2%", 0.382),
    ("50%", 0.5),
    ("61.8%", 0.618),
    ("78.6%", 0.786),
    ("100% (High)", 1.0),
];

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct FibLevel {
    pub label: &'static str,
    pub ratio: f64,
    pub price: f64,
}

/// Retracement levels between `low` and `high`. The end levels are the inputs
/// themselves, not `low + range * ratio`.
pub fn fibonacci_levels(high: f64, low: f64) -> [FibLevel; 7] {
    let range = high - low;
    FIB_RATIOS.map(|(label, ratio)| {
        let price = if ratio <= 0.0 {
            low
        } else if ratio >= 1.0 {
            high
        } else {
            low + range * ratio
        };
        FibLevel {
            label,
            ratio,
            price,
        }
    })
}

/// Standard floor-trader pivots
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PivotPoints {
    pub pivot: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
}

pub fn pivot_points<T: OHLCV>(bar: &T) -> PivotPoints {
    let (high, low, close) = (bar.high(), bar.low(), bar.close());
    let range = high - low;
    let pivot = (high + low + close) / 3.0;
    let s1 = 2.0 * pivot - high;
    let r1 = 2.0 * pivot - low;
    PivotPoints {
        pivot,
        s1,
        s2: pivot - range,
        s3: s1 - range,
        r1,
        r2: pivot + range,
        r3: r1 + range,
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FibonacciAnalysis {
    pub high: f64,
    pub low: f64,
    pub levels: [FibLevel; 7],
    pub pivots: PivotPoints,
    pub last_close: f64,
    /// `i` such that the last close sits in `[levels[i], levels[i + 1])`
    pub position: Option<usize>,
}

impl FibonacciAnalysis {
    /// Level at `ratio`, if it is one of [`FIB_RATIOS`].
    pub fn level(&self, ratio: f64) -> Option<&FibLevel> {
        self.levels.iter().find(|l| (l.ratio - ratio).abs() < 1e-9)
    }

    pub fn position_label(&self) -> String {
        match self.position {
            Some(i) => format!("Between {} and {}", self.levels[i].label, self.levels[i + 1].label),
            None => "Outside the retracement range".to_string(),
        }
    }
}

/// Retracements over the trailing [`FIB_LOOKBACK`] bars and pivots of the last bar.
pub fn analyze_fibonacci<T: OHLCV>(bars: &[T]) -> Option<FibonacciAnalysis> {
    let last = bars.last()?;
    let window = &bars[bars.len() - FIB_LOOKBACK.min(bars.len())..];
    let high = window.iter().map(|b| b.high()).fold(f64::MIN, f64::max);
    let low = window.iter().map(|b| b.low()).fold(f64::MAX, f64::min);
    let levels = fibonacci_levels(high, low);

    let last_close = last.close();
    let position = levels
        .windows(2)
        .position(|w| last_close >= w[0].price && last_close < w[1].price);

    Some(FibonacciAnalysis {
        high,
        low,
        levels,
        pivots: pivot_points(last),
        last_close,
        position,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// 10th and 90th percentile closes. Fewer than five closes fall back to the
/// first and last close.
pub fn support_resistance(closes: &[f64]) -> SupportResistance {
    if closes.len() < 5 {
        return SupportResistance {
            support: closes.first().copied().unwrap_or(0.0),
            resistance: closes.last().copied().unwrap_or(0.0),
        };
    }
    let mut sorted = closes.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    SupportResistance {
        support: sorted[(n * 0.1) as usize],
        resistance: sorted[(n * 0.9) as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct TestBar {
        h: f64,
        l: f64,
        c: f64,
    }

    impl OHLCV for TestBar {
        fn open(&self) -> f64 {
            self.c
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }

        fn volume(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_fibonacci_levels_exact() {
        let levels = fibonacci_levels(100.0, 50.0);
        assert_eq!(levels[0].price, 50.0);
        assert_eq!(levels[3].price, 75.0);
        assert_eq!(levels[6].price, 100.0);
        assert!((levels[2].price - 69.1).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_points() {
        let p = pivot_points(&TestBar {
            h: 110.0,
            l: 90.0,
            c: 100.0,
        });
        assert_eq!(p.pivot, 100.0);
        assert_eq!(p.s1, 90.0);
        assert_eq!(p.r1, 110.0);
        assert_eq!(p.s2, 80.0);
        assert_eq!(p.r2, 120.0);
        assert_eq!(p.s3, 70.0);
        assert_eq!(p.r3, 130.0);
    }

    #[test]
    fn test_analyze_fibonacci_window_and_position() {
        let mut bars = vec![
            TestBar {
                h: 500.0,
                l: 1.0,
                c: 250.0
            };
            5
        ];
        // The old extremes fall outside the trailing 30 bars.
        bars.extend((0..30).map(|i| TestBar {
            h: if i == 10 { 100.0 } else { 80.0 },
            l: if i == 20 { 50.0 } else { 60.0 },
            c: 70.0,
        }));
        let analysis = analyze_fibonacci(&bars).unwrap();

        assert_eq!(analysis.high, 100.0);
        assert_eq!(analysis.low, 50.0);
        assert_eq!(analysis.level(0.5).unwrap().price, 75.0);
        // 70 lies in [69.1, 75)
        assert_eq!(analysis.position, Some(2));
        assert_eq!(analysis.position_label(), "Between 38.2% and 50%");
    }

    #[test]
    fn test_close_at_high_has_no_position() {
        let bars = vec![TestBar {
            h: 100.0,
            l: 50.0,
            c: 100.0,
        }];
        let analysis = analyze_fibonacci(&bars).unwrap();
        assert_eq!(analysis.position, None);
        assert!(analyze_fibonacci::<TestBar>(&[]).is_none());
    }

    #[test]
    fn test_support_resistance_percentiles() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let sr = support_resistance(&closes);
        assert_eq!(sr.support, 2.0);
        assert_eq!(sr.resistance, 10.0);

        let sr = support_resistance(&[3.0, 1.0]);
        assert_eq!(sr.support, 3.0);
        assert_eq!(sr.resistance, 1.0);
    }
}
