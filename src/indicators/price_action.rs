//! Plain OHLC bar-chart read: trend from half-window means, range volatility,
//! inside/outside bars.

use crate::{Direction, OHLCV};

pub const BAR_CHART_MIN_BARS: usize = 10;
const WINDOW: usize = 20;
const HALF: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BarShape {
    InsideBar,
    OutsideBar,
}

impl BarShape {
    pub fn label(self) -> &'static str {
        match self {
            BarShape::InsideBar => "Inside Bar (Consolidation)",
            BarShape::OutsideBar => "Outside Bar (Volatility Expansion)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BarChartAnalysis {
    /// Bullish = uptrend, Bearish = downtrend, Neutral = sideways
    pub trend: Direction,
    pub volatility: VolatilityLevel,
    /// Mean `(high - low) / low` over the window, in percent
    pub avg_range_pct: f64,
    pub shapes: Vec<BarShape>,
    pub sufficient: bool,
}

impl BarChartAnalysis {
    fn insufficient() -> Self {
        Self {
            trend: Direction::Neutral,
            volatility: VolatilityLevel::Low,
            avg_range_pct: 0.0,
            shapes: Vec::new(),
            sufficient: false,
        }
    }

    pub fn interpretation(&self) -> String {
        if !self.sufficient {
            return "Insufficient data".to_string();
        }
        let trend = match self.trend {
            Direction::Bullish => "uptrend",
            Direction::Bearish => "downtrend",
            Direction::Neutral => "sideways",
        };
        let volatility = match self.volatility {
            VolatilityLevel::High => "high",
            VolatilityLevel::Medium => "medium",
            VolatilityLevel::Low => "low",
        };
        let shapes = if self.shapes.is_empty() {
            "No special bar patterns detected.".to_string()
        } else {
            self.shapes.iter().map(|s| s.label()).collect::<Vec<_>>().join(". ")
        };
        format!("Market is in {trend} with {volatility} volatility. {shapes}")
    }
}

pub fn analyze_bar_chart<T: OHLCV>(bars: &[T]) -> BarChartAnalysis {
    if bars.len() < BAR_CHART_MIN_BARS {
        return BarChartAnalysis::insufficient();
    }
    let recent = &bars[bars.len() - WINDOW.min(bars.len())..];
    let mean_close = |slice: &[T]| slice.iter().map(|b| b.close()).sum::<f64>() / slice.len() as f64;
    let first = mean_close(&recent[..HALF]);
    let second = mean_close(&recent[recent.len() - HALF..]);

    let trend = if second > first * 1.02 {
        Direction::Bullish
    } else if second < first * 0.98 {
        Direction::Bearish
    } else {
        Direction::Neutral
    };

    let avg_range_pct = recent
        .iter()
        .map(|b| if b.low() > 0.0 { (b.high() - b.low()) / b.low() * 100.0 } else { 0.0 })
        .sum::<f64>()
        / recent.len() as f64;
    let volatility = if avg_range_pct > 3.0 {
        VolatilityLevel::High
    } else if avg_range_pct > 1.5 {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::Low
    };

    let last = &bars[bars.len() - 1];
    let prev = &bars[bars.len() - 2];
    let mut shapes = Vec::new();
    if last.high() < prev.high() && last.low() > prev.low() {
        shapes.push(BarShape::InsideBar);
    }
    if last.high() > prev.high() && last.low() < prev.low() {
        shapes.push(BarShape::OutsideBar);
    }

    BarChartAnalysis {
        trend,
        volatility,
        avg_range_pct,
        shapes,
        sufficient: true,
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

    fn bar(c: f64, spread: f64) -> TestBar {
        TestBar {
            h: c + spread,
            l: c - spread,
            c,
        }
    }

    #[test]
    fn test_uptrend_low_volatility() {
        let bars: Vec<TestBar> = (0..20).map(|i| bar(100.0 + i as f64, 0.2)).collect();
        let analysis = analyze_bar_chart(&bars);
        assert_eq!(analysis.trend, Direction::Bullish);
        assert_eq!(analysis.volatility, VolatilityLevel::Low);
        assert!(analysis.interpretation().starts_with("Market is in uptrend with low volatility."));
    }

    #[test]
    fn test_inside_and_outside_bars() {
        let mut bars: Vec<TestBar> = (0..12).map(|_| bar(100.0, 5.0)).collect();
        bars.push(bar(100.0, 2.0));
        let analysis = analyze_bar_chart(&bars);
        assert_eq!(analysis.trend, Direction::Neutral);
        assert_eq!(analysis.volatility, VolatilityLevel::High);
        assert_eq!(analysis.shapes, vec![BarShape::InsideBar]);

        bars.push(bar(100.0, 8.0));
        assert_eq!(analyze_bar_chart(&bars).shapes, vec![BarShape::OutsideBar]);
    }

    #[test]
    fn test_insufficient() {
        let bars: Vec<TestBar> = (0..9).map(|_| bar(100.0, 1.0)).collect();
        let analysis = analyze_bar_chart(&bars);
        assert!(!analysis.sufficient);
        assert_eq!(analysis.interpretation(), "Insufficient data");
    }
}
