//! Heikin-Ashi smoothed candles

use super::{ChartTransform, DerivedSeries};
use crate::{Bar, Trend};
use serde::Serialize;

/// Number of trailing candles inspected for the trend.
pub const HA_TREND_WINDOW: usize = 5;

/// Heikin-Ashi transform.
///
/// - close = (open + high + low + close) / 4
/// - open = (previous HA open + previous HA close) / 2, seeded with (open + close) / 2
/// - high = max(high, HA open, HA close)
/// - low = min(low, HA open, HA close)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeikinAshi;

/// Smoothed candles with trend read off the trailing window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeikinAshiChart {
    pub candles: Vec<Bar>,
    pub trend: Trend,
    /// Percentage of the window made of bullish candles with no lower wick
    pub strength: u8,
}

/// Smooth a raw bar series 1:1 into Heikin-Ashi candles.
pub fn smooth(bars: &[Bar]) -> Vec<Bar> {
    let mut candles: Vec<Bar> = Vec::with_capacity(bars.len());

    for bar in bars {
        let close = (bar.open + bar.high + bar.low + bar.close) / 4.0;
        let open = match candles.last() {
            Some(prev) => (prev.open + prev.close) / 2.0,
            None => (bar.open + bar.close) / 2.0,
        };

        candles.push(Bar {
            date: bar.date,
            open,
            high: bar.high.max(open).max(close),
            low: bar.low.min(open).min(close),
            close,
            volume: bar.volume,
        });
    }

    candles
}

fn has_no_lower_wick(candle: &Bar) -> bool {
    candle.low == candle.open.min(candle.close)
}

/// Classify the trailing window and return `(trend, strength)`.
fn classify(candles: &[Bar]) -> (Trend, u8) {
    let recent = &candles[candles.len() - HA_TREND_WINDOW.min(candles.len())..];

    let bullish: Vec<&Bar> = recent.iter().filter(|c| c.close > c.open).collect();
    let clean = bullish.iter().filter(|c| has_no_lower_wick(c)).count();
    let strength = (clean * 100 / HA_TREND_WINDOW) as u8;

    let trend = match (bullish.len(), clean) {
        (b, c) if b >= 4 && c >= 3 => Trend::StrongBullish,
        (b, _) if b >= 3 => Trend::Bullish,
        (b, 0) if b <= 1 => Trend::StrongBearish,
        _ => Trend::Bearish,
    };

    (trend, strength)
}

impl ChartTransform for HeikinAshi {
    type Output = HeikinAshiChart;

    fn name(&self) -> &'static str {
        "heikin-ashi"
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn transform(&self, bars: &[Bar]) -> HeikinAshiChart {
        if bars.len() < self.min_bars() {
            return HeikinAshiChart::default();
        }

        let candles = smooth(bars);
        let (trend, strength) = classify(&candles);
        log::trace!("heikin-ashi: {} candles, trend {trend}, strength {strength}", candles.len());

        HeikinAshiChart {
            candles,
            trend,
            strength,
        }
    }
}

impl DerivedSeries for HeikinAshiChart {
    fn trend(&self) -> Trend {
        self.trend
    }

    fn len(&self) -> usize {
        self.candles.len()
    }
}
