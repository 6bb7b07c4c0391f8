//! Simple/exponential moving averages and the golden/death cross scan.

use chrono::NaiveDate;

use crate::{Bar, Direction};

/// Bars scanned for a fresh crossover, counted back from the newest bar.
pub const CROSSOVER_LOOKBACK: usize = 10;
/// Shortest series on which crossovers are looked for.
pub const CROSSOVER_MIN_BARS: usize = 52;
/// Upper bound of the long average; shorter series use every bar.
pub const LONG_PERIOD: usize = 200;

/// Mean of the last `period` values.
///
/// A series shorter than `period` degrades to its last value, and an empty one
/// to `0.0`.
pub fn sma(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return values.last().copied().unwrap_or(0.0);
    }
    values[values.len() - period..].iter().sum::<f64>() / period as f64
}

/// Exponential moving average seeded with the SMA of the first `period` values,
/// then smoothed forward with `2 / (period + 1)`.
///
/// Same degradation rule as [`sma`] for short series.
pub fn ema(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return values.last().copied().unwrap_or(0.0);
    }
    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    values[period..]
        .iter()
        .fold(seed, |ema, &v| (v - ema) * multiplier + ema)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossKind {
    GoldenCross,
    DeathCross,
}

/// SMA50 crossing the long SMA on a given bar
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Crossover {
    pub kind: CrossKind,
    pub index: usize,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MovingAverageAnalysis {
    pub sma20: f64,
    pub sma50: f64,
    /// SMA over `min(200, n)` bars
    pub sma200: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub crossovers: Vec<Crossover>,
    pub trend: Direction,
    pub last_close: f64,
}

impl MovingAverageAnalysis {
    pub fn has_golden_cross(&self) -> bool {
        self.crossovers.iter().any(|c| c.kind == CrossKind::GoldenCross)
    }

    pub fn has_death_cross(&self) -> bool {
        self.crossovers.iter().any(|c| c.kind == CrossKind::DeathCross)
    }

    pub fn interpretation(&self) -> String {
        if let Some(last) = self.crossovers.last() {
            return match last.kind {
                CrossKind::GoldenCross => "Golden Cross detected - bullish signal!".to_string(),
                CrossKind::DeathCross => "Death Cross detected - bearish signal!".to_string(),
            };
        }
        let side = if self.last_close > self.sma50 { "above" } else { "below" };
        let state = match self.trend {
            Direction::Bullish => "Uptrend intact.",
            Direction::Bearish => "Downtrend in progress.",
            Direction::Neutral => "Sideways movement.",
        };
        format!("Price is {side} 50 SMA. {state}")
    }
}

pub fn analyze_moving_averages(bars: &[Bar]) -> MovingAverageAnalysis {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let n = closes.len();

    let sma20 = sma(&closes, 20);
    let sma50 = sma(&closes, 50);
    let sma200 = sma(&closes, LONG_PERIOD.min(n));
    let last_close = closes.last().copied().unwrap_or(0.0);

    let trend = if last_close > sma20 && sma20 > sma50 {
        Direction::Bullish
    } else if last_close < sma20 && sma20 < sma50 {
        Direction::Bearish
    } else {
        Direction::Neutral
    };

    MovingAverageAnalysis {
        sma20,
        sma50,
        sma200,
        ema12: ema(&closes, 12),
        ema26: ema(&closes, 26),
        crossovers: find_crossovers(bars, &closes),
        trend,
        last_close,
    }
}

fn find_crossovers(bars: &[Bar], closes: &[f64]) -> Vec<Crossover> {
    let n = closes.len();
    if n < CROSSOVER_MIN_BARS {
        return Vec::new();
    }

    let mut crossovers = Vec::new();
    for i in n - CROSSOVER_LOOKBACK..n {
        let prev_short = sma(&closes[..i], 50);
        let curr_short = sma(&closes[..=i], 50);
        let prev_long = sma(&closes[..i], LONG_PERIOD.min(i));
        let curr_long = sma(&closes[..=i], LONG_PERIOD.min(i + 1));

        let kind = if prev_short < prev_long && curr_short > curr_long {
            CrossKind::GoldenCross
        } else if prev_short > prev_long && curr_short < curr_long {
            CrossKind::DeathCross
        } else {
            continue;
        };
        crossovers.push(Crossover {
            kind,
            index: i,
            date: bars[i].date,
        });
    }
    crossovers
}
