//! Momentum oscillators: RSI, MACD and Stochastic, plus the vote that combines them.

use super::moving_average::ema;
use crate::{Direction, Signal, OHLCV};

pub const RSI_PERIOD: usize = 14;
pub const STOCHASTIC_PERIOD: usize = 14;
/// Bars compared for RSI divergence.
pub const DIVERGENCE_LOOKBACK: usize = 10;
/// Histogram magnitude below which MACD reads neutral.
pub const MACD_DEADBAND: f64 = 0.5;
/// MACD signal line as a fixed fraction of MACD.
///
/// This stands in for the usual 9-period EMA of MACD; no MACD history is kept.
pub const MACD_SIGNAL_FACTOR: f64 = 0.9;

/// Overbought/oversold zone of a bounded oscillator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Overbought,
    #[default]
    Neutral,
    Oversold,
}

impl Zone {
    pub(crate) fn classify(value: f64, upper: f64, lower: f64) -> Self {
        if value > upper {
            Zone::Overbought
        } else if value < lower {
            Zone::Oversold
        } else {
            Zone::Neutral
        }
    }

    /// Contrarian vote: oversold +1, overbought -1.
    fn vote(self) -> i32 {
        match self {
            Zone::Oversold => 1,
            Zone::Overbought => -1,
            Zone::Neutral => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Overbought => "overbought",
            Zone::Neutral => "neutral",
            Zone::Oversold => "oversold",
        }
    }
}

// ============================================================
// RSI
// ============================================================

/// Relative Strength Index over the trailing `period` price changes.
///
/// Gains and losses are averaged over `period` even when fewer changes exist.
/// No losses at all reads 100; fewer than two closes reads a neutral 50.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if closes.len() < 2 || period == 0 {
        return 50.0;
    }
    let changes = period.min(closes.len() - 1);
    let (gains, losses) = closes[closes.len() - changes - 1..]
        .windows(2)
        .fold((0.0, 0.0), |(gains, losses), w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss <= 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RsiReading {
    pub value: f64,
    pub zone: Zone,
    /// Price direction over the last 10 bars disagrees with RSI being above 50.
    pub divergence: bool,
}

pub fn rsi_reading(closes: &[f64]) -> RsiReading {
    let value = rsi(closes, RSI_PERIOD);
    let n = closes.len();
    let price_up = n >= DIVERGENCE_LOOKBACK && closes[n - 1] > closes[n - DIVERGENCE_LOOKBACK];
    RsiReading {
        value,
        zone: Zone::classify(value, 70.0, 30.0),
        divergence: price_up != (value > 50.0),
    }
}

// ============================================================
// MACD
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl Macd {
    pub fn trend(&self) -> Direction {
        if self.histogram > MACD_DEADBAND {
            Direction::Bullish
        } else if self.histogram < -MACD_DEADBAND {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }
}

/// `EMA12 - EMA26`, with the signal line approximated by [`MACD_SIGNAL_FACTOR`].
pub fn macd(closes: &[f64]) -> Macd {
    let value = ema(closes, 12) - ema(closes, 26);
    let signal = value * MACD_SIGNAL_FACTOR;
    Macd {
        value,
        signal,
        histogram: value - signal,
    }
}

// ============================================================
// STOCHASTIC
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Stochastic {
    pub k: f64,
    /// `0.8 * %K + 20`, a linear stand-in for the 3-bar SMA of %K.
    pub d: f64,
}

impl Stochastic {
    fn from_k(k: f64) -> Self {
        Self { k, d: k * 0.8 + 20.0 }
    }

    pub fn zone(&self) -> Zone {
        Zone::classify(self.k, 80.0, 20.0)
    }
}

/// %K of the last close within the high/low range of the trailing `period` bars.
///
/// A flat window or fewer than two bars reads a neutral 50.
pub fn stochastic<T: OHLCV>(bars: &[T], period: usize) -> Stochastic {
    let Some(last) = bars.last() else {
        return Stochastic::from_k(50.0);
    };
    if bars.len() < 2 || period == 0 {
        return Stochastic::from_k(50.0);
    }
    let window = &bars[bars.len() - period.min(bars.len())..];
    let high = window.iter().map(|b| b.high()).fold(f64::MIN, f64::max);
    let low = window.iter().map(|b| b.low()).fold(f64::MAX, f64::min);
    let span = high - low;
    if span <= 0.0 {
        return Stochastic::from_k(50.0);
    }
    Stochastic::from_k((last.close() - low) / span * 100.0)
}

// ============================================================
// COMBINED VOTE
// ============================================================

/// Outcome of the RSI + MACD + Stochastic vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Outlook {
    StrongBuy,
    WeakBuy,
    Neutral,
    WeakSell,
    StrongSell,
}

impl Outlook {
    fn from_votes(votes: i32) -> Self {
        match votes {
            v if v >= 2 => Outlook::StrongBuy,
            1 => Outlook::WeakBuy,
            0 => Outlook::Neutral,
            -1 => Outlook::WeakSell,
            _ => Outlook::StrongSell,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outlook::StrongBuy => "Strong Buy Signal",
            Outlook::WeakBuy => "Weak Buy Signal",
            Outlook::Neutral => "Neutral - Wait for confirmation",
            Outlook::WeakSell => "Weak Sell Signal",
            Outlook::StrongSell => "Strong Sell Signal",
        }
    }
}

impl From<Outlook> for Signal {
    fn from(outlook: Outlook) -> Self {
        match outlook {
            Outlook::StrongBuy => Signal::StrongBuy,
            Outlook::WeakBuy => Signal::Buy,
            Outlook::Neutral => Signal::Hold,
            Outlook::WeakSell => Signal::Sell,
            Outlook::StrongSell => Signal::StrongSell,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OscillatorAnalysis {
    pub rsi: RsiReading,
    pub macd: Macd,
    pub stochastic: Stochastic,
    pub votes: i32,
    pub outlook: Outlook,
}

impl OscillatorAnalysis {
    pub fn interpretation(&self) -> String {
        let mut text = format!(
            "RSI: {:.2} ({}), MACD: {}, Stochastic: {:.0} ({}).",
            self.rsi.value,
            self.rsi.zone.as_str(),
            self.macd.trend(),
            self.stochastic.k,
            self.stochastic.zone().as_str(),
        );
        if self.rsi.divergence {
            text.push_str(" DIVERGENCE DETECTED!");
        }
        text
    }
}

pub fn analyze_oscillators<T: OHLCV>(bars: &[T]) -> OscillatorAnalysis {
    let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();
    let rsi = rsi_reading(&closes);
    let macd = macd(&closes);
    let stochastic = stochastic(bars, STOCHASTIC_PERIOD);

    let macd_vote = match macd.trend() {
        Direction::Bullish => 1,
        Direction::Bearish => -1,
        Direction::Neutral => 0,
    };
    let votes = rsi.zone.vote() + macd_vote + stochastic.zone().vote();

    OscillatorAnalysis {
        rsi,
        macd,
        stochastic,
        votes,
        outlook: Outlook::from_votes(votes),
    }
}
