//! Indicator library
//!
//! Stateless functions over closes (or full bars where high/low/volume are
//! needed). Every function is total: short history yields a degenerate but
//! defined value, never a panic.
//!
//! - **Moving averages**: SMA, EMA, golden/death cross scan
//! - **Oscillators**: RSI, MACD, Stochastic and their combined vote
//! - **Bands**: Bollinger Bands, historical volatility
//! - **Volume**: OBV, VPT
//! - **Levels**: Fibonacci retracements, pivots, percentile support/resistance
//! - **Price action**: OHLC bar-chart trend/volatility read

pub mod bands;
pub mod levels;
pub mod moving_average;
pub mod oscillators;
pub mod price_action;
pub mod volume;

pub use bands::*;
pub use levels::*;
pub use moving_average::*;
pub use oscillators::*;
pub use price_action::*;
pub use volume::*;

use crate::{Signal, OHLCV};

/// Close prices of a bar series, oldest first.
pub fn closes<T: OHLCV>(bars: &[T]) -> Vec<f64> {
    bars.iter().map(|b| b.close()).collect()
}

// ============================================================
// TECHNICAL SNAPSHOT
// ============================================================

/// Point-in-time bundle of the headline indicators for one series
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TechnicalSnapshot {
    pub rsi: f64,
    pub rsi_zone: Zone,
    pub macd: Macd,
    pub sma20: f64,
    pub sma50: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub bollinger: BollingerBands,
    pub volatility: f64,
    pub levels: SupportResistance,
}

/// Snapshot of the latest readings.
///
/// Unlike [`rsi`], the snapshot RSI wants a full window of [`RSI_PERIOD`]
/// changes and reads 50 until it has one.
pub fn technical_snapshot(closes: &[f64]) -> TechnicalSnapshot {
    let value = if closes.len() > RSI_PERIOD {
        rsi(closes, RSI_PERIOD)
    } else {
        50.0
    };
    TechnicalSnapshot {
        rsi: value,
        rsi_zone: Zone::classify(value, 70.0, 30.0),
        macd: macd(closes),
        sma20: sma(closes, 20),
        sma50: sma(closes, 50),
        ema12: ema(closes, 12),
        ema26: ema(closes, 26),
        bollinger: bollinger(closes, BOLLINGER_PERIOD),
        volatility: volatility(closes),
        levels: support_resistance(closes),
    }
}

/// Score (0-100) and five-level signal derived from a snapshot
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConfidenceScore {
    pub score: u8,
    pub signal: Signal,
    pub reasons: Vec<&'static str>,
}

/// Start at 50; RSI extremes move the score by 15, the MACD histogram sign by
/// 10 (no deadband here). Bollinger width only contributes reasons.
pub fn confidence_score(snapshot: &TechnicalSnapshot) -> ConfidenceScore {
    let mut score: i32 = 50;
    let mut reasons = Vec::new();

    match snapshot.rsi_zone {
        Zone::Oversold => {
            score += 15;
            reasons.push("RSI indicates oversold conditions");
        }
        Zone::Overbought => {
            score -= 15;
            reasons.push("RSI indicates overbought conditions");
        }
        Zone::Neutral => {}
    }

    let histogram = snapshot.macd.histogram;
    if histogram > 0.0 {
        score += 10;
        reasons.push("Positive MACD momentum");
    } else if histogram < 0.0 {
        score -= 10;
        reasons.push("Negative MACD momentum");
    }

    if snapshot.bollinger.width < 5.0 {
        reasons.push("Low volatility - potential breakout ahead");
    } else if snapshot.bollinger.width > 15.0 {
        reasons.push("High volatility detected");
    }

    let score = score.clamp(0, 100) as u8;
    let signal = match score {
        75.. => Signal::StrongBuy,
        60..=74 => Signal::Buy,
        40..=59 => Signal::Hold,
        25..=39 => Signal::Sell,
        _ => Signal::StrongSell,
    };

    ConfidenceScore {
        score,
        signal,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_on_flat_series() {
        let closes = [100.0; 30];
        let snapshot = technical_snapshot(&closes);
        assert_eq!(snapshot.sma20, 100.0);
        assert_eq!(snapshot.bollinger.width, 0.0);
        assert_eq!(snapshot.volatility, 0.0);

        let score = confidence_score(&snapshot);
        // flat: RSI reads 100 (no losses) -> overbought
        assert_eq!(score.score, 35);
        assert_eq!(score.signal, Signal::Sell);
        assert!(score.reasons.contains(&"Low volatility - potential breakout ahead"));
    }

    #[test]
    fn test_score_on_steady_decline() {
        let closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64 * 2.0).collect();
        let score = confidence_score(&technical_snapshot(&closes));
        // oversold +15, bearish MACD -10
        assert_eq!(score.score, 55);
        assert_eq!(score.signal, Signal::Hold);
        assert_eq!(score.reasons.len(), 3);
        assert!(score.reasons.contains(&"High volatility detected"));
    }

    #[test]
    fn test_score_counts_histogram_inside_deadband() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let snapshot = technical_snapshot(&closes);
        assert!(snapshot.macd.histogram > 0.0 && snapshot.macd.histogram < MACD_DEADBAND);
        assert_eq!(snapshot.macd.trend(), crate::Direction::Neutral);

        // overbought -15, positive histogram +10
        let score = confidence_score(&snapshot);
        assert_eq!(score.score, 45);
        assert_eq!(score.signal, Signal::Hold);
        assert_eq!(
            score.reasons,
            vec!["RSI indicates overbought conditions", "Positive MACD momentum"]
        );
    }

    #[test]
    fn test_snapshot_rsi_needs_full_window() {
        let snapshot = technical_snapshot(&[100.0, 101.0, 102.0]);
        assert_eq!(snapshot.rsi, 50.0);
        assert_eq!(snapshot.rsi_zone, Zone::Neutral);

        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let snapshot = technical_snapshot(&closes);
        assert_eq!(snapshot.rsi, 100.0);
        assert_eq!(snapshot.rsi_zone, Zone::Overbought);
    }

    #[test]
    fn test_snapshot_on_empty_series() {
        let snapshot = technical_snapshot(&[]);
        assert_eq!(snapshot.rsi, 50.0);
        assert_eq!(snapshot.sma50, 0.0);
        assert_eq!(confidence_score(&snapshot).signal, Signal::Hold);
    }
}
