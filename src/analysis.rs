//! Analysis dispatcher
//!
//! Maps `(bar series, method)` to a uniform [`Verdict`]: a five-level signal,
//! a confidence percentage, an interpretation and, for the level-producing
//! methods, support/resistance prices. Dispatch is a pure function of its
//! input; the verdict timestamp is the date of the last bar.

use crate::detectors::{
    direction_counts, max_confidence, CandlestickScanner, ClassicalScanner, Finding,
};
use crate::indicators::{
    analyze_bar_chart, analyze_fibonacci, analyze_moving_averages, analyze_oscillators,
    analyze_volume, Confirmation, FlowTrend, VolatilityLevel,
};
use crate::transforms::{BuiltinTransform, ChartTransform, HeikinAshi, Kagi, PointFigure, Renko};
use crate::{AnalysisError, Bar, Result, Signal};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fallback confidence when a method has nothing better to report
pub const NEUTRAL_CONFIDENCE: u8 = 50;

// ============================================================
// METHODS
// ============================================================

/// The closed set of analysis methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Candlestick,
    Bar,
    PointFigure,
    HeikinAshi,
    Renko,
    Kagi,
    Patterns,
    MovingAverage,
    Oscillator,
    Fibonacci,
    Volume,
}

/// Fixed educational text attached to every verdict of a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodGuide {
    pub psychology: &'static str,
    pub use_case: &'static str,
}

impl Method {
    pub const ALL: [Method; 11] = [
        Method::Candlestick,
        Method::Bar,
        Method::PointFigure,
        Method::HeikinAshi,
        Method::Renko,
        Method::Kagi,
        Method::Patterns,
        Method::MovingAverage,
        Method::Oscillator,
        Method::Fibonacci,
        Method::Volume,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Candlestick => "candlestick",
            Method::Bar => "bar",
            Method::PointFigure => "point-figure",
            Method::HeikinAshi => "heikin-ashi",
            Method::Renko => "renko",
            Method::Kagi => "kagi",
            Method::Patterns => "patterns",
            Method::MovingAverage => "moving-average",
            Method::Oscillator => "oscillator",
            Method::Fibonacci => "fibonacci",
            Method::Volume => "volume",
        }
    }

    /// Shortest series the method analyses with default settings
    pub fn min_bars(self) -> usize {
        match self {
            Method::MovingAverage => 1,
            Method::HeikinAshi | Method::Oscillator | Method::Fibonacci => 2,
            Method::Candlestick => 3,
            Method::PointFigure | Method::Renko | Method::Kagi => 5,
            Method::Bar | Method::Volume => 10,
            Method::Patterns => 20,
        }
    }

    pub fn guide(self) -> MethodGuide {
        let (psychology, use_case) = match self {
            Method::Candlestick => (
                "Candlestick patterns reflect the emotional battle between buyers and sellers within each trading period.",
                "Best for short-term trading, swing trading, and identifying reversals.",
            ),
            Method::Bar => (
                "Bar size shows trading range volatility; closing position shows buyer/seller dominance.",
                "Alternative to candlesticks for clarity in historical data analysis.",
            ),
            Method::PointFigure => (
                "Filters out time noise to show pure supply and demand dynamics.",
                "Identifying support/resistance levels, long-term trend spotting.",
            ),
            Method::HeikinAshi => (
                "Shows momentum clearly by averaging prices, reduces emotional reaction to short-term reversals.",
                "Identifying trend direction, trend strength, and optimal exit/entry points.",
            ),
            Method::Renko => (
                "Simplifies market direction by removing time element, showing only significant price moves.",
                "Trend-following strategies, breakout detection with minimal noise.",
            ),
            Method::Kagi => (
                "Line thickness changes highlight shifts in supply/demand dominance and trend reversals.",
                "Market strength analysis, identifying trend reversals and support/resistance.",
            ),
            Method::Patterns => (
                "Chart patterns reflect market phases: accumulation, distribution, and breakout psychology.",
                "Mid-to-long-term technical analysis, confirming market sentiment.",
            ),
            Method::MovingAverage => (
                "Moving averages smooth price data to reveal trend momentum and potential exhaustion points.",
                "Trend confirmation, entry/exit timing, swing trading strategies.",
            ),
            Method::Oscillator => (
                "Oscillators show extremes in buying/selling pressure and potential reversal zones.",
                "Short-term reversal spotting, trade timing, divergence analysis.",
            ),
            Method::Fibonacci => (
                "Traders collectively react to Fibonacci levels, creating self-fulfilling support/resistance zones.",
                "Predicting pullback levels, setting target prices and stop-losses.",
            ),
            Method::Volume => (
                "Volume reflects participation and conviction behind price movements.",
                "Confirming trend strength, spotting divergences, validating breakouts.",
            ),
        };
        MethodGuide {
            psychology,
            use_case,
        }
    }
}

impl FromStr for Method {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownMethod(s.to_string()))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// VERDICT
// ============================================================

/// Uniform result of one analysis method over one series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub method: String,
    pub signal: Signal,
    /// 0..=100
    pub confidence: u8,
    pub findings: Vec<Finding>,
    pub interpretation: String,
    pub psychology: &'static str,
    pub use_case: &'static str,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    /// Date of the last bar analysed
    pub timestamp: Option<NaiveDate>,
}

impl Verdict {
    fn neutral(method: &str, guide: MethodGuide, timestamp: Option<NaiveDate>) -> Self {
        Self {
            method: method.to_string(),
            signal: Signal::Hold,
            confidence: NEUTRAL_CONFIDENCE,
            findings: Vec::new(),
            interpretation: String::new(),
            psychology: guide.psychology,
            use_case: guide.use_case,
            support_levels: Vec::new(),
            resistance_levels: Vec::new(),
            timestamp,
        }
    }

    /// Verdict for a method id outside [`Method::ALL`]
    pub fn unknown(method: &str, timestamp: Option<NaiveDate>) -> Self {
        let guide = MethodGuide {
            psychology: "",
            use_case: "",
        };
        let mut verdict = Self::neutral(method, guide, timestamp);
        verdict.interpretation = "Unknown analysis method selected.".to_string();
        verdict
    }
}

fn buy_sell_hold(bullish: bool, bearish: bool) -> Signal {
    if bullish {
        Signal::Buy
    } else if bearish {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

// ============================================================
// ANALYZER
// ============================================================

/// Holds the configured engines and dispatches methods to them
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    candlestick: CandlestickScanner,
    classical: ClassicalScanner,
    heikin_ashi: HeikinAshi,
    renko: Renko,
    kagi: Kagi,
    point_figure: PointFigure,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the matching chart transform, validating its config
    pub fn with_transform(mut self, transform: BuiltinTransform) -> Result<Self> {
        transform.validate_config()?;
        match transform {
            BuiltinTransform::HeikinAshi(t) => self.heikin_ashi = t,
            BuiltinTransform::Renko(t) => self.renko = t,
            BuiltinTransform::Kagi(t) => self.kagi = t,
            BuiltinTransform::PointFigure(t) => self.point_figure = t,
        }
        Ok(self)
    }

    pub fn with_candlestick_scanner(mut self, scanner: CandlestickScanner) -> Self {
        self.candlestick = scanner;
        self
    }

    pub fn with_classical_scanner(mut self, scanner: ClassicalScanner) -> Result<Self> {
        scanner.validate_config()?;
        self.classical = scanner;
        Ok(self)
    }

    /// Shortest series `method` analyses with this configuration
    pub fn min_bars(&self, method: Method) -> usize {
        let configured = match method {
            Method::Candlestick => self.candlestick.config().min_bars,
            Method::Patterns => self.classical.min_bars,
            Method::HeikinAshi => self.heikin_ashi.min_bars(),
            Method::Renko => self.renko.min_bars(),
            Method::Kagi => self.kagi.min_bars(),
            Method::PointFigure => self.point_figure.min_bars(),
            _ => method.min_bars(),
        };
        configured.max(1)
    }

    /// Run one method. Never fails; short series give a Hold verdict.
    pub fn analyze(&self, bars: &[Bar], method: Method) -> Verdict {
        let timestamp = bars.last().map(|b| b.date);
        let mut verdict = Verdict::neutral(method.as_str(), method.guide(), timestamp);

        if bars.len() < self.min_bars(method) {
            verdict.interpretation = "Insufficient data".to_string();
            log::debug!("{method}: {} bars, need {}", bars.len(), self.min_bars(method));
            return verdict;
        }

        match method {
            Method::Candlestick => self.candlestick_verdict(bars, &mut verdict),
            Method::Bar => bar_verdict(bars, &mut verdict),
            Method::PointFigure => self.point_figure_verdict(bars, &mut verdict),
            Method::HeikinAshi => self.heikin_ashi_verdict(bars, &mut verdict),
            Method::Renko => self.renko_verdict(bars, &mut verdict),
            Method::Kagi => self.kagi_verdict(bars, &mut verdict),
            Method::Patterns => self.patterns_verdict(bars, &mut verdict),
            Method::MovingAverage => moving_average_verdict(bars, &mut verdict),
            Method::Oscillator => oscillator_verdict(bars, &mut verdict),
            Method::Fibonacci => fibonacci_verdict(bars, &mut verdict),
            Method::Volume => volume_verdict(bars, &mut verdict),
        }

        log::debug!(
            "{method}: {} at {}% over {} bars",
            verdict.signal,
            verdict.confidence,
            bars.len()
        );
        verdict
    }

    /// Run a method by id; unknown ids give a neutral verdict.
    pub fn analyze_id(&self, bars: &[Bar], method_id: &str) -> Verdict {
        match method_id.parse::<Method>() {
            Ok(method) => self.analyze(bars, method),
            Err(e) => {
                log::warn!("{e}");
                Verdict::unknown(method_id, bars.last().map(|b| b.date))
            }
        }
    }

    /// Every method over the same series, in [`Method::ALL`] order.
    pub fn analyze_all(&self, bars: &[Bar]) -> Vec<Verdict> {
        Method::ALL
            .par_iter()
            .map(|&method| self.analyze(bars, method))
            .collect()
    }

    fn candlestick_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let analysis = self.candlestick.analyze(bars);
        verdict.signal = analysis.signal.into();
        verdict.confidence = max_confidence(&analysis.findings).unwrap_or(NEUTRAL_CONFIDENCE);
        verdict.interpretation = analysis.interpretation();
        verdict.findings = analysis.findings;
    }

    fn point_figure_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let chart = self.point_figure.transform(bars);
        let labels: Vec<&str> = chart.breakouts.iter().map(|b| b.label()).collect();

        verdict.signal = chart.trend.into();
        verdict.confidence = if chart.breakouts.is_empty() { NEUTRAL_CONFIDENCE } else { 72 };
        verdict.interpretation = if labels.is_empty() {
            format!(
                "Generated {} columns. Focus on X/O column reversals for signals.",
                chart.columns.len()
            )
        } else {
            format!("Generated {} columns. {}", chart.columns.len(), labels.join(". "))
        };
    }

    fn heikin_ashi_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let chart = self.heikin_ashi.transform(bars);
        verdict.signal = chart.trend.into();
        verdict.confidence = chart.strength;
        verdict.interpretation = format!(
            "Trend: {}. Trend strength: {}%. Smooth candles reduce noise for clearer trend identification.",
            chart.trend, chart.strength
        );
    }

    fn renko_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let chart = self.renko.transform(bars);
        verdict.signal = chart.trend.into();
        verdict.confidence = if chart.bricks.len() > 10 { 70 } else { 55 };
        verdict.interpretation = format!(
            "{} bricks generated with size {:.2}. Trend: {}. Focus on brick color changes for reversal signals.",
            chart.bricks.len(),
            chart.brick_size,
            chart.trend
        );
    }

    fn kagi_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let chart = self.kagi.transform(bars);
        verdict.signal = chart.trend.into();
        verdict.confidence = if chart.lines.len() > 5 { 68 } else { NEUTRAL_CONFIDENCE };
        verdict.interpretation = format!(
            "{} Kagi lines generated. Yang (thick) = demand, Yin (thin) = supply. Current trend: {}.",
            chart.lines.len(),
            chart.trend
        );
    }

    fn patterns_verdict(&self, bars: &[Bar], verdict: &mut Verdict) {
        let findings = self.classical.scan(bars);
        let (bullish, bearish) = direction_counts(&findings);

        verdict.signal = buy_sell_hold(bullish > bearish, bearish > bullish);
        verdict.confidence = max_confidence(&findings).unwrap_or(NEUTRAL_CONFIDENCE);
        verdict.interpretation = if findings.is_empty() {
            "No classic chart patterns detected in current data.".to_string()
        } else {
            let names: Vec<&str> = findings.iter().map(|f| f.name).collect();
            format!("Detected: {}", names.join(", "))
        };
        verdict.findings = findings;
    }
}

fn bar_verdict(bars: &[Bar], verdict: &mut Verdict) {
    let analysis = analyze_bar_chart(bars);
    verdict.signal = analysis.trend.into();
    verdict.confidence = match analysis.volatility {
        VolatilityLevel::High => 60,
        _ => 70,
    };
    verdict.interpretation = analysis.interpretation();
}

fn moving_average_verdict(bars: &[Bar], verdict: &mut Verdict) {
    let analysis = analyze_moving_averages(bars);

    verdict.signal = if analysis.has_golden_cross() {
        Signal::StrongBuy
    } else if analysis.has_death_cross() {
        Signal::StrongSell
    } else {
        analysis.trend.into()
    };
    verdict.confidence = if analysis.crossovers.is_empty() { 65 } else { 82 };
    verdict.interpretation = analysis.interpretation();
    verdict.support_levels = vec![analysis.sma50, analysis.sma200];
    if analysis.trend.is_bearish() {
        verdict.resistance_levels = vec![analysis.sma20];
    }
}

fn oscillator_verdict(bars: &[Bar], verdict: &mut Verdict) {
    let analysis = analyze_oscillators(bars);
    verdict.signal = analysis.outlook.into();
    verdict.confidence = if analysis.rsi.divergence { 78 } else { 68 };
    verdict.interpretation = analysis.interpretation();
}

fn fibonacci_verdict(bars: &[Bar], verdict: &mut Verdict) {
    let Some(analysis) = analyze_fibonacci(bars) else {
        return;
    };
    // levels: 0, 23.6, 38.2, 50, 61.8, 78.6, 100
    let lower = analysis.levels[2].price;
    let upper = analysis.levels[4].price;
    let pivots = analysis.pivots;

    verdict.signal = buy_sell_hold(analysis.last_close < lower, analysis.last_close > upper);
    verdict.confidence = 70;
    verdict.interpretation = format!(
        "{}. Key levels: 38.2% ({lower:.2}), 61.8% ({upper:.2}). Pivot: {:.2}",
        analysis.position_label(),
        pivots.pivot
    );
    verdict.support_levels = vec![pivots.s1, pivots.s2, lower];
    verdict.resistance_levels = vec![pivots.r1, pivots.r2, upper];
}

fn volume_verdict(bars: &[Bar], verdict: &mut Verdict) {
    let Some(analysis) = analyze_volume(bars) else {
        return;
    };
    let confirmed = analysis.confirmation == Confirmation::Confirmed;

    verdict.signal = buy_sell_hold(
        confirmed && analysis.obv_trend == FlowTrend::Accumulation,
        confirmed && analysis.obv_trend == FlowTrend::Distribution,
    );
    verdict.confidence = if analysis.volume_spike {
        75
    } else if confirmed {
        70
    } else {
        55
    };
    verdict.interpretation = analysis.interpretation();
}

/// Analyse `bars` with the method named `method_id` using default engines.
///
/// Unknown ids yield a Hold verdict at confidence 50.
pub fn analyze(bars: &[Bar], method_id: &str) -> Verdict {
    Analyzer::default().analyze_id(bars, method_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::PatternId;
    use chrono::Days;

    fn day(n: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n as u64)
    }

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(day(i), c, c * 1.01, c * 0.99, c, 1000 + i as u64).unwrap())
            .collect()
    }

    fn flat_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| Bar::new(day(i), 50.0, 50.0, 50.0, 50.0, 1000).unwrap())
            .collect()
    }

    #[test]
    fn test_method_ids_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.as_str()));
        }
        assert_eq!(
            "elliott-wave".parse::<Method>(),
            Err(AnalysisError::UnknownMethod("elliott-wave".to_string()))
        );
    }

    #[test]
    fn test_guides_populated() {
        for method in Method::ALL {
            let guide = method.guide();
            assert!(!guide.psychology.is_empty(), "{method}");
            assert!(!guide.use_case.is_empty(), "{method}");
        }
    }

    #[test]
    fn test_unknown_method() {
        let bars = flat_bars(5);
        let verdict = analyze(&bars, "astrology");

        assert_eq!(verdict.method, "astrology");
        assert_eq!(verdict.signal, Signal::Hold);
        assert_eq!(verdict.confidence, 50);
        assert_eq!(verdict.interpretation, "Unknown analysis method selected.");
        assert_eq!(verdict.timestamp, Some(day(4)));
    }

    #[test]
    fn test_insufficient_data() {
        let bars = flat_bars(4);
        let verdict = Analyzer::new().analyze(&bars, Method::Volume);
        assert_eq!(verdict.signal, Signal::Hold);
        assert_eq!(verdict.confidence, 50);
        assert_eq!(verdict.interpretation, "Insufficient data");
        assert_eq!(verdict.psychology, Method::Volume.guide().psychology);
    }

    #[test]
    fn test_empty_series() {
        for verdict in Analyzer::new().analyze_all(&[]) {
            assert_eq!(verdict.signal, Signal::Hold);
            assert_eq!(verdict.timestamp, None);
        }
    }

    #[test]
    fn test_analyze_all_order() {
        let bars = flat_bars(30);
        let verdicts = Analyzer::new().analyze_all(&bars);
        let methods: Vec<&str> = verdicts.iter().map(|v| v.method.as_str()).collect();
        let expected: Vec<&str> = Method::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(methods, expected);
    }

    #[test]
    fn test_candlestick_flat_series() {
        let verdict = analyze(&flat_bars(12), "candlestick");
        assert_eq!(verdict.findings.len(), 10);
        assert!(verdict.findings.iter().all(|f| f.id == PatternId("DOJI") && f.confidence == 75));
        assert_eq!(verdict.signal, Signal::Hold);
        assert_eq!(verdict.confidence, 75);
    }

    #[test]
    fn test_moving_average_levels() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let verdict = analyze(&bars_from_closes(&closes), "moving-average");

        assert_eq!(verdict.signal, Signal::Buy);
        assert_eq!(verdict.confidence, 65);
        assert_eq!(verdict.support_levels.len(), 2);
        assert!(verdict.resistance_levels.is_empty());
    }

    #[test]
    fn test_moving_average_bearish_resistance() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 * 0.99_f64.powi(i)).collect();
        let verdict = analyze(&bars_from_closes(&closes), "moving-average");

        assert_eq!(verdict.signal, Signal::Sell);
        assert_eq!(verdict.resistance_levels.len(), 1);
    }

    #[test]
    fn test_golden_cross_overrides_trend() {
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 - i as f64).collect();
        closes.extend((0..15).map(|i| 150.0 + i as f64 * 30.0));
        let verdict = analyze(&bars_from_closes(&closes), "moving-average");

        assert_eq!(verdict.signal, Signal::StrongBuy);
        assert_eq!(verdict.confidence, 82);
        assert!(verdict.interpretation.starts_with("Golden Cross"));
    }

    #[test]
    fn test_death_cross_overrides_trend() {
        // Mirror of the golden cross: long climb, then a crash.
        let mut closes: Vec<f64> = (0..50).map(|i| 500.0 + i as f64).collect();
        closes.extend((0..15).map(|i| 550.0 - i as f64 * 30.0));
        let verdict = analyze(&bars_from_closes(&closes), "moving-average");

        assert_eq!(verdict.signal, Signal::StrongSell);
        assert_eq!(verdict.confidence, 82);
        assert!(verdict.interpretation.starts_with("Death Cross"));
        assert_eq!(verdict.support_levels.len(), 2);
        assert_eq!(verdict.resistance_levels.len(), 1);
    }

    fn tight_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(day(i), c, c + 0.1, c - 0.1, c, 1000).unwrap())
            .collect()
    }

    #[test]
    fn test_oscillator_strong_sell() {
        // RSI and Stochastic overbought, MACD histogram inside the deadband
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let verdict = analyze(&tight_bars(&closes), "oscillator");

        assert_eq!(verdict.signal, Signal::StrongSell);
        assert_eq!(verdict.confidence, 68);
        assert!(!verdict.interpretation.contains("DIVERGENCE"));
    }

    #[test]
    fn test_oscillator_strong_buy() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64 * 0.5).collect();
        let verdict = analyze(&tight_bars(&closes), "oscillator");

        assert_eq!(verdict.signal, Signal::StrongBuy);
        assert_eq!(verdict.confidence, 68);
        assert!(verdict.support_levels.is_empty());
    }

    #[test]
    fn test_fibonacci_levels_and_signal() {
        // Range 50..100, last close near the low
        let mut bars = vec![
            Bar::new(day(0), 60.0, 100.0, 55.0, 90.0, 1000).unwrap(),
            Bar::new(day(1), 90.0, 95.0, 50.0, 60.0, 1000).unwrap(),
        ];
        let verdict = analyze(&bars, "fibonacci");
        assert_eq!(verdict.signal, Signal::Buy);
        assert_eq!(verdict.confidence, 70);
        assert_eq!(verdict.support_levels.len(), 3);
        assert_eq!(verdict.resistance_levels.len(), 3);
        // 38.2% level of 50..100
        assert!((verdict.support_levels[2] - 69.1).abs() < 1e-9);

        bars.push(Bar::new(day(2), 60.0, 98.0, 59.0, 97.0, 1000).unwrap());
        assert_eq!(analyze(&bars, "fibonacci").signal, Signal::Sell);
    }

    #[test]
    fn test_renko_confidence_by_brick_count() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let verdict = Analyzer::new()
            .with_transform(BuiltinTransform::Renko(Renko::with_brick_size(1.0).unwrap()))
            .unwrap()
            .analyze(&bars_from_closes(&closes), Method::Renko);

        assert_eq!(verdict.signal, Signal::Buy);
        assert_eq!(verdict.confidence, 70);
    }

    #[test]
    fn test_with_transform_rejects_invalid() {
        let bad = BuiltinTransform::Kagi(Kagi {
            reversal_percent: -1.0,
        });
        assert!(Analyzer::new().with_transform(bad).is_err());
    }

    #[test]
    fn test_configured_min_bars() {
        let scanner = ClassicalScanner {
            min_bars: 40,
            ..ClassicalScanner::default()
        };
        let analyzer = Analyzer::new().with_classical_scanner(scanner).unwrap();
        assert_eq!(analyzer.min_bars(Method::Patterns), 40);
        assert_eq!(analyzer.min_bars(Method::Volume), 10);
    }
}
