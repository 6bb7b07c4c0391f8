//! Candlestick pattern detectors
//!
//! One-, two- and three-bar shapes scanned over the most recent bars, plus
//! the scanner that aggregates them into a bias.

use super::helpers::{DOJI_BODY_RATIO, LONG_WICK_FACTOR, SHORT_WICK_FACTOR, STAR_BODY_FACTOR};
use super::{direction_counts, Finding, FindingKind, PatternDetector, PatternId, PatternInfo};
use crate::{AnalysisError, Direction, OHLCVExt, Period, Result, OHLCV};
use serde::Serialize;

impl_with_defaults!(
    DojiDetector,
    HammerDetector,
    ShootingStarDetector,
    BullishEngulfingDetector,
    BearishEngulfingDetector,
    MorningStarDetector,
    EveningStarDetector,
);

const fn candle(
    id: &'static str,
    name: &'static str,
    direction: Direction,
    description: &'static str,
    psychology: &'static str,
    confidence: u8,
) -> PatternInfo {
    PatternInfo {
        id: PatternId(id),
        name,
        kind: FindingKind::Candlestick,
        direction,
        description,
        psychology,
        confidence,
    }
}

const DOJI: PatternInfo = candle(
    "DOJI",
    "Doji",
    Direction::Neutral,
    "Open and close are nearly equal, indicating indecision.",
    "Neither buyers nor sellers are in control. Market is at equilibrium.",
    75,
);

const HAMMER: PatternInfo = candle(
    "HAMMER",
    "Hammer",
    Direction::Bullish,
    "Small body with long lower wick after downtrend.",
    "Sellers pushed prices down but buyers recovered. Potential reversal.",
    72,
);

const SHOOTING_STAR: PatternInfo = candle(
    "SHOOTING_STAR",
    "Shooting Star",
    Direction::Bearish,
    "Small body with long upper wick after uptrend.",
    "Buyers pushed prices up but sellers rejected. Potential reversal.",
    70,
);

const BULLISH_ENGULFING: PatternInfo = candle(
    "BULLISH_ENGULFING",
    "Bullish Engulfing",
    Direction::Bullish,
    "Green candle completely engulfs previous red candle.",
    "Strong buyer takeover after selling pressure. High reversal probability.",
    80,
);

const BEARISH_ENGULFING: PatternInfo = candle(
    "BEARISH_ENGULFING",
    "Bearish Engulfing",
    Direction::Bearish,
    "Red candle completely engulfs previous green candle.",
    "Strong seller takeover after buying pressure. High reversal probability.",
    80,
);

const MORNING_STAR: PatternInfo = candle(
    "MORNING_STAR",
    "Morning Star",
    Direction::Bullish,
    "Three-candle bullish reversal pattern.",
    "Bearish momentum exhausted, bulls taking control. Strong reversal signal.",
    85,
);

const EVENING_STAR: PatternInfo = candle(
    "EVENING_STAR",
    "Evening Star",
    Direction::Bearish,
    "Three-candle bearish reversal pattern.",
    "Bullish momentum exhausted, bears taking control. Strong reversal signal.",
    85,
);

fn check_factor(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalysisError::InvalidConfig(format!(
            "{field} must be positive, got {value}"
        )));
    }
    Ok(())
}

// ============================================================
// SINGLE BAR
// ============================================================

/// Doji: body under `body_ratio` of the range. A bar with no range counts.
#[derive(Debug, Clone, Copy)]
pub struct DojiDetector {
    pub body_ratio: f64,
}

impl Default for DojiDetector {
    fn default() -> Self {
        Self {
            body_ratio: DOJI_BODY_RATIO,
        }
    }
}

impl PatternDetector for DojiDetector {
    fn id(&self) -> PatternId {
        DOJI.id
    }

    fn min_bars(&self) -> usize {
        1
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let bar = bars.get(index)?;
        bar.body_ratio()
            .map_or(true, |r| r < self.body_ratio)
            .then(|| DOJI.at(index, index))
    }

    fn validate_config(&self) -> Result<()> {
        if !(self.body_ratio > 0.0 && self.body_ratio <= 1.0) {
            return Err(AnalysisError::OutOfRange {
                field: "body_ratio",
                value: self.body_ratio,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

/// Hammer: long lower wick, short upper wick, after a bearish bar
#[derive(Debug, Clone, Copy)]
pub struct HammerDetector {
    pub long_wick_factor: f64,
    pub short_wick_factor: f64,
}

impl Default for HammerDetector {
    fn default() -> Self {
        Self {
            long_wick_factor: LONG_WICK_FACTOR,
            short_wick_factor: SHORT_WICK_FACTOR,
        }
    }
}

impl PatternDetector for HammerDetector {
    fn id(&self) -> PatternId {
        HAMMER.id
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let bar = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;
        let body = bar.body();

        (bar.lower_wick() > body * self.long_wick_factor
            && bar.upper_wick() < body * self.short_wick_factor
            && prev.is_bearish())
        .then(|| HAMMER.at(index, index))
    }

    fn validate_config(&self) -> Result<()> {
        check_factor("long_wick_factor", self.long_wick_factor)?;
        check_factor("short_wick_factor", self.short_wick_factor)
    }
}

/// Shooting Star: mirror of the Hammer, after a bullish bar
#[derive(Debug, Clone, Copy)]
pub struct ShootingStarDetector {
    pub long_wick_factor: f64,
    pub short_wick_factor: f64,
}

impl Default for ShootingStarDetector {
    fn default() -> Self {
        Self {
            long_wick_factor: LONG_WICK_FACTOR,
            short_wick_factor: SHORT_WICK_FACTOR,
        }
    }
}

impl PatternDetector for ShootingStarDetector {
    fn id(&self) -> PatternId {
        SHOOTING_STAR.id
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let bar = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;
        let body = bar.body();

        (bar.upper_wick() > body * self.long_wick_factor
            && bar.lower_wick() < body * self.short_wick_factor
            && prev.is_bullish())
        .then(|| SHOOTING_STAR.at(index, index))
    }

    fn validate_config(&self) -> Result<()> {
        check_factor("long_wick_factor", self.long_wick_factor)?;
        check_factor("short_wick_factor", self.short_wick_factor)
    }
}

// ============================================================
// TWO BAR
// ============================================================

/// Bullish Engulfing: bullish body opens below and closes above a bearish body
#[derive(Debug, Clone, Copy, Default)]
pub struct BullishEngulfingDetector;

impl PatternDetector for BullishEngulfingDetector {
    fn id(&self) -> PatternId {
        BULLISH_ENGULFING.id
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let bar = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;

        (prev.is_bearish()
            && bar.is_bullish()
            && bar.open() < prev.close()
            && bar.close() > prev.open())
        .then(|| BULLISH_ENGULFING.at(index - 1, index))
    }
}

/// Bearish Engulfing: bearish body opens above and closes below a bullish body
#[derive(Debug, Clone, Copy, Default)]
pub struct BearishEngulfingDetector;

impl PatternDetector for BearishEngulfingDetector {
    fn id(&self) -> PatternId {
        BEARISH_ENGULFING.id
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let bar = bars.get(index)?;
        let prev = bars.get(index.checked_sub(1)?)?;

        (prev.is_bullish()
            && bar.is_bearish()
            && bar.open() > prev.close()
            && bar.close() < prev.open())
        .then(|| BEARISH_ENGULFING.at(index - 1, index))
    }
}

// ============================================================
// THREE BAR
// ============================================================

/// Morning Star: bearish bar, small middle body, bullish bar
#[derive(Debug, Clone, Copy)]
pub struct MorningStarDetector {
    pub star_body_factor: f64,
}

impl Default for MorningStarDetector {
    fn default() -> Self {
        Self {
            star_body_factor: STAR_BODY_FACTOR,
        }
    }
}

impl PatternDetector for MorningStarDetector {
    fn id(&self) -> PatternId {
        MORNING_STAR.id
    }

    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let first = bars.get(index.checked_sub(2)?)?;
        let star = bars.get(index - 1)?;
        let bar = bars.get(index)?;

        (first.is_bearish()
            && star.body() < first.body() * self.star_body_factor
            && bar.is_bullish())
        .then(|| MORNING_STAR.at(index - 2, index))
    }

    fn validate_config(&self) -> Result<()> {
        check_factor("star_body_factor", self.star_body_factor)
    }
}

/// Evening Star: bullish bar, small middle body, bearish bar
#[derive(Debug, Clone, Copy)]
pub struct EveningStarDetector {
    pub star_body_factor: f64,
}

impl Default for EveningStarDetector {
    fn default() -> Self {
        Self {
            star_body_factor: STAR_BODY_FACTOR,
        }
    }
}

impl PatternDetector for EveningStarDetector {
    fn id(&self) -> PatternId {
        EVENING_STAR.id
    }

    fn min_bars(&self) -> usize {
        3
    }

    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
        let first = bars.get(index.checked_sub(2)?)?;
        let star = bars.get(index - 1)?;
        let bar = bars.get(index)?;

        (first.is_bullish()
            && star.body() < first.body() * self.star_body_factor
            && bar.is_bearish())
        .then(|| EVENING_STAR.at(index - 2, index))
    }

    fn validate_config(&self) -> Result<()> {
        check_factor("star_body_factor", self.star_body_factor)
    }
}

// ============================================================
// BUILTIN DETECTORS - generated via macro
// ============================================================

/// Macro to generate BuiltinDetector enum without boilerplate
macro_rules! define_builtin_detectors {
    (
        $(
            $variant:ident($detector:ty)
        ),* $(,)?
    ) => {
        /// All builtin candlestick detectors - enum dispatch
        #[derive(Debug, Clone)]
        pub enum BuiltinDetector {
            $($variant($detector)),*
        }

        impl BuiltinDetector {
            /// One of each, default thresholds, in scan order
            pub fn all_defaults() -> Vec<BuiltinDetector> {
                vec![$(BuiltinDetector::$variant(<$detector>::default())),*]
            }

            #[inline]
            pub fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding> {
                match self {
                    $(Self::$variant(d) => PatternDetector::detect(d, bars, index)),*
                }
            }

            #[inline]
            pub fn id(&self) -> PatternId {
                match self {
                    $(Self::$variant(d) => PatternDetector::id(d)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(d) => PatternDetector::min_bars(d)),*
                }
            }

            pub fn validate_config(&self) -> Result<()> {
                match self {
                    $(Self::$variant(d) => PatternDetector::validate_config(d)),*
                }
            }
        }
    };
}

define_builtin_detectors! {
    Doji(DojiDetector),
    Hammer(HammerDetector),
    ShootingStar(ShootingStarDetector),
    BullishEngulfing(BullishEngulfingDetector),
    BearishEngulfing(BearishEngulfingDetector),
    MorningStar(MorningStarDetector),
    EveningStar(EveningStarDetector),
}

// ============================================================
// SCANNER
// ============================================================

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Most recent bars scanned
    pub lookback: Period,
    /// Shorter series are reported as insufficient
    pub min_bars: usize,
    pub min_confidence: Option<u8>,
    pub pattern_filter: Option<Vec<PatternId>>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            lookback: Period::new_const(10),
            min_bars: 3,
            min_confidence: None,
            pattern_filter: None,
        }
    }
}

/// Candlestick findings over the scanned window with their aggregate bias
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandlestickAnalysis {
    pub findings: Vec<Finding>,
    pub signal: Direction,
    /// False when the series was shorter than the scanner minimum
    pub sufficient: bool,
}

impl CandlestickAnalysis {
    pub fn interpretation(&self) -> String {
        if !self.sufficient {
            return "Insufficient data for pattern analysis".to_string();
        }
        if self.findings.is_empty() {
            return "No significant candlestick patterns detected in recent data.".to_string();
        }

        let bias = match self.signal {
            Direction::Bullish => "Bullish bias suggests buying pressure.",
            Direction::Bearish => "Bearish bias suggests selling pressure.",
            Direction::Neutral => "Mixed signals - wait for confirmation.",
        };
        format!("Detected {} candlestick patterns. {bias}", self.findings.len())
    }
}

/// Runs candlestick detectors over the trailing window
#[derive(Debug, Clone)]
pub struct CandlestickScanner {
    detectors: Vec<BuiltinDetector>,
    config: ScannerConfig,
}

impl Default for CandlestickScanner {
    fn default() -> Self {
        Self {
            detectors: BuiltinDetector::all_defaults(),
            config: ScannerConfig::default(),
        }
    }
}

impl CandlestickScanner {
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    pub fn detectors(&self) -> &[BuiltinDetector] {
        &self.detectors
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Findings ending at `index`, in detector order.
    pub fn scan_at<T: OHLCV>(&self, bars: &[T], index: usize) -> Vec<Finding> {
        self.detectors
            .iter()
            .filter(|d| index + 1 >= d.min_bars())
            .filter_map(|d| d.detect(bars, index))
            .filter(|f| self.should_include(f))
            .collect()
    }

    /// Findings over the trailing `lookback` bars, ordered by bar.
    pub fn scan<T: OHLCV>(&self, bars: &[T]) -> Vec<Finding> {
        let start = bars.len().saturating_sub(self.config.lookback.get());
        (start..bars.len())
            .flat_map(|i| self.scan_at(bars, i))
            .collect()
    }

    /// Scan and aggregate: a side wins when it leads by more than one finding.
    pub fn analyze<T: OHLCV>(&self, bars: &[T]) -> CandlestickAnalysis {
        if bars.len() < self.config.min_bars {
            return CandlestickAnalysis::default();
        }

        let findings = self.scan(bars);
        let (bullish, bearish) = direction_counts(&findings);
        let signal = if bullish > bearish + 1 {
            Direction::Bullish
        } else if bearish > bullish + 1 {
            Direction::Bearish
        } else {
            Direction::Neutral
        };

        CandlestickAnalysis {
            findings,
            signal,
            sufficient: true,
        }
    }

    fn should_include(&self, f: &Finding) -> bool {
        if let Some(min) = self.config.min_confidence {
            if f.confidence < min {
                return false;
            }
        }
        if let Some(ref filter) = self.config.pattern_filter {
            if !filter.contains(&f.id) {
                return false;
            }
        }
        true
    }
}

/// Builder for [`CandlestickScanner`]
#[derive(Debug, Clone, Default)]
pub struct ScannerBuilder {
    detectors: Vec<BuiltinDetector>,
    lookback: Option<usize>,
    config: ScannerConfig,
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every builtin detector with default thresholds
    pub fn with_all_defaults(mut self) -> Self {
        self.detectors.extend(BuiltinDetector::all_defaults());
        self
    }

    /// Add a detector, validating its thresholds
    pub fn add(mut self, detector: BuiltinDetector) -> Result<Self> {
        detector.validate_config()?;
        self.detectors.push(detector);
        Ok(self)
    }

    pub fn lookback(mut self, bars: usize) -> Self {
        self.lookback = Some(bars);
        self
    }

    pub fn min_bars(mut self, bars: usize) -> Self {
        self.config.min_bars = bars;
        self
    }

    /// Drop findings below this confidence
    pub fn min_confidence(mut self, confidence: u8) -> Self {
        self.config.min_confidence = Some(confidence);
        self
    }

    /// Filter to specific patterns only
    pub fn only_patterns(mut self, ids: impl IntoIterator<Item = PatternId>) -> Self {
        self.config.pattern_filter = Some(ids.into_iter().collect());
        self
    }

    pub fn build(mut self) -> Result<CandlestickScanner> {
        if let Some(lookback) = self.lookback {
            self.config.lookback = Period::new(lookback)?;
        }
        if self.detectors.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "scanner has no detectors".to_string(),
            ));
        }
        for d in &self.detectors {
            d.validate_config()?;
        }

        Ok(CandlestickScanner {
            detectors: self.detectors,
            config: self.config,
        })
    }
}
