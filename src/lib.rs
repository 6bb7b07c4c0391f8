//! # chartwise
//!
//! Chart transforms, technical indicators and pattern detection over a
//! time-ordered series of OHLCV price bars.
//!
//! ## Quick Start
//!
//! ```rust
//! use chartwise::prelude::*;
//! use chrono::{Days, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bars: Vec<Bar> = (0..60u32)
//!     .map(|i| {
//!         let close = 100.0 * 1.01_f64.powi(i as i32);
//!         let date = start + Days::new(u64::from(i));
//!         Bar::new(date, close * 0.995, close * 1.005, close * 0.99, close, 10_000).unwrap()
//!     })
//!     .collect();
//!
//! // One method at a time, by id...
//! let verdict = analyze(&bars, "moving-average");
//! assert_eq!(verdict.signal, Signal::Buy);
//!
//! // ...or every method at once.
//! let verdicts = Analyzer::default().analyze_all(&bars);
//! assert_eq!(verdicts.len(), Method::ALL.len());
//! ```

use chrono::NaiveDate;

pub mod analysis;
pub mod detectors;
pub mod indicators;
pub mod params;
pub mod transforms;

pub mod prelude {
    pub use crate::{
        // Dispatcher
        analysis::{analyze, Analyzer, Method, MethodGuide, Verdict},
        // Detectors
        detectors::{
            CandlestickAnalysis, CandlestickScanner, ClassicalScanner, Finding, FindingKind,
            PatternClass, PatternDetector, PatternId, ScannerBuilder,
        },
        // Indicators
        indicators::{
            bollinger, ema, macd, rsi, sma, stochastic, BollingerBands, Macd, Stochastic,
        },
        // Parameters
        params::{ParamMeta, ParamType, ParameterizedTransform},
        // Transforms
        transforms::{
            BuiltinTransform, ChartTransform, DerivedChart, DerivedSeries, HeikinAshi, Kagi,
            PointFigure, Renko,
        },
        // Parallel
        analyze_parallel,
        validate_series,
        // Errors
        AnalysisError,
        // Types
        Bar,
        Direction,
        InstrumentReport,
        OHLCVExt,
        Period,
        Result,
        ScanError,
        Signal,
        Trend,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised at construction and configuration boundaries.
///
/// Computations over a well-formed series never fail; short or degenerate
/// input resolves to a neutral value instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: &'static str },

    #[error("Unknown analysis method: {0}")]
    UnknownMethod(String),
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Lookback period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(AnalysisError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

/// Extension trait with computed candle geometry
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_wick(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_wick(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Body as ratio of range. Returns None if range ≈ 0
    #[inline]
    fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > f64::EPSILON).then(|| self.body() / range)
    }

    /// Validate OHLC consistency: finite, positive, `low ≤ min(o, c) ≤ max(o, c) ≤ high`.
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        if prices.iter().any(|&p| p <= 0.0) {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "non-positive price",
            });
        }
        if self.high() < self.low() {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open().min(self.close()) < self.low() {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "open/close below low",
            });
        }
        if self.open().max(self.close()) > self.high() {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "open/close above high",
            });
        }
        if self.volume() < 0.0 || self.volume().is_nan() {
            return Err(AnalysisError::InvalidBar {
                index: 0,
                reason: "negative volume",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// BAR
// ============================================================

/// One trading day of price data. A series is ordered oldest first.
///
/// Deserialising goes through [`Bar::new`], so decoded bars hold the same
/// invariant as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawBar")]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Create a bar, rejecting prices that break the OHLC ordering.
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }
}

#[derive(serde::Deserialize)]
struct RawBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl TryFrom<RawBar> for Bar {
    type Error = AnalysisError;

    fn try_from(raw: RawBar) -> Result<Self> {
        Bar::new(raw.date, raw.open, raw.high, raw.low, raw.close, raw.volume)
    }
}

impl OHLCV for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume as f64
    }
}

/// Validate every bar of a series, reporting the first offending index.
pub fn validate_series<T: OHLCV>(bars: &[T]) -> Result<()> {
    for (i, bar) in bars.iter().enumerate() {
        bar.validate().map_err(|e| match e {
            AnalysisError::InvalidBar { reason, .. } => AnalysisError::InvalidBar { index: i, reason },
            other => other,
        })?;
    }
    Ok(())
}

// ============================================================
// CLASSIFICATIONS
// ============================================================

/// Direction/bias of a finding or indicator reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Bullish => "bullish",
            Direction::Neutral => "neutral",
            Direction::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse trend read produced by the chart transforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    StrongBullish,
    Bullish,
    #[default]
    Neutral,
    Bearish,
    StrongBearish,
}

impl Trend {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Trend::Bullish | Trend::StrongBullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Trend::Bearish | Trend::StrongBearish)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trend::StrongBullish => "strong-bullish",
            Trend::Bullish => "bullish",
            Trend::Neutral => "neutral",
            Trend::Bearish => "bearish",
            Trend::StrongBearish => "strong-bearish",
        }
    }
}

impl From<Direction> for Trend {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Bullish => Trend::Bullish,
            Direction::Neutral => Trend::Neutral,
            Direction::Bearish => Trend::Bearish,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five-level trading signal carried by every verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Signal {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    #[default]
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Signal {
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::StrongBuy => "Strong Buy",
            Signal::Buy => "Buy",
            Signal::Hold => "Hold",
            Signal::Sell => "Sell",
            Signal::StrongSell => "Strong Sell",
        }
    }
}

impl From<Trend> for Signal {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::StrongBullish => Signal::StrongBuy,
            Trend::Bullish => Signal::Buy,
            Trend::Neutral => Signal::Hold,
            Trend::Bearish => Signal::Sell,
            Trend::StrongBearish => Signal::StrongSell,
        }
    }
}

impl From<Direction> for Signal {
    fn from(direction: Direction) -> Self {
        Trend::from(direction).into()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use analysis::{Analyzer, Method, Verdict};
use rayon::prelude::*;

/// Verdicts for a single instrument
#[derive(Debug)]
pub struct InstrumentReport {
    pub symbol: String,
    pub verdicts: Vec<Verdict>,
}

/// Malformed series for a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: AnalysisError,
}

/// Run `methods` over many independent instruments in parallel.
///
/// Each series is validated first; malformed ones are reported instead of analysed.
pub fn analyze_parallel<'a, I>(
    analyzer: &Analyzer,
    instruments: I,
    methods: &[Method],
) -> (Vec<InstrumentReport>, Vec<ScanError>)
where
    I: IntoParallelIterator<Item = (&'a str, &'a [Bar])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            validate_series(bars)
                .map(|()| InstrumentReport {
                    symbol: symbol.to_string(),
                    verdicts: methods.iter().map(|&m| analyzer.analyze(bars, m)).collect(),
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
