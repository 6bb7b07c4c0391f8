//! Pattern detectors
//!
//! Two families share the [`Finding`] type:
//!
//! - **Candlestick (7)**: Doji, Hammer, Shooting Star, Bullish/Bearish
//!   Engulfing, Morning/Evening Star. Fixed geometric thresholds, scanned
//!   over the most recent bars.
//! - **Classical (7)**: Head and Shoulders and its inverse, symmetrical,
//!   ascending and descending triangles, Double Top/Bottom. Derived from
//!   swing extrema over a trailing window.

use crate::{Direction, Result, OHLCV};
use serde::Serialize;

pub mod helpers;

/// Generate `with_defaults()` -> `Self::default()` for multiple detector types.
macro_rules! impl_with_defaults {
  ($($detector:ty),* $(,)?) => {
    $(impl $detector {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod candlestick;
pub mod classical;

pub use candlestick::*;
pub use classical::*;
pub use helpers::*;

/// Stable pattern identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PatternId(pub &'static str);

impl PatternId {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Role of a classical chart pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternClass {
    Continuation,
    Reversal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "family", content = "class")]
pub enum FindingKind {
    Candlestick,
    Classical(PatternClass),
}

/// A named formation located in a bar series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: PatternId,
    pub name: &'static str,
    pub kind: FindingKind,
    pub direction: Direction,
    pub description: &'static str,
    pub psychology: &'static str,
    /// 0..=100
    pub confidence: u8,
    pub start_index: usize,
    pub end_index: usize,
}

/// Static description of a pattern; stamped into a [`Finding`] on a match.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PatternInfo {
    pub id: PatternId,
    pub name: &'static str,
    pub kind: FindingKind,
    pub direction: Direction,
    pub description: &'static str,
    pub psychology: &'static str,
    pub confidence: u8,
}

impl PatternInfo {
    pub(crate) fn at(&self, start_index: usize, end_index: usize) -> Finding {
        Finding {
            id: self.id,
            name: self.name,
            kind: self.kind,
            direction: self.direction,
            description: self.description,
            psychology: self.psychology,
            confidence: self.confidence,
            start_index,
            end_index,
        }
    }
}

/// Count bullish and bearish findings.
pub fn direction_counts(findings: &[Finding]) -> (usize, usize) {
    findings.iter().fold((0, 0), |(bull, bear), f| match f.direction {
        Direction::Bullish => (bull + 1, bear),
        Direction::Bearish => (bull, bear + 1),
        Direction::Neutral => (bull, bear),
    })
}

/// Highest finding confidence, if any
pub fn max_confidence(findings: &[Finding]) -> Option<u8> {
    findings.iter().map(|f| f.confidence).max()
}

/// Single-position pattern detector
pub trait PatternDetector: Send + Sync {
    fn id(&self) -> PatternId;
    /// Bars up to and including `index` the pattern needs
    fn min_bars(&self) -> usize;
    fn detect<T: OHLCV>(&self, bars: &[T], index: usize) -> Option<Finding>;

    fn validate_config(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(direction: Direction, confidence: u8) -> Finding {
        Finding {
            id: PatternId("TEST"),
            name: "Test",
            kind: FindingKind::Candlestick,
            direction,
            description: "",
            psychology: "",
            confidence,
            start_index: 0,
            end_index: 0,
        }
    }

    #[test]
    fn test_direction_counts() {
        let findings = vec![
            finding(Direction::Bullish, 70),
            finding(Direction::Neutral, 75),
            finding(Direction::Bullish, 80),
            finding(Direction::Bearish, 85),
        ];
        assert_eq!(direction_counts(&findings), (2, 1));
        assert_eq!(max_confidence(&findings), Some(85));
        assert_eq!(max_confidence(&[]), None);
    }

    #[test]
    fn test_finding_kind_serde() {
        let json = serde_json::to_string(&FindingKind::Classical(PatternClass::Reversal)).unwrap();
        assert_eq!(json, r#"{"family":"classical","class":"reversal"}"#);
        let json = serde_json::to_string(&FindingKind::Candlestick).unwrap();
        assert_eq!(json, r#"{"family":"candlestick"}"#);
    }
}
