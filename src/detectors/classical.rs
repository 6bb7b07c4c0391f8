//! Classical chart patterns from swing extrema
//!
//! Peaks and troughs are taken over the trailing window; findings are
//! additive, so one series may raise several patterns at once.

use super::helpers::{
    peaks, slope, troughs, within_tolerance, DOUBLE_TOLERANCE, EXTREMA_RADIUS,
    FLAT_SLOPE, SHOULDER_TOLERANCE, STEEP_SLOPE,
};
use super::{Finding, FindingKind, PatternClass, PatternId, PatternInfo};
use crate::{AnalysisError, Direction, Period, Result, OHLCV};

impl_with_defaults!(ClassicalScanner);

const REVERSAL_PSYCHOLOGY: &str = "Pattern indicates market psychology shift.";
const CONTINUATION_PSYCHOLOGY: &str = "Pattern suggests trend continuation.";

const fn chart(
    id: &'static str,
    name: &'static str,
    class: PatternClass,
    direction: Direction,
    description: &'static str,
    confidence: u8,
) -> PatternInfo {
    PatternInfo {
        id: PatternId(id),
        name,
        kind: FindingKind::Classical(class),
        direction,
        description,
        psychology: match class {
            PatternClass::Reversal => REVERSAL_PSYCHOLOGY,
            PatternClass::Continuation => CONTINUATION_PSYCHOLOGY,
        },
        confidence,
    }
}

const HEAD_AND_SHOULDERS: PatternInfo = chart(
    "HEAD_AND_SHOULDERS",
    "Head and Shoulders",
    PatternClass::Reversal,
    Direction::Bearish,
    "Classic reversal pattern with center peak higher than shoulders. Suggests trend reversal from bullish to bearish.",
    75,
);

const INVERSE_HEAD_AND_SHOULDERS: PatternInfo = chart(
    "INVERSE_HEAD_AND_SHOULDERS",
    "Inverse Head and Shoulders",
    PatternClass::Reversal,
    Direction::Bullish,
    "Bullish reversal pattern with center trough lower than shoulders. Suggests trend reversal from bearish to bullish.",
    75,
);

const SYMMETRICAL_TRIANGLE: PatternInfo = chart(
    "SYMMETRICAL_TRIANGLE",
    "Symmetrical Triangle",
    PatternClass::Continuation,
    Direction::Bullish,
    "Converging trendlines suggest consolidation before breakout. Direction depends on breakout.",
    65,
);

const ASCENDING_TRIANGLE: PatternInfo = chart(
    "ASCENDING_TRIANGLE",
    "Ascending Triangle",
    PatternClass::Continuation,
    Direction::Bullish,
    "Flat resistance with rising support suggests bullish breakout.",
    70,
);

const DESCENDING_TRIANGLE: PatternInfo = chart(
    "DESCENDING_TRIANGLE",
    "Descending Triangle",
    PatternClass::Continuation,
    Direction::Bearish,
    "Falling resistance with flat support suggests bearish breakdown.",
    70,
);

const DOUBLE_TOP: PatternInfo = chart(
    "DOUBLE_TOP",
    "Double Top",
    PatternClass::Reversal,
    Direction::Bearish,
    "Two peaks at similar levels indicate resistance and potential bearish reversal.",
    72,
);

const DOUBLE_BOTTOM: PatternInfo = chart(
    "DOUBLE_BOTTOM",
    "Double Bottom",
    PatternClass::Reversal,
    Direction::Bullish,
    "Two troughs at similar levels indicate support and potential bullish reversal.",
    72,
);

/// Swing-extrema pattern scanner
#[derive(Debug, Clone, Copy)]
pub struct ClassicalScanner {
    /// Shorter series produce no findings
    pub min_bars: usize,
    /// Trailing bars searched for extrema
    pub window: Period,
    /// Neighbours on each side a swing point must beat
    pub radius: usize,
    pub shoulder_tolerance: f64,
    pub double_tolerance: f64,
    pub steep_slope: f64,
    pub flat_slope: f64,
}

impl Default for ClassicalScanner {
    fn default() -> Self {
        Self {
            min_bars: 20,
            window: Period::new_const(30),
            radius: EXTREMA_RADIUS,
            shoulder_tolerance: SHOULDER_TOLERANCE,
            double_tolerance: DOUBLE_TOLERANCE,
            steep_slope: STEEP_SLOPE,
            flat_slope: FLAT_SLOPE,
        }
    }
}

impl ClassicalScanner {
    pub fn validate_config(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(AnalysisError::InvalidValue("radius must be >= 1"));
        }
        if self.window.get() < 2 * self.radius + 1 {
            return Err(AnalysisError::InvalidConfig(format!(
                "window {} too short for radius {}",
                self.window.get(),
                self.radius
            )));
        }
        for (field, value) in [
            ("shoulder_tolerance", self.shoulder_tolerance),
            ("double_tolerance", self.double_tolerance),
            ("steep_slope", self.steep_slope),
            ("flat_slope", self.flat_slope),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// All classical findings over the trailing window.
    ///
    /// Indices in the findings refer to `bars`, not the window.
    pub fn scan<T: OHLCV>(&self, bars: &[T]) -> Vec<Finding> {
        let mut findings = Vec::new();
        if bars.len() < self.min_bars {
            return findings;
        }

        let offset = bars.len().saturating_sub(self.window.get());
        let recent = &bars[offset..];
        let highs: Vec<f64> = recent.iter().map(|b| b.high()).collect();
        let lows: Vec<f64> = recent.iter().map(|b| b.low()).collect();

        let peaks = peaks(&highs, self.radius);
        let troughs = troughs(&lows, self.radius);
        log::trace!("classical: {} peaks, {} troughs", peaks.len(), troughs.len());

        let span = |start: usize, end: usize| (offset + start, offset + end);

        if let [.., left, head, right] = peaks[..] {
            if highs[head] > highs[left]
                && highs[head] > highs[right]
                && within_tolerance(highs[left], highs[right], self.shoulder_tolerance)
            {
                let (s, e) = span(left, right);
                findings.push(HEAD_AND_SHOULDERS.at(s, e));
            }
        }

        if let [.., left, head, right] = troughs[..] {
            if lows[head] < lows[left]
                && lows[head] < lows[right]
                && within_tolerance(lows[left], lows[right], self.shoulder_tolerance)
            {
                let (s, e) = span(left, right);
                findings.push(INVERSE_HEAD_AND_SHOULDERS.at(s, e));
            }
        }

        if let ([.., p0, p1], [.., t0, t1]) = (&peaks[..], &troughs[..]) {
            let high_slope = slope(&highs, *p0, *p1);
            let low_slope = slope(&lows, *t0, *t1);
            let (s, e) = span((*p0).min(*t0), (*p1).max(*t1));

            let triangle = if high_slope < -self.steep_slope && low_slope > self.steep_slope {
                Some(SYMMETRICAL_TRIANGLE)
            } else if high_slope.abs() < self.flat_slope && low_slope > self.steep_slope {
                Some(ASCENDING_TRIANGLE)
            } else if high_slope < -self.steep_slope && low_slope.abs() < self.flat_slope {
                Some(DESCENDING_TRIANGLE)
            } else {
                None
            };
            if let Some(info) = triangle {
                findings.push(info.at(s, e));
            }
        }

        if let [.., first, second] = peaks[..] {
            if within_tolerance(highs[first], highs[second], self.double_tolerance) {
                let (s, e) = span(first, second);
                findings.push(DOUBLE_TOP.at(s, e));
            }
        }

        if let [.., first, second] = troughs[..] {
            if within_tolerance(lows[first], lows[second], self.double_tolerance) {
                let (s, e) = span(first, second);
                findings.push(DOUBLE_BOTTOM.at(s, e));
            }
        }

        findings
    }
}
