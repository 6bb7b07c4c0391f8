//! Renko bricks

use super::{count_recent, ChartTransform, DerivedSeries};
use crate::{AnalysisError, Bar, Period, Result, Trend};
use chrono::NaiveDate;
use serde::Serialize;

/// Trailing bricks inspected for the trend.
pub const RENKO_TREND_WINDOW: usize = 5;
/// Fraction of the mean bar range used as the automatic brick size.
pub const AUTO_BRICK_FACTOR: f64 = 0.5;
/// Brick size used when the automatic size rounds to zero.
pub const FALLBACK_BRICK_SIZE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Brick {
    pub kind: BrickKind,
    /// Boundary level after the move
    pub price: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenkoChart {
    pub bricks: Vec<Brick>,
    pub trend: Trend,
    pub brick_size: f64,
}

impl Default for RenkoChart {
    fn default() -> Self {
        Self {
            bricks: Vec::new(),
            trend: Trend::Neutral,
            brick_size: FALLBACK_BRICK_SIZE,
        }
    }
}

/// Renko transform.
///
/// With no fixed `brick_size`, the brick is half the mean high-low range of
/// the last `range_period` bars, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renko {
    pub brick_size: Option<f64>,
    pub range_period: Period,
}

impl Default for Renko {
    fn default() -> Self {
        Self {
            brick_size: None,
            range_period: Period::new_const(20),
        }
    }
}

impl Renko {
    pub fn with_brick_size(brick_size: f64) -> Result<Self> {
        let renko = Self {
            brick_size: Some(brick_size),
            ..Self::default()
        };
        renko.validate_config()?;
        Ok(renko)
    }

    /// Brick size this transform would use for `bars`.
    pub fn resolve_brick_size(&self, bars: &[Bar]) -> f64 {
        if let Some(size) = self.brick_size {
            return size;
        }

        let recent = &bars[bars.len().saturating_sub(self.range_period.get())..];
        if recent.is_empty() {
            return FALLBACK_BRICK_SIZE;
        }

        let mean_range = recent.iter().map(|b| b.high - b.low).sum::<f64>() / recent.len() as f64;
        let size = (mean_range * AUTO_BRICK_FACTOR * 100.0).round() / 100.0;
        log::debug!("renko: auto brick size {size} from mean range {mean_range:.4}");

        if size > 0.0 {
            size
        } else {
            FALLBACK_BRICK_SIZE
        }
    }
}

/// Emit bricks as closes cross whole brick multiples from the running boundary.
fn build_bricks(bars: &[Bar], size: f64) -> Vec<Brick> {
    let mut bricks = Vec::new();
    let Some(first) = bars.first() else {
        return bricks;
    };
    let mut boundary = (first.close / size).floor() * size;

    for bar in bars {
        let price = bar.close;

        while price >= boundary + size {
            let next = boundary + size;
            if next <= boundary {
                break;
            }
            boundary = next;
            log::trace!("renko: up brick at {boundary}");
            bricks.push(Brick {
                kind: BrickKind::Up,
                price: boundary,
                date: bar.date,
            });
        }

        while price <= boundary - size {
            let next = boundary - size;
            if next >= boundary {
                break;
            }
            boundary = next;
            log::trace!("renko: down brick at {boundary}");
            bricks.push(Brick {
                kind: BrickKind::Down,
                price: boundary,
                date: bar.date,
            });
        }
    }

    bricks
}

fn classify(bricks: &[Brick]) -> Trend {
    if bricks.is_empty() {
        return Trend::Neutral;
    }
    match count_recent(bricks, RENKO_TREND_WINDOW, |b| b.kind == BrickKind::Up) {
        up if up >= 4 => Trend::Bullish,
        up if up <= 1 => Trend::Bearish,
        _ => Trend::Neutral,
    }
}

impl ChartTransform for Renko {
    type Output = RenkoChart;

    fn name(&self) -> &'static str {
        "renko"
    }

    fn min_bars(&self) -> usize {
        5
    }

    fn validate_config(&self) -> Result<()> {
        match self.brick_size {
            Some(size) if !size.is_finite() || size <= 0.0 => Err(AnalysisError::InvalidConfig(
                format!("brick_size must be positive, got {size}"),
            )),
            _ => Ok(()),
        }
    }

    fn transform(&self, bars: &[Bar]) -> RenkoChart {
        if bars.len() < self.min_bars() {
            return RenkoChart::default();
        }

        let brick_size = self.resolve_brick_size(bars);
        let bricks = build_bricks(bars, brick_size);
        let trend = classify(&bricks);

        RenkoChart {
            bricks,
            trend,
            brick_size,
        }
    }
}

impl DerivedSeries for RenkoChart {
    fn trend(&self) -> Trend {
        self.trend
    }

    fn len(&self) -> usize {
        self.bricks.len()
    }
}
