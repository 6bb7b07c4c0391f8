//! Point & Figure columns

use super::{ChartTransform, DerivedSeries};
use crate::{AnalysisError, Bar, Result, Trend};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Rising boxes
    X,
    /// Falling boxes
    O,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub kind: ColumnKind,
    pub start_price: f64,
    pub end_price: f64,
    /// Whole boxes between start and end
    pub count: u32,
}

/// Breakout read off the last three columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Breakout {
    DoubleTopBreakout,
    DoubleBottomBreakdown,
}

impl Breakout {
    pub fn label(self) -> &'static str {
        match self {
            Breakout::DoubleTopBreakout => "Double Top Breakout (Bullish)",
            Breakout::DoubleBottomBreakdown => "Double Bottom Breakdown (Bearish)",
        }
    }

    pub fn direction(self) -> Trend {
        match self {
            Breakout::DoubleTopBreakout => Trend::Bullish,
            Breakout::DoubleBottomBreakdown => Trend::Bearish,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFigureChart {
    pub columns: Vec<Column>,
    pub box_size: f64,
    pub reversal_amount: u32,
    pub breakouts: Vec<Breakout>,
    pub trend: Trend,
}

/// Point & Figure transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointFigure {
    pub box_size: f64,
    /// Boxes against the column needed to reverse
    pub reversal_amount: u32,
}

impl Default for PointFigure {
    fn default() -> Self {
        Self {
            box_size: 0.5,
            reversal_amount: 3,
        }
    }
}

impl PointFigure {
    pub fn new(box_size: f64, reversal_amount: u32) -> Result<Self> {
        let pf = Self {
            box_size,
            reversal_amount,
        };
        pf.validate_config()?;
        Ok(pf)
    }

    fn empty(&self) -> PointFigureChart {
        PointFigureChart {
            columns: Vec::new(),
            box_size: self.box_size,
            reversal_amount: self.reversal_amount,
            breakouts: Vec::new(),
            trend: Trend::Neutral,
        }
    }
}

fn box_count(from: f64, to: f64, box_size: f64) -> u32 {
    ((to - from).abs() / box_size + 1e-9).floor() as u32
}

fn build_columns(bars: &[Bar], box_size: f64, reversal_amount: u32) -> Vec<Column> {
    let mut columns = Vec::new();
    let (first, second) = match bars {
        [first, second, ..] => (first, second),
        _ => return columns,
    };

    let snap = |price: f64| (price / box_size).floor() * box_size;
    let reversal = box_size * reversal_amount as f64;

    let mut kind = if second.close > first.close {
        ColumnKind::X
    } else {
        ColumnKind::O
    };
    let mut start = snap(first.close);
    let mut end = start;

    for bar in &bars[1..] {
        let level = snap(bar.close);

        match kind {
            ColumnKind::X if level >= end + box_size => end = level,
            ColumnKind::X if level <= end - reversal => {
                columns.push(Column {
                    kind,
                    start_price: start,
                    end_price: end,
                    count: box_count(start, end, box_size),
                });
                log::trace!("point-figure: X column closed at {end}");
                kind = ColumnKind::O;
                start = end - box_size;
                end = level;
            }
            ColumnKind::O if level <= end - box_size => end = level,
            ColumnKind::O if level >= end + reversal => {
                columns.push(Column {
                    kind,
                    start_price: start,
                    end_price: end,
                    count: box_count(start, end, box_size),
                });
                log::trace!("point-figure: O column closed at {end}");
                kind = ColumnKind::X;
                start = end + box_size;
                end = level;
            }
            _ => {}
        }
    }

    // Open column
    columns.push(Column {
        kind,
        start_price: start,
        end_price: end,
        count: box_count(start, end, box_size),
    });

    columns
}

fn find_breakouts(columns: &[Column]) -> Vec<Breakout> {
    let [first, _, last] = match columns {
        [.., a, b, c] => [a, b, c],
        _ => return Vec::new(),
    };

    let mut breakouts = Vec::new();
    if last.kind == ColumnKind::X && last.end_price > first.end_price {
        breakouts.push(Breakout::DoubleTopBreakout);
    }
    if last.kind == ColumnKind::O && last.end_price < first.end_price {
        breakouts.push(Breakout::DoubleBottomBreakdown);
    }
    breakouts
}

impl ChartTransform for PointFigure {
    type Output = PointFigureChart;

    fn name(&self) -> &'static str {
        "point-figure"
    }

    fn min_bars(&self) -> usize {
        5
    }

    fn validate_config(&self) -> Result<()> {
        if !self.box_size.is_finite() || self.box_size <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "box_size must be positive, got {}",
                self.box_size
            )));
        }
        if self.reversal_amount == 0 {
            return Err(AnalysisError::InvalidValue("reversal_amount must be >= 1"));
        }
        Ok(())
    }

    fn transform(&self, bars: &[Bar]) -> PointFigureChart {
        if bars.len() < self.min_bars() {
            return self.empty();
        }

        let columns = build_columns(bars, self.box_size, self.reversal_amount);
        let breakouts = find_breakouts(&columns);
        let trend = breakouts
            .first()
            .map_or(Trend::Neutral, |b| b.direction());

        PointFigureChart {
            columns,
            box_size: self.box_size,
            reversal_amount: self.reversal_amount,
            breakouts,
            trend,
        }
    }
}

impl DerivedSeries for PointFigureChart {
    fn trend(&self) -> Trend {
        self.trend
    }

    fn len(&self) -> usize {
        self.columns.len()
    }
}
