//! Kagi reversal lines

use super::{count_recent, ChartTransform, DerivedSeries};
use crate::{AnalysisError, Bar, Result, Trend};
use chrono::NaiveDate;
use serde::Serialize;

/// Trailing lines inspected for the trend.
pub const KAGI_TREND_WINDOW: usize = 3;

/// Line thickness: yang (thick) marks demand, yin (thin) marks supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Thickness {
    Yang,
    Yin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KagiLine {
    pub kind: Thickness,
    /// Pivot price the reversal started from
    pub start_price: f64,
    /// Close that triggered the reversal
    pub end_price: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KagiChart {
    pub lines: Vec<KagiLine>,
    pub trend: Trend,
    pub reversal_percent: f64,
}

/// Kagi transform with a percentage reversal threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kagi {
    pub reversal_percent: f64,
}

impl Default for Kagi {
    fn default() -> Self {
        Self {
            reversal_percent: 4.0,
        }
    }
}

impl Kagi {
    pub fn new(reversal_percent: f64) -> Result<Self> {
        let kagi = Self { reversal_percent };
        kagi.validate_config()?;
        Ok(kagi)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Swing {
    Up,
    Down,
}

/// Walk closes keeping one pivot; a line closes when price moves against the
/// swing by `reversal_percent` of the pivot.
fn build_lines(bars: &[Bar], reversal_percent: f64) -> Vec<KagiLine> {
    let mut lines = Vec::new();
    let (first, second) = match bars {
        [first, second, ..] => (first, second),
        _ => return lines,
    };

    let mut swing = if second.close > first.close {
        Swing::Up
    } else {
        Swing::Down
    };
    let mut pivot = first.close;
    let mut last_high = first.high;
    let mut last_low = first.low;
    let mut thickness = match swing {
        Swing::Up => Thickness::Yang,
        Swing::Down => Thickness::Yin,
    };

    for bar in &bars[1..] {
        let price = bar.close;
        let threshold = pivot * reversal_percent / 100.0;

        match swing {
            Swing::Up if price > pivot => {
                pivot = price;
                if price > last_high {
                    thickness = Thickness::Yang;
                    last_high = price;
                }
            }
            Swing::Up if price <= pivot - threshold => {
                lines.push(KagiLine {
                    kind: thickness,
                    start_price: pivot,
                    end_price: price,
                    date: bar.date,
                });
                log::trace!("kagi: reversal down {pivot} -> {price}");
                swing = Swing::Down;
                pivot = price;
                if price < last_low {
                    thickness = Thickness::Yin;
                    last_low = price;
                }
            }
            Swing::Down if price < pivot => {
                pivot = price;
                if price < last_low {
                    thickness = Thickness::Yin;
                    last_low = price;
                }
            }
            Swing::Down if price >= pivot + threshold => {
                lines.push(KagiLine {
                    kind: thickness,
                    start_price: pivot,
                    end_price: price,
                    date: bar.date,
                });
                log::trace!("kagi: reversal up {pivot} -> {price}");
                swing = Swing::Up;
                pivot = price;
                if price > last_high {
                    thickness = Thickness::Yang;
                    last_high = price;
                }
            }
            _ => {}
        }
    }

    lines
}

fn classify(lines: &[KagiLine]) -> Trend {
    if lines.is_empty() {
        return Trend::Neutral;
    }
    match count_recent(lines, KAGI_TREND_WINDOW, |l| l.kind == Thickness::Yang) {
        yang if yang >= 2 => Trend::Bullish,
        0 => Trend::Bearish,
        _ => Trend::Neutral,
    }
}

impl ChartTransform for Kagi {
    type Output = KagiChart;

    fn name(&self) -> &'static str {
        "kagi"
    }

    fn min_bars(&self) -> usize {
        5
    }

    fn validate_config(&self) -> Result<()> {
        let pct = self.reversal_percent;
        if !pct.is_finite() || pct <= 0.0 || pct > 100.0 {
            return Err(AnalysisError::OutOfRange {
                field: "reversal_percent",
                value: pct,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(())
    }

    fn transform(&self, bars: &[Bar]) -> KagiChart {
        if bars.len() < self.min_bars() {
            return KagiChart {
                reversal_percent: self.reversal_percent,
                ..KagiChart::default()
            };
        }

        let lines = build_lines(bars, self.reversal_percent);
        let trend = classify(&lines);

        KagiChart {
            lines,
            trend,
            reversal_percent: self.reversal_percent,
        }
    }
}

impl DerivedSeries for KagiChart {
    fn trend(&self) -> Trend {
        self.trend
    }

    fn len(&self) -> usize {
        self.lines.len()
    }
}
