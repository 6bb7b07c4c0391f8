//! Volume-flow measures: On-Balance Volume and Volume-Price Trend.

use crate::OHLCV;

/// Minimum history for [`analyze_volume`].
pub const VOLUME_MIN_BARS: usize = 10;
/// Bars over which OBV/VPT deltas are read for trend.
pub const FLOW_LOOKBACK: usize = 10;
pub const AVG_VOLUME_PERIOD: usize = 20;
/// Last volume above `factor * average` counts as a spike.
pub const SPIKE_FACTOR: f64 = 1.5;
/// Bars back for the price leg of price/volume confirmation.
pub const CONFIRMATION_LOOKBACK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowTrend {
    Accumulation,
    Distribution,
    Neutral,
}

impl FlowTrend {
    fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            FlowTrend::Accumulation
        } else if delta < 0.0 {
            FlowTrend::Distribution
        } else {
            FlowTrend::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    /// Price and volume moved the same way
    Confirmed,
    Divergence,
}

fn obv_step<T: OHLCV>(prev: &T, curr: &T) -> f64 {
    if curr.close() > prev.close() {
        curr.volume()
    } else if curr.close() < prev.close() {
        -curr.volume()
    } else {
        0.0
    }
}

fn vpt_step<T: OHLCV>(prev: &T, curr: &T) -> f64 {
    if prev.close() == 0.0 {
        return 0.0;
    }
    (curr.close() - prev.close()) / prev.close() * curr.volume()
}

/// On-Balance Volume: full volume added on up closes, subtracted on down closes.
pub fn obv<T: OHLCV>(bars: &[T]) -> f64 {
    bars.windows(2).map(|w| obv_step(&w[0], &w[1])).sum()
}

/// Volume-Price Trend: fractional close change times volume, accumulated.
pub fn vpt<T: OHLCV>(bars: &[T]) -> f64 {
    bars.windows(2).map(|w| vpt_step(&w[0], &w[1])).sum()
}

fn recent<T>(bars: &[T], n: usize) -> &[T] {
    &bars[bars.len() - n.min(bars.len())..]
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VolumeAnalysis {
    pub obv: f64,
    pub obv_trend: FlowTrend,
    pub vpt: f64,
    pub vpt_trend: FlowTrend,
    pub avg_volume: f64,
    pub last_volume: f64,
    pub volume_spike: bool,
    pub confirmation: Confirmation,
}

impl VolumeAnalysis {
    pub fn interpretation(&self) -> String {
        if self.volume_spike {
            let detail = match self.confirmation {
                Confirmation::Confirmed => "Price move is confirmed by volume.",
                Confirmation::Divergence => {
                    "Warning: Price-volume divergence may indicate weak move."
                }
            };
            return format!("Volume spike detected! {detail}");
        }
        let side = if self.last_volume > self.avg_volume { "above" } else { "below" };
        let flow = match self.obv_trend {
            FlowTrend::Accumulation => "OBV shows accumulation (bullish).",
            FlowTrend::Distribution => "OBV shows distribution (bearish).",
            FlowTrend::Neutral => "Volume neutral.",
        };
        format!("Volume is {side} average. {flow}")
    }
}

/// Volume read over the full series; `None` with fewer than [`VOLUME_MIN_BARS`] bars.
pub fn analyze_volume<T: OHLCV>(bars: &[T]) -> Option<VolumeAnalysis> {
    if bars.len() < VOLUME_MIN_BARS {
        return None;
    }
    let flow = recent(bars, FLOW_LOOKBACK);
    let obv_delta: f64 = flow.windows(2).map(|w| obv_step(&w[0], &w[1])).sum();
    let vpt_delta: f64 = flow.windows(2).map(|w| vpt_step(&w[0], &w[1])).sum();

    let volume_window = recent(bars, AVG_VOLUME_PERIOD);
    let avg_volume =
        volume_window.iter().map(|b| b.volume()).sum::<f64>() / volume_window.len() as f64;

    let last = &bars[bars.len() - 1];
    let last_volume = last.volume();
    let price_up = last.close() > bars[bars.len() - CONFIRMATION_LOOKBACK].close();
    let volume_up = last_volume > avg_volume;

    Some(VolumeAnalysis {
        obv: obv(bars),
        obv_trend: FlowTrend::from_delta(obv_delta),
        vpt: vpt(bars),
        vpt_trend: FlowTrend::from_delta(vpt_delta),
        avg_volume,
        last_volume,
        volume_spike: last_volume > avg_volume * SPIKE_FACTOR,
        confirmation: if price_up == volume_up {
            Confirmation::Confirmed
        } else {
            Confirmation::Divergence
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct TestBar {
        c: f64,
        v: f64,
    }

    impl OHLCV for TestBar {
        fn open(&self) -> f64 {
            self.c
        }

        fn high(&self) -> f64 {
            self.c
        }

        fn low(&self) -> f64 {
            self.c
        }

        fn close(&self) -> f64 {
            self.c
        }

        fn volume(&self) -> f64 {
            self.v
        }
    }

    fn bars(points: &[(f64, f64)]) -> Vec<TestBar> {
        points.iter().map(|&(c, v)| TestBar { c, v }).collect()
    }

    #[test]
    fn test_obv_adds_and_subtracts() {
        let data = bars(&[(10.0, 100.0), (11.0, 200.0), (10.5, 50.0), (10.5, 999.0)]);
        assert_eq!(obv(&data), 150.0);
    }

    #[test]
    fn test_vpt_accumulates_percent_change() {
        let data = bars(&[(10.0, 100.0), (11.0, 200.0), (9.9, 100.0)]);
        // +10% * 200 - 10% * 100
        assert!((vpt(&data) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_is_none() {
        let data = bars(&[(10.0, 100.0); 9]);
        assert!(analyze_volume(&data).is_none());
    }

    #[test]
    fn test_accumulation_with_spike() {
        let mut points: Vec<(f64, f64)> = (0..14).map(|i| (100.0 + i as f64, 1000.0)).collect();
        points.push((120.0, 5000.0));
        let analysis = analyze_volume(&bars(&points)).unwrap();

        assert_eq!(analysis.obv_trend, FlowTrend::Accumulation);
        assert_eq!(analysis.vpt_trend, FlowTrend::Accumulation);
        assert!(analysis.volume_spike);
        assert_eq!(analysis.confirmation, Confirmation::Confirmed);
        assert!(analysis.interpretation().starts_with("Volume spike detected!"));
    }

    #[test]
    fn test_distribution_without_spike() {
        let points: Vec<(f64, f64)> = (0..12).map(|i| (100.0 - i as f64, 1000.0)).collect();
        let analysis = analyze_volume(&bars(&points)).unwrap();

        assert_eq!(analysis.obv_trend, FlowTrend::Distribution);
        assert!(!analysis.volume_spike);
        // price down, volume not above average
        assert_eq!(analysis.confirmation, Confirmation::Confirmed);
        assert!(analysis.interpretation().contains("distribution"));
    }
}
