//! Chart transform engines
//!
//! Each engine walks the bar series once, carrying a single accumulator
//! forward, and produces a derived series plus a coarse [`Trend`].
//!
//! - **Heikin-Ashi**: smoothed candles, one per input bar
//! - **Renko**: fixed-size bricks, time ignored
//! - **Kagi**: reversal-threshold lines with yang/yin thickness
//! - **Point & Figure**: X/O box columns with multi-box reversals
//!
//! Series shorter than an engine's `min_bars()` yield an empty derived series
//! and a neutral trend.

use crate::{Bar, Result, Trend};

pub mod heikin_ashi;
pub mod kagi;
pub mod point_figure;
pub mod renko;

pub use heikin_ashi::*;
pub use kagi::*;
pub use point_figure::*;
pub use renko::*;

/// Output of a chart transform
pub trait DerivedSeries {
    fn trend(&self) -> Trend;
    /// Number of derived elements (candles, bricks, lines or columns)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Common contract: `&[Bar] -> (derived series, trend)`
pub trait ChartTransform: Send + Sync {
    type Output: DerivedSeries;

    fn name(&self) -> &'static str;
    fn min_bars(&self) -> usize;
    fn transform(&self, bars: &[Bar]) -> Self::Output;

    fn validate_config(&self) -> Result<()> {
        Ok(())
    }
}

/// Macro to generate the transform/chart enum pair without boilerplate
macro_rules! define_builtin_transforms {
    (
        $(
            $variant:ident($transform:ty) => $chart:ty
        ),* $(,)?
    ) => {
        /// All builtin transforms - dispatch without trait objects
        #[derive(Debug, Clone)]
        pub enum BuiltinTransform {
            $($variant($transform)),*
        }

        /// Output of a [`BuiltinTransform`]
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        pub enum DerivedChart {
            $($variant($chart)),*
        }

        impl BuiltinTransform {
            #[inline]
            pub fn apply(&self, bars: &[Bar]) -> DerivedChart {
                match self {
                    $(Self::$variant(t) => DerivedChart::$variant(ChartTransform::transform(t, bars))),*
                }
            }

            #[inline]
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(t) => ChartTransform::name(t)),*
                }
            }

            #[inline]
            pub fn min_bars(&self) -> usize {
                match self {
                    $(Self::$variant(t) => ChartTransform::min_bars(t)),*
                }
            }

            pub fn validate_config(&self) -> Result<()> {
                match self {
                    $(Self::$variant(t) => ChartTransform::validate_config(t)),*
                }
            }
        }

        impl DerivedSeries for DerivedChart {
            fn trend(&self) -> Trend {
                match self {
                    $(Self::$variant(c) => DerivedSeries::trend(c)),*
                }
            }

            fn len(&self) -> usize {
                match self {
                    $(Self::$variant(c) => DerivedSeries::len(c)),*
                }
            }
        }
    };
}

define_builtin_transforms! {
    HeikinAshi(HeikinAshi) => HeikinAshiChart,
    Renko(Renko) => RenkoChart,
    Kagi(Kagi) => KagiChart,
    PointFigure(PointFigure) => PointFigureChart,
}

impl BuiltinTransform {
    /// Every transform with its default configuration
    pub fn all_defaults() -> [BuiltinTransform; 4] {
        [
            BuiltinTransform::HeikinAshi(HeikinAshi),
            BuiltinTransform::Renko(Renko::default()),
            BuiltinTransform::Kagi(Kagi::default()),
            BuiltinTransform::PointFigure(PointFigure::default()),
        ]
    }
}

/// Count of `true` predicates over the last `n` items.
pub(crate) fn count_recent<T>(items: &[T], n: usize, pred: impl Fn(&T) -> bool) -> usize {
    items[items.len() - n.min(items.len())..]
        .iter()
        .filter(|item| pred(item))
        .count()
}


#[cfg(test)]
mod tests {
    use super::test_support::bars_from_closes;
    use super::*;

    #[test]
    fn test_all_defaults_validate() {
        for transform in BuiltinTransform::all_defaults() {
            assert!(transform.validate_config().is_ok(), "{}", transform.name());
        }
    }

    #[test]
    fn test_short_series_is_empty_and_neutral() {
        let bars = bars_from_closes(&[100.0]);
        for transform in BuiltinTransform::all_defaults() {
            let chart = transform.apply(&bars);
            assert!(chart.is_empty(), "{}", transform.name());
            assert_eq!(chart.trend(), Trend::Neutral, "{}", transform.name());
        }
    }

    #[test]
    fn test_apply_dispatches_to_matching_chart() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = bars_from_closes(&closes);

        let chart = BuiltinTransform::Renko(Renko::default()).apply(&bars);
        assert!(matches!(chart, DerivedChart::Renko(_)));
        assert_eq!(chart.trend(), Trend::Bullish);

        let chart = BuiltinTransform::HeikinAshi(HeikinAshi).apply(&bars);
        assert_eq!(chart.len(), bars.len());
    }

    #[test]
    fn test_count_recent() {
        let items = [1, 2, 3, 4, 5, 6];
        assert_eq!(count_recent(&items, 3, |&x| x % 2 == 0), 2);
        assert_eq!(count_recent(&items, 100, |&x| x > 0), 6);
    }
}
