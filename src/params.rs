//! Parameter metadata for chart transforms
//!
//! Describes the tunable sizes and thresholds of each transform so callers
//! can build configuration forms, sweep a grid, or construct a transform from
//! loosely typed key/value input.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use chartwise::params::ParameterizedTransform;
//! use chartwise::prelude::*;
//!
//! for param in Kagi::param_meta() {
//!   println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! let pf = PointFigure::with_params(&HashMap::from([("box_size", 1.0)])).unwrap();
//! assert_eq!(pf.box_size, 1.0);
//! assert_eq!(pf.reversal_amount, 3);
//! ```

use std::collections::HashMap;

use crate::transforms::{Kagi, PointFigure, Renko};
use crate::{AnalysisError, Period, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Absolute price distance (non-negative)
  Price,
  /// Percentage of price
  Percent,
  /// Whole number of boxes/bricks
  Count,
  /// Lookback in bars (positive integer)
  Period,
}

/// Metadata for a single transform parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "box_size")
  pub name: &'static str,
  pub param_type: ParamType,
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn price(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Price, default, range, description }
  }

  pub const fn percent(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Percent, default, range, description }
  }

  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    if step <= 0.0 {
      return vec![min];
    }
    let steps = ((max - min) / step + 1e-9).floor() as usize;
    (0..=steps).map(|i| min + step * i as f64).collect()
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if !value.is_finite() {
      return Err(AnalysisError::InvalidValue("parameter must be finite"));
    }
    if value < min || value > max {
      return Err(AnalysisError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Price | ParamType::Percent => Ok(()),
      ParamType::Count | ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(AnalysisError::InvalidValue("count/period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED TRANSFORM TRAIT
// ============================================================

/// Transforms constructible from named numeric parameters
pub trait ParameterizedTransform: Sized {
  /// Metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Build from a parameter map.
  ///
  /// Missing parameters use their default values; unknown keys are rejected.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  fn transform_name() -> &'static str;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Reject keys no parameter in `metas` answers to.
pub fn check_keys(metas: &[ParamMeta], params: &HashMap<&str, f64>) -> Result<()> {
  match params.keys().copied().find(|k| !metas.iter().any(|m| m.name == *k)) {
    Some(key) => Err(AnalysisError::InvalidConfig(format!("unknown parameter `{key}`"))),
    None => Ok(()),
  }
}

/// Value for `name` (or its default), validated against its metadata
pub fn get_param(metas: &[ParamMeta], params: &HashMap<&str, f64>, name: &str) -> Result<f64> {
  let meta = metas
    .iter()
    .find(|m| m.name == name)
    .ok_or_else(|| AnalysisError::InvalidConfig(format!("no metadata for `{name}`")))?;
  let value = params.get(name).copied().unwrap_or(meta.default);
  meta.validate(value)?;
  Ok(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(metas: &[ParamMeta], params: &HashMap<&str, f64>, name: &str) -> Result<Period> {
  Period::new(get_param(metas, params, name)? as usize)
}

// ============================================================
// TRANSFORM PARAMETERS
// ============================================================

static RENKO_PARAMS: [ParamMeta; 2] = [
  ParamMeta::price("brick_size", 0.0, (0.0, 1000.0, 0.25), "Brick height; 0 sizes bricks from the mean bar range"),
  ParamMeta::period("range_period", 20.0, (5.0, 50.0, 5.0), "Bars averaged for the automatic brick size"),
];

static KAGI_PARAMS: [ParamMeta; 1] = [ParamMeta::percent(
  "reversal_percent",
  4.0,
  (0.5, 20.0, 0.5),
  "Move against the line, in percent of the pivot, that starts a new line",
)];

static POINT_FIGURE_PARAMS: [ParamMeta; 2] = [
  ParamMeta::price("box_size", 0.5, (0.01, 1000.0, 0.25), "Price height of one box"),
  ParamMeta::count("reversal_amount", 3.0, (1.0, 5.0, 1.0), "Boxes against the column needed to reverse"),
];

impl ParameterizedTransform for Renko {
  fn param_meta() -> &'static [ParamMeta] {
    &RENKO_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    check_keys(&RENKO_PARAMS, params)?;
    let brick_size = get_param(&RENKO_PARAMS, params, "brick_size")?;
    Ok(Self {
      brick_size: (brick_size > 0.0).then_some(brick_size),
      range_period: get_period(&RENKO_PARAMS, params, "range_period")?,
    })
  }

  fn transform_name() -> &'static str {
    "renko"
  }
}

impl ParameterizedTransform for Kagi {
  fn param_meta() -> &'static [ParamMeta] {
    &KAGI_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    check_keys(&KAGI_PARAMS, params)?;
    Kagi::new(get_param(&KAGI_PARAMS, params, "reversal_percent")?)
  }

  fn transform_name() -> &'static str {
    "kagi"
  }
}

impl ParameterizedTransform for PointFigure {
  fn param_meta() -> &'static [ParamMeta] {
    &POINT_FIGURE_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    check_keys(&POINT_FIGURE_PARAMS, params)?;
    PointFigure::new(
      get_param(&POINT_FIGURE_PARAMS, params, "box_size")?,
      get_param(&POINT_FIGURE_PARAMS, params, "reversal_amount")? as u32,
    )
  }

  fn transform_name() -> &'static str {
    "point-figure"
  }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_meta_constructors() {
    let meta = ParamMeta::percent("pct", 4.0, (1.0, 10.0, 1.0), "Test percent");
    assert_eq!(meta.name, "pct");
    assert_eq!(meta.param_type, ParamType::Percent);
    assert_eq!(meta.default, 4.0);

    let meta = ParamMeta::count("boxes", 3.0, (1.0, 5.0, 1.0), "Test count");
    assert_eq!(meta.param_type, ParamType::Count);
  }

  #[test]
  fn test_generate_grid() {
    let meta = ParamMeta::price("test", 0.5, (0.25, 1.0, 0.25), "Test");

    let grid = meta.generate_grid();
    assert_eq!(grid, vec![0.25, 0.5, 0.75, 1.0]);
  }

  #[test]
  fn test_validate_count() {
    let meta = ParamMeta::count("test", 3.0, (1.0, 5.0, 1.0), "Test");

    assert!(meta.validate(3.0).is_ok());
    assert!(meta.validate(2.5).is_err());
    assert!(meta.validate(6.0).is_err());
    assert!(meta.validate(f64::NAN).is_err());
  }

  #[test]
  fn test_defaults_match_default_impls() {
    let empty = HashMap::new();
    assert_eq!(Renko::with_params(&empty).unwrap(), Renko::default());
    assert_eq!(Kagi::with_params(&empty).unwrap(), Kagi::default());
    assert_eq!(PointFigure::with_params(&empty).unwrap(), PointFigure::default());
  }

  #[test]
  fn test_renko_fixed_brick() {
    let renko = Renko::with_params(&HashMap::from([("brick_size", 2.5)])).unwrap();
    assert_eq!(renko.brick_size, Some(2.5));
  }

  #[test]
  fn test_rejects_unknown_and_out_of_range() {
    assert!(Kagi::with_params(&HashMap::from([("reversal", 4.0)])).is_err());
    assert!(Kagi::with_params(&HashMap::from([("reversal_percent", 50.0)])).is_err());
    assert!(PointFigure::with_params(&HashMap::from([("reversal_amount", 0.0)])).is_err());
  }

  #[test]
  fn test_every_grid_value_builds() {
    for meta in PointFigure::param_meta() {
      for value in meta.generate_grid() {
        assert!(
          PointFigure::with_params(&HashMap::from([(meta.name, value)])).is_ok(),
          "{} = {value}",
          meta.name
        );
      }
    }
  }
}
