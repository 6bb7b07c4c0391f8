//! Integration tests for the analysis dispatcher and its engines.

use chartwise::indicators::{fibonacci_levels, FIB_RATIOS};
use chartwise::prelude::*;
use chrono::{Days, NaiveDate};

fn day(n: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n as u64)
}

/// Closes rising 1% a bar with a tight range around each close
fn make_rising(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 * 1.01_f64.powi(i as i32);
            Bar::new(day(i), close * 0.995, close * 1.005, close * 0.99, close, 10_000).unwrap()
        })
        .collect()
}

/// Every price equal
fn make_flat(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| Bar::new(day(i), 42.0, 42.0, 42.0, 42.0, 5_000).unwrap())
        .collect()
}

/// Deterministic zig-zag around a slow drift
fn make_choppy(n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + t * 0.2 + (t * 0.7).sin() * 4.0;
            let open = close - (t * 1.3).cos();
            let high = open.max(close) + 0.8;
            let low = open.min(close) - 0.8;
            Bar::new(day(i), open, high, low, close, 1_000 + (i as u64 * 37) % 500).unwrap()
        })
        .collect()
}

// ============================================================
// SCENARIOS
// ============================================================

#[test]
fn test_rising_series_moving_average() {
    let bars = make_rising(60);
    let verdict = analyze(&bars, "moving-average");

    assert_eq!(verdict.signal, Signal::Buy);
    assert_eq!(verdict.confidence, 65);
    assert!(verdict.interpretation.contains("Uptrend intact"));
    assert_eq!(verdict.timestamp, Some(day(59)));
}

#[test]
fn test_flat_series_dojis() {
    let bars = make_flat(10);
    let analysis = CandlestickScanner::default().analyze(&bars);

    assert_eq!(analysis.findings.len(), bars.len());
    for (i, finding) in analysis.findings.iter().enumerate() {
        assert_eq!(finding.name, "Doji");
        assert_eq!(finding.confidence, 75);
        assert_eq!(finding.start_index, i);
    }
    assert_eq!(analysis.signal, Direction::Neutral);

    let verdict = analyze(&bars, "candlestick");
    assert_eq!(verdict.signal, Signal::Hold);
}

#[test]
fn test_fibonacci_levels() {
    let levels = fibonacci_levels(100.0, 50.0);

    assert_eq!(levels.len(), FIB_RATIOS.len());
    assert_eq!(levels[0].price, 50.0);
    assert_eq!(levels[3].price, 75.0);
    assert_eq!(levels[6].price, 100.0);
}

// ============================================================
// DISPATCHER PROPERTIES
// ============================================================

#[test]
fn test_dispatch_is_deterministic() {
    let bars = make_choppy(80);
    let analyzer = Analyzer::default();

    for method in Method::ALL {
        let first = analyzer.analyze(&bars, method);
        let second = analyzer.analyze(&bars, method);
        assert_eq!(first, second, "{method}");
    }
    assert_eq!(analyzer.analyze_all(&bars), analyzer.analyze_all(&bars));
}

#[test]
fn test_single_bar_never_panics() {
    let bars = make_rising(1);

    for method in Method::ALL {
        let verdict = analyze(&bars, method.as_str());
        assert_eq!(verdict.signal, Signal::Hold, "{method}");
        assert!(verdict.confidence <= 100);
    }
}

#[test]
fn test_unknown_method_id() {
    let verdict = analyze(&make_rising(30), "tarot");
    assert_eq!(verdict.signal, Signal::Hold);
    assert_eq!(verdict.confidence, 50);
    assert_eq!(verdict.interpretation, "Unknown analysis method selected.");
}

#[test]
fn test_confidence_in_range_on_long_series() {
    let bars = make_choppy(250);
    for verdict in Analyzer::default().analyze_all(&bars) {
        assert!(verdict.confidence <= 100, "{}", verdict.method);
        assert!(!verdict.interpretation.is_empty(), "{}", verdict.method);
    }
}

#[test]
fn test_levels_only_from_level_methods() {
    let bars = make_choppy(60);
    for verdict in Analyzer::default().analyze_all(&bars) {
        let has_levels = !verdict.support_levels.is_empty() || !verdict.resistance_levels.is_empty();
        let produces_levels = verdict.method == "moving-average" || verdict.method == "fibonacci";
        assert!(!has_levels || produces_levels, "{}", verdict.method);
    }
}

// ============================================================
// TRANSFORMS
// ============================================================

#[test]
fn test_transforms_over_rising_series() {
    let bars = make_rising(60);

    let ha = HeikinAshi.transform(&bars);
    assert_eq!(ha.candles.len(), bars.len());
    assert!(ha.trend.is_bullish());

    let renko = Renko::default().transform(&bars);
    assert!(!renko.bricks.is_empty());
    assert_eq!(renko.trend, Trend::Bullish);

    let pf = PointFigure::default().transform(&bars);
    assert_eq!(pf.columns.len(), 1);
}

#[test]
fn test_builtin_transform_matches_direct_call() {
    let bars = make_choppy(100);
    let direct = Kagi::default().transform(&bars);

    match BuiltinTransform::Kagi(Kagi::default()).apply(&bars) {
        DerivedChart::Kagi(chart) => assert_eq!(chart, direct),
        other => panic!("unexpected chart {other:?}"),
    }
}

// ============================================================
// BATCH
// ============================================================

#[test]
fn test_analyze_parallel_reports_bad_series() {
    let good = make_choppy(40);
    let mut bad = make_choppy(40);
    bad[7].low = bad[7].high + 1.0;

    let instruments = vec![("GOOD", good.as_slice()), ("BAD", bad.as_slice())];
    let (reports, errors) =
        analyze_parallel(&Analyzer::default(), instruments, &[Method::Renko, Method::Oscillator]);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].symbol, "GOOD");
    assert_eq!(reports[0].verdicts.len(), 2);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].symbol, "BAD");
    assert!(matches!(errors[0].error, AnalysisError::InvalidBar { index: 7, .. }));
}

// ============================================================
// SERIALIZATION
// ============================================================

#[test]
fn test_verdict_serializes() {
    let verdict = analyze(&make_flat(12), "candlestick");
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["method"], "candlestick");
    assert_eq!(json["signal"], "Hold");
    assert_eq!(json["timestamp"], "2024-01-12");
    assert_eq!(json["findings"][0]["name"], "Doji");
    assert_eq!(json["findings"][0]["direction"], "neutral");
}

#[test]
fn test_signal_labels() {
    let json = serde_json::to_string(&[Signal::StrongBuy, Signal::Sell]).unwrap();
    assert_eq!(json, r#"["Strong Buy","Sell"]"#);
}

#[test]
fn test_bars_round_trip_json() {
    let bars = make_choppy(5);
    let json = serde_json::to_string(&bars).unwrap();
    let back: Vec<Bar> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, bars);
}
