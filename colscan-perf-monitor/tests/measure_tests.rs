use std::time::Duration;

use colscan_perf_monitor::{depth, log_if_slow, measure};

#[test]
fn measure_returns_the_expression_value() {
    let (value, elapsed) = measure!("sum", (1..=10).sum::<u32>());
    assert_eq!(value, 55);
    #[cfg(not(feature = "perf-mon"))]
    assert_eq!(elapsed, Duration::ZERO);
    #[cfg(feature = "perf-mon")]
    let _ = elapsed;

    let (value, _) = measure!({
        let mut v = vec![3, 1, 2];
        v.sort();
        v
    });
    assert_eq!(value, vec![1, 2, 3]);
}

#[test]
fn measure_propagates_early_returns() {
    fn parse(input: &str) -> Result<u32, std::num::ParseIntError> {
        let (n, _) = measure!("parse", input.parse::<u32>()?);
        Ok(n * 2)
    }
    assert_eq!(parse("21").unwrap(), 42);
    assert!(parse("x").is_err());
    assert_eq!(depth(), 0);
}

#[cfg(not(feature = "perf-mon"))]
#[test]
fn slow_logging_is_disabled_without_feature() {
    assert!(!log_if_slow("filter", &[("exact", Duration::from_secs(10))]));
}

#[cfg(feature = "perf-mon")]
#[test]
fn slow_logging_reports_parts_over_threshold() {
    assert!(log_if_slow("filter", &[("exact", Duration::from_secs(10))]));
    assert!(!log_if_slow("filter", &[("exact", Duration::ZERO)]));
}
