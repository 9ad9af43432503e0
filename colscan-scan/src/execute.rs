//! Running a filter plan and computing the four price statistics.
//!
//! A shared scan filters one copy of the store and computes every statistic
//! from it. A normal scan filters a fresh copy per statistic. Both produce the
//! same numbers; the split exists to measure the cost of repeated filtering.

use std::fmt;
use std::str::FromStr;

use colscan_aggregate::{CategoryValue, StatCategory, Statistics};
use colscan_column_map::ColumnStore;
use colscan_perf_monitor::{log_if_slow, measure};
use colscan_result::{Error, Result};

use crate::config::{FLOOR_AREA_COLUMN, PRICE_COLUMN};
use crate::plan::FilterPlan;

/// How the statistics are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Filter once, compute every statistic from the result.
    #[default]
    Shared,
    /// Filter a separate clone per statistic.
    Normal,
}

impl ScanMode {
    pub fn from_shared_flag(shared: bool) -> Self {
        if shared {
            ScanMode::Shared
        } else {
            ScanMode::Normal
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanMode::Shared => "shared",
            ScanMode::Normal => "normal",
        })
    }
}

impl FromStr for ScanMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(ScanMode::Shared),
            "normal" => Ok(ScanMode::Normal),
            other => Err(Error::InvalidArgumentError(format!(
                "unknown scan mode '{other}'"
            ))),
        }
    }
}

/// Result of a scan.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    /// One value per category, in [`StatCategory::ALL`] order.
    Computed(Vec<CategoryValue>),
    /// A required projection came back empty.
    NoResult,
}

impl ScanOutcome {
    pub fn is_no_result(&self) -> bool {
        matches!(self, ScanOutcome::NoResult)
    }

    pub fn values(&self) -> &[CategoryValue] {
        match self {
            ScanOutcome::Computed(values) => values,
            ScanOutcome::NoResult => &[],
        }
    }

    pub fn get(&self, category: StatCategory) -> Option<f64> {
        self.values()
            .iter()
            .find(|v| v.category == category)
            .map(|v| v.value)
    }
}

/// Filter one clone of `base` and compute all statistics from it.
pub fn shared_scan(base: &ColumnStore, plan: &FilterPlan) -> Result<ScanOutcome> {
    let mut store = base.clone();
    let (applied, filter_time) = measure!("shared_scan.filter", plan.apply(&mut store));
    applied?;

    let prices = store.get_numeric_values(PRICE_COLUMN)?;
    let areas = store.get_numeric_values(FLOOR_AREA_COLUMN)?;
    if prices.is_empty() || areas.is_empty() {
        tracing::info!(target: "colscan::scan", mode = "shared", "no rows matched");
        return Ok(ScanOutcome::NoResult);
    }

    let (values, stats_time) = measure!(
        "shared_scan.aggregate",
        Statistics::compute_all(&prices, &areas)
    );
    log_if_slow(
        "shared_scan",
        &[("filter", filter_time), ("aggregate", stats_time)],
    );
    tracing::info!(
        target: "colscan::scan",
        mode = "shared",
        rows = prices.len(),
        "scan complete"
    );
    Ok(ScanOutcome::Computed(values))
}

/// Filter a fresh clone of `base` for every statistic.
pub fn normal_scan(base: &ColumnStore, plan: &FilterPlan) -> Result<ScanOutcome> {
    let mut values = Vec::with_capacity(StatCategory::ALL.len());
    for category in StatCategory::ALL {
        let mut store = base.clone();
        let (applied, filter_time) = measure!("normal_scan.filter", plan.apply(&mut store));
        applied?;

        let prices = store.get_numeric_values(PRICE_COLUMN)?;
        if prices.is_empty() {
            tracing::info!(
                target: "colscan::scan",
                mode = "normal",
                %category,
                "no rows matched"
            );
            return Ok(ScanOutcome::NoResult);
        }
        let areas = if category.needs_area() {
            store.get_numeric_values(FLOOR_AREA_COLUMN)?
        } else {
            Vec::new()
        };

        let (value, stats_time) = measure!(category.compute(&prices, &areas));
        log_if_slow(
            category.label(),
            &[("filter", filter_time), ("aggregate", stats_time)],
        );
        values.push(CategoryValue { category, value });
    }
    tracing::info!(target: "colscan::scan", mode = "normal", "scan complete");
    Ok(ScanOutcome::Computed(values))
}

pub fn run_scan(mode: ScanMode, base: &ColumnStore, plan: &FilterPlan) -> Result<ScanOutcome> {
    tracing::debug!(target: "colscan::scan", %mode, plan = %plan, "running scan");
    match mode {
        ScanMode::Shared => shared_scan(base, plan),
        ScanMode::Normal => normal_scan(base, plan),
    }
}
