//! Ordering the per-query filters before they touch a store.
//!
//! A filter on the partition column goes first since it prunes whole
//! partitions without reading a value. The remaining filters run from the
//! lowest estimated cardinality upward; the sort is stable, so filters with
//! equal estimates keep their query order.

use std::fmt;

use colscan_column_map::{ColumnStore, RangeOp};
use colscan_result::Result;

use crate::config::{FLOOR_AREA_COLUMN, MONTH_COLUMN, ScanConfig, TOWN_COLUMN};
use crate::query::QueryParams;

/// One predicate of a plan.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanFilter {
    Equality {
        column: String,
        value: String,
    },
    DateRange {
        column: String,
        start: String,
        end: String,
    },
    Range {
        column: String,
        op: RangeOp,
        threshold: f64,
    },
}

impl ScanFilter {
    pub fn column(&self) -> &str {
        match self {
            ScanFilter::Equality { column, .. }
            | ScanFilter::DateRange { column, .. }
            | ScanFilter::Range { column, .. } => column,
        }
    }

    pub fn apply(&self, store: &mut ColumnStore) -> Result<()> {
        match self {
            ScanFilter::Equality { column, value } => store.filter_by_equality(column, value),
            ScanFilter::DateRange { column, start, end } => {
                store.filter_by_date_range(column, start, end)
            }
            ScanFilter::Range {
                column,
                op,
                threshold,
            } => store.filter_by_range(column, *op, *threshold),
        }
    }
}

impl fmt::Display for ScanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanFilter::Equality { column, value } => write!(f, "{column} = '{value}'"),
            ScanFilter::DateRange { column, start, end } => {
                write!(f, "{column} in [{start}, {end}]")
            }
            ScanFilter::Range {
                column,
                op,
                threshold,
            } => write!(f, "{column} {op} {threshold}"),
        }
    }
}

/// Ordered filters for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterPlan {
    filters: Vec<ScanFilter>,
}

impl FilterPlan {
    /// Town equality, month range and minimum floor area for `params`.
    pub fn for_query(
        params: &QueryParams,
        config: &ScanConfig,
        partition_column: Option<&str>,
    ) -> Self {
        let filters = vec![
            ScanFilter::Equality {
                column: TOWN_COLUMN.to_string(),
                value: params.town.clone(),
            },
            ScanFilter::DateRange {
                column: MONTH_COLUMN.to_string(),
                start: params.start_year_month.clone(),
                end: params.end_year_month.clone(),
            },
            ScanFilter::Range {
                column: FLOOR_AREA_COLUMN.to_string(),
                op: RangeOp::GreaterThanOrEquals,
                threshold: config.area_threshold,
            },
        ];
        Self::ordered(filters, config, partition_column)
    }

    /// Order arbitrary filters the same way [`for_query`](Self::for_query) does.
    pub fn ordered(
        mut filters: Vec<ScanFilter>,
        config: &ScanConfig,
        partition_column: Option<&str>,
    ) -> Self {
        let mut head = Vec::new();
        if let Some(partition) = partition_column
            && let Some(pos) = filters.iter().position(|f| f.column() == partition)
        {
            head.push(filters.remove(pos));
        }
        filters.sort_by_key(|f| config.cardinality_of(f.column()));
        head.extend(filters);
        Self { filters: head }
    }

    pub fn filters(&self) -> &[ScanFilter] {
        &self.filters
    }

    /// Apply every filter to `store`, in plan order.
    pub fn apply(&self, store: &mut ColumnStore) -> Result<()> {
        for filter in &self.filters {
            filter.apply(store)?;
            tracing::trace!(
                target: "colscan::scan",
                filter = %filter,
                remaining = store.len(),
                "applied filter"
            );
        }
        Ok(())
    }
}

impl fmt::Display for FilterPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> QueryParams {
        QueryParams {
            town: "BEDOK".into(),
            start_year_month: "2021-01".into(),
            end_year_month: "2021-02".into(),
        }
    }

    fn columns(plan: &FilterPlan) -> Vec<&str> {
        plan.filters().iter().map(ScanFilter::column).collect()
    }

    #[test]
    fn unpartitioned_plan_sorts_by_cardinality() {
        let plan = FilterPlan::for_query(&params(), &ScanConfig::default(), None);
        assert_eq!(columns(&plan), ["town", "month", "floor_area_sqm"]);
    }

    #[test]
    fn partition_filter_leads() {
        let config = ScanConfig::default();
        let plan = FilterPlan::for_query(&params(), &config, Some("floor_area_sqm"));
        assert_eq!(columns(&plan), ["floor_area_sqm", "town", "month"]);

        let plan = FilterPlan::for_query(&params(), &config, Some("month"));
        assert_eq!(columns(&plan), ["month", "town", "floor_area_sqm"]);
    }

    #[test]
    fn unrelated_partition_column_does_not_reorder() {
        let plan = FilterPlan::for_query(&params(), &ScanConfig::default(), Some("flat_type"));
        assert_eq!(columns(&plan), ["town", "month", "floor_area_sqm"]);
    }

    #[test]
    fn unknown_columns_sort_last_and_ties_keep_order() {
        let config = ScanConfig::default()
            .with_cardinality("town", 500)
            .with_cardinality("month", 500);
        let mut filters = FilterPlan::for_query(&params(), &config, None)
            .filters()
            .to_vec();
        filters.insert(
            0,
            ScanFilter::Equality {
                column: "postal_code".into(),
                value: "460123".into(),
            },
        );
        let plan = FilterPlan::ordered(filters, &config, None);
        assert_eq!(
            columns(&plan),
            ["floor_area_sqm", "town", "month", "postal_code"]
        );
    }

    #[test]
    fn display_lists_filters_in_order() {
        let plan = FilterPlan::for_query(&params(), &ScanConfig::default(), None);
        assert_eq!(
            plan.to_string(),
            "town = 'BEDOK' -> month in [2021-01, 2021-02] -> floor_area_sqm >= 80"
        );
    }
}
