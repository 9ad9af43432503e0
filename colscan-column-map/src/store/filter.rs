//! Predicate filters over a [`ColumnStore`]'s row selection.
//!
//! Every filter works the same way: cheap pruning first (whole partitions when
//! the column is the partition key, whole blocks when it is the zone-mapped
//! column), then an exact per-row check over the rows that survived pruning.
//! Survivors replace the selection, so filters only ever remove rows.

use colscan_perf_monitor::{log_if_slow, measure};
use colscan_result::Result;
use colscan_storage::{Block, RangeOp, Value};

use super::core::ColumnStore;
use super::selection::RowSelection;
use crate::date::{parse_bound, parse_date};

impl ColumnStore {
    /// Keep rows whose `column` equals `value`.
    ///
    /// Comparison is numeric when both sides parse as numbers, otherwise an
    /// exact string match.
    pub fn filter_by_equality(&mut self, column: &str, value: &str) -> Result<()> {
        self.table.column_index(column)?;
        let before = self.selection.len();

        if self.table.is_partition_column(column) {
            // Every row of a kept partition holds the key, so no row check.
            let pruned = self.prune_partitions(|key| Value::parse(key).matches_literal(value));
            tracing::debug!(
                target: "colscan::filter",
                column,
                value,
                pruned_partitions = pruned,
                before,
                after = self.selection.len(),
                "equality filter (partition)"
            );
            return Ok(());
        }

        let candidates = self.candidates_for_equality(column, value)?;
        let (survivors, elapsed) = measure!(
            "filter_by_equality",
            self.exact_check(column, &candidates, |cell| cell.matches_literal(value))?
        );
        log_if_slow("filter_by_equality", &[("exact", elapsed)]);

        tracing::debug!(
            target: "colscan::filter",
            column,
            value,
            before,
            candidates = candidates.len(),
            after = survivors.len(),
            "equality filter"
        );
        self.selection = survivors;
        Ok(())
    }

    /// Keep rows whose numeric `column` value satisfies `value <op> threshold`.
    ///
    /// Text cells never satisfy a range predicate.
    pub fn filter_by_range(&mut self, column: &str, op: RangeOp, threshold: f64) -> Result<()> {
        let before = self.selection.len();
        let candidates = self.candidates_for_range(column, op, threshold)?;
        let (survivors, elapsed) = measure!(
            "filter_by_range",
            self.exact_check(column, &candidates, |cell| {
                cell.as_f64().is_some_and(|v| op.evaluate(v, threshold))
            })?
        );
        log_if_slow("filter_by_range", &[("exact", elapsed)]);

        tracing::debug!(
            target: "colscan::filter",
            column,
            op = op.symbol(),
            threshold,
            before,
            candidates = candidates.len(),
            after = survivors.len(),
            "range filter"
        );
        self.selection = survivors;
        Ok(())
    }

    /// [`filter_by_range`](Self::filter_by_range) with the operator given as
    /// text (`>`, `>=`, `<`, `<=`).
    pub fn filter_by_operator(&mut self, column: &str, op: &str, threshold: f64) -> Result<()> {
        let op: RangeOp = op.parse()?;
        self.filter_by_range(column, op, threshold)
    }

    /// Keep rows whose `column` parses as a date within `[start, end]`.
    ///
    /// Bounds and cells may be `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Cells that do
    /// not parse are dropped; bounds that do not parse are an error.
    pub fn filter_by_date_range(&mut self, column: &str, start: &str, end: &str) -> Result<()> {
        let lo = parse_bound(start)?;
        let hi = parse_bound(end)?;
        self.table.column_index(column)?;
        let in_range = |text: &str| parse_date(text).is_some_and(|d| lo <= d && d <= hi);
        let before = self.selection.len();

        if self.table.is_partition_column(column) {
            let pruned = self.prune_partitions(in_range);
            tracing::debug!(
                target: "colscan::filter",
                column,
                start,
                end,
                pruned_partitions = pruned,
                before,
                after = self.selection.len(),
                "date range filter (partition)"
            );
            return Ok(());
        }

        let (survivors, elapsed) = measure!(
            "filter_by_date_range",
            self.exact_check(column, &self.selection, |cell| match cell {
                Value::Text(text) => in_range(text.as_str()),
                Value::Float(_) => in_range(&cell.to_string()),
            })?
        );
        log_if_slow("filter_by_date_range", &[("exact", elapsed)]);

        tracing::debug!(
            target: "colscan::filter",
            column,
            start,
            end,
            before,
            after = survivors.len(),
            "date range filter"
        );
        self.selection = survivors;
        Ok(())
    }

    /// The selection after zone-map pruning for `column = value`, before the
    /// exact check. Always a superset of the exact survivors.
    pub fn candidates_for_equality(&self, column: &str, value: &str) -> Result<RowSelection> {
        let mut candidates = self.selection.clone();
        let literal = Value::parse(value);
        if self.table.is_zone_map_column(column) && literal.is_numeric() {
            self.prune_blocks(column, &mut candidates, |block| block.is_in_zone(&literal))?;
        } else {
            self.table.column_index(column)?;
        }
        Ok(candidates)
    }

    /// The selection after zone-map pruning for `column <op> threshold`.
    pub fn candidates_for_range(
        &self,
        column: &str,
        op: RangeOp,
        threshold: f64,
    ) -> Result<RowSelection> {
        let mut candidates = self.selection.clone();
        if self.table.is_zone_map_column(column) {
            self.prune_blocks(column, &mut candidates, |block| {
                block.may_satisfy(op, threshold)
            })?;
        } else {
            self.table.column_index(column)?;
        }
        Ok(candidates)
    }

    /// Drop the rows of every partition whose key fails `keep`.
    fn prune_partitions(&mut self, keep: impl Fn(&str) -> bool) -> usize {
        let mut pruned = 0;
        for span in self.table.partitions() {
            if !keep(&span.key) {
                self.selection.remove_range(span.rows.clone());
                pruned += 1;
            }
        }
        pruned
    }

    /// Drop from `candidates` the rows of every `column` block whose summary
    /// fails `keep`.
    fn prune_blocks(
        &self,
        column: &str,
        candidates: &mut RowSelection,
        keep: impl Fn(&Block) -> bool,
    ) -> Result<usize> {
        let zone_map = self.table.zone_map();
        let mut pruned = 0;
        for (_, block) in self.table.blocks(column)? {
            if keep(block) {
                continue;
            }
            if let Some(span) = zone_map.get(block.id()) {
                candidates.remove_range(span.as_range());
                pruned += 1;
            }
        }
        tracing::trace!(
            target: "colscan::filter",
            column,
            pruned_blocks = pruned,
            "zone-map pruning"
        );
        Ok(pruned)
    }

    /// Rows of `candidates` whose `column` value satisfies `pred`.
    fn exact_check(
        &self,
        column: &str,
        candidates: &RowSelection,
        pred: impl Fn(&Value) -> bool,
    ) -> Result<RowSelection> {
        let mut survivors = Vec::with_capacity(candidates.len() as usize);
        self.table.visit_selected(column, candidates, |row, cell| {
            if pred(cell) {
                survivors.push(row);
            }
        })?;
        Ok(survivors.into_iter().collect())
    }
}
