use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use colscan_csv::{CsvReadSession, CsvReader};
use colscan_perf_monitor::{log_if_slow, measure};
use colscan_result::Result;
use colscan_storage::{RowId, Value};

use super::config::StoreConfig;
use super::ingest;
use super::selection::RowSelection;
use super::table::LoadedTable;

/// A loaded table plus one query's row selection.
///
/// Cloning is cheap: the table is shared read-only and only the selection is
/// copied, so clones filter independently.
#[derive(Clone, Debug)]
pub struct ColumnStore {
    pub(crate) table: Arc<LoadedTable>,
    pub(crate) selection: RowSelection,
}

impl ColumnStore {
    /// Load a delimited file. The first line is the header.
    pub fn load(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
        let session = CsvReader::new(config.read_options.clone()).open(path.as_ref())?;
        Self::ingest(session, config)
    }

    pub fn load_from_reader<R: Read>(reader: R, config: &StoreConfig) -> Result<Self> {
        let session = CsvReader::new(config.read_options.clone()).from_reader(reader)?;
        Self::ingest(session, config)
    }

    fn ingest<R: Read>(session: CsvReadSession<R>, config: &StoreConfig) -> Result<Self> {
        let (table, elapsed) = measure!("load", ingest::load_table(session, config)?);
        log_if_slow("load", &[("ingest", elapsed)]);
        Ok(Self::from_table(Arc::new(table)))
    }

    /// A store over `table` with every row selected.
    pub fn from_table(table: Arc<LoadedTable>) -> Self {
        let selection = RowSelection::full(table.row_count());
        Self { table, selection }
    }

    pub fn table(&self) -> &Arc<LoadedTable> {
        &self.table
    }

    pub fn headers(&self) -> &[String] {
        self.table.headers()
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Surviving row ids, ascending.
    pub fn row_ids(&self) -> Vec<RowId> {
        self.selection.to_vec()
    }

    /// Rows still selected.
    pub fn len(&self) -> u64 {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Rows stored at load, independent of filtering.
    pub fn total_rows(&self) -> u64 {
        self.table.row_count()
    }

    /// Start a new query over the same table.
    pub fn reset(&mut self) {
        self.selection = RowSelection::full(self.table.row_count());
    }

    /// Values of `column` at the selected rows, in ascending row-id order.
    pub fn get_column_values(&self, column: &str) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(self.selection.len() as usize);
        self.table
            .visit_selected(column, &self.selection, |_, value| out.push(value.clone()))?;
        Ok(out)
    }

    /// Numeric values of `column` at the selected rows; text cells are skipped.
    pub fn get_numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        Ok(self
            .get_column_values(column)?
            .iter()
            .filter_map(Value::as_f64)
            .collect())
    }

    /// Every stored value of `column` in storage order, ignoring the selection.
    pub fn flatten_column(&self, column: &str) -> Result<Vec<&Value>> {
        Ok(self
            .table
            .blocks(column)?
            .into_iter()
            .flat_map(|(_, block)| block.values())
            .collect())
    }
}
