//! CSV report writer.
//!
//! [`CsvWriter`] turns rows of already-rendered text cells into a single
//! all-`Utf8` record batch and hands it to arrow's CSV writer, which owns the
//! quoting rules.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use colscan_result::{Error, Result};

/// Configuration for writing CSV files.
#[derive(Debug, Clone)]
pub struct CsvWriteOptions {
    /// Write a header row with column names when true.
    pub include_header: bool,
    /// Delimiter to use between fields.
    pub delimiter: u8,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            delimiter: b',',
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    options: CsvWriteOptions,
}

impl CsvWriter {
    pub fn new(options: CsvWriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvWriteOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut CsvWriteOptions {
        &mut self.options
    }

    pub fn write_rows_to_path<C>(
        &self,
        csv_path: C,
        columns: &[&str],
        rows: &[Vec<String>],
    ) -> Result<()>
    where
        C: AsRef<Path>,
    {
        let file = File::create(csv_path.as_ref()).map_err(|err| {
            Error::Internal(format!(
                "failed to create CSV file '{}': {err}",
                csv_path.as_ref().display()
            ))
        })?;
        tracing::trace!(
            target: "colscan::csv",
            path = %csv_path.as_ref().display(),
            rows = rows.len(),
            "writing CSV report"
        );
        self.write_rows_to_writer(BufWriter::new(file), columns, rows)
    }

    pub fn write_rows_to_writer<W>(
        &self,
        writer: W,
        columns: &[&str],
        rows: &[Vec<String>],
    ) -> Result<()>
    where
        W: Write,
    {
        if columns.is_empty() {
            return Err(Error::InvalidArgumentError(
                "at least one column must be provided for CSV export".into(),
            ));
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != columns.len()) {
            return Err(Error::InvalidArgumentError(format!(
                "row has {} cells but {} columns were declared",
                bad.len(),
                columns.len()
            )));
        }

        let batch = build_batch(columns, rows)?;

        let mut out = WriterBuilder::new()
            .with_delimiter(self.options.delimiter)
            .with_header(self.options.include_header)
            .build(writer);
        out.write(&batch)?;
        out.into_inner()
            .flush()
            .map_err(|err| Error::Internal(format!("flushing report failed: {err}")))
    }
}

fn build_batch(columns: &[&str], rows: &[Vec<String>]) -> Result<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    let arrays: Vec<ArrayRef> = (0..columns.len())
        .map(|col| {
            let cells = rows.iter().map(|row| row[col].as_str());
            Arc::new(StringArray::from_iter_values(cells)) as ArrayRef
        })
        .collect();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}
