use std::fs::File;
use std::io::Read;
use std::path::Path;

use colscan_result::{Error, Result};
use csv::{ByteRecord, StringRecord};

#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    pub has_header: bool,
    pub delimiter: u8,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    options: CsvReadOptions,
}

impl CsvReader {
    pub fn new(options: CsvReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CsvReadOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut CsvReadOptions {
        &mut self.options
    }

    /// Open `path` and read its header line.
    pub fn open(&self, path: &Path) -> Result<CsvReadSession<File>> {
        let file = File::open(path)?;
        self.start(file, &path.display().to_string())
    }

    /// Read from an arbitrary source, e.g. an in-memory buffer.
    pub fn from_reader<R: Read>(&self, reader: R) -> Result<CsvReadSession<R>> {
        self.start(reader, "<reader>")
    }

    fn start<R: Read>(&self, reader: R, source: &str) -> Result<CsvReadSession<R>> {
        // Field counts are checked by the caller, so ragged rows must not be
        // a reader error.
        let reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut session = CsvReadSession {
            header: Vec::new(),
            reader,
            pending: None,
            undecodable: 0,
        };

        let (line, raw) = session
            .next_raw()?
            .ok_or_else(|| Error::EmptySource(source.to_string()))?;

        if self.options.has_header {
            let header = StringRecord::from_byte_record(raw).map_err(|err| {
                Error::InvalidArgumentError(format!("header of {source} is not UTF-8: {err}"))
            })?;
            session.header = header
                .iter()
                .map(|f| f.trim_start_matches('\u{FEFF}').to_string())
                .collect();
        } else {
            session.header = (0..raw.len()).map(|i| format!("col_{i}")).collect();
            session.pending = session.decode(line, raw);
        }

        tracing::debug!(
            target: "colscan::csv",
            source,
            columns = session.header.len(),
            "opened delimited source"
        );
        Ok(session)
    }
}

/// One data line, split and unquoted.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    /// 1-based line number in the source.
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRecord {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Streaming view over the data lines of an opened source.
///
/// Blank lines are skipped and lines that are not UTF-8 are dropped (see
/// [`undecodable_rows`](Self::undecodable_rows)). Field counts are not
/// validated here.
pub struct CsvReadSession<R> {
    header: Vec<String>,
    reader: csv::Reader<R>,
    pending: Option<CsvRecord>,
    undecodable: u64,
}

impl<R: Read> CsvReadSession<R> {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data lines dropped so far because they were not valid UTF-8.
    pub fn undecodable_rows(&self) -> u64 {
        self.undecodable
    }

    /// Next non-blank record, undecoded, with its starting line.
    fn next_raw(&mut self) -> Result<Option<(usize, ByteRecord)>> {
        let mut raw = ByteRecord::new();
        loop {
            if !self.reader.read_byte_record(&mut raw).map_err(csv_error)? {
                return Ok(None);
            }
            // Whitespace-only lines trim down to a single empty field.
            if raw.len() == 1 && raw[0].is_empty() {
                continue;
            }
            let line = raw.position().map_or(0, |p| p.line() as usize);
            return Ok(Some((line, raw)));
        }
    }

    fn decode(&mut self, line: usize, raw: ByteRecord) -> Option<CsvRecord> {
        match StringRecord::from_byte_record(raw) {
            Ok(record) => Some(CsvRecord {
                line,
                fields: record.iter().map(str::to_string).collect(),
            }),
            Err(err) => {
                self.undecodable += 1;
                tracing::debug!(
                    target: "colscan::csv",
                    line,
                    error = %err,
                    "dropping row that is not UTF-8"
                );
                None
            }
        }
    }

    fn next_record(&mut self) -> Result<Option<CsvRecord>> {
        while let Some((line, raw)) = self.next_raw()? {
            if let Some(record) = self.decode(line, raw) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

impl<R: Read> Iterator for CsvReadSession<R> {
    type Item = Result<CsvRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.pending.take() {
            return Some(Ok(record));
        }
        self.next_record().transpose()
    }
}

fn csv_error(err: csv::Error) -> Error {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(err) => Error::Io(err),
        _ => Error::Internal(message),
    }
}
