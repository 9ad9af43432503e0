//! Row-at-a-time ingestion into blocks.
//!
//! Every data line either lands in storage as one row or is dropped whole:
//! lines whose field count differs from the header, or that are not UTF-8,
//! are counted and skipped.
//! Each field is parsed independently as a number or kept as text, charged its
//! fixed size against the column's open block, and a full block is sealed
//! before a new one is opened.

use std::io::Read;

use colscan_csv::{CsvReadSession, CsvRecord};
use colscan_result::{Error, Result};
use colscan_storage::{Block, BlockId, Disk, Partition, RowId, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use super::config::StoreConfig;
use super::table::{LoadedTable, PartitionSpan};
use super::zone_map::ZoneMapIndex;

pub(crate) fn load_table<R: Read>(
    mut session: CsvReadSession<R>,
    config: &StoreConfig,
) -> Result<LoadedTable> {
    let mut builder = TableBuilder::new(session.header().to_vec(), config)?;
    for record in session.by_ref() {
        builder.push_record(record?);
    }
    builder.skipped_rows += session.undecodable_rows();
    builder.finish()
}

/// Open block plus sealed chain for every column of one row group.
struct ColumnSink {
    chains: Vec<Vec<Block>>,
    open: Vec<Block>,
}

impl ColumnSink {
    fn new(disk: &mut Disk, width: usize, block_size: usize, zone_col: Option<usize>) -> Self {
        let open = (0..width)
            .map(|col| disk.open_block(block_size, zone_col == Some(col)))
            .collect();
        Self {
            chains: vec![Vec::new(); width],
            open,
        }
    }

    /// Append `value` to `col` and return the id of the block it landed in.
    fn append(
        &mut self,
        disk: &mut Disk,
        col: usize,
        value: Value,
        block_size: usize,
        zone_map: bool,
    ) -> BlockId {
        let size = value.byte_size();
        let current = &mut self.open[col];
        // An empty block always takes the value, even one larger than the budget.
        if !current.is_empty() && !current.is_able_to_add(size) {
            let full = std::mem::replace(current, disk.open_block(block_size, zone_map));
            self.chains[col].push(full);
        }
        let current = &mut self.open[col];
        current.add_data(value, size);
        current.id()
    }

    /// Sealed chains per column, with non-empty open blocks appended.
    fn finish(self) -> impl Iterator<Item = Vec<Block>> {
        self.chains
            .into_iter()
            .zip(self.open)
            .map(|(mut chain, open)| {
                if !open.is_empty() {
                    chain.push(open);
                }
                chain
            })
    }
}

struct PartitionSink {
    key: String,
    columns: ColumnSink,
    rows: RowId,
    /// Spans in partition-local row ids until [`TableBuilder::finish`].
    zone_map: ZoneMapIndex,
}

enum Layout {
    Columns(ColumnSink),
    Partitioned {
        key_column: usize,
        slots: FxHashMap<String, usize>,
        partitions: Vec<PartitionSink>,
    },
}

pub(crate) struct TableBuilder {
    headers: Vec<String>,
    block_size: usize,
    partition_column: Option<String>,
    zone_map_column: Option<String>,
    zone_col: Option<usize>,
    disk: Disk,
    layout: Layout,
    zone_map: ZoneMapIndex,
    row_count: RowId,
    skipped_rows: u64,
}

impl TableBuilder {
    pub(crate) fn new(headers: Vec<String>, config: &StoreConfig) -> Result<Self> {
        if config.block_size == 0 {
            return Err(Error::InvalidArgumentError(
                "block size must be greater than zero".into(),
            ));
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(Error::InvalidArgumentError(format!(
                "duplicate column '{dup}' in header"
            )));
        }

        let position = |name: &str| headers.iter().position(|h| h == name);

        let partition_col = match config.partition_column.as_deref() {
            Some(name) => Some(position(name).ok_or_else(|| Error::column_not_found(name))?),
            None => None,
        };

        let zone_col = match config.zone_map_column.as_deref() {
            Some(name) => {
                let col = position(name);
                if col.is_none() {
                    tracing::warn!(
                        target: "colscan::ingest",
                        column = name,
                        "zone-map column not in header; zone mapping disabled"
                    );
                }
                col
            }
            None => None,
        };

        let mut disk = Disk::new();
        let layout = match partition_col {
            Some(key_column) => Layout::Partitioned {
                key_column,
                slots: FxHashMap::default(),
                partitions: Vec::new(),
            },
            None => Layout::Columns(ColumnSink::new(
                &mut disk,
                headers.len(),
                config.block_size,
                zone_col,
            )),
        };

        tracing::debug!(
            target: "colscan::ingest",
            columns = headers.len(),
            partition_column = ?config.partition_column,
            zone_map_column = ?zone_col.map(|c| &headers[c]),
            block_size = config.block_size,
            "starting load"
        );

        Ok(Self {
            block_size: config.block_size,
            partition_column: partition_col.map(|c| headers[c].clone()),
            zone_map_column: zone_col.map(|c| headers[c].clone()),
            zone_col,
            disk,
            layout,
            zone_map: ZoneMapIndex::new(),
            row_count: 0,
            skipped_rows: 0,
            headers,
        })
    }

    pub(crate) fn push_record(&mut self, record: CsvRecord) {
        if record.len() != self.headers.len() {
            self.skipped_rows += 1;
            tracing::debug!(
                target: "colscan::ingest",
                line = record.line,
                expected = self.headers.len(),
                found = record.len(),
                "dropping malformed row"
            );
            return;
        }

        match &mut self.layout {
            Layout::Columns(sink) => {
                let row = self.row_count;
                for (col, field) in record.fields.iter().enumerate() {
                    let zone = self.zone_col == Some(col);
                    let block =
                        sink.append(&mut self.disk, col, Value::parse(field), self.block_size, zone);
                    if zone {
                        self.zone_map.record(block, row);
                    }
                }
            }
            Layout::Partitioned {
                key_column,
                slots,
                partitions,
            } => {
                let key = &record.fields[*key_column];
                let slot = match slots.get(key) {
                    Some(&slot) => slot,
                    None => {
                        let slot = partitions.len();
                        tracing::trace!(
                            target: "colscan::ingest",
                            key = key.as_str(),
                            slot,
                            "opening partition"
                        );
                        partitions.push(PartitionSink {
                            key: key.clone(),
                            columns: ColumnSink::new(
                                &mut self.disk,
                                self.headers.len(),
                                self.block_size,
                                self.zone_col,
                            ),
                            rows: 0,
                            zone_map: ZoneMapIndex::new(),
                        });
                        slots.insert(key.clone(), slot);
                        slot
                    }
                };

                let partition = &mut partitions[slot];
                let row = partition.rows;
                for (col, field) in record.fields.iter().enumerate() {
                    let zone = self.zone_col == Some(col);
                    let block = partition.columns.append(
                        &mut self.disk,
                        col,
                        Value::parse(field),
                        self.block_size,
                        zone,
                    );
                    if zone {
                        partition.zone_map.record(block, row);
                    }
                }
                partition.rows += 1;
            }
        }
        self.row_count += 1;
    }

    pub(crate) fn finish(self) -> Result<LoadedTable> {
        let TableBuilder {
            headers,
            partition_column,
            zone_map_column,
            mut disk,
            layout,
            mut zone_map,
            row_count,
            skipped_rows,
            ..
        } = self;

        let mut spans = Vec::new();
        match layout {
            Layout::Columns(sink) => {
                for (col, chain) in sink.finish().enumerate() {
                    for block in chain {
                        disk.add_block(&headers[col], block)?;
                    }
                }
            }
            Layout::Partitioned { partitions, .. } => {
                let mut offset: RowId = 0;
                for sink in partitions {
                    let mut partition = Partition::new();
                    for (col, chain) in sink.columns.finish().enumerate() {
                        for block in chain {
                            partition.add(headers[col].as_str(), block);
                        }
                    }
                    disk.add_partition(&sink.key, partition)?;
                    zone_map.absorb(sink.zone_map, offset);
                    spans.push(PartitionSpan {
                        key: sink.key,
                        rows: offset..offset + sink.rows,
                    });
                    offset += sink.rows;
                }
            }
        }

        tracing::info!(
            target: "colscan::ingest",
            rows = row_count,
            skipped = skipped_rows,
            blocks = disk.allocated_blocks(),
            partitions = spans.len(),
            "load complete"
        );

        Ok(LoadedTable {
            disk,
            headers,
            partition_column,
            zone_map_column,
            zone_map,
            partitions: spans,
            row_count,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscan_csv::CsvReader;
    use colscan_storage::{FLOAT_BYTES, StorageUnit, VARCHAR_BYTES};

    fn load(data: &str, config: &StoreConfig) -> Result<LoadedTable> {
        let session = CsvReader::default().from_reader(data.as_bytes())?;
        load_table(session, config)
    }

    const SAMPLE: &str = "\
month,town,floor_area_sqm,resale_price
2021-01,BEDOK,70,300000
2021-02,BEDOK,85,310000
2021-01,YISHUN,90,350000
2021-03,BEDOK,95
2021-03,BEDOK,95,400000
2021-02,TAMPINES,60,280000
";

    #[test]
    fn unpartitioned_load_keys_chains_by_column() {
        let table = load(SAMPLE, &StoreConfig::default()).unwrap();
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.skipped_rows(), 1);
        assert!(table.partitions().is_empty());
        assert_eq!(
            table.disk().keys().collect::<Vec<_>>(),
            vec!["month", "town", "floor_area_sqm", "resale_price"]
        );

        let towns: Vec<String> = table
            .blocks("town")
            .unwrap()
            .into_iter()
            .flat_map(|(_, b)| b.values().iter().map(|v| v.to_string()))
            .collect();
        assert_eq!(towns, vec!["BEDOK", "BEDOK", "YISHUN", "BEDOK", "TAMPINES"]);
    }

    #[test]
    fn blocks_seal_at_capacity() {
        // Two floats or no strings fit per block.
        let config = StoreConfig::default().with_block_size(2 * FLOAT_BYTES);
        let table = load(SAMPLE, &config).unwrap();
        let area = table.blocks("floor_area_sqm").unwrap();
        assert_eq!(area.iter().map(|(_, b)| b.len()).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(area.iter().map(|(start, _)| *start).collect::<Vec<_>>(), vec![0, 2, 4]);

        // A string never fits, so every string gets its own block.
        assert!(2 * FLOAT_BYTES < VARCHAR_BYTES);
        assert_eq!(table.blocks("town").unwrap().len(), 5);
    }

    #[test]
    fn partitioned_load_orders_rows_by_first_seen_partition() {
        let config = StoreConfig::default().with_partition_column("town");
        let table = load(SAMPLE, &config).unwrap();
        assert_eq!(table.row_count(), 5);
        let spans: Vec<_> = table
            .partitions()
            .iter()
            .map(|s| (s.key.as_str(), s.rows.clone()))
            .collect();
        assert_eq!(
            spans,
            vec![("BEDOK", 0..3), ("YISHUN", 3..4), ("TAMPINES", 4..5)]
        );

        match table.disk().get("BEDOK").unwrap() {
            StorageUnit::Partitioned(p) => assert_eq!(p.row_count(), 3),
            StorageUnit::Columns(_) => panic!("expected partition"),
        }

        let prices: Vec<String> = table
            .blocks("resale_price")
            .unwrap()
            .into_iter()
            .flat_map(|(_, b)| b.values().iter().map(|v| v.to_string()))
            .collect();
        assert_eq!(prices, vec!["300000", "310000", "400000", "350000", "280000"]);
    }

    #[test]
    fn zone_map_spans_cover_global_rows_after_partitioning() {
        let config = StoreConfig::default()
            .with_partition_column("town")
            .with_zone_map_column("floor_area_sqm")
            .with_block_size(2 * FLOAT_BYTES);
        let table = load(SAMPLE, &config).unwrap();

        for (start, block) in table.blocks("floor_area_sqm").unwrap() {
            let span = table.zone_map().get(block.id()).expect("span for zone block");
            assert_eq!(span.as_range(), start..start + block.len() as RowId);
            assert!(block.has_zone_map());
        }
        for (_, block) in table.blocks("town").unwrap() {
            assert!(table.zone_map().get(block.id()).is_none());
            assert!(!block.has_zone_map());
        }
    }

    #[test]
    fn missing_partition_column_is_an_error() {
        let config = StoreConfig::default().with_partition_column("flat_type");
        let err = load(SAMPLE, &config).unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(c) if c == "flat_type"));
    }

    #[test]
    fn missing_zone_map_column_disables_zone_mapping() {
        let config = StoreConfig::default().with_zone_map_column("lease_commence_date");
        let table = load(SAMPLE, &config).unwrap();
        assert_eq!(table.zone_map_column(), None);
        assert!(table.zone_map().is_empty());
    }

    #[test]
    fn rejects_degenerate_configuration() {
        let err = load(SAMPLE, &StoreConfig::default().with_block_size(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));

        let err = load("a,b,a\n1,2,3\n", &StoreConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(msg) if msg.contains("'a'")));
    }

    #[test]
    fn undecodable_lines_are_skipped_like_ragged_ones() {
        let mut data = SAMPLE.as_bytes().to_vec();
        data.extend_from_slice(b"2021-04,\xc3\x28,75,290000\n");
        data.extend_from_slice(b"2021-04,\"ANG MO KIO, AVE 3\",75,295000\n");

        let session = CsvReader::default().from_reader(&data[..]).unwrap();
        let table = load_table(session, &StoreConfig::default()).unwrap();
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.skipped_rows(), 2);

        let last_town = table
            .blocks("town")
            .unwrap()
            .last()
            .and_then(|(_, b)| b.values().last().cloned())
            .unwrap();
        assert_eq!(last_town.to_string(), "ANG MO KIO, AVE 3");
    }
}
