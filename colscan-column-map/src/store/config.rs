use colscan_csv::CsvReadOptions;
use colscan_storage::DEFAULT_BLOCK_SIZE;

/// Load-time layout of a [`ColumnStore`](super::ColumnStore).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Group rows into one partition per distinct value of this column.
    pub partition_column: Option<String>,
    /// Keep per-block min/max summaries and a block-to-rows index for this
    /// column.
    pub zone_map_column: Option<String>,
    /// Byte budget of every block.
    pub block_size: usize,
    pub read_options: CsvReadOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            partition_column: None,
            zone_map_column: None,
            block_size: DEFAULT_BLOCK_SIZE,
            read_options: CsvReadOptions::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partition_column(mut self, column: impl Into<String>) -> Self {
        self.partition_column = Some(column.into());
        self
    }

    pub fn with_zone_map_column(mut self, column: impl Into<String>) -> Self {
        self.zone_map_column = Some(column.into());
        self
    }

    pub fn with_block_size(mut self, bytes: usize) -> Self {
        self.block_size = bytes;
        self
    }

    pub fn with_read_options(mut self, options: CsvReadOptions) -> Self {
        self.read_options = options;
        self
    }
}
