use rustc_hash::FxHashMap;

pub const TOWN_COLUMN: &str = "town";
pub const MONTH_COLUMN: &str = "month";
pub const FLOOR_AREA_COLUMN: &str = "floor_area_sqm";
pub const PRICE_COLUMN: &str = "resale_price";

/// Default location of the resale price data.
pub const DEFAULT_DATA_PATH: &str = "ResalePricesSingapore.csv";

/// Smallest floor area (square meters) a query keeps by default.
pub const DEFAULT_AREA_THRESHOLD: f64 = 80.0;

/// Tunables for planning and running a scan.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Estimated distinct values per column, used to order filters.
    pub cardinality: FxHashMap<String, u64>,
    /// Rows with a floor area below this are dropped.
    pub area_threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let cardinality = [
            ("month", 121),
            ("town", 26),
            ("flat_type", 7),
            ("block", 2700),
            ("street_name", 567),
            ("storey_range", 17),
            ("floor_area_sqm", 174),
            ("flat_model", 21),
            ("lease_commence_date", 56),
            ("resale_price", 4083),
        ]
        .into_iter()
        .map(|(column, n)| (column.to_string(), n))
        .collect();
        Self {
            cardinality,
            area_threshold: DEFAULT_AREA_THRESHOLD,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area_threshold(mut self, threshold: f64) -> Self {
        self.area_threshold = threshold;
        self
    }

    pub fn with_cardinality(mut self, column: impl Into<String>, distinct: u64) -> Self {
        self.cardinality.insert(column.into(), distinct);
        self
    }

    /// Estimated cardinality; columns without an estimate sort last.
    pub fn cardinality_of(&self, column: &str) -> u64 {
        self.cardinality.get(column).copied().unwrap_or(u64::MAX)
    }
}
