use colscan_column_map::{ColumnStore, RangeOp, StoreConfig};
use colscan_test_utils::init_tracing_for_tests;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOWNS: &[&str] = &["BEDOK", "YISHUN", "TAMPINES", "ANG MO KIO", "WOODLANDS", "JURONG WEST"];

#[derive(Clone, Debug)]
struct Row {
    month: String,
    town: &'static str,
    area: Option<u32>,
    price: u32,
}

impl Row {
    fn key(&self) -> String {
        let area = self.area.map_or("n/a".to_string(), |a| a.to_string());
        format!("{}|{}|{}|{}", self.month, self.town, area, self.price)
    }
}

fn generate(seed: u64, n: usize) -> (String, Vec<Row>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut csv = String::from("month,town,floor_area_sqm,resale_price\n");
    let mut rows = Vec::with_capacity(n);
    for _ in 0..n {
        if rng.random_range(0..20) == 0 {
            // Malformed: one field short.
            csv.push_str("2020-01,BEDOK,90\n");
        }
        let row = Row {
            month: format!(
                "{}-{:02}",
                rng.random_range(2019..=2021),
                rng.random_range(1..=12)
            ),
            town: TOWNS[rng.random_range(0..TOWNS.len())],
            area: (rng.random_range(0..25) != 0).then(|| rng.random_range(30..=150)),
            price: rng.random_range(150_000..=900_000),
        };
        let area = row.area.map_or("n/a".to_string(), |a| a.to_string());
        csv.push_str(&format!("{},{},{},{}\n", row.month, row.town, area, row.price));
        rows.push(row);
    }
    (csv, rows)
}

fn configs() -> Vec<StoreConfig> {
    let small = 16 * 24;
    vec![
        StoreConfig::default(),
        StoreConfig::default().with_block_size(small),
        StoreConfig::default().with_partition_column("town"),
        StoreConfig::default()
            .with_zone_map_column("floor_area_sqm")
            .with_block_size(small),
        StoreConfig::default()
            .with_partition_column("town")
            .with_zone_map_column("floor_area_sqm")
            .with_block_size(small),
        StoreConfig::default()
            .with_partition_column("month")
            .with_zone_map_column("floor_area_sqm")
            .with_block_size(small),
    ]
}

/// Selected rows rendered as sorted keys, comparable across layouts.
fn projected_keys(store: &ColumnStore) -> Vec<String> {
    let months = store.get_column_values("month").unwrap();
    let towns = store.get_column_values("town").unwrap();
    let areas = store.get_column_values("floor_area_sqm").unwrap();
    let prices = store.get_column_values("resale_price").unwrap();
    assert_eq!(months.len(), towns.len());
    assert_eq!(areas.len(), prices.len());
    let mut keys: Vec<String> = (0..months.len())
        .map(|i| format!("{}|{}|{}|{}", months[i], towns[i], areas[i], prices[i]))
        .collect();
    keys.sort();
    keys
}

#[derive(Clone, Copy, Debug)]
enum Filter {
    Town(&'static str),
    Months(&'static str, &'static str),
    Area(RangeOp, f64),
}

impl Filter {
    fn apply(self, store: &mut ColumnStore) {
        match self {
            Filter::Town(town) => store.filter_by_equality("town", town).unwrap(),
            Filter::Months(start, end) => {
                store.filter_by_date_range("month", start, end).unwrap()
            }
            Filter::Area(op, t) => store.filter_by_range("floor_area_sqm", op, t).unwrap(),
        }
    }

    fn matches(self, row: &Row) -> bool {
        match self {
            Filter::Town(town) => row.town == town,
            Filter::Months(start, end) => {
                let month = row.month.as_str();
                // Zero-padded YYYY-MM compares lexically.
                start <= month && month <= end
            }
            Filter::Area(op, t) => row.area.is_some_and(|a| op.evaluate(f64::from(a), t)),
        }
    }
}

fn random_filters(rng: &mut StdRng) -> Vec<Filter> {
    const MONTHS: &[&str] = &["2019-03", "2019-11", "2020-01", "2020-06", "2021-02", "2021-12"];
    let ops = [
        RangeOp::GreaterThan,
        RangeOp::GreaterThanOrEquals,
        RangeOp::LessThan,
        RangeOp::LessThanOrEquals,
    ];
    let a = MONTHS[rng.random_range(0..MONTHS.len())];
    let b = MONTHS[rng.random_range(0..MONTHS.len())];
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    vec![
        Filter::Town(TOWNS[rng.random_range(0..TOWNS.len())]),
        Filter::Months(start, end),
        Filter::Area(
            ops[rng.random_range(0..ops.len())],
            f64::from(rng.random_range(25..=155)),
        ),
    ]
}

#[test]
fn test_filters_match_reference_in_every_layout() {
    init_tracing_for_tests();
    let (csv, rows) = generate(0xC0FFEE, 600);
    let mut rng = StdRng::seed_from_u64(7);

    let loaded: Vec<ColumnStore> = configs()
        .iter()
        .map(|c| ColumnStore::load_from_reader(csv.as_bytes(), c).unwrap())
        .collect();
    for store in &loaded {
        assert_eq!(store.total_rows(), rows.len() as u64);
    }

    for _ in 0..25 {
        let filters = random_filters(&mut rng);
        let mut expected: Vec<String> = rows
            .iter()
            .filter(|r| filters.iter().all(|f| f.matches(r)))
            .map(Row::key)
            .collect();
        expected.sort();

        for base in &loaded {
            let mut store = base.clone();
            for f in &filters {
                f.apply(&mut store);
            }
            assert_eq!(projected_keys(&store), expected, "filters {filters:?}");
        }
    }
}

#[test]
fn test_filters_are_monotone_and_idempotent() {
    let (csv, _) = generate(11, 400);
    let mut rng = StdRng::seed_from_u64(12);
    for config in configs() {
        let base = ColumnStore::load_from_reader(csv.as_bytes(), &config).unwrap();
        for _ in 0..10 {
            let mut store = base.clone();
            for f in random_filters(&mut rng) {
                let before = store.selection().clone();
                f.apply(&mut store);
                assert!(store.selection().is_subset_of(&before), "{f:?} added rows");

                let once = store.row_ids();
                f.apply(&mut store);
                assert_eq!(store.row_ids(), once, "{f:?} not idempotent");
            }
        }
        // Filtering a clone leaves the source untouched.
        assert_eq!(base.len(), base.total_rows());
    }
}

#[test]
fn test_filter_order_does_not_change_result() {
    let (csv, _) = generate(21, 500);
    let mut rng = StdRng::seed_from_u64(22);
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for config in configs() {
        let base = ColumnStore::load_from_reader(csv.as_bytes(), &config).unwrap();
        for _ in 0..5 {
            let filters = random_filters(&mut rng);
            let results: Vec<Vec<u64>> = orders
                .iter()
                .map(|order| {
                    let mut store = base.clone();
                    for &i in order {
                        filters[i].apply(&mut store);
                    }
                    store.row_ids()
                })
                .collect();
            for r in &results[1..] {
                assert_eq!(r, &results[0], "filters {filters:?}");
            }
        }
    }
}

#[test]
fn test_zone_map_candidates_are_supersets() {
    let (csv, _) = generate(31, 800);
    let mut rng = StdRng::seed_from_u64(32);
    let config = StoreConfig::default()
        .with_partition_column("town")
        .with_zone_map_column("floor_area_sqm")
        .with_block_size(8 * 4);
    let base = ColumnStore::load_from_reader(csv.as_bytes(), &config).unwrap();

    let mut pruned_something = false;
    for _ in 0..50 {
        let mut store = base.clone();
        // Pre-filter so candidates start from a partial selection.
        store
            .filter_by_equality("town", TOWNS[rng.random_range(0..TOWNS.len())])
            .unwrap();

        let threshold = f64::from(rng.random_range(25..=155));
        for op in [RangeOp::GreaterThanOrEquals, RangeOp::LessThan] {
            let candidates = store.candidates_for_range("floor_area_sqm", op, threshold).unwrap();
            assert!(candidates.is_subset_of(store.selection()));
            pruned_something |= candidates.len() < store.len();

            let mut exact = store.clone();
            exact.filter_by_range("floor_area_sqm", op, threshold).unwrap();
            assert!(exact.selection().is_subset_of(&candidates));
        }

        let literal = rng.random_range(25..=155).to_string();
        let candidates = store
            .candidates_for_equality("floor_area_sqm", &literal)
            .unwrap();
        let mut exact = store.clone();
        exact.filter_by_equality("floor_area_sqm", &literal).unwrap();
        assert!(exact.selection().is_subset_of(&candidates));
    }
    assert!(pruned_something, "zone map never pruned a block");
}
