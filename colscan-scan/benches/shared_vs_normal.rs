//! Shared scan against normal scan over 200k synthetic resale rows.
//!
//! Loads one table per layout (flat, partitioned by town, partitioned by town
//! with a floor-area zone map), then times:
//!   - shared_scan (filter once, four statistics)
//!   - normal_scan (filter four clones, one statistic each)
//!
//! Run:
//!   cargo bench --bench shared_vs_normal

#![forbid(unsafe_code)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use colscan_column_map::{ColumnStore, StoreConfig};
use colscan_scan::{FilterPlan, QueryParams, ScanConfig, normal_scan, shared_scan};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const N_ROWS: usize = 200_000;
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;
const TOWNS: &[&str] = &[
    "BEDOK",
    "BUKIT PANJANG",
    "CLEMENTI",
    "CHOA CHU KANG",
    "HOUGANG",
    "JURONG WEST",
    "PASIR RIS",
    "TAMPINES",
    "WOODLANDS",
    "YISHUN",
];

fn synthetic_csv() -> String {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut csv = String::with_capacity(N_ROWS * 40);
    csv.push_str("month,town,floor_area_sqm,resale_price\n");
    for _ in 0..N_ROWS {
        csv.push_str(&format!(
            "{}-{:02},{},{},{}\n",
            rng.random_range(2014..=2023),
            rng.random_range(1..=12),
            TOWNS[rng.random_range(0..TOWNS.len())],
            rng.random_range(35..=180),
            rng.random_range(150_000..=1_200_000)
        ));
    }
    csv
}

fn bench_scans(c: &mut Criterion) {
    let csv = synthetic_csv();
    let params = QueryParams {
        town: "TAMPINES".into(),
        start_year_month: "2021-02".into(),
        end_year_month: "2021-03".into(),
    };
    let layouts = [
        ("flat", StoreConfig::default()),
        ("by_town", StoreConfig::default().with_partition_column("town")),
        (
            "by_town_zoned",
            StoreConfig::default()
                .with_partition_column("town")
                .with_zone_map_column("floor_area_sqm"),
        ),
    ];

    let mut group = c.benchmark_group("scan");
    group.sample_size(20);
    for (name, layout) in layouts {
        let store = ColumnStore::load_from_reader(csv.as_bytes(), &layout).unwrap();
        let plan = FilterPlan::for_query(
            &params,
            &ScanConfig::default(),
            store.table().partition_column(),
        );
        group.bench_function(format!("shared/{name}"), |b| {
            b.iter(|| black_box(shared_scan(&store, &plan).unwrap()))
        });
        group.bench_function(format!("normal/{name}"), |b| {
            b.iter(|| black_box(normal_scan(&store, &plan).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scans);
criterion_main!(benches);
