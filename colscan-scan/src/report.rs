use std::path::{Path, PathBuf};

use colscan_aggregate::StatCategory;
use colscan_csv::{CsvWriteOptions, CsvWriter};
use colscan_result::Result;

use crate::execute::ScanOutcome;
use crate::query::QueryParams;

pub const REPORT_COLUMNS: [&str; 5] = ["Year", "Month", "Town", "Category", "Value"];

/// Value written for every category when nothing matched.
pub const NO_RESULT: &str = "No result";

pub fn report_file_name(identifier: &str) -> String {
    format!("ScanResult_{identifier}.csv")
}

/// One row per category: year, month, town, category label, value.
pub fn report_rows(params: &QueryParams, outcome: &ScanOutcome) -> Vec<Vec<String>> {
    let row = |category: StatCategory, value: String| {
        vec![
            params.year().to_string(),
            params.month().to_string(),
            params.town.clone(),
            category.label().to_string(),
            value,
        ]
    };
    match outcome {
        ScanOutcome::Computed(values) => values
            .iter()
            .map(|v| row(v.category, v.formatted()))
            .collect(),
        ScanOutcome::NoResult => StatCategory::ALL
            .into_iter()
            .map(|c| row(c, NO_RESULT.to_string()))
            .collect(),
    }
}

/// Write `ScanResult_<identifier>.csv` into `dir` and return its path.
pub fn write_report(
    dir: &Path,
    identifier: &str,
    params: &QueryParams,
    outcome: &ScanOutcome,
) -> Result<PathBuf> {
    let path = dir.join(report_file_name(identifier));
    let rows = report_rows(params, outcome);
    CsvWriter::new(CsvWriteOptions::default()).write_rows_to_path(&path, &REPORT_COLUMNS, &rows)?;
    tracing::info!(target: "colscan::scan", path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use colscan_aggregate::CategoryValue;

    use super::*;

    fn params() -> QueryParams {
        QueryParams {
            town: "BEDOK".into(),
            start_year_month: "2021-01".into(),
            end_year_month: "2021-02".into(),
        }
    }

    #[test]
    fn computed_rows_carry_formatted_values() {
        let outcome = ScanOutcome::Computed(vec![
            CategoryValue {
                category: StatCategory::MinimumPrice,
                value: 310000.0,
            },
            CategoryValue {
                category: StatCategory::StandardDeviationOfPrice,
                value: f64::NAN,
            },
        ]);
        let rows = report_rows(&params(), &outcome);
        assert_eq!(
            rows[0],
            ["2021", "01", "BEDOK", "Minimum Price", "310000.00"]
        );
        assert_eq!(rows[1][4], "NaN");
    }

    #[test]
    fn no_result_fills_every_category() {
        let rows = report_rows(&params(), &ScanOutcome::NoResult);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r[4] == NO_RESULT));
        assert_eq!(rows[3][3], "Minimum Price per Square Meter");
    }

    #[test]
    fn file_name_embeds_identifier() {
        assert_eq!(report_file_name("U2237721K"), "ScanResult_U2237721K.csv");
    }
}
