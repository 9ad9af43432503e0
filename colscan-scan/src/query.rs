//! Turning an identifier string into query parameters.

use std::fmt;

use colscan_result::{Error, Result};

/// Town and month range of one query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams {
    pub town: String,
    /// Inclusive start, `YYYY-MM`.
    pub start_year_month: String,
    /// Inclusive end, `YYYY-MM`.
    pub end_year_month: String,
}

impl QueryParams {
    /// Year part of the start month.
    pub fn year(&self) -> &str {
        self.start_year_month.get(..4).unwrap_or("")
    }

    /// Month part of the start month.
    pub fn month(&self) -> &str {
        self.start_year_month.get(5..7).unwrap_or("")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} to {}",
            self.town, self.start_year_month, self.end_year_month
        )
    }
}

/// Lookup tables indexed by identifier digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryCatalog {
    pub towns: Vec<String>,
    pub years: Vec<String>,
}

impl Default for QueryCatalog {
    fn default() -> Self {
        let towns = [
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
        let years = [
            "2020", "2021", "2022", "2023", "2014", "2015", "2016", "2017", "2018", "2019",
        ];
        Self {
            towns: towns.into_iter().map(String::from).collect(),
            years: years.into_iter().map(String::from).collect(),
        }
    }
}

impl QueryCatalog {
    /// Derive a query from the trailing digits of `identifier`.
    ///
    /// Counting from the end: the second-to-last character picks the year, the
    /// third-to-last the month (`0` meaning October), the fourth-to-last the
    /// town. The range covers the chosen month and the one after it.
    pub fn preprocess(&self, identifier: &str) -> Result<QueryParams> {
        let chars: Vec<char> = identifier.trim().chars().collect();
        if chars.len() < 4 {
            return Err(Error::InvalidArgumentError(format!(
                "identifier '{identifier}' needs at least 4 characters"
            )));
        }
        let digit = |from_end: usize, role: &str| -> Result<usize> {
            let c = chars[chars.len() - from_end];
            c.to_digit(10).map(|d| d as usize).ok_or_else(|| {
                Error::InvalidArgumentError(format!(
                    "identifier '{identifier}': {role} position holds '{c}', not a digit"
                ))
            })
        };

        let year_digit = digit(2, "year")?;
        let month = match digit(3, "month")? {
            0 => 10,
            m => m,
        };
        let town_digit = digit(4, "town")?;

        let year = lookup(&self.years, year_digit, "year")?;
        let town = lookup(&self.towns, town_digit, "town")?;

        Ok(QueryParams {
            town: town.to_string(),
            start_year_month: format!("{year}-{month:02}"),
            end_year_month: format!("{year}-{:02}", month + 1),
        })
    }
}

fn lookup<'a>(table: &'a [String], digit: usize, role: &str) -> Result<&'a str> {
    table.get(digit).map(String::as_str).ok_or_else(|| {
        Error::InvalidArgumentError(format!("no {role} configured for digit {digit}"))
    })
}

/// [`QueryCatalog::preprocess`] against the default catalog.
pub fn preprocess(identifier: &str) -> Result<QueryParams> {
    QueryCatalog::default().preprocess(identifier)
}
