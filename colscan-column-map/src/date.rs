//! Date parsing for date-range predicates.
//!
//! Accepted forms are `YYYY`, `YYYY-MM` and `YYYY-MM-DD`. A bare year means
//! January 1 and a year-month means the first of that month.

use colscan_result::{Error, Result};
use time::{Date, Month};

/// Parse a stored cell or partition key. `None` when it is not a date.
pub fn parse_date(text: &str) -> Option<Date> {
    let mut parts = text.trim().split('-');
    let year = parse_component::<i32>(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(m) => Month::try_from(parse_component::<u8>(m, 2)?).ok()?,
        None => Month::January,
    };
    let day = match parts.next() {
        Some(d) => parse_component::<u8>(d, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    Date::from_calendar_date(year, month, day).ok()
}

/// Parse a query bound, failing on anything [`parse_date`] rejects.
pub fn parse_bound(text: &str) -> Result<Date> {
    parse_date(text).ok_or_else(|| {
        Error::InvalidArgumentError(format!(
            "cannot parse date bound '{text}' (expected YYYY, YYYY-MM or YYYY-MM-DD)"
        ))
    })
}

fn parse_component<T: std::str::FromStr>(part: &str, digits: usize) -> Option<T> {
    if part.len() != digits || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
