use std::fmt;
use std::str::FromStr;

use colscan_result::Error;

/// Comparison operator of a range predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeOp {
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
}

impl RangeOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RangeOp::GreaterThan => ">",
            RangeOp::GreaterThanOrEquals => ">=",
            RangeOp::LessThan => "<",
            RangeOp::LessThanOrEquals => "<=",
        }
    }

    /// `value <op> threshold`.
    #[inline]
    pub fn evaluate(self, value: f64, threshold: f64) -> bool {
        match self {
            RangeOp::GreaterThan => value > threshold,
            RangeOp::GreaterThanOrEquals => value >= threshold,
            RangeOp::LessThan => value < threshold,
            RangeOp::LessThanOrEquals => value <= threshold,
        }
    }

    /// Whether some value in `[min, max]` can satisfy `value <op> threshold`.
    #[inline]
    pub fn may_overlap(self, min: f64, max: f64, threshold: f64) -> bool {
        match self {
            RangeOp::GreaterThan => max > threshold,
            RangeOp::GreaterThanOrEquals => max >= threshold,
            RangeOp::LessThan => min < threshold,
            RangeOp::LessThanOrEquals => min <= threshold,
        }
    }
}

impl FromStr for RangeOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(RangeOp::GreaterThan),
            ">=" => Ok(RangeOp::GreaterThanOrEquals),
            "<" => Ok(RangeOp::LessThan),
            "<=" => Ok(RangeOp::LessThanOrEquals),
            other => Err(Error::InvalidArgumentError(format!(
                "Invalid operator: {other}"
            ))),
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_symbols() {
        for op in [
            RangeOp::GreaterThan,
            RangeOp::GreaterThanOrEquals,
            RangeOp::LessThan,
            RangeOp::LessThanOrEquals,
        ] {
            assert_eq!(op.symbol().parse::<RangeOp>().unwrap(), op);
        }
    }

    #[test]
    fn rejects_unknown_symbols() {
        let err = "!=".parse::<RangeOp>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(msg) if msg.contains("!=")));
        assert!("=>".parse::<RangeOp>().is_err());
    }

    #[test]
    fn overlap_uses_the_relevant_bound() {
        assert!(RangeOp::GreaterThanOrEquals.may_overlap(60.0, 80.0, 80.0));
        assert!(!RangeOp::GreaterThan.may_overlap(60.0, 80.0, 80.0));
        assert!(RangeOp::LessThanOrEquals.may_overlap(80.0, 90.0, 80.0));
        assert!(!RangeOp::LessThan.may_overlap(80.0, 90.0, 80.0));
    }
}
