use std::fmt;
use std::str::FromStr;

use colscan_result::Error;

pub type AggregateResult<T> = Result<T, Error>;

/// Statistic reported for a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatCategory {
    MinimumPrice,
    AveragePrice,
    StandardDeviationOfPrice,
    MinimumPricePerSquareMeter,
}

impl StatCategory {
    /// Every category, in report order.
    pub const ALL: [StatCategory; 4] = [
        StatCategory::MinimumPrice,
        StatCategory::AveragePrice,
        StatCategory::StandardDeviationOfPrice,
        StatCategory::MinimumPricePerSquareMeter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatCategory::MinimumPrice => "Minimum Price",
            StatCategory::AveragePrice => "Average Price",
            StatCategory::StandardDeviationOfPrice => "Standard Deviation of Price",
            StatCategory::MinimumPricePerSquareMeter => "Minimum Price per Square Meter",
        }
    }

    /// Whether computing this category needs the floor-area projection.
    pub fn needs_area(self) -> bool {
        matches!(self, StatCategory::MinimumPricePerSquareMeter)
    }

    /// Compute this category from aligned price and area projections.
    ///
    /// `areas` is ignored unless [`needs_area`](Self::needs_area).
    pub fn compute(self, prices: &[f64], areas: &[f64]) -> f64 {
        match self {
            StatCategory::MinimumPrice => Statistics::min(prices),
            StatCategory::AveragePrice => Statistics::average(prices),
            StatCategory::StandardDeviationOfPrice => Statistics::standard_deviation(prices),
            StatCategory::MinimumPricePerSquareMeter => {
                Statistics::min_price_per_sqm(prices, areas)
            }
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgumentError(format!("unknown statistic '{s}'")))
    }
}

/// One computed statistic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryValue {
    pub category: StatCategory,
    pub value: f64,
}

impl CategoryValue {
    /// The value with two decimals; `NaN` stays `NaN`.
    pub fn formatted(&self) -> String {
        format_value(self.value)
    }
}

pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Streaming minimum, mean and variance over one pass of values.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriceAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    min: Option<f64>,
}

impl PriceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> f64 {
        self.min.unwrap_or(f64::NAN)
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Population standard deviation; `NaN` for fewer than two values.
    pub fn std_dev(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

impl Extend<f64> for PriceAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.update(v);
        }
    }
}

/// Stateless statistics over filtered projections. Empty input yields `NaN`.
pub struct Statistics;

impl Statistics {
    pub fn min(values: &[f64]) -> f64 {
        Self::accumulate(values).min()
    }

    pub fn average(values: &[f64]) -> f64 {
        Self::accumulate(values).mean()
    }

    pub fn standard_deviation(values: &[f64]) -> f64 {
        Self::accumulate(values).std_dev()
    }

    /// Smallest `price / area` over aligned pairs. `NaN` when either side is
    /// empty or the lengths differ.
    pub fn min_price_per_sqm(prices: &[f64], areas: &[f64]) -> f64 {
        if prices.is_empty() || prices.len() != areas.len() {
            return f64::NAN;
        }
        prices
            .iter()
            .zip(areas)
            .map(|(p, a)| p / a)
            .fold(f64::INFINITY, f64::min)
    }

    /// Every category from one pass over the projections.
    pub fn compute_all(prices: &[f64], areas: &[f64]) -> Vec<CategoryValue> {
        let acc = Self::accumulate(prices);
        StatCategory::ALL
            .into_iter()
            .map(|category| {
                let value = match category {
                    StatCategory::MinimumPrice => acc.min(),
                    StatCategory::AveragePrice => acc.mean(),
                    StatCategory::StandardDeviationOfPrice => acc.std_dev(),
                    StatCategory::MinimumPricePerSquareMeter => {
                        Self::min_price_per_sqm(prices, areas)
                    }
                };
                CategoryValue { category, value }
            })
            .collect()
    }

    fn accumulate(values: &[f64]) -> PriceAccumulator {
        let mut acc = PriceAccumulator::new();
        acc.extend(values.iter().copied());
        acc
    }
}
