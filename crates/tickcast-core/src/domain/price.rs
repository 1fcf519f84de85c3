use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Symbol;

/// Maximum number of daily points a fetched series holds.
pub const MAX_DAYS: usize = 30;

/// A single dated closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub price: f64,
}

impl PricePoint {
    pub const fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }
}

impl Display for PricePoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {:.2}", self.date, self.price)
    }
}

/// Where a series' data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrigin {
    /// Parsed from a successful provider response.
    Live,
    /// Substituted fallback data after an upstream failure.
    Mock,
}

/// Immutable, chronologically ascending price history for one symbol.
///
/// Clones share the same backing storage; there is no way to mutate the
/// points once the series is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: Symbol,
    origin: SeriesOrigin,
    points: Arc<[PricePoint]>,
}

impl PriceSeries {
    /// Build a series, sorting oldest-first and keeping the trailing
    /// [`MAX_DAYS`] points.
    pub fn new(symbol: Symbol, origin: SeriesOrigin, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.date);
        if points.len() > MAX_DAYS {
            points.drain(..points.len() - MAX_DAYS);
        }

        Self {
            symbol,
            origin,
            points: points.into(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn origin(&self) -> SeriesOrigin {
        self.origin
    }

    pub fn is_mock(&self) -> bool {
        self.origin == SeriesOrigin::Mock
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices only, oldest first.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.price).collect()
    }

    /// Most recent point (the last one).
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Points newest first, for display consumers.
    pub fn newest_first(&self) -> Vec<PricePoint> {
        self.points.iter().rev().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}
