//! # Domain Models
//!
//! Canonical price-history types for tickcast.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Trimmed, upper-cased ticker used as the cache key |
//! | [`PricePoint`] | One dated closing price |
//! | [`PriceSeries`] | Immutable oldest-first series of at most [`MAX_DAYS`] points |
//! | [`SeriesOrigin`] | Whether a series is live provider data or fallback mock data |
//!
//! ## Ordering
//!
//! Every series produced by the fetch and cache layers is chronological
//! ascending. The most recent price is always the **last** element;
//! consumers that want newest-first call [`PriceSeries::newest_first`].

mod price;
mod symbol;

pub use price::{PricePoint, PriceSeries, SeriesOrigin, MAX_DAYS};
pub use symbol::Symbol;
