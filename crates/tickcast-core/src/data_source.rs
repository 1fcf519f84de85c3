//! Price source trait, fetch window and upstream failure types.
//!
//! A [`PriceSource`] never fails on upstream problems: transport errors,
//! non-2xx statuses and unusable payloads are classified as [`FetchError`],
//! logged, and replaced by the [`mock_series`]. Only caller input errors
//! ([`ValidationError`]) reach the caller, through [`fetch_prices`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tickcast_core::{fetch_prices, YahooPriceSource};
//!
//! async fn latest_close(source: &YahooPriceSource) -> Result<f64, tickcast_core::ValidationError> {
//!     let series = fetch_prices(source, "aapl").await?;
//!     Ok(series.latest().map(|point| point.price).unwrap_or_default())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{PricePoint, PriceSeries, SeriesOrigin, Symbol, ValidationError, MAX_DAYS};

/// Fallback closing prices, oldest first.
pub const MOCK_PRICES: [f64; 5] = [150.0, 152.0, 148.0, 155.0, 153.0];

/// Boxed future returned by [`PriceSource::fetch`].
pub type SeriesFuture<'a> = Pin<Box<dyn Future<Output = PriceSeries> + Send + 'a>>;

/// Contract every price provider adapter implements.
pub trait PriceSource: Send + Sync {
    /// Short provider name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Fetch the trailing daily closes for an already-normalized symbol.
    ///
    /// Upstream failures are absorbed: the returned series is either live
    /// data or the fallback series, chronological ascending, at most
    /// [`MAX_DAYS`] long.
    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> SeriesFuture<'a>;
}

/// Validate `symbol` and fetch its series from `source`.
///
/// # Errors
///
/// Returns [`ValidationError::EmptySymbol`] for blank input, before any
/// network activity.
pub async fn fetch_prices<S>(source: &S, symbol: &str) -> Result<PriceSeries, ValidationError>
where
    S: PriceSource + ?Sized,
{
    let symbol = Symbol::parse(symbol)?;
    Ok(source.fetch(&symbol).await)
}

/// Classification of upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Transport,
    Timeout,
    Status,
    Upstream,
    Parse,
    NoData,
}

/// An upstream or integration failure while fetching prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Timeout, message)
    }

    pub fn status(status: u16) -> Self {
        Self::new(
            FetchErrorKind::Status,
            format!("provider request failed with HTTP status {status}"),
        )
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Upstream, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Parse, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::NoData, message)
    }

    fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::Timeout => "fetch.timeout",
            FetchErrorKind::Status => "fetch.status",
            FetchErrorKind::Upstream => "fetch.upstream",
            FetchErrorKind::Parse => "fetch.parse",
            FetchErrorKind::NoData => "fetch.no_data",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Trailing calendar-day window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl FetchWindow {
    /// The [`MAX_DAYS`] calendar days ending at `end`.
    pub fn trailing(end: OffsetDateTime) -> Self {
        Self::trailing_days(end, MAX_DAYS)
    }

    pub fn trailing_days(end: OffsetDateTime, days: usize) -> Self {
        let span = Duration::days(i64::try_from(days).unwrap_or(i64::MAX / 86_400));
        Self {
            start: end.saturating_sub(span),
            end,
        }
    }

    pub fn start_unix(&self) -> i64 {
        self.start.unix_timestamp()
    }

    pub fn end_unix(&self) -> i64 {
        self.end.unix_timestamp()
    }

    pub fn end_date(&self) -> Date {
        self.end.date()
    }
}

/// The deterministic fallback series: [`MOCK_PRICES`] on consecutive calendar
/// days ending at `end`.
pub fn mock_series(symbol: &Symbol, end: Date) -> PriceSeries {
    let last = MOCK_PRICES.len() as i64 - 1;
    let points = MOCK_PRICES
        .iter()
        .enumerate()
        .map(|(index, &price)| {
            PricePoint::new(end.saturating_sub(Duration::days(last - index as i64)), price)
        })
        .collect();

    PriceSeries::new(symbol.clone(), SeriesOrigin::Mock, points)
}
