//! # Tickcast Core
//!
//! Daily price history retrieval, caching and short-horizon forecasting.
//!
//! ## Overview
//!
//! - **Price source** fetches the trailing 30 calendar days of daily closes
//!   for a ticker and falls back to a fixed mock series when the provider
//!   fails
//! - **Price cache** keeps the latest series per normalized symbol until the
//!   caller forces a refresh
//! - **Forecast engine** derives moving averages, a linear trend and
//!   exponential smoothing from a series
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo chart API) |
//! | [`cache`] | Per-symbol price series cache |
//! | [`config`] | Provider endpoint, user agent and timeouts |
//! | [`data_source`] | Price source trait, fetch window and fallback series |
//! | [`domain`] | Symbol, price point and price series types |
//! | [`error`] | Core error types |
//! | [`forecast`] | Moving average, linear trend and exponential smoothing |
//! | [`http_client`] | HTTP client abstraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickcast_core::{linear_extrapolate, PriceCache, SourceConfig, YahooPriceSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = YahooPriceSource::from_config(SourceConfig::from_env())?;
//!     let cache = PriceCache::new(Arc::new(source));
//!
//!     let series = cache.get("aapl", false).await?;
//!     let trend = linear_extrapolate(&series.prices())?;
//!     println!("{} now {:.2}, next {:.2}", series.symbol(), trend.current, trend.next());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Caller / UI    │
//! └───┬─────────┬───┘
//!     │         │
//!     ▼         ▼
//! ┌─────────┐ ┌──────────────────┐
//! │ Price   │ │ Forecast Engine  │
//! │ Cache   │ │ (pure functions) │
//! └───┬─────┘ └──────────────────┘
//!     │
//!     ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Price Source    │────▶│ HTTP Client      │
//! │ (Yahoo adapter) │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Only caller input errors cross the fetch/cache boundary:
//!
//! ```rust
//! use tickcast_core::{moving_average, ValidationError};
//!
//! let err = moving_average(&[1.0, 2.0], 3).unwrap_err();
//! assert_eq!(err, ValidationError::InvalidWindow { window: 3, len: 2 });
//! ```
//!
//! Upstream failures ([`FetchError`]) are logged through `tracing` and
//! replaced by the fallback series built from [`MOCK_PRICES`].

pub mod adapters;
pub mod cache;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod http_client;

// Adapter implementations
pub use adapters::YahooPriceSource;

// Caching
pub use cache::{CacheMode, PriceCache};

// Configuration
pub use config::SourceConfig;

// Price source trait and types
pub use data_source::{
    fetch_prices, mock_series, FetchError, FetchErrorKind, FetchWindow, PriceSource, SeriesFuture,
    MOCK_PRICES,
};

// Domain models
pub use domain::{PricePoint, PriceSeries, SeriesOrigin, Symbol, MAX_DAYS};

// Error types
pub use error::{CoreError, ValidationError};

// Forecasting
pub use forecast::{
    exponential_smooth, linear_extrapolate, moving_average, Forecast, ForecastMethod,
    TrendForecast,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
