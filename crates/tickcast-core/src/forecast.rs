//! Short-horizon forecasts over a chronological-ascending price series.
//!
//! All functions are pure and deterministic. Invalid arguments are always a
//! [`ValidationError`]; nothing here falls back to substitute data.
//!
//! | Method | Function | Output |
//! |--------|----------|--------|
//! | Moving average | [`moving_average`] | `len - window + 1` trailing means |
//! | Linear trend | [`linear_extrapolate`] | [`TrendForecast`] (`[current, next]`) |
//! | Exponential smoothing | [`exponential_smooth`] | `len + 1` smoothed values |

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PriceSeries, ValidationError};

pub const DEFAULT_WINDOW: usize = 5;
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Simple moving average over every full window, in input order.
///
/// # Errors
///
/// Fails if `prices` is empty or `window` is zero or longer than `prices`.
pub fn moving_average(prices: &[f64], window: usize) -> Result<Vec<f64>, ValidationError> {
    ensure_not_empty(prices)?;
    if window == 0 || window > prices.len() {
        return Err(ValidationError::InvalidWindow {
            window,
            len: prices.len(),
        });
    }

    Ok(prices
        .windows(window)
        .map(|slice| slice.iter().sum::<f64>() / window as f64)
        .collect())
}

/// Least-squares line of price against index, fitted over the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    /// The last price of the series.
    pub current: f64,
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted on.
    pub len: usize,
}

impl TrendForecast {
    /// Fitted value `steps_ahead` points past the last one.
    pub fn predict(&self, steps_ahead: usize) -> f64 {
        let x = (self.len + steps_ahead) as f64 - 1.0;
        self.intercept + self.slope * x
    }

    pub fn next(&self) -> f64 {
        self.predict(1)
    }

    /// `[current, next]`.
    pub fn values(&self) -> [f64; 2] {
        [self.current, self.next()]
    }

    /// `[current, next, two steps ahead]`.
    pub fn with_two_ahead(&self) -> [f64; 3] {
        [self.current, self.next(), self.predict(2)]
    }
}

/// Fit a trend line over the entire series and extrapolate it.
///
/// A single point fits a flat line through it.
///
/// # Errors
///
/// Fails if `prices` is empty.
pub fn linear_extrapolate(prices: &[f64]) -> Result<TrendForecast, ValidationError> {
    let current = *prices.last().ok_or(ValidationError::EmptySeries)?;

    let n = prices.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = prices.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in prices.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };

    Ok(TrendForecast {
        current,
        slope,
        intercept: y_mean - slope * x_mean,
        len: prices.len(),
    })
}

/// Exponentially smoothed series seeded with the first price, followed by the
/// one-step-ahead forecast.
///
/// # Errors
///
/// Fails if `prices` is empty or `alpha` is not strictly between 0 and 1.
pub fn exponential_smooth(prices: &[f64], alpha: f64) -> Result<Vec<f64>, ValidationError> {
    ensure_not_empty(prices)?;
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(ValidationError::InvalidAlpha { alpha });
    }

    let mut smoothed = Vec::with_capacity(prices.len() + 1);
    let mut level = prices[0];
    smoothed.push(level);
    for &price in &prices[1..] {
        level = alpha * price + (1.0 - alpha) * level;
        smoothed.push(level);
    }

    let last = prices[prices.len() - 1];
    smoothed.push(alpha * last + (1.0 - alpha) * level);

    Ok(smoothed)
}

fn ensure_not_empty(prices: &[f64]) -> Result<(), ValidationError> {
    if prices.is_empty() {
        Err(ValidationError::EmptySeries)
    } else {
        Ok(())
    }
}

/// Selectable forecast method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum ForecastMethod {
    MovingAverage { window: usize },
    LinearTrend,
    ExponentialSmoothing { alpha: f64 },
}

impl ForecastMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MovingAverage { .. } => "moving-average",
            Self::LinearTrend => "linear",
            Self::ExponentialSmoothing { .. } => "exponential",
        }
    }

    /// Run this method over `series`' prices.
    pub fn apply(self, series: &PriceSeries) -> Result<Forecast, ValidationError> {
        self.apply_prices(&series.prices())
    }

    pub fn apply_prices(self, prices: &[f64]) -> Result<Forecast, ValidationError> {
        match self {
            Self::MovingAverage { window } => moving_average(prices, window).map(Forecast::Series),
            Self::LinearTrend => linear_extrapolate(prices).map(Forecast::Trend),
            Self::ExponentialSmoothing { alpha } => {
                exponential_smooth(prices, alpha).map(Forecast::Series)
            }
        }
    }
}

impl Display for ForecastMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = ValidationError;

    /// Parses a method name with default parameters.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "moving-average" | "moving_average" | "ma" => Ok(Self::MovingAverage {
                window: DEFAULT_WINDOW,
            }),
            "linear" | "linear-trend" | "linear_regression" => Ok(Self::LinearTrend),
            "exponential" | "exponential-smoothing" | "ema" => Ok(Self::ExponentialSmoothing {
                alpha: DEFAULT_ALPHA,
            }),
            _ => Err(ValidationError::InvalidMethod {
                value: value.to_owned(),
            }),
        }
    }
}

/// Output of a [`ForecastMethod`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Forecast {
    Series(Vec<f64>),
    Trend(TrendForecast),
}

impl Forecast {
    /// Flat values: the series itself, or `[current, next]` for a trend.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::Series(values) => values.clone(),
            Self::Trend(trend) => trend.values().to_vec(),
        }
    }
}
