use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::data_source::{mock_series, FetchError, FetchWindow, PriceSource, SeriesFuture};
use crate::http_client::{HttpClient, HttpError, HttpRequest, ReqwestHttpClient};
use crate::{CoreError, PricePoint, PriceSeries, SeriesOrigin, Symbol, ValidationError};

/// Daily close history from the Yahoo Finance chart endpoint.
///
/// One GET per fetch, no retries. Any upstream failure is logged and the
/// fallback series is served instead.
#[derive(Clone)]
pub struct YahooPriceSource {
    config: SourceConfig,
    http_client: Arc<dyn HttpClient>,
    clock: fn() -> OffsetDateTime,
}

impl Default for YahooPriceSource {
    fn default() -> Self {
        Self::new(SourceConfig::default(), Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooPriceSource {
    pub fn new(config: SourceConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Build a source backed by a reqwest client honoring `config`'s timeouts.
    pub fn from_config(config: SourceConfig) -> Result<Self, HttpError> {
        let http_client = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::new(config, Arc::new(http_client)))
    }

    /// Replace the clock that decides where the trailing window ends.
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Validate `symbol` and fetch it, falling back to mock data on upstream failure.
    pub async fn fetch_prices(&self, symbol: &str) -> Result<PriceSeries, ValidationError> {
        crate::data_source::fetch_prices(self, symbol).await
    }

    /// Validate `symbol` and fetch it live, surfacing upstream failures
    /// instead of falling back.
    pub async fn fetch_prices_strict(&self, symbol: &str) -> Result<PriceSeries, CoreError> {
        let symbol = Symbol::parse(symbol)?;
        Ok(self.fetch_live(&symbol, self.current_window()).await?)
    }

    /// The trailing window ending now.
    pub fn current_window(&self) -> FetchWindow {
        FetchWindow::trailing((self.clock)())
    }

    /// Fetch without the fallback policy.
    pub async fn fetch_live(
        &self,
        symbol: &Symbol,
        window: FetchWindow,
    ) -> Result<PriceSeries, FetchError> {
        let endpoint = self.chart_endpoint(symbol, &window);
        debug!(
            %symbol,
            start = window.start_unix(),
            end = window.end_unix(),
            "fetching daily closes from yahoo"
        );

        let request = HttpRequest::get(endpoint)
            .with_header("user-agent", self.config.user_agent.as_str())
            .with_timeout(self.config.read_timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(format!("yahoo request timed out: {}", e.message()))
            } else {
                FetchError::transport(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if !response.is_success() {
            return Err(FetchError::status(response.status));
        }

        parse_chart(symbol, &response.body)
    }

    fn chart_endpoint(&self, symbol: &Symbol, window: &FetchWindow) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.config.chart_url.trim_end_matches('/'),
            urlencoding::encode(symbol.as_str()),
            window.start_unix(),
            window.end_unix()
        )
    }
}

impl PriceSource for YahooPriceSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> SeriesFuture<'a> {
        Box::pin(async move {
            let window = self.current_window();
            match self.fetch_live(symbol, window).await {
                Ok(series) => series,
                Err(error) => {
                    warn!(
                        %symbol,
                        code = error.code(),
                        error = error.message(),
                        "yahoo fetch failed; serving fallback series"
                    );
                    mock_series(symbol, window.end_date())
                }
            }
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

impl YahooChartIndicators {
    /// Adjusted closes when the payload carries any, raw closes otherwise.
    fn closing_prices(&self) -> Option<&[Option<f64>]> {
        let adjusted = self
            .adjclose
            .first()
            .map(|series| series.adjclose.as_slice())
            .filter(|prices| prices.iter().any(Option::is_some));

        adjusted.or_else(|| self.quote.first().map(|quote| quote.close.as_slice()))
    }
}

fn parse_chart(symbol: &Symbol, body: &str) -> Result<PriceSeries, FetchError> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::parse(format!("failed to parse yahoo chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        let description = error
            .description
            .or(error.code)
            .unwrap_or_else(|| String::from("Unknown error"));
        return Err(FetchError::upstream(format!(
            "yahoo chart API error: {}",
            description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::no_data("no result found in chart data"))?;

    let prices = result
        .indicators
        .closing_prices()
        .ok_or_else(|| FetchError::no_data("no quote data found in chart data"))?;

    let mut points = Vec::with_capacity(prices.len());
    for (&ts_value, price) in result.timestamp.iter().zip(prices) {
        let Some(price) = *price else {
            continue;
        };
        let date = OffsetDateTime::from_unix_timestamp(ts_value)
            .map_err(|e| FetchError::parse(format!("invalid timestamp {}: {}", ts_value, e)))?
            .date();
        points.push(PricePoint::new(date, price));
    }

    if points.is_empty() {
        return Err(FetchError::no_data("no valid closing prices found in chart data"));
    }

    Ok(PriceSeries::new(symbol.clone(), SeriesOrigin::Live, points))
}
