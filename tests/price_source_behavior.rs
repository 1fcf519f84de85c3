//! Behavior-driven tests for the price source client
//!
//! These tests verify HOW the system treats caller input versus upstream
//! failures: bad input is a hard error, bad remote data degrades to the
//! documented fallback series.

use std::sync::{Arc, Mutex};

use tickcast_core::{
    fetch_prices, FetchErrorKind, HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse,
    NoopHttpClient, PriceSource, SeriesOrigin, SourceConfig, Symbol, ValidationError,
    YahooPriceSource, MAX_DAYS, MOCK_PRICES,
};

/// Replays one canned outcome for every request and records what was sent.
struct ScriptedHttpClient {
    outcome: Result<HttpResponse, HttpError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn responding(outcome: Result<HttpResponse, HttpError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        self.requests.lock().expect("lock").push(request);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

fn source(client: Arc<ScriptedHttpClient>) -> YahooPriceSource {
    let config = SourceConfig::default().with_chart_url("http://stub.test/v8/finance/chart");
    YahooPriceSource::new(config, client)
}

fn chart_body(days: i64) -> String {
    let first = 1_714_570_200_i64;
    let timestamps: Vec<String> = (0..days).map(|d| (first + d * 86_400).to_string()).collect();
    let closes: Vec<String> = (0..days).map(|d| format!("{}.25", 100 + d)).collect();
    format!(
        r#"{{"chart":{{"result":[{{"timestamp":[{}],"indicators":{{"quote":[{{"close":[{}]}}],"adjclose":[{{"adjclose":[{}]}}]}}}}],"error":null}}}}"#,
        timestamps.join(","),
        closes.join(","),
        closes.join(",")
    )
}

// =============================================================================
// Price Source: Valid Response Handling
// =============================================================================

#[tokio::test]
async fn when_provider_returns_history_system_yields_trailing_ascending_series() {
    // Given: A provider returning 45 days of closes
    let client = ScriptedHttpClient::responding(Ok(HttpResponse::ok_json(chart_body(45))));
    let source = source(client.clone());

    // When: The system fetches prices for a lower-case symbol
    let series = fetch_prices(&source, " msft ").await.expect("valid symbol");

    // Then: The newest 30 points are returned oldest first
    assert_eq!(series.origin(), SeriesOrigin::Live);
    assert_eq!(series.symbol().as_str(), "MSFT");
    assert_eq!(series.len(), MAX_DAYS);
    assert_eq!(series.points()[0].price, 115.25);
    assert_eq!(series.latest().map(|p| p.price), Some(144.25));
    assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn when_provider_returns_short_history_system_keeps_all_of_it() {
    // Given: A newly listed symbol with three sessions
    let client = ScriptedHttpClient::responding(Ok(HttpResponse::ok_json(chart_body(3))));
    let source = source(client);

    // When: The system fetches prices
    let series = source.fetch_prices("NEWCO").await.expect("valid symbol");

    // Then: All three points are kept
    assert_eq!(series.prices(), vec![100.25, 101.25, 102.25]);
}

// =============================================================================
// Price Source: Upstream Failure Fallback
// =============================================================================

#[tokio::test]
async fn when_provider_returns_server_error_system_serves_mock_series() {
    // Given: The provider is failing with HTTP 500
    let client = ScriptedHttpClient::responding(Ok(HttpResponse::with_status(500, "oops")));
    let source = source(client);

    // When: The system fetches prices
    let series = source.fetch_prices("AAPL").await.expect("fallback, not an error");

    // Then: The documented mock series is returned
    assert_eq!(series.origin(), SeriesOrigin::Mock);
    assert_eq!(series.prices(), MOCK_PRICES.to_vec());
}

#[tokio::test]
async fn when_provider_times_out_system_serves_mock_series() {
    // Given: Every request times out
    let client = ScriptedHttpClient::responding(Err(HttpError::timeout("read timed out")));
    let source = source(client);

    // When: The system fetches prices
    let series = source.fetch_prices("AAPL").await.expect("fallback, not an error");

    // Then: The mock series is returned
    assert!(series.is_mock());
    assert_eq!(series.prices(), MOCK_PRICES.to_vec());
}

#[tokio::test]
async fn when_provider_returns_malformed_json_system_serves_mock_series() {
    // Given: The provider answers with an HTML error page
    let client =
        ScriptedHttpClient::responding(Ok(HttpResponse::ok_json("<html>rate limited</html>")));
    let source = source(client);

    // When: The system fetches prices
    let series = source.fetch_prices("AAPL").await.expect("fallback, not an error");

    // Then: The mock series is returned and is still ascending
    assert_eq!(series.prices(), MOCK_PRICES.to_vec());
    assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn when_provider_reports_unknown_symbol_live_fetch_exposes_upstream_error() {
    // Given: The provider reports an error object
    let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
    let client = ScriptedHttpClient::responding(Ok(HttpResponse::ok_json(body)));
    let source = source(client);
    let symbol = Symbol::parse("NOPE").expect("valid");

    // When: The system performs a live fetch without fallback
    let error = source
        .fetch_live(&symbol, source.current_window())
        .await
        .expect_err("provider error must surface");

    // Then: The error is classified as an upstream failure
    assert_eq!(error.kind(), FetchErrorKind::Upstream);

    // And: The fallback path still yields the mock series
    assert!(source.fetch(&symbol).await.is_mock());
}

#[tokio::test]
async fn when_offline_transport_is_used_system_serves_mock_series() {
    // Given: A source wired to the offline transport
    let source = YahooPriceSource::new(SourceConfig::default(), Arc::new(NoopHttpClient));

    // When: The system fetches prices
    let series = source.fetch_prices("AAPL").await.expect("valid symbol");

    // Then: The mock series is returned
    assert_eq!(series.prices(), MOCK_PRICES.to_vec());
}

// =============================================================================
// Price Source: Input Validation
// =============================================================================

#[tokio::test]
async fn when_symbol_is_blank_system_returns_validation_error_even_if_fallback_applies() {
    // Given: A provider that would trigger the fallback path
    let client = ScriptedHttpClient::responding(Err(HttpError::new("connection refused")));
    let source = source(client.clone());

    // When: The caller passes empty, blank and missing symbols
    let empty = source.fetch_prices("").await;
    let blank = source.fetch_prices(" \t ").await;
    let missing = Symbol::parse_opt(None);

    // Then: All fail with the validation error and nothing is sent upstream
    assert_eq!(empty.expect_err("empty"), ValidationError::EmptySymbol);
    assert_eq!(blank.expect_err("blank"), ValidationError::EmptySymbol);
    assert_eq!(missing.expect_err("missing"), ValidationError::EmptySymbol);
    assert_eq!(client.request_count(), 0);
}
