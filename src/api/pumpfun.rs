use crate::api::types::{RawCoin, RawTrade};
use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::metrics::{API_CALLS, API_ERRORS, API_LATENCY};
use log::{debug, error, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

const METRICS_LABEL: &str = "pumpfun";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSort {
    MarketCap,
    LastReply,
    CreatedTimestamp,
}

impl CoinSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinSort::MarketCap => "market_cap",
            CoinSort::LastReply => "last_reply",
            CoinSort::CreatedTimestamp => "created_timestamp",
        }
    }
}

/// One page of the `/coins` listing, always in descending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinQuery {
    pub offset: usize,
    pub limit: usize,
    pub sort: CoinSort,
    pub search_term: Option<String>,
}

impl CoinQuery {
    pub fn page(sort: CoinSort, offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            sort,
            search_term: None,
        }
    }

    pub fn search(term: &str, offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            sort: CoinSort::MarketCap,
            search_term: Some(term.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PumpFunClient {
    client: Client,
    base_url: String,
    include_nsfw: bool,
}

impl PumpFunClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, header_value(config.site_url.trim_end_matches('/'))?);
        headers.insert(REFERER, header_value(&format!("{}/", config.site_url.trim_end_matches('/')))?);
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            include_nsfw: config.include_nsfw,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn coin_params(&self, query: &CoinQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("offset", query.offset.to_string()),
            ("limit", query.limit.to_string()),
            ("sort", query.sort.as_str().to_string()),
            ("order", "DESC".to_string()),
            ("includeNsfw", self.include_nsfw.to_string()),
        ];
        if let Some(term) = &query.search_term {
            params.push(("searchTerm", term.clone()));
        }
        params
    }

    /// Issues a GET and returns the body, or `None` when the upstream answers 404.
    async fn get_body(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Fetching {} with params {:?}", url, params);

        API_CALLS.with_label_values(&[METRICS_LABEL]).inc();
        let timer = API_LATENCY.with_label_values(&[METRICS_LABEL]).start_timer();
        let result = self.send(&url, params).await;
        timer.observe_duration();

        if let Err(e) = &result {
            API_ERRORS.with_label_values(&[METRICS_LABEL]).inc();
            error!("Request to {} failed: {}", url, e);
        }
        result
    }

    async fn send(&self, url: &str, params: &[(&str, String)]) -> Result<Option<String>> {
        let response = self.client.get(url).query(params).send().await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("pump.fun rate limit hit on {}", url);
                Err(Error::RateLimitExceeded("pump.fun API rate limit exceeded".to_string()))
            }
            status => Err(Error::ApiError(format!(
                "pump.fun request failed with status: {}",
                status
            ))),
        }
    }

    /// Fetches a listing endpoint. A missing endpoint or an empty body is an
    /// upstream failure, never an empty list.
    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<T>> {
        let body = self.get_body(endpoint, params).await?.ok_or_else(|| {
            Error::ApiError(format!("pump.fun endpoint {} answered 404", endpoint))
        })?;
        parse_body(endpoint, &body)?.ok_or_else(|| {
            Error::ApiInvalidFormat(format!("Empty response from {}", endpoint))
        })
    }

    pub async fn get_coins(&self, query: &CoinQuery) -> Result<Vec<RawCoin>> {
        let params = self.coin_params(query);
        info!(
            "Fetching coins (sort: {}, offset: {}, limit: {})",
            query.sort.as_str(),
            query.offset,
            query.limit
        );
        let coins: Vec<RawCoin> = self.get_list("coins", &params).await?;
        info!("Received {} coins", coins.len());
        Ok(coins)
    }

    /// Looks up one coin; 404 and empty bodies mean the mint is unknown.
    pub async fn get_coin(&self, mint: &str) -> Result<Option<RawCoin>> {
        let endpoint = format!("coins/{}", mint);
        match self.get_body(&endpoint, &[]).await? {
            Some(body) => parse_body(&endpoint, &body),
            None => Ok(None),
        }
    }

    pub async fn get_trades(&self, mint: &str, limit: usize) -> Result<Vec<RawTrade>> {
        let params = [
            ("limit", limit.to_string()),
            ("offset", "0".to_string()),
            ("minimumSize", "0".to_string()),
        ];
        let trades: Vec<RawTrade> = self.get_list(&format!("trades/all/{}", mint), &params).await?;
        debug!("Received {} trades for {}", trades.len(), mint);
        Ok(trades)
    }
}

/// Parses a JSON body; `None` for an empty or `null` body.
fn parse_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Option<T>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some).map_err(|e| {
        error!("Invalid JSON from {}: {}", endpoint, e);
        Error::ApiInvalidFormat(format!("Invalid response from {}: {}", endpoint, e))
    })
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::ConfigError(format!("Invalid header value {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    fn closed_port_config() -> UpstreamConfig {
        UpstreamConfig {
            // Port 1 is reserved and nothing listens there.
            base_url: "http://127.0.0.1:1/".to_string(),
            timeout_secs: 2,
            ..UpstreamConfig::default()
        }
    }

    #[test]
    fn test_coin_params() {
        let client = PumpFunClient::new(&closed_port_config()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1");

        let params = client.coin_params(&CoinQuery::page(CoinSort::MarketCap, 50, 50));
        assert!(params.contains(&("offset", "50".to_string())));
        assert!(params.contains(&("sort", "market_cap".to_string())));
        assert!(params.contains(&("order", "DESC".to_string())));
        assert!(params.contains(&("includeNsfw", "false".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "searchTerm"));

        let params = client.coin_params(&CoinQuery::search("PEPE", 50, 50));
        assert!(params.contains(&("searchTerm", "PEPE".to_string())));
        assert!(params.contains(&("offset", "50".to_string())));
    }

    #[test]
    fn test_invalid_user_agent_is_config_error() {
        let config = UpstreamConfig {
            user_agent: "bad\nagent".to_string(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(PumpFunClient::new(&config), Err(Error::ConfigError(_))));
    }

    /// Serves `body` with `status` on every path and returns the base URL.
    fn spawn_stub(status: u16, body: &'static str) -> UpstreamConfig {
        let status = warp::http::StatusCode::from_u16(status).unwrap();
        let stub = warp::any().map(move || warp::reply::with_status(body, status));
        let (addr, server) = warp::serve(stub).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        UpstreamConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 2,
            ..UpstreamConfig::default()
        }
    }

    #[tokio::test]
    async fn test_listing_404_is_an_error() {
        let client = PumpFunClient::new(&spawn_stub(404, "Not Found")).unwrap();

        let err = client
            .get_coins(&CoinQuery::page(CoinSort::MarketCap, 0, 50))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ApiError(_)));
        assert!(matches!(client.get_trades("mint", 10).await, Err(Error::ApiError(_))));

        assert_eq!(client.get_coin("mint").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_listing_empty_body_is_invalid_format() {
        let client = PumpFunClient::new(&spawn_stub(200, "null")).unwrap();

        let err = client
            .get_coins(&CoinQuery::page(CoinSort::LastReply, 0, 50))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "upstream_invalid_response");
        assert_eq!(client.get_coin("mint").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_listing_is_ok() {
        let client = PumpFunClient::new(&spawn_stub(200, "[]")).unwrap();
        let coins = client
            .get_coins(&CoinQuery::page(CoinSort::MarketCap, 0, 50))
            .await
            .unwrap();
        assert!(coins.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let client = PumpFunClient::new(&closed_port_config()).unwrap();
        let result = client.get_coins(&CoinQuery::page(CoinSort::MarketCap, 0, 50)).await;
        match result {
            Err(e) => assert_eq!(e.kind(), "upstream_unavailable"),
            Ok(coins) => panic!("expected failure, got {} coins", coins.len()),
        }
    }
}
