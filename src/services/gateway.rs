use crate::api::{CoinQuery, CoinSort, RawCoin, Upstream};
use crate::config::GatewayConfig;
use crate::error::{Error, Result};
use crate::models::{Holder, Thread, Token, Trade};
use crate::validation::{looks_like_mint, validate_limit, validate_symbol};
use log::{debug, info};
use std::sync::Arc;

/// The five read operations exposed over HTTP.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct Gateway {
    upstream: Arc<dyn Upstream>,
    settings: GatewayConfig,
}

impl Gateway {
    pub fn new(upstream: Arc<dyn Upstream>, settings: GatewayConfig) -> Self {
        Self { upstream, settings }
    }

    /// Top tokens by market cap, paging through the upstream until `limit` is reached.
    pub async fn list_tokens(&self, limit: Option<usize>) -> Result<Vec<Token>> {
        let limit = validate_limit(limit)?.unwrap_or(self.settings.default_token_limit);
        if limit > self.settings.max_token_limit {
            return Err(Error::ValidationError(format!(
                "limit cannot exceed {}",
                self.settings.max_token_limit
            )));
        }

        let page_size = self.settings.page_size;
        let mut coins: Vec<RawCoin> = Vec::with_capacity(limit);
        let mut offset = 0;

        while coins.len() < limit {
            let batch = self
                .upstream
                .fetch_coins(&CoinQuery::page(CoinSort::MarketCap, offset, page_size))
                .await?;
            if batch.is_empty() {
                info!("No more tokens available");
                break;
            }
            let received = batch.len();
            coins.extend(batch);
            if received < page_size {
                break;
            }
            offset += page_size;
        }

        info!("Received total of {} tokens from upstream", coins.len());
        coins.truncate(limit);
        coins.into_iter().map(RawCoin::into_token).collect()
    }

    pub async fn token(&self, symbol: &str) -> Result<Token> {
        self.resolve(symbol).await?.into_token()
    }

    /// Trades for a token, most recent first.
    pub async fn trades(&self, symbol: &str, limit: Option<usize>) -> Result<Vec<Trade>> {
        let limit = validate_limit(limit)?;
        let coin = self.resolve(symbol).await?;
        let raw = self
            .upstream
            .fetch_trades(&coin.mint, self.settings.trade_fetch_limit)
            .await?;

        let mut trades = raw
            .into_iter()
            .map(|trade| trade.into_trade(&coin.symbol))
            .collect::<Result<Vec<_>>>()?;
        trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(truncate(trades, limit))
    }

    /// Coin boards with the most recent reply activity first.
    pub async fn threads(&self, limit: Option<usize>) -> Result<Vec<Thread>> {
        let limit = validate_limit(limit)?;
        let coins = self
            .upstream
            .fetch_coins(&CoinQuery::page(
                CoinSort::LastReply,
                0,
                self.settings.thread_fetch_limit,
            ))
            .await?;

        let mut threads = coins
            .into_iter()
            .map(RawCoin::into_thread)
            .collect::<Result<Vec<_>>>()?;
        threads.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(truncate(threads, limit))
    }

    /// Largest holders of a token, biggest balance first.
    pub async fn holders(&self, symbol: &str) -> Result<Vec<Holder>> {
        let coin = self.resolve(symbol).await?;
        self.upstream
            .fetch_holders(&coin.mint)
            .await?
            .into_holders(&coin.symbol)
    }

    /// Maps a path identifier to an upstream coin: mint addresses are looked up
    /// directly, anything else is searched and matched on the ticker. At most
    /// `search_pages` pages of `search_limit` candidates are scanned.
    async fn resolve(&self, identifier: &str) -> Result<RawCoin> {
        validate_symbol(identifier)?;

        if looks_like_mint(identifier) {
            debug!("Resolving {} as a mint address", identifier);
            return self
                .upstream
                .fetch_coin(identifier)
                .await?
                .ok_or_else(|| not_found(identifier));
        }

        // Search pages arrive by market cap, so the first match is the largest.
        let wanted = identifier.to_lowercase();
        let limit = self.settings.search_limit;
        for page in 0..self.settings.search_pages {
            let candidates = self
                .upstream
                .fetch_coins(&CoinQuery::search(identifier, page * limit, limit))
                .await?;
            debug!(
                "Search page {} for {} returned {} candidates",
                page,
                identifier,
                candidates.len()
            );

            let received = candidates.len();
            if let Some(coin) = candidates
                .into_iter()
                .find(|coin| coin.symbol.to_lowercase() == wanted)
            {
                return Ok(coin);
            }
            if received < limit {
                break;
            }
        }
        Err(not_found(identifier))
    }
}

fn not_found(identifier: &str) -> Error {
    Error::NotFound(format!("Token '{}' not found", identifier))
}

fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}
