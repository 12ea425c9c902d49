#![allow(dead_code)]

use async_trait::async_trait;
use pump_gateway::api::{
    CoinQuery, CoinSort, RawCoin, RawHolders, RawTrade, RpcTokenAccount, RpcTokenAmount, Upstream,
};
use pump_gateway::config::GatewayConfig;
use pump_gateway::error::{Error, Result};
use pump_gateway::services::Gateway;
use std::collections::HashMap;
use std::sync::Arc;

pub const ABC_MINT: &str = "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr";
pub const XYZ_MINT: &str = "6p6xgHyF7AeE6TZkSmFsko444wqoP15icUSqi2jfGiPN";

/// In-memory upstream that behaves like the pump.fun listing endpoints.
#[derive(Debug, Default, Clone)]
pub struct FakeUpstream {
    pub coins: Vec<RawCoin>,
    pub trades: HashMap<String, Vec<RawTrade>>,
    pub holders: HashMap<String, RawHolders>,
    pub unreachable: bool,
}

impl FakeUpstream {
    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            return Err(Error::ApiConnectionFailed("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch_coins(&self, query: &CoinQuery) -> Result<Vec<RawCoin>> {
        self.check_reachable()?;
        let mut coins: Vec<RawCoin> = self
            .coins
            .iter()
            .filter(|coin| match &query.search_term {
                Some(term) => coin.symbol.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();

        match query.sort {
            CoinSort::MarketCap => {
                coins.sort_by(|a, b| b.usd_market_cap.partial_cmp(&a.usd_market_cap).unwrap())
            }
            CoinSort::LastReply => coins.sort_by_key(|coin| std::cmp::Reverse(coin.last_reply)),
            CoinSort::CreatedTimestamp => {
                coins.sort_by_key(|coin| std::cmp::Reverse(coin.created_timestamp))
            }
        }

        Ok(coins.into_iter().skip(query.offset).take(query.limit).collect())
    }

    async fn fetch_coin(&self, mint: &str) -> Result<Option<RawCoin>> {
        self.check_reachable()?;
        Ok(self.coins.iter().find(|coin| coin.mint == mint).cloned())
    }

    async fn fetch_trades(&self, mint: &str, limit: usize) -> Result<Vec<RawTrade>> {
        self.check_reachable()?;
        Ok(self
            .trades
            .get(mint)
            .map(|trades| trades.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_holders(&self, mint: &str) -> Result<RawHolders> {
        self.check_reachable()?;
        self.holders
            .get(mint)
            .cloned()
            .ok_or_else(|| Error::ApiError(format!("Invalid param: not a Token mint {}", mint)))
    }
}

pub fn create_test_coin(mint: &str, symbol: &str, usd_market_cap: f64) -> RawCoin {
    RawCoin {
        mint: mint.to_string(),
        name: format!("{} Token", symbol),
        symbol: symbol.to_string(),
        description: Some(format!("All about {}", symbol)),
        image_uri: Some(format!("https://cf-ipfs.com/ipfs/{}", symbol)),
        created_timestamp: 1_700_000_000_000,
        usd_market_cap,
        market_cap: usd_market_cap / 150.0,
        total_supply: 1_000_000_000_000_000.0,
        reply_count: 3,
        last_reply: None,
        volume: None,
    }
}

pub fn create_test_trade(mint: &str, signature: &str, timestamp: i64, is_buy: bool) -> RawTrade {
    RawTrade {
        signature: signature.to_string(),
        mint: mint.to_string(),
        sol_amount: 250_000_000,
        token_amount: 5_000_000_000,
        is_buy,
        user: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string(),
        timestamp,
    }
}

/// Two tokens: ABC with five trades and two holders, XYZ with no activity.
pub fn create_test_upstream() -> FakeUpstream {
    let mut abc = create_test_coin(ABC_MINT, "ABC", 50_000.0);
    abc.last_reply = Some(1_700_000_500_000);
    abc.reply_count = 17;
    let mut xyz = create_test_coin(XYZ_MINT, "XYZ", 90_000.0);
    xyz.last_reply = Some(1_700_000_900_000);
    let quiet = create_test_coin("quietmint", "QUIET", 1_000.0);

    let trades = vec![
        create_test_trade(ABC_MINT, "sig3", 1_700_000_300, true),
        create_test_trade(ABC_MINT, "sig1", 1_700_000_100, true),
        create_test_trade(ABC_MINT, "sig5", 1_700_000_500, false),
        create_test_trade(ABC_MINT, "sig2", 1_700_000_200, true),
        create_test_trade(ABC_MINT, "sig4", 1_700_000_400, false),
    ];

    let holders = RawHolders {
        accounts: vec![
            RpcTokenAccount {
                address: "holderB".to_string(),
                amount: RpcTokenAmount { amount: "100000000000000".to_string(), decimals: 6 },
            },
            RpcTokenAccount {
                address: "holderA".to_string(),
                amount: RpcTokenAmount { amount: "200000000000000".to_string(), decimals: 6 },
            },
        ],
        supply: RpcTokenAmount { amount: "1000000000000000".to_string(), decimals: 6 },
    };

    FakeUpstream {
        coins: vec![abc, xyz, quiet],
        trades: HashMap::from([(ABC_MINT.to_string(), trades)]),
        holders: HashMap::from([(ABC_MINT.to_string(), holders)]),
        unreachable: false,
    }
}

pub fn create_test_gateway_config() -> GatewayConfig {
    GatewayConfig {
        page_size: 2,
        ..GatewayConfig::default()
    }
}

pub fn create_test_gateway(upstream: FakeUpstream) -> Arc<Gateway> {
    Arc::new(Gateway::new(Arc::new(upstream), create_test_gateway_config()))
}
