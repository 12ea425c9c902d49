use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;

pub mod pumpfun;
pub mod solana;
pub mod types;

pub use pumpfun::{CoinQuery, CoinSort, PumpFunClient};
pub use solana::SolanaRpcClient;
pub use types::{RawCoin, RawHolders, RawTrade, RpcTokenAccount, RpcTokenAmount};

/// Source of raw pump.fun data. The gateway only talks to this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch_coins(&self, query: &CoinQuery) -> Result<Vec<RawCoin>>;

    /// `Ok(None)` when the upstream does not know the mint.
    async fn fetch_coin(&self, mint: &str) -> Result<Option<RawCoin>>;

    async fn fetch_trades(&self, mint: &str, limit: usize) -> Result<Vec<RawTrade>>;

    async fn fetch_holders(&self, mint: &str) -> Result<RawHolders>;
}

/// pump.fun frontend API for coins and trades, Solana RPC for holders.
#[derive(Debug, Clone)]
pub struct LiveUpstream {
    pump: PumpFunClient,
    rpc: SolanaRpcClient,
}

impl LiveUpstream {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pump: PumpFunClient::new(&config.upstream)?,
            rpc: SolanaRpcClient::new(&config.solana, config.upstream.timeout())?,
        })
    }
}

#[async_trait]
impl Upstream for LiveUpstream {
    async fn fetch_coins(&self, query: &CoinQuery) -> Result<Vec<RawCoin>> {
        self.pump.get_coins(query).await
    }

    async fn fetch_coin(&self, mint: &str) -> Result<Option<RawCoin>> {
        self.pump.get_coin(mint).await
    }

    async fn fetch_trades(&self, mint: &str, limit: usize) -> Result<Vec<RawTrade>> {
        self.pump.get_trades(mint, limit).await
    }

    async fn fetch_holders(&self, mint: &str) -> Result<RawHolders> {
        self.rpc.get_holders(mint).await
    }
}
