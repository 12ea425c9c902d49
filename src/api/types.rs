//! Raw upstream records and their conversion into the gateway's models.
//!
//! Every conversion validates first and fails with `Error::ApiInvalidData`
//! instead of producing a partially filled model.

use crate::error::{Error, Result};
use crate::models::{Holder, Thread, Token, Trade, TradeSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// pump.fun tokens carry 6 decimals.
pub const TOKEN_DECIMALS: u32 = 6;
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;
pub const BOARD_URL: &str = "https://pump.fun/board";

/// A coin as served by the pump.fun `/coins` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCoin {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    /// Milliseconds since the epoch.
    pub created_timestamp: i64,
    pub usd_market_cap: f64,
    #[serde(default)]
    pub market_cap: f64,
    pub total_supply: f64,
    #[serde(default)]
    pub reply_count: u64,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub last_reply: Option<i64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl RawCoin {
    pub fn validate(&self) -> Result<()> {
        if self.mint.trim().is_empty() {
            return Err(Error::ApiInvalidData("Empty coin mint".into()));
        }
        if self.symbol.trim().is_empty() {
            return Err(Error::ApiInvalidData(format!("Empty symbol for coin {}", self.mint)));
        }
        if !self.usd_market_cap.is_finite() || self.usd_market_cap < 0.0 {
            return Err(Error::ApiInvalidData(format!(
                "Invalid market cap for {}: {}",
                self.mint, self.usd_market_cap
            )));
        }
        if !self.market_cap.is_finite() || self.market_cap < 0.0 {
            return Err(Error::ApiInvalidData(format!(
                "Invalid SOL market cap for {}: {}",
                self.mint, self.market_cap
            )));
        }
        if !self.total_supply.is_finite() || self.total_supply <= 0.0 {
            return Err(Error::ApiInvalidData(format!(
                "Invalid total supply for {}: {}",
                self.mint, self.total_supply
            )));
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(Error::ApiInvalidData(format!("Invalid volume for {}: {}", self.mint, volume)));
            }
        }
        Ok(())
    }

    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        millis_to_datetime(self.created_timestamp, &self.mint)
    }

    pub fn board_url(&self) -> String {
        format!("{}/{}", BOARD_URL, self.mint)
    }

    pub fn into_token(self) -> Result<Token> {
        self.validate()?;
        let created_at = self.created_at()?;
        let supply = self.total_supply / 10f64.powi(TOKEN_DECIMALS as i32);
        let token_url = self.board_url();

        Ok(Token {
            price: self.usd_market_cap / supply,
            market_cap: self.usd_market_cap.round(),
            market_cap_sol: self.market_cap,
            volume: self.volume,
            replies: self.reply_count,
            name: self.name.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            image_url: self.image_uri.filter(|u| !u.trim().is_empty()),
            symbol: self.symbol,
            mint: self.mint,
            token_url,
            created_at,
        })
    }

    pub fn into_thread(self) -> Result<Thread> {
        self.validate()?;
        let created_at = self.created_at()?;
        let timestamp = match self.last_reply {
            Some(ms) => millis_to_datetime(ms, &self.mint)?,
            None => created_at,
        };
        let url = self.board_url();
        let name = self.name.trim().to_string();
        let body = match self.description {
            Some(description) if !description.trim().is_empty() => description,
            _ => name.clone(),
        };

        Ok(Thread {
            id: self.mint,
            symbol: self.symbol,
            reply_count: self.reply_count,
            name,
            body,
            created_at,
            timestamp,
            url,
        })
    }
}

/// A trade as served by `/trades/all/{mint}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    pub signature: String,
    pub mint: String,
    /// Lamports.
    pub sol_amount: u64,
    /// Raw token units.
    pub token_amount: u64,
    pub is_buy: bool,
    pub user: String,
    /// Seconds since the epoch.
    pub timestamp: i64,
}

impl RawTrade {
    pub fn validate(&self) -> Result<()> {
        if self.signature.trim().is_empty() {
            return Err(Error::ApiInvalidData("Empty trade signature".into()));
        }
        if self.token_amount == 0 {
            return Err(Error::ApiInvalidData(format!(
                "Trade {} has no token amount",
                self.signature
            )));
        }
        Ok(())
    }

    pub fn into_trade(self, symbol: &str) -> Result<Trade> {
        self.validate()?;
        let timestamp = DateTime::from_timestamp(self.timestamp, 0).ok_or_else(|| {
            Error::ApiInvalidData(format!("Invalid timestamp on trade {}: {}", self.signature, self.timestamp))
        })?;
        let amount = self.token_amount as f64 / 10f64.powi(TOKEN_DECIMALS as i32);
        let sol_amount = self.sol_amount as f64 / LAMPORTS_PER_SOL;

        Ok(Trade {
            signature: self.signature,
            symbol: symbol.to_string(),
            side: if self.is_buy { TradeSide::Buy } else { TradeSide::Sell },
            price: sol_amount / amount,
            amount,
            sol_amount,
            user: self.user,
            timestamp,
        })
    }
}

/// Token amount in the Solana JSON-RPC `UiTokenAmount` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTokenAmount {
    pub amount: String,
    pub decimals: u8,
}

impl RpcTokenAmount {
    pub fn raw(&self) -> Result<u128> {
        self.amount
            .parse::<u128>()
            .map_err(|_| Error::ApiInvalidData(format!("Invalid token amount: {}", self.amount)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcTokenAccount {
    pub address: String,
    #[serde(flatten)]
    pub amount: RpcTokenAmount,
}

/// Largest token accounts of a mint together with its supply.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHolders {
    pub accounts: Vec<RpcTokenAccount>,
    pub supply: RpcTokenAmount,
}

impl RawHolders {
    pub fn into_holders(self, symbol: &str) -> Result<Vec<Holder>> {
        let supply = self.supply.raw()?;
        if supply == 0 {
            return Err(Error::ApiInvalidData(format!("Zero supply reported for {}", symbol)));
        }
        let scale = 10f64.powi(self.supply.decimals as i32);

        let mut holders = self
            .accounts
            .into_iter()
            .map(|account| {
                if account.address.trim().is_empty() {
                    return Err(Error::ApiInvalidData("Empty holder address".into()));
                }
                let amount = account.amount.raw()?;
                if amount > supply {
                    return Err(Error::ApiInvalidData(format!(
                        "Holder {} balance exceeds supply",
                        account.address
                    )));
                }
                Ok(Holder {
                    symbol: symbol.to_string(),
                    balance: amount as f64 / scale,
                    percentage: amount as f64 * 100.0 / supply as f64,
                    address: account.address,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        holders.sort_by(|a, b| b.balance.partial_cmp(&a.balance).unwrap_or(std::cmp::Ordering::Equal));
        Ok(holders)
    }
}

fn millis_to_datetime(ms: i64, mint: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::ApiInvalidData(format!("Invalid timestamp for {}: {}", mint, ms)))
}
