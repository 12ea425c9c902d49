use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub mint: String,
    pub symbol: String,
    pub name: String,
    pub description: Option<String>,
    /// USD per whole token.
    pub price: f64,
    /// USD, rounded to whole dollars.
    pub market_cap: f64,
    pub market_cap_sol: f64,
    pub volume: Option<f64>,
    pub replies: u64,
    pub image_url: Option<String>,
    pub token_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub signature: String,
    pub symbol: String,
    pub side: TradeSide,
    /// Whole tokens exchanged.
    pub amount: f64,
    pub sol_amount: f64,
    /// SOL per whole token.
    pub price: f64,
    pub user: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub body: String,
    pub reply_count: u64,
    pub created_at: DateTime<Utc>,
    /// Time of the latest reply, or creation when nobody has replied.
    pub timestamp: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub symbol: String,
    pub address: String,
    pub balance: f64,
    pub percentage: f64,
}
