// src/domain/model/mod.rs
// Core domain models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{BrokerError, BrokerResult};

/// Credential proving a prior login, kept exactly as it was persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn has_surrounding_whitespace(&self) -> bool {
        self.0.trim() != self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SessionToken(<{} bytes redacted>)", self.0.len())
    }
}

/// Display name and broker user id the session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub display_name: String,
    pub user_id: String,
}

impl AccountIdentity {
    pub fn new(display_name: &str, user_id: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variety {
    Regular,
    Amo,
}

impl Variety {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variety::Regular => "regular",
            Variety::Amo => "amo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    Nse,
    Bse,
    Nfo,
    Bfo,
    Cds,
    Bcd,
    Mcx,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
            Exchange::Nfo => "NFO",
            Exchange::Bfo => "BFO",
            Exchange::Cds => "CDS",
            Exchange::Bcd => "BCD",
            Exchange::Mcx => "MCX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Product {
    Mis,
    Cnc,
    Nrml,
    Co,
    Mtf,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Mis => "MIS",
            Product::Cnc => "CNC",
            Product::Nrml => "NRML",
            Product::Co => "CO",
            Product::Mtf => "MTF",
        }
    }
}

/// Order type; prices travel with the variant that needs them.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderType {
    Market,
    Limit(Decimal),
    Sl { price: Decimal, trigger: Decimal },
    SlM { trigger: Decimal },
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit(_) => "LIMIT",
            OrderType::Sl { .. } => "SL",
            OrderType::SlM { .. } => "SL-M",
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            OrderType::Limit(price) | OrderType::Sl { price, .. } => Some(*price),
            OrderType::Market | OrderType::SlM { .. } => None,
        }
    }

    pub fn trigger_price(&self) -> Option<Decimal> {
        match self {
            OrderType::Sl { trigger, .. } | OrderType::SlM { trigger } => Some(*trigger),
            OrderType::Market | OrderType::Limit(_) => None,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit(price) => write!(f, "LIMIT {}", price),
            OrderType::Sl { price, trigger } => write!(f, "SL {} trigger={}", price, trigger),
            OrderType::SlM { trigger } => write!(f, "SL-M trigger={}", trigger),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Day,
    Ioc,
}

impl Validity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Validity::Day => "DAY",
            Validity::Ioc => "IOC",
        }
    }
}

/// A single order placement, consumed by exactly one call.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub variety: Variety,
    pub exchange: Exchange,
    pub tradingsymbol: String,
    pub transaction_type: TransactionType,
    pub quantity: u32,
    pub product: Product,
    pub order_type: OrderType,
    pub validity: Validity,
}

impl OrderRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        variety: Variety,
        exchange: Exchange,
        tradingsymbol: &str,
        transaction_type: TransactionType,
        quantity: u32,
        product: Product,
        order_type: OrderType,
        validity: Validity,
    ) -> Self {
        Self {
            variety,
            exchange,
            tradingsymbol: tradingsymbol.to_string(),
            transaction_type,
            quantity,
            product,
            order_type,
            validity,
        }
    }

    /// Checks the shape of the request; the broker remains the authority on
    /// whether it is accepted.
    pub fn validate(&self) -> BrokerResult<()> {
        if self.quantity == 0 {
            return Err(BrokerError::InvalidOrder("quantity must be positive".into()));
        }
        if self.tradingsymbol.trim().is_empty() {
            return Err(BrokerError::InvalidOrder("trading symbol is empty".into()));
        }
        for (name, value) in [
            ("price", self.order_type.price()),
            ("trigger price", self.order_type.trigger_price()),
        ] {
            if let Some(value) = value {
                if value <= Decimal::ZERO {
                    return Err(BrokerError::InvalidOrder(format!(
                        "{} must be positive, got {}",
                        name, value
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Broker-assigned reference to a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the orders book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub status: String,
    pub tradingsymbol: String,
    pub exchange: String,
    pub transaction_type: String,
    pub order_type: String,
    pub product: String,
    pub variety: String,
    pub validity: String,
    pub quantity: u32,
    pub filled_quantity: u32,
    pub pending_quantity: u32,
    pub price: Decimal,
    pub trigger_price: Decimal,
    pub average_price: Decimal,
    pub placed_at: Option<NaiveDateTime>,
    pub status_message: Option<String>,
    pub tag: Option<String>,
}

impl OrderSummary {
    pub fn is_open(&self) -> bool {
        matches!(
            self.status.as_str(),
            "OPEN" | "TRIGGER PENDING" | "AMO REQ RECEIVED" | "PUT ORDER REQ RECEIVED" | "VALIDATION PENDING"
        )
    }
}

/// One entry of the holdings list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub tradingsymbol: String,
    pub exchange: String,
    pub isin: String,
    pub product: String,
    pub quantity: i64,
    pub t1_quantity: i64,
    pub average_price: Decimal,
    pub last_price: Decimal,
    pub pnl: Decimal,
}
