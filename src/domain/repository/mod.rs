// src/domain/repository/mod.rs
// Repository interfaces for domain entities

use async_trait::async_trait;
use crate::domain::errors::BrokerResult;
use crate::domain::model::{Holding, OrderId, OrderRequest, OrderSummary};

/// Repository interface for broker operations on one authenticated session
#[async_trait]
pub trait BrokerRepository: Send + Sync {
    /// Place a new order
    async fn place_order(&self, order: &OrderRequest) -> BrokerResult<OrderId>;

    /// Get the day's orders book
    async fn orders(&self) -> BrokerResult<Vec<OrderSummary>>;

    /// Get long-term holdings
    async fn holdings(&self) -> BrokerResult<Vec<Holding>>;
}
