// src/application/usecase/order_usecase.rs
// Order use cases on a single broker session

use std::sync::Arc;
use async_trait::async_trait;
use rust_decimal_macros::dec;

use crate::domain::errors::BrokerResult;
use crate::domain::model::{
    Exchange, Holding, OrderId, OrderRequest, OrderSummary, OrderType, Product, TransactionType,
    Validity, Variety,
};
use crate::domain::repository::BrokerRepository;

/// The after-market buy the tool exists to place. Constant on every run.
pub fn scripted_order() -> OrderRequest {
    OrderRequest::new(
        Variety::Amo,
        Exchange::Nse,
        "SBIN",
        TransactionType::Buy,
        5,
        Product::Mis,
        OrderType::Limit(dec!(820)),
        Validity::Day,
    )
}

/// Order management use case
#[async_trait]
pub trait OrderManagementUseCase {
    async fn place_scripted_order(&self) -> BrokerResult<OrderId>;

    async fn place_order(&self, order: OrderRequest) -> BrokerResult<OrderId>;

    async fn list_orders(&self) -> BrokerResult<Vec<OrderSummary>>;

    async fn list_holdings(&self) -> BrokerResult<Vec<Holding>>;
}

pub struct OrderManager {
    broker: Arc<dyn BrokerRepository>,
}

impl OrderManager {
    pub fn new(broker: Arc<dyn BrokerRepository>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl OrderManagementUseCase for OrderManager {
    async fn place_scripted_order(&self) -> BrokerResult<OrderId> {
        self.place_order(scripted_order()).await
    }

    /// Submits exactly once. No retry, no deduplication.
    async fn place_order(&self, order: OrderRequest) -> BrokerResult<OrderId> {
        order.validate()?;

        log::info!(
            "Placing {} order: {} {} {}:{} {} {} {}",
            order.variety.as_str(),
            order.transaction_type.as_str(),
            order.quantity,
            order.exchange.as_str(),
            order.tradingsymbol,
            order.product.as_str(),
            order.order_type,
            order.validity.as_str()
        );

        let order_id = self.broker.place_order(&order).await?;
        log::info!("Order accepted with id {}", order_id);
        Ok(order_id)
    }

    async fn list_orders(&self) -> BrokerResult<Vec<OrderSummary>> {
        let orders = self.broker.orders().await?;
        log::debug!(
            "Fetched {} orders ({} open)",
            orders.len(),
            orders.iter().filter(|o| o.is_open()).count()
        );
        Ok(orders)
    }

    async fn list_holdings(&self) -> BrokerResult<Vec<Holding>> {
        let holdings = self.broker.holdings().await?;
        log::debug!("Fetched {} holdings", holdings.len());
        Ok(holdings)
    }
}
