pub mod errors;
pub mod model;
pub mod repository;

// Re-export common types for convenience
pub use errors::{AppError, AppResult, BrokerError, BrokerResult};
pub use model::{
    AccountIdentity, Exchange, Holding, OrderId, OrderRequest, OrderSummary, OrderType, Product,
    SessionToken, TransactionType, Validity, Variety,
};
pub use repository::BrokerRepository;
