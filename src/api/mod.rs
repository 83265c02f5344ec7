pub mod client;
pub mod models;
pub mod queries;
pub mod ratelimit;
pub mod subscription;

pub use client::ExplorerClient;
pub use models::{ApiError, TransactionsPage};
pub use subscription::{ReadyState, SocketEvent, SubscriptionClient};
