pub mod feed_service;
pub mod transaction_service;
