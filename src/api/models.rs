use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Transaction;

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a> {
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: Value,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Cursor info returned with each list page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    pub next: Option<String>,
}

/// `dataAvailabilityTransactions` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    pub items: Vec<Transaction>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsData {
    pub data_availability_transactions: TransactionsPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub data_availability_transaction: Option<Transaction>,
}

/// 429 Rate limit response
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub retry_after: Option<i64>,
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized
    Unauthorized(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 429 Too Many Requests
    RateLimited { retry_after: i64 },
    /// 5xx Server Error
    ServerError(i32, String),
    /// Other HTTP errors
    HttpError(i32, String),
    /// Network/request error
    RequestError(String),
    /// Deserialization error
    DeserializationError(String),
    /// The server answered with a GraphQL `errors` array
    GraphQl(Vec<String>),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::RateLimited { retry_after } => {
                write!(f, "Rate Limited. Retry after {} ms", retry_after)
            }
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
            ApiError::GraphQl(messages) => write!(f, "GraphQL Error: {}", messages.join("; ")),
        }
    }
}

impl std::error::Error for ApiError {}

impl<T> GraphQlResponse<T> {
    /// Collapse the envelope into the data or an error
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::GraphQl(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::DeserializationError("Response carried no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use serde_json::json;

    #[test]
    fn test_transactions_page_decodes() {
        let body = json!({
            "data": {
                "dataAvailabilityTransactions": {
                    "items": [fixtures::transaction_json("a"), fixtures::transaction_json("b")],
                    "pageInfo": { "next": "cursor-2" }
                }
            }
        });

        let response: GraphQlResponse<TransactionsData> =
            serde_json::from_value(body).expect("decodes");
        let page = response.into_result().expect("has data").data_availability_transactions;

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].transaction_id, "a");
        assert_eq!(page.page_info.next.as_deref(), Some("cursor-2"));
    }

    #[test]
    fn test_graphql_errors_win_over_data() {
        let body = json!({
            "data": null,
            "errors": [{ "message": "limit must be <= 50" }, { "message": "second" }]
        });

        let response: GraphQlResponse<TransactionsData> =
            serde_json::from_value(body).expect("decodes");
        let err = response.into_result().unwrap_err();

        assert_eq!(err.to_string(), "GraphQL Error: limit must be <= 50; second");
    }

    #[test]
    fn test_missing_detail_is_none() {
        let body = json!({ "data": { "dataAvailabilityTransaction": null } });
        let response: GraphQlResponse<TransactionData> =
            serde_json::from_value(body).expect("decodes");

        assert!(response.into_result().expect("has data").data_availability_transaction.is_none());
    }
}
