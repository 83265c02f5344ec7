use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{
    ApiError, GraphQlRequest, GraphQlResponse, RateLimitResponse, TransactionData,
    TransactionsData, TransactionsPage,
};
use super::queries;
use super::ratelimit::RateLimiter;
use crate::models::Transaction;

/// GraphQL client for the data-availability explorer API
pub struct ExplorerClient {
    http_client: HttpClient,
    endpoint: String,
    limiter: RateLimiter,
}

impl ExplorerClient {
    /// Create a new client for the given GraphQL endpoint, allowed
    /// `requests_per_second` outgoing requests that each give up after `timeout`
    pub fn new(endpoint: String, requests_per_second: usize, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
            limiter: RateLimiter::new(requests_per_second),
        })
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        error_from_status(status_code, body_text)
    }

    /// POST a GraphQL operation and decode its `data`
    async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        self.limiter.acquire().await;

        let body = GraphQlRequest {
            operation_name,
            query,
            variables,
        };

        debug!("POST {} ({})", self.endpoint, operation_name);

        let response = self.http_client
            .post(&self.endpoint)
            .headers(Self::create_headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::RequestError(format!("Request timed out: {}", e))
                } else {
                    ApiError::RequestError(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<GraphQlResponse<T>>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::RequestError(format!("Request timed out: {}", e))
                } else {
                    ApiError::DeserializationError(format!("Failed to parse response: {}", e))
                }
            })?
            .into_result()
    }

    /// The most recent `limit` transactions, newest first
    pub async fn latest_transactions(&self, limit: usize) -> Result<Vec<Transaction>, ApiError> {
        Ok(self.transactions_page(limit, None).await?.items)
    }

    /// One page of transactions, starting at `cursor` when given
    pub async fn transactions_page(
        &self,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<TransactionsPage, ApiError> {
        let mut request = json!({ "limit": limit });
        if let Some(cursor) = cursor {
            request["cursor"] = json!(cursor);
        }

        let data: TransactionsData = self
            .execute(
                queries::DA_TRANSACTIONS_OPERATION,
                &queries::da_transactions_query(),
                json!({ "request": request }),
            )
            .await?;

        Ok(data.data_availability_transactions)
    }

    /// A single transaction by id; `None` when the API does not know it
    pub async fn transaction(&self, id: &str) -> Result<Option<Transaction>, ApiError> {
        let data: TransactionData = self
            .execute(
                queries::DA_TRANSACTION_OPERATION,
                &queries::da_transaction_query(),
                json!({ "request": { "id": id } }),
            )
            .await?;

        Ok(data.data_availability_transaction)
    }
}

fn error_from_status(status_code: u16, body_text: String) -> ApiError {
    match status_code {
        400 => {
            // GraphQL servers put the reason in errors[0].message
            if let Ok(err_json) = serde_json::from_str::<serde_json::Value>(&body_text) {
                let message = err_json
                    .pointer("/errors/0/message")
                    .or_else(|| err_json.get("message"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(&body_text);
                ApiError::BadRequest(message.to_string())
            } else {
                ApiError::BadRequest(body_text)
            }
        }
        401 => ApiError::Unauthorized(body_text),
        403 => ApiError::Forbidden(body_text),
        404 => ApiError::NotFound(body_text),
        429 => {
            let retry_after = serde_json::from_str::<RateLimitResponse>(&body_text)
                .ok()
                .and_then(|r| r.retry_after)
                .unwrap_or(1000);
            warn!("Rate limited by explorer API, retry after {} ms", retry_after);
            ApiError::RateLimited { retry_after }
        }
        500..=599 => {
            warn!("Server error {}: {}", status_code, body_text);
            ApiError::ServerError(status_code as i32, body_text)
        }
        _ => ApiError::HttpError(status_code as i32, body_text),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// An endpoint that accepts connections and never answers them
    pub(crate) async fn silent_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}/graphql", addr)
    }

    #[tokio::test]
    async fn test_request_gives_up_after_timeout() {
        let endpoint = silent_endpoint().await;
        let client = ExplorerClient::new(endpoint, 5, Duration::from_millis(300)).expect("client");

        let result = tokio::time::timeout(Duration::from_secs(5), client.latest_transactions(10))
            .await
            .expect("request should not outlive its timeout");

        match result {
            Err(ApiError::RequestError(msg)) => assert!(msg.contains("timed out"), "{}", msg),
            Err(other) => panic!("unexpected error {}", other),
            Ok(_) => panic!("silent endpoint returned data"),
        }
    }

    #[test]
    fn test_bad_request_extracts_graphql_message() {
        let body = r#"{"errors":[{"message":"Variable \"$request\" got invalid value"}]}"#;
        match error_from_status(400, body.to_string()) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Variable \"$request\" got invalid value"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(error_from_status(401, String::new()), ApiError::Unauthorized(_)));
        assert!(matches!(error_from_status(404, String::new()), ApiError::NotFound(_)));
        assert!(matches!(
            error_from_status(429, r#"{"retry_after": 250}"#.to_string()),
            ApiError::RateLimited { retry_after: 250 }
        ));
        assert!(matches!(
            error_from_status(429, "slow down".to_string()),
            ApiError::RateLimited { retry_after: 1000 }
        ));
        assert!(matches!(error_from_status(502, String::new()), ApiError::ServerError(502, _)));
        assert!(matches!(error_from_status(418, String::new()), ApiError::HttpError(418, _)));
    }
}
