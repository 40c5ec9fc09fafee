//! # API Client
//!
//! `ApiClient` is the one place HTTP happens. Every method is a single
//! request/response pair: no retry, no backoff, no caching. A failure is
//! returned immediately and the next user action issues a fresh request.
//!
//! The session consumes the [`Backend`] trait rather than the concrete
//! client so its tests can run against an in-memory fake.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use warung_core::{HeldOrder, PaymentStatus, Product};

use crate::auth;
use crate::error::{ClientError, ClientResult};
use crate::wire::{CreateOrderRequest, OrderDetailDto, OrderDto, OrdersEnvelope, ProductDto, SubmittedOrder};

// =============================================================================
// Backend Trait
// =============================================================================

/// The backend surface the sales session depends on.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the full product catalog.
    async fn fetch_products(&self) -> ClientResult<Vec<Product>>;

    /// Fetches all held (unpaid) orders, items included.
    async fn fetch_unpaid_orders(&self) -> ClientResult<Vec<HeldOrder>>;

    /// Submits an order (hold or pay).
    async fn submit_order(&self, request: &CreateOrderRequest) -> ClientResult<SubmittedOrder>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP implementation of [`Backend`] against the Warung POS REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: String,
    user_id: String,
}

impl ApiClient {
    /// Creates a client for the given base URL and bearer token.
    ///
    /// The user id is read out of the token's `sub` claim once, up front,
    /// so a malformed token fails at construction instead of at the first
    /// order submission.
    pub fn new(base_url: &str, token: impl Into<String>) -> ClientResult<Self> {
        let token = token.into();
        let user_id = auth::user_id_from_token(&token)?;

        // A base without a trailing slash would swallow its last path
        // segment on join()
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(ApiClient {
            http: reqwest::Client::new(),
            base: Url::parse(&normalized)?,
            token,
            user_id,
        })
    }

    /// The user id from the token's `sub` claim, stamped into
    /// `created_by` on submissions.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `GET /products`
    pub async fn products(&self) -> ClientResult<Vec<Product>> {
        let url = self.base.join("products")?;
        debug!(%url, "GET products");

        let response = self.authorized(self.http.get(url)).send().await?;
        let dtos: Vec<ProductDto> = Self::parse(response).await?;
        Ok(dtos.into_iter().map(Product::from).collect())
    }

    /// `GET /orders?status=paid|unpaid`
    pub async fn orders(&self, status: PaymentStatus) -> ClientResult<Vec<OrderDto>> {
        let url = self.base.join("orders")?;
        debug!(%url, %status, "GET orders");

        let response = self
            .authorized(self.http.get(url).query(&[("status", status.to_string())]))
            .send()
            .await?;
        let envelope: OrdersEnvelope = Self::parse(response).await?;
        Ok(envelope.data)
    }

    /// `GET /orders/{id}`
    pub async fn order_detail(&self, id: &str) -> ClientResult<OrderDetailDto> {
        let url = self.base.join(&format!("orders/{}", id))?;
        debug!(%url, "GET order detail");

        let response = self.authorized(self.http.get(url)).send().await?;
        Self::parse(response).await
    }

    /// `POST /orders`
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<SubmittedOrder> {
        let url = self.base.join("orders")?;
        debug!(%url, status = %request.order.payment_status, "POST order");

        let response = self.authorized(self.http.post(url).json(request)).send().await?;
        let order: OrderDto = Self::parse(response).await?;
        Ok(SubmittedOrder::from(order))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    /// Checks the status and decodes the body, extracting a best-effort
    /// error message from failure bodies.
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
        } else {
            Err(Self::api_error(status, response.text().await.unwrap_or_default()))
        }
    }

    fn api_error(status: StatusCode, body: String) -> ClientError {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str().map(str::to_string))
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        self.products().await
    }

    /// The list endpoint omits items, so each unpaid order needs a detail
    /// fetch before it can be recalled into a cart.
    async fn fetch_unpaid_orders(&self) -> ClientResult<Vec<HeldOrder>> {
        let summaries = self.orders(PaymentStatus::Unpaid).await?;

        let mut held = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let detail = self.order_detail(&summary.id).await?;
            held.push(HeldOrder::from(detail));
        }
        Ok(held)
    }

    async fn submit_order(&self, request: &CreateOrderRequest) -> ClientResult<SubmittedOrder> {
        self.create_order(request).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_token() {
        assert!(matches!(
            ApiClient::new("http://localhost:3000/api", "not-a-jwt"),
            Err(ClientError::Token(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_normalization() {
        let token = test_token();
        let with = ApiClient::new("http://localhost:3000/api/", &token).unwrap();
        let without = ApiClient::new("http://localhost:3000/api", &token).unwrap();

        assert_eq!(
            with.base.join("products").unwrap(),
            without.base.join("products").unwrap()
        );
        assert_eq!(
            without.base.join("products").unwrap().as_str(),
            "http://localhost:3000/api/products"
        );
    }

    #[test]
    fn test_user_id_read_at_construction() {
        let client = ApiClient::new("http://localhost:3000/api", test_token()).unwrap();
        assert_eq!(client.user_id(), "user-7");
    }

    #[test]
    fn test_api_error_message_extraction() {
        let err = ApiClient::api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"message": "Order has no items"}"#.to_string(),
        );
        assert_eq!(err.to_string(), "Backend returned 422: Order has no items");

        let err = ApiClient::api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html>gateway exploded</html>".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Backend returned 500: Internal Server Error"
        );
    }

    fn test_token() -> String {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            &serde_json::json!({ "sub": "user-7" }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }
}
