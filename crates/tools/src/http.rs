//! Remote shopping list backend over the REST API
//!
//! Endpoints: `POST /add`, `DELETE /remove`, `POST /clear`, `GET /list`,
//! `GET /search?q=&brand=&price=`, `GET /suggestions`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::integrations::{
    IntegrationError, ListItem, Product, SearchQuery, ShoppingListIntegration, Suggestions,
};

#[derive(Debug, Serialize)]
struct ItemRequest<'a> {
    item: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(rename = "shoppingList", default)]
    shopping_list: Vec<ListItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for a remote list service
#[derive(Debug, Clone)]
pub struct HttpShoppingList {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpShoppingList {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IntegrationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IntegrationError::Internal(e.to_string()))?;
        Ok(Self {
            timeout: Some(timeout),
            ..Self::with_client(client, base_url)
        })
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, IntegrationError> {
        let response = request
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.timeout))?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            tracing::warn!(status = %status, error = %message, "List service request failed");
            return Err(map_status(status, message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| IntegrationError::Internal(format!("Invalid response body: {e}")))
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Option<Duration>) -> IntegrationError {
    if err.is_timeout() {
        let ms = timeout.map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        return IntegrationError::Timeout(ms);
    }
    IntegrationError::ConnectionFailed(err.to_string())
}

fn map_status(status: StatusCode, message: String) -> IntegrationError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            IntegrationError::InvalidRequest(message)
        },
        StatusCode::NOT_FOUND => IntegrationError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => IntegrationError::RateLimited,
        _ => IntegrationError::Internal(message),
    }
}

/// Query string for `GET /search`
fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("q", query.text.clone())];
    if let Some(brand) = &query.brand {
        params.push(("brand", brand.clone()));
    }
    if let Some(price) = query.max_price {
        params.push(("price", price.to_string()));
    }
    params
}

#[async_trait]
impl ShoppingListIntegration for HttpShoppingList {
    async fn add_item(&self, name: &str, quantity: u32) -> Result<Vec<ListItem>, IntegrationError> {
        let body = ItemRequest {
            item: name,
            quantity: Some(quantity),
        };
        let response: ListResponse = self.send(self.request(Method::POST, "/add").json(&body)).await?;
        Ok(response.shopping_list)
    }

    async fn remove_item(&self, name: &str) -> Result<Vec<ListItem>, IntegrationError> {
        let body = ItemRequest {
            item: name,
            quantity: None,
        };
        let response: ListResponse = self
            .send(self.request(Method::DELETE, "/remove").json(&body))
            .await?;
        Ok(response.shopping_list)
    }

    async fn search_items(&self, query: &SearchQuery) -> Result<Vec<Product>, IntegrationError> {
        let request = self.request(Method::GET, "/search").query(&search_params(query));
        let response: SearchResponse = self.send(request).await?;
        Ok(response.results)
    }

    async fn list_items(&self) -> Result<Vec<ListItem>, IntegrationError> {
        let response: ListResponse = self.send(self.request(Method::GET, "/list")).await?;
        Ok(response.shopping_list)
    }

    async fn clear(&self) -> Result<Vec<ListItem>, IntegrationError> {
        let response: ListResponse = self.send(self.request(Method::POST, "/clear")).await?;
        Ok(response.shopping_list)
    }

    async fn suggestions(&self) -> Result<Suggestions, IntegrationError> {
        self.send(self.request(Method::GET, "/suggestions")).await
    }
}
