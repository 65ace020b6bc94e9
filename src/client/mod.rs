//! Typed HTTP client for the repair-desk API
//!
//! Covers what the browser UI does: log in, list and search orders, apply
//! mutations, keep a listing fresh with [`AutoRefresh`], and export it with
//! [`crate::export`].
//!
//! ```rust,ignore
//! let client = RepairClient::new("http://localhost:3000")?;
//! client.login("admin", "secret").await?;
//! let id = client.create_order(&NewOrder::new("Ana", "Laptop").with_phone("555-1")).await?;
//! ```

pub mod refresh;

pub use refresh::AutoRefresh;

use crate::core::error::ErrorResponse;
use crate::core::order::{NewOrder, OrderUpdate, RepairOrder};
use crate::server::exposure::rest::session::LoginResponse;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} {code}: {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid base url '{0}'")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct CreatedId {
    id: u64,
}

#[derive(Deserialize)]
struct Deleted {
    deleted: u64,
}

/// Client session against one server
///
/// Clones share the session token.
#[derive(Clone)]
pub struct RepairClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl RepairClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// Use a token obtained elsewhere
    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.token.write() {
            *current = token;
        }
    }

    pub async fn health(&self) -> ClientResult<bool> {
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(response.status().is_success())
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }));
        let login: LoginResponse = Self::parse(request.send().await?).await?;
        self.set_token(Some(login.token.clone()));
        tracing::debug!(username, "logged in");
        Ok(login)
    }

    /// Tell the server and forget the token
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self.authed(self.http.post(self.url("/logout")))?.send().await;
        self.set_token(None);
        Self::check(result?).await
    }

    pub async fn list_orders(&self) -> ClientResult<Vec<RepairOrder>> {
        let request = self.authed(self.http.get(self.url("/orders")))?;
        Self::parse(request.send().await?).await
    }

    pub async fn search(&self, term: &str) -> ClientResult<Vec<RepairOrder>> {
        let request = self
            .authed(self.http.get(self.url("/orders/search")))?
            .query(&[("term", term)]);
        Self::parse(request.send().await?).await
    }

    pub async fn get_order(&self, id: u64) -> ClientResult<RepairOrder> {
        let request = self.authed(self.http.get(self.url(&format!("/orders/{}", id))))?;
        Self::parse(request.send().await?).await
    }

    /// Returns the id of the new order
    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<u64> {
        let request = self.authed(self.http.post(self.url("/orders")))?.json(order);
        let created: CreatedId = Self::parse(request.send().await?).await?;
        Ok(created.id)
    }

    pub async fn update_order(&self, id: u64, update: &OrderUpdate) -> ClientResult<RepairOrder> {
        let request = self
            .authed(self.http.put(self.url(&format!("/orders/{}", id))))?
            .json(update);
        Self::parse(request.send().await?).await
    }

    pub async fn delete_order(&self, id: u64) -> ClientResult<u64> {
        let request = self.authed(self.http.delete(self.url(&format!("/orders/{}", id))))?;
        let deleted: Deleted = Self::parse(request.send().await?).await?;
        Ok(deleted.deleted)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self
            .token
            .read()
            .ok()
            .and_then(|t| t.clone())
            .ok_or(ClientError::NotLoggedIn)?;
        Ok(request.bearer_auth(token))
    }

    async fn check(response: Response) -> ClientResult<()> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(response).await)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn api_error(response: Response) -> ClientError {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => ClientError::Api {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: status.as_str().to_string(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            },
        }
    }
}
