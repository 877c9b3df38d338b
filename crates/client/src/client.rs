//! HTTP transport shared by the read and write wrappers.

use std::sync::{Arc, RwLock};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::cache::QueryCache;
use crate::error::ClientError;
use crate::hooks::{Mutation, MutationOptions, Query, QueryOptions};
use crate::notify::Notifier;

/// Success envelope `{ status, message, data }` returned by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

/// Client for one back-office API deployment.
///
/// Holds the bearer token, the response cache and the notifier used by
/// write wrappers for their default messages.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    /// * `base_url` - API root including the prefix, e.g.
    ///   `http://host:3000/api/v1`.
    pub fn new(base_url: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, notifier)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            cache: QueryCache::default(),
            notifier,
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.into());
        }
    }

    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Read wrapper for a GET endpoint. Nothing is sent until
    /// [`Query::fetch`].
    pub fn query<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<String>,
        options: QueryOptions,
    ) -> Query<'_, T> {
        Query::new(self, endpoint.into(), options)
    }

    /// Write wrapper sending POST.
    pub fn post_data(&self, endpoint: impl Into<String>, options: MutationOptions) -> Mutation<'_> {
        Mutation::new(self, Method::POST, endpoint.into(), options)
    }

    /// Write wrapper sending PUT.
    pub fn put_data(&self, endpoint: impl Into<String>, options: MutationOptions) -> Mutation<'_> {
        Mutation::new(self, Method::PUT, endpoint.into(), options)
    }

    /// Write wrapper sending DELETE.
    pub fn delete_data(
        &self,
        endpoint: impl Into<String>,
        options: MutationOptions,
    ) -> Mutation<'_> {
        Mutation::new(self, Method::DELETE, endpoint.into(), options)
    }

    /// One-shot GET through a fresh [`Query`].
    ///
    /// Returns `Ok(None)` when the query is disabled.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<String>,
        options: QueryOptions,
    ) -> Result<Option<Envelope<T>>, ClientError> {
        let mut query = self.query::<T>(endpoint, options);
        query.fetch().await;
        query.into_result()
    }

    /// Send one request and return the decoded success body.
    ///
    /// Non-2xx answers become [`ClientError::Api`] carrying the error
    /// envelope's `message` and `errors`.
    pub(crate) async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut request = self.http.request(method.clone(), &url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%method, %url, status = status.as_u16(), "API response");

        if !status.is_success() {
            let envelope: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                errors: envelope.get("errors").cloned().unwrap_or(Value::Null),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
