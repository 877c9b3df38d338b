//! Read and write wrappers.
//!
//! [`Query`] is the cached, retrying GET; [`Mutation`] is the POST/PUT
//! that reports through the client's [`Notifier`](crate::Notifier) and
//! invalidates cache keys on success.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheKey;
use crate::client::{ApiClient, Envelope};
use crate::error::ClientError;
use crate::notify::Notice;
use crate::state::FetchState;

pub const POSTED_MESSAGE: &str = "Data posted successfully";
pub const UPDATED_MESSAGE: &str = "Data updated successfully";
pub const DELETED_MESSAGE: &str = "Data deleted successfully";

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

pub type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Options of a read wrapper. Defaults: one retry, enabled.
pub struct QueryOptions {
    /// Cache key. Defaults to the endpoint plus its query parameters.
    pub key: Option<CacheKey>,
    pub retry: u32,
    pub retry_delay: Duration,
    /// A disabled query never sends a request.
    pub enabled: bool,
    pub on_success: Option<Callback<Value>>,
    pub on_error: Option<Callback<ClientError>>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            key: None,
            retry: 1,
            retry_delay: DEFAULT_RETRY_DELAY,
            enabled: true,
            on_success: None,
            on_error: None,
        }
    }
}

impl QueryOptions {
    pub fn key(mut self, key: impl Into<CacheKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_success(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ClientError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Options of a write wrapper. Defaults: no retry, default notifications.
pub struct MutationOptions {
    /// Cache prefix dropped after a successful write.
    pub invalidate: Option<CacheKey>,
    pub retry: u32,
    pub retry_delay: Duration,
    /// Replaces the default success notification.
    pub on_success: Option<Callback<Value>>,
    /// Replaces the default error notification.
    pub on_error: Option<Callback<ClientError>>,
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            invalidate: None,
            retry: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_success: None,
            on_error: None,
        }
    }
}

impl MutationOptions {
    pub fn invalidate(mut self, key: impl Into<CacheKey>) -> Self {
        self.invalidate = Some(key.into());
        self
    }

    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn on_success(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ClientError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Send one request, retrying up to `retry` more times on any failure.
async fn send_with_retry(
    client: &ApiClient,
    method: Method,
    endpoint: &str,
    params: &[(String, String)],
    body: Option<&Value>,
    retry: u32,
    delay: Duration,
) -> Result<Value, ClientError> {
    let mut attempt = 0;
    loop {
        match client.send(method.clone(), endpoint, params, body).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < retry => {
                attempt += 1;
                tracing::debug!(%method, endpoint, attempt, error = %e, "Retrying request");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Cached GET decoding `data` as `T`.
pub struct Query<'a, T> {
    client: &'a ApiClient,
    endpoint: String,
    params: Vec<(String, String)>,
    options: QueryOptions,
    state: FetchState,
    data: Option<Envelope<T>>,
    error: Option<ClientError>,
}

impl<'a, T: DeserializeOwned> Query<'a, T> {
    pub(crate) fn new(client: &'a ApiClient, endpoint: String, options: QueryOptions) -> Self {
        Self {
            client,
            endpoint,
            params: Vec::new(),
            options,
            state: FetchState::Idle,
            data: None,
            error: None,
        }
    }

    /// Add a query-string parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    pub fn cache_key(&self) -> CacheKey {
        match &self.options.key {
            Some(key) => key.clone(),
            None => self
                .params
                .iter()
                .fold(CacheKey::from(self.endpoint.as_str()), |key, (k, v)| {
                    key.child(format!("{k}={v}"))
                }),
        }
    }

    /// Serve from cache when fresh, otherwise fetch. Callbacks run on
    /// every settle.
    pub async fn fetch(&mut self) -> FetchState {
        if !self.options.enabled {
            return self.state;
        }

        let key = self.cache_key();
        if let Some(cached) = self.client.cache().fresh(&key) {
            tracing::debug!(key = ?key.parts(), "Query served from cache");
            return self.settle(Ok(cached), None);
        }

        self.state = FetchState::Loading;
        let result = send_with_retry(
            self.client,
            Method::GET,
            &self.endpoint,
            &self.params,
            None,
            self.options.retry,
            self.options.retry_delay,
        )
        .await;
        self.settle(result, Some(key))
    }

    /// Drop this query's cache entry and fetch again.
    pub async fn refetch(&mut self) -> FetchState {
        self.client.cache().invalidate(&self.cache_key());
        self.fetch().await
    }

    fn settle(&mut self, result: Result<Value, ClientError>, cache_as: Option<CacheKey>) -> FetchState {
        let decoded = result.and_then(|raw| {
            let envelope = serde_json::from_value::<Envelope<T>>(raw.clone())?;
            Ok((raw, envelope))
        });

        match decoded {
            Ok((raw, envelope)) => {
                if let Some(key) = cache_as {
                    self.client.cache().insert(key, raw.clone());
                }
                if let Some(callback) = &self.options.on_success {
                    callback(&raw);
                }
                self.data = Some(envelope);
                self.error = None;
                self.state = FetchState::Success;
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Query failed");
                if let Some(callback) = &self.options.on_error {
                    callback(&e);
                }
                self.error = Some(e);
                self.state = FetchState::Error;
            }
        }
        self.state
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Last successful envelope. Kept across a later failure.
    pub fn data(&self) -> Option<&Envelope<T>> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn reset(&mut self) {
        self.state = FetchState::Idle;
        self.data = None;
        self.error = None;
    }

    pub fn into_result(self) -> Result<Option<Envelope<T>>, ClientError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// POST/PUT/DELETE with default notifications and cache invalidation.
pub struct Mutation<'a> {
    client: &'a ApiClient,
    method: Method,
    endpoint: String,
    options: MutationOptions,
    state: FetchState,
    response: Option<Value>,
    error: Option<ClientError>,
}

impl<'a> Mutation<'a> {
    pub(crate) fn new(
        client: &'a ApiClient,
        method: Method,
        endpoint: String,
        options: MutationOptions,
    ) -> Self {
        Self {
            client,
            method,
            endpoint,
            options,
            state: FetchState::Idle,
            response: None,
            error: None,
        }
    }

    /// Send `body` as JSON.
    pub async fn run<B: Serialize + ?Sized>(&mut self, body: &B) -> FetchState {
        match serde_json::to_value(body) {
            Ok(value) => self.execute(Some(value)).await,
            Err(e) => self.settle(Err(e.into())),
        }
    }

    /// Send without a body.
    pub async fn run_empty(&mut self) -> FetchState {
        self.execute(None).await
    }

    async fn execute(&mut self, body: Option<Value>) -> FetchState {
        self.state = FetchState::Loading;
        let result = send_with_retry(
            self.client,
            self.method.clone(),
            &self.endpoint,
            &[],
            body.as_ref(),
            self.options.retry,
            self.options.retry_delay,
        )
        .await;
        self.settle(result)
    }

    fn settle(&mut self, result: Result<Value, ClientError>) -> FetchState {
        match result {
            Ok(value) => {
                match &self.options.on_success {
                    Some(callback) => callback(&value),
                    None => self
                        .client
                        .notifier()
                        .notify(Notice::Success(self.success_message().to_string())),
                }
                if let Some(key) = &self.options.invalidate {
                    self.client.cache().invalidate(key);
                }
                self.response = Some(value);
                self.error = None;
                self.state = FetchState::Success;
            }
            Err(e) => {
                tracing::warn!(method = %self.method, endpoint = %self.endpoint, error = %e, "Mutation failed");
                match &self.options.on_error {
                    Some(callback) => callback(&e),
                    None => {
                        if let Some(message) = e.notification() {
                            self.client.notifier().notify(Notice::Error(message));
                        }
                    }
                }
                self.error = Some(e);
                self.state = FetchState::Error;
            }
        }
        self.state
    }

    fn success_message(&self) -> &'static str {
        match self.method {
            Method::POST => POSTED_MESSAGE,
            Method::PUT => UPDATED_MESSAGE,
            _ => DELETED_MESSAGE,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Raw success body of the last run.
    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn reset(&mut self) {
        self.state = FetchState::Idle;
        self.response = None;
        self.error = None;
    }
}
