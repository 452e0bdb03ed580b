// Accessor - Cached, refreshable view of one REST resource
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::infrastructure::endpoints::ApiEndpoints;
use crate::infrastructure::error::{FetchError, FetchResult};
use crate::infrastructure::http_client::HttpClient;

/// One remote resource: how to address it and how to read its body
pub trait Resource: Send + Sync + 'static {
    type Params: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// `Default` is the empty form the cache falls back to on failure
    type Value: Clone + Default + Send + Sync + 'static;

    const NAME: &'static str;

    fn url(endpoints: &ApiEndpoints, params: &Self::Params) -> String;

    fn decode(url: &str, body: Bytes) -> FetchResult<Self::Value>;
}

pub fn decode_json<T: DeserializeOwned>(url: &str, body: &[u8]) -> FetchResult<T> {
    serde_json::from_slice(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Parameters changed in a way that addresses different data
pub fn should_refetch<P: PartialEq>(previous: &P, next: &P) -> bool {
    previous != next
}

/// Read-through cache of one resource.
///
/// The cached value lives in a watch channel so views can subscribe to
/// replacements. Fetch failures are logged and reset the value to its empty
/// form. Concurrent refreshes are not fenced: the last response to resolve
/// wins.
pub struct Accessor<R: Resource> {
    http: Arc<dyn HttpClient>,
    endpoints: ApiEndpoints,
    params: Mutex<R::Params>,
    value: watch::Sender<R::Value>,
}

impl<R: Resource> Accessor<R> {
    /// Build without fetching; the value starts in its empty form
    pub fn new(http: Arc<dyn HttpClient>, endpoints: ApiEndpoints, params: R::Params) -> Self {
        let (value, _) = watch::channel(R::Value::default());
        Self {
            http,
            endpoints,
            params: Mutex::new(params),
            value,
        }
    }

    /// Build and issue the initial fetch
    pub async fn mount(
        http: Arc<dyn HttpClient>,
        endpoints: ApiEndpoints,
        params: R::Params,
    ) -> Self {
        let accessor = Self::new(http, endpoints, params);
        accessor.refresh().await;
        accessor
    }

    pub fn params(&self) -> R::Params {
        self.lock_params().clone()
    }

    pub fn url(&self) -> String {
        R::url(&self.endpoints, &self.lock_params())
    }

    pub fn value(&self) -> R::Value {
        self.value.borrow().clone()
    }

    pub fn with_value<T>(&self, f: impl FnOnce(&R::Value) -> T) -> T {
        f(&self.value.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<R::Value> {
        self.value.subscribe()
    }

    /// Swap parameters and refetch if they changed. Returns whether a
    /// request was issued.
    pub async fn set_params(&self, params: R::Params) -> bool {
        let changed = {
            let mut current = self.lock_params();
            if should_refetch(&*current, &params) {
                *current = params;
                true
            } else {
                false
            }
        };

        if changed {
            self.refresh().await;
        }
        changed
    }

    /// Fetch again and replace the cached value. Never fails.
    pub async fn refresh(&self) {
        let url = self.url();

        match self.fetch(&url).await {
            Ok(value) => {
                self.value.send_replace(value);
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", R::NAME, e);
                self.value.send_replace(R::Value::default());
            }
        }
    }

    async fn fetch(&self, url: &str) -> FetchResult<R::Value> {
        let response = self.http.get(url).await?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        R::decode(url, response.body)
    }

    fn lock_params(&self) -> std::sync::MutexGuard<'_, R::Params> {
        // Params are plain data; a poisoned lock still holds a usable value
        self.params.lock().unwrap_or_else(|e| e.into_inner())
    }
}
