use std::collections::HashMap;

use http::HeaderMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Per caller operation state handed to source executors.
#[derive(Debug, Clone, Default)]
pub struct DelegationContext {
    /// Headers of the caller's request, for executors that forward them.
    pub headers: HeaderMap,
    pub extensions: HashMap<String, Value>,
    /// Cancelled when the caller's operation is abandoned. Outstanding
    /// dispatches are dropped as soon as it fires.
    pub cancellation_token: CancellationToken,
}

impl DelegationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_cancellation_token(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    pub fn insert_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }
}
