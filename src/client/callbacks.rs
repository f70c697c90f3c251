//! Lifecycle hooks invoked by the client around each request

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Observer for every response the client receives
pub type RequestCallback = Arc<dyn Fn(StatusCode, &HeaderMap) + Send + Sync>;

/// Observer fired when the stored access token is found to be expired
pub type TokenExpiredCallback = Arc<dyn Fn() + Send + Sync>;

/// Callbacks that observe the client's request lifecycle.
///
/// Callbacks see status codes and headers (typically for telemetry or for
/// dropping a cached token); they cannot change the outcome of a request.
#[derive(Clone, Default)]
pub struct LifecycleCallbacks {
    pub request: Option<RequestCallback>,
    pub token_expired: Option<TokenExpiredCallback>,
}

impl LifecycleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the status and headers of every response
    pub fn on_request<F>(mut self, callback: F) -> Self
    where
        F: Fn(StatusCode, &HeaderMap) + Send + Sync + 'static,
    {
        self.request = Some(Arc::new(callback));
        self
    }

    /// Observe token expiry, right before a new token is generated
    pub fn on_token_expired<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.token_expired = Some(Arc::new(callback));
        self
    }

    pub(crate) fn response(&self, status: StatusCode, headers: &HeaderMap) {
        if let Some(callback) = &self.request {
            callback(status, headers);
        }
    }

    pub(crate) fn expired(&self) {
        if let Some(callback) = &self.token_expired {
            callback();
        }
    }
}

impl fmt::Debug for LifecycleCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCallbacks")
            .field("request", &self.request.is_some())
            .field("token_expired", &self.token_expired.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_callbacks_are_noops() {
        let callbacks = LifecycleCallbacks::new();
        callbacks.response(StatusCode::OK, &HeaderMap::new());
        callbacks.expired();
        assert_eq!(
            format!("{:?}", callbacks),
            "LifecycleCallbacks { request: false, token_expired: false }"
        );
    }

    #[test]
    fn test_callbacks_are_invoked() {
        let seen = Arc::new(AtomicUsize::new(0));
        let expired = Arc::new(AtomicUsize::new(0));

        let seen_clone = seen.clone();
        let expired_clone = expired.clone();
        let callbacks = LifecycleCallbacks::new()
            .on_request(move |status, _| {
                seen_clone.store(status.as_u16() as usize, Ordering::SeqCst);
            })
            .on_token_expired(move || {
                expired_clone.fetch_add(1, Ordering::SeqCst);
            });

        callbacks.response(StatusCode::FORBIDDEN, &HeaderMap::new());
        callbacks.expired();

        assert_eq!(seen.load(Ordering::SeqCst), 403);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }
}
