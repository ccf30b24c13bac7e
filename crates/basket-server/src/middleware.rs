//! Request ids, API keys and per-client request budgets.
//!
//! Rejections use the same `{error, meta}` envelope as the handlers, carrying
//! the request id assigned by [`request_id`], so that layer must wrap the
//! other two.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use basket_core::Environment;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Tracked clients above which expired windows are swept on the next request.
const SWEEP_THRESHOLD: usize = 1_024;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The set of accepted API keys. Empty means the API is open.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashSet<String>>,
}

impl AuthState {
    /// Builds the key set from `BASKET_API_KEYS` (comma-separated).
    ///
    /// Development and test environments may run open; production refuses to
    /// start without at least one key.
    pub fn from_config(api_keys: Option<&str>, env: &Environment) -> anyhow::Result<Self> {
        let keys: HashSet<String> = api_keys
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if *env == Environment::Production {
                anyhow::bail!("BASKET_API_KEYS is required in production");
            }
            tracing::warn!(%env, "BASKET_API_KEYS not set; comparison API is open");
            return Ok(Self::open());
        }

        tracing::info!(keys = keys.len(), "API key auth enabled");
        Ok(Self {
            api_keys: Arc::new(keys),
        })
    }

    #[must_use]
    pub fn open() -> Self {
        Self {
            api_keys: Arc::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.api_keys.is_empty()
    }

    fn admits(&self, headers: &HeaderMap) -> bool {
        self.is_open() || bearer_token(headers).is_some_and(|t| self.api_keys.contains(t))
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window request budget tracked separately for each client.
///
/// A client is its bearer token when one is sent, otherwise the first
/// `x-forwarded-for` address, otherwise a shared anonymous bucket.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    per_window: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, ClientWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(per_window: usize, window: Duration) -> Self {
        Self {
            per_window,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request for `client`.
    ///
    /// Returns how long the client must wait when its budget is spent.
    pub async fn admit(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let mut clients = self.clients.lock().await;

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(ClientWindow {
            started_at: now,
            count: 0,
        });
        let elapsed = now.duration_since(entry.started_at);
        if elapsed >= self.window {
            *entry = ClientWindow {
                started_at: now,
                count: 0,
            };
        }

        if entry.count >= self.per_window {
            return Err(self.window.saturating_sub(now.duration_since(entry.started_at)));
        }
        entry.count += 1;
        Ok(())
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

/// Extracts or generates a request id, stores it as a [`RequestId`]
/// extension and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

pub async fn require_api_key(State(auth): State<AuthState>, req: Request, next: Next) -> Response {
    if auth.admits(req.headers()) {
        return next.run(req).await;
    }

    tracing::debug!(path = %req.uri().path(), "rejecting request without a valid API key");
    ApiError::new(
        request_id_of(&req),
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(req.headers());

    match rate_limit.admit(&client, Instant::now()).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            tracing::warn!(client = %redact(&client), "rate limit exceeded");
            let mut res = ApiError::new(request_id_of(&req), "rate_limited", "rate limit exceeded")
                .into_response();
            // Round up so a client never retries inside the current window.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            res.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
            res
        }
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn client_key(headers: &HeaderMap) -> String {
    if let Some(token) = bearer_token(headers) {
        return format!("key:{token}");
    }
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| "anonymous".to_string(), |addr| format!("addr:{addr}"))
}

/// Keeps API keys out of logs.
fn redact(client: &str) -> &str {
    if client.starts_with("key:") {
        "key:[redacted]"
    } else {
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn bearer_token_requires_bearer_scheme() {
        assert_eq!(
            bearer_token(&headers(&[("authorization", "Bearer abc")])),
            Some("abc")
        );
        assert_eq!(bearer_token(&headers(&[("authorization", "Basic abc")])), None);
        assert_eq!(bearer_token(&headers(&[("authorization", "Bearer  ")])), None);
    }

    #[test]
    fn client_key_prefers_token_then_forwarded_address() {
        let both = headers(&[
            ("authorization", "Bearer abc"),
            ("x-forwarded-for", "10.0.0.1"),
        ]);
        assert_eq!(client_key(&both), "key:abc");
        assert_eq!(
            client_key(&headers(&[("x-forwarded-for", "10.0.0.1, 172.16.0.9")])),
            "addr:10.0.0.1"
        );
        assert_eq!(client_key(&HeaderMap::new()), "anonymous");
        assert_eq!(redact("key:abc"), "key:[redacted]");
    }

    #[test]
    fn open_auth_in_development_and_test() {
        assert!(AuthState::from_config(None, &Environment::Development)
            .unwrap()
            .is_open());
        assert!(AuthState::from_config(Some(" , "), &Environment::Test)
            .unwrap()
            .is_open());
    }

    #[test]
    fn production_requires_keys() {
        assert!(AuthState::from_config(None, &Environment::Production).is_err());
    }

    #[test]
    fn configured_keys_gate_requests() {
        let auth = AuthState::from_config(Some("alpha, beta"), &Environment::Production).unwrap();
        assert!(!auth.is_open());
        assert!(auth.admits(&headers(&[("authorization", "Bearer beta")])));
        assert!(!auth.admits(&headers(&[("authorization", "Bearer gamma")])));
        assert!(!auth.admits(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn budgets_are_tracked_per_client() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.admit("addr:a", now).await.is_ok());
        assert!(limiter.admit("addr:a", now).await.is_ok());
        let wait = limiter.admit("addr:a", now).await.unwrap_err();
        assert_eq!(wait, Duration::from_secs(60));

        assert!(limiter.admit("addr:b", now).await.is_ok());
    }

    #[tokio::test]
    async fn budget_resets_after_window() {
        let limiter = RateLimitState::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.admit("anonymous", start).await.is_ok());
        let wait = limiter
            .admit("anonymous", start + Duration::from_secs(45))
            .await
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(15));
        assert!(limiter
            .admit("anonymous", start + Duration::from_secs(60))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn expired_clients_are_swept() {
        let limiter = RateLimitState::new(5, Duration::from_secs(1));
        let start = Instant::now();
        for n in 0..SWEEP_THRESHOLD {
            limiter.admit(&format!("addr:{n}"), start).await.unwrap();
        }
        assert_eq!(limiter.tracked_clients().await, SWEEP_THRESHOLD);

        limiter
            .admit("addr:late", start + Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(limiter.tracked_clients().await, 1);
    }
}
