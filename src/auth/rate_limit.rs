//! Per-address throttling of login attempts

use crate::core::error::{AuthError, RepairError};
use crate::server::host::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

struct AddrEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter of login attempts per client address
///
/// Every attempt counts, successful or not.
#[derive(Clone)]
pub struct LoginRateLimiter {
    inner: Arc<Mutex<HashMap<String, AddrEntry>>>,
    max_attempts: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// Count an attempt from `addr`
    ///
    /// Returns the seconds left in the window when the attempt is over the limit.
    pub async fn check(&self, addr: &str) -> Result<(), u64> {
        let mut map = self.inner.lock().await;
        let now = Instant::now();

        let entry = map.entry(addr.to_owned()).or_insert_with(|| AddrEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        if entry.count <= self.max_attempts {
            Ok(())
        } else {
            let elapsed = now.duration_since(entry.window_start);
            Err(self.window.saturating_sub(elapsed).as_secs().max(1))
        }
    }

    /// Drop entries whose window has ended
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        map.retain(|_, entry| now.duration_since(entry.window_start) < self.window);
    }

    pub async fn tracked_addresses(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Run [`cleanup`](Self::cleanup) every `period` until `shutdown` fires
    pub fn spawn_cleanup(&self, period: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => limiter.cleanup().await,
                }
            }
            tracing::debug!("login rate limiter cleanup stopped");
        })
    }
}

/// Client address: first `X-Forwarded-For` entry, then the peer address
pub fn client_addr(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let addr = first.trim();
        if !addr.is_empty() {
            return addr.to_owned();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Middleware throttling `POST /login`
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RepairError> {
    let addr = client_addr(&request);
    if let Err(retry_after_secs) = state.login_limiter.check(&addr).await {
        tracing::warn!(client = %addr, retry_after_secs, "login rate limit exceeded");
        return Err(AuthError::RateLimited { retry_after_secs }.into());
    }
    Ok(next.run(request).await)
}
