//! API Middleware (Rate Limiting, Request Logging)

use axum::{
    extract::{Json, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::handlers::AppState;
use super::types::{ApiError, ApiResponse};
use crate::models::config::ServerConfig;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration
    pub window_duration: Duration,
}

impl From<&ServerConfig> for RateLimitConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            requests_per_window: config.rate_limit,
            window_duration: config.rate_window,
        }
    }
}

/// In-memory fixed-window rate limiter keyed by client
pub struct RateLimiter {
    /// Request counts per client key
    requests: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Check if request is allowed, returns (allowed, remaining, reset_seconds)
    pub fn check(&self, key: &str) -> (bool, u32, u64) {
        let now = Instant::now();

        let mut entry = self.requests.entry(key.to_string()).or_insert((0, now));

        // Reset window if expired
        if now.duration_since(entry.1) > self.config.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        let reset_secs = self
            .config
            .window_duration
            .saturating_sub(now.duration_since(entry.1))
            .as_secs();

        if entry.0 >= self.config.requests_per_window {
            return (false, 0, reset_secs);
        }

        entry.0 += 1;
        let remaining = self.config.requests_per_window - entry.0;
        (true, remaining, reset_secs)
    }

    /// Drop entries idle for two windows; returns how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        self.requests.retain(|_, (_, timestamp)| {
            now.duration_since(*timestamp) < self.config.window_duration * 2
        });
        before.saturating_sub(self.requests.len())
    }

    /// Number of tracked clients
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

impl From<&ServerConfig> for RateLimiter {
    fn from(config: &ServerConfig) -> Self {
        Self::new(RateLimitConfig::from(config))
    }
}

/// Periodically evict idle rate limiter entries
pub fn start_cleanup_task(limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = limiter.cleanup();
            if removed > 0 {
                debug!(
                    "🧹 Rate limiter cleanup: {} idle clients removed, {} tracked",
                    removed,
                    limiter.tracked_clients()
                );
            }
        }
    });
}

fn is_health_path(path: &str) -> bool {
    path == "/health" || path == "/v1/health"
}

/// Client key: forwarded IP when present, otherwise "unknown"
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("X-Forwarded-For")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    // Skip rate limiting for health check
    if is_health_path(request.uri().path()) {
        return next.run(request).await;
    }

    let rate_key = client_key(&headers);
    let (allowed, remaining, reset) = state.rate_limiter.check(&rate_key);

    if !allowed {
        warn!(key = %rate_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiResponse::error(ApiError::rate_limited(reset), 0.0)),
        )
            .into_response();
    }

    let mut response = next.run(request).await;

    // Add rate limit headers
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Remaining", remaining.into());
    headers.insert("X-RateLimit-Reset", reset.into());

    response
}

/// Request logging middleware; tags each response with `X-Request-Id`
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-Id", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_blocks_after_quota() {
        let limiter = RateLimiter::new(RateLimitConfig {
            requests_per_window: 2,
            window_duration: Duration::from_secs(60),
        });

        assert!(limiter.check("a").0);
        let (allowed, remaining, _) = limiter.check("a");
        assert!(allowed);
        assert_eq!(remaining, 0);
        assert!(!limiter.check("a").0);

        // Separate clients have separate windows
        assert!(limiter.check("b").0);
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_rate_limiter_window_resets() {
        let limiter = RateLimiter::new(RateLimitConfig {
            requests_per_window: 1,
            window_duration: Duration::from_millis(10),
        });

        assert!(limiter.check("a").0);
        assert!(!limiter.check("a").0);
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("a").0);
    }

    #[test]
    fn test_cleanup_removes_idle_clients() {
        let limiter = RateLimiter::new(RateLimitConfig {
            requests_per_window: 5,
            window_duration: Duration::from_millis(5),
        });
        limiter.check("a");
        std::thread::sleep(Duration::from_millis(15));
        assert_eq!(limiter.cleanup(), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_limiter_from_server_config() {
        let config = ServerConfig {
            rate_limit: 3,
            rate_window: Duration::from_secs(5),
            ..ServerConfig::default()
        };
        let limiter = RateLimiter::from(&config);
        let (_, remaining, reset) = limiter.check("a");
        assert_eq!(remaining, 2);
        assert!(reset <= 5);
    }

    #[test]
    fn test_client_key() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_key(&headers), "10.0.0.2");

        headers.insert("X-Forwarded-For", HeaderValue::from_static("1.2.3.4, 10.0.0.1"));
        assert_eq!(client_key(&headers), "1.2.3.4");
    }
}
