//! Per-client request throttling as a `tower` layer.
//!
//! A fixed one-second window per client: requests beyond the configured
//! maximum within a window get `429 Too Many Requests`. Clients are keyed
//! by the first `X-Forwarded-For` address; requests without the header
//! (e.g. local smoke tests) pass through unthrottled.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

const WINDOW: Duration = Duration::from_secs(1);
const LOG_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ThrottleLayer {
    max_per_window: u32,
}

impl ThrottleLayer {
    pub fn new(max_per_window: u32) -> Self {
        Self { max_per_window }
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = Throttle<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Throttle {
            inner,
            windows: Arc::new(DashMap::new()),
            dropped_since_log: Arc::new(AtomicU64::new(0)),
            last_log: Arc::new(std::sync::Mutex::new(Instant::now())),
            max_per_window: self.max_per_window,
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Clone)]
pub struct Throttle<S> {
    inner: S,
    windows: Arc<DashMap<String, Window>>,
    dropped_since_log: Arc<AtomicU64>,
    last_log: Arc<std::sync::Mutex<Instant>>,
    max_per_window: u32,
}

impl<S, ReqBody> Service<axum::http::Request<ReqBody>> for Throttle<S>
where
    S: Service<axum::http::Request<ReqBody>, Response = axum::http::Response<axum::body::Body>>
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: axum::http::Request<ReqBody>) -> Self::Future {
        if let Some(client) = client_id(&req) {
            if !self.admit(&client) {
                self.dropped_since_log.fetch_add(1, Ordering::Relaxed);
                self.log_drops_if_due();
                return Box::pin(async move {
                    Ok(axum::http::Response::builder()
                        .status(axum::http::StatusCode::TOO_MANY_REQUESTS)
                        .body(axum::body::Body::from("rate limited"))
                        .unwrap())
                });
            }
        }

        let fut = self.inner.call(req);
        Box::pin(async move { fut.await })
    }
}

impl<S> Throttle<S> {
    fn admit(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut window = self.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(window.started) >= WINDOW {
            window.started = now;
            window.count = 0;
        }

        if window.count < self.max_per_window {
            window.count += 1;
            true
        } else {
            false
        }
    }

    fn log_drops_if_due(&self) {
        let now = Instant::now();
        let mut last = self.last_log.lock().unwrap();
        if now.saturating_duration_since(*last) >= LOG_INTERVAL {
            let dropped = self.dropped_since_log.swap(0, Ordering::Relaxed);
            if dropped > 0 {
                warn!("throttled {dropped} requests in the last minute");
            }
            *last = now;
        }
    }
}

fn client_id<B>(req: &axum::http::Request<B>) -> Option<String> {
    // First hop in the proxy chain identifies the client.
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
