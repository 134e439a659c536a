use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use menudeals_feed::{RateLimitDecision, SlidingWindowLimiter};
use serde::Serialize;
use uuid::Uuid;

const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const X_RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Identity used when a request carries no caller hint.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared per-caller limiter guarding the decode routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    limiter: Arc<SlidingWindowLimiter>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(limiter: Arc<SlidingWindowLimiter>) -> Self {
        Self { limiter }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the per-caller sliding-window quota.
///
/// Allowed requests carry their [`RateLimitDecision`] as a request extension
/// so handlers can report the remaining quota. Denied requests get a 429
/// with a `retry-after` header.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = caller_identity(req.headers());
    let decision = rate_limit.limiter.check(&identity);
    let quota = rate_limit.limiter.quota();

    if !decision.allowed {
        tracing::info!(caller = %identity, reset_at = %decision.reset_at, "rate limit exceeded");
        let mut res = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "rate_limited",
                    message: "rate limit exceeded",
                },
            }),
        )
            .into_response();
        let retry_after = (decision.reset_at - Utc::now()).num_seconds().max(1);
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        apply_rate_limit_headers(res.headers_mut(), quota, &decision);
        return res;
    }

    req.extensions_mut().insert(decision);
    let mut res = next.run(req).await;
    apply_rate_limit_headers(res.headers_mut(), quota, &decision);
    res
}

/// Picks the limiter identity for a request.
///
/// Uses the first `x-forwarded-for` hop, then `x-client-id`, then
/// [`ANONYMOUS_CALLER`].
#[must_use]
pub fn caller_identity(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| header("x-client-id"))
        .unwrap_or(ANONYMOUS_CALLER)
        .to_owned()
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, quota: usize, decision: &RateLimitDecision) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(quota));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(decision.reset_at.timestamp()),
    );
}
