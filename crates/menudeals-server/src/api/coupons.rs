use axum::{extract::State, http::HeaderMap, Extension, Json};
use chrono::{DateTime, Utc};
use menudeals_core::{Coupon, StoreInfo};
use menudeals_feed::{CollectingSink, RateLimitDecision};
use serde::Serialize;

use crate::middleware::{caller_identity, RequestId};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct DecodeData {
    store: StoreInfo,
    coupons: Vec<Coupon>,
    /// Tolerated anomalies, e.g. skipped misaligned rows.
    warnings: Vec<String>,
    quota: QuotaSnapshot,
}

#[derive(Debug, Serialize)]
pub(super) struct QuotaSnapshot {
    remaining: usize,
    reset_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct QuotaData {
    caller: String,
    limit: usize,
    remaining: usize,
    reset_at: DateTime<Utc>,
}

/// `POST /api/v1/coupons/decode`: decodes a raw upstream feed payload.
///
/// The body is the feed JSON exactly as the upstream returned it. Bodies
/// that are not a JSON object are rejected with `bad_request`; objects with
/// no coupon table decode to an empty list.
pub(super) async fn decode_coupons(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(decision): Extension<RateLimitDecision>,
    body: String,
) -> Result<Json<ApiResponse<DecodeData>>, ApiError> {
    let mut sink = CollectingSink::default();
    let feed = menudeals_feed::decode_str(&body, &state.decode_options, &mut sink).map_err(|e| {
        tracing::warn!(request_id = %req_id.0, error = %e, "rejected coupon payload");
        ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
    })?;

    for event in &sink.events {
        tracing::warn!(request_id = %req_id.0, event = %event, "tolerated coupon payload anomaly");
    }
    tracing::info!(
        request_id = %req_id.0,
        coupon_count = feed.coupons.len(),
        store_id = feed.store.store_id.as_deref().unwrap_or(""),
        "decoded coupon payload"
    );

    Ok(Json(ApiResponse {
        data: DecodeData {
            store: feed.store,
            coupons: feed.coupons,
            warnings: sink.events.iter().map(ToString::to_string).collect(),
            quota: QuotaSnapshot {
                remaining: decision.remaining,
                reset_at: decision.reset_at,
            },
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/quota`: the caller's remaining decode quota. Does not
/// consume quota.
pub(super) async fn quota(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Json<ApiResponse<QuotaData>> {
    let caller = caller_identity(&headers);
    let remaining = state.limiter.remaining(&caller);
    let reset_at = state.limiter.reset_at(&caller);

    Json(ApiResponse {
        data: QuotaData {
            caller,
            limit: state.limiter.quota(),
            remaining,
            reset_at,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
