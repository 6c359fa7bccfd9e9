use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{ApiKeyInfo, fingerprint};
use crate::error::Problem;
use crate::metrics::{REQUESTS_FORBIDDEN, REQUESTS_RATE_LIMITED, REQUESTS_UNAUTHORIZED};
use crate::rate_limit::RETRY_AFTER_SECS;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";

// Terminal result of evaluating one request against the gate. Outcomes are
// mutually exclusive; exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Allow {
        identity: ApiKeyInfo,
        remaining: usize,
    },
    Unauthorized,
    RateLimited {
        retry_after_secs: u64,
        remaining: usize,
    },
    Forbidden,
}

fn is_modifying(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE
}

// Health, metrics and the root path skip the gate entirely
fn is_public_path(path: &str) -> bool {
    path == "/" || path == "/health" || path == "/metrics"
}

// Fixed evaluation order: identity, then rate limit, then write permission.
// The order decides which status a client sees when several conditions hold
// at once: an over-quota read-only key gets 429, not 403. The try_admit call
// is the only state-mutating step and runs exactly once per request; the
// remaining() read afterwards does not consume quota.
pub fn evaluate(
    state: &AppState,
    api_key: Option<&str>,
    method: &Method,
    now: Instant,
) -> GateOutcome {
    let Some(identity) = state.directory.resolve(api_key) else {
        return GateOutcome::Unauthorized;
    };

    if !state.limiter.try_admit(&identity.key, now) {
        return GateOutcome::RateLimited {
            retry_after_secs: RETRY_AFTER_SECS,
            remaining: state.limiter.remaining(&identity.key, now),
        };
    }

    if identity.read_only && is_modifying(method) {
        return GateOutcome::Forbidden;
    }

    GateOutcome::Allow {
        remaining: state.limiter.remaining(&identity.key, now),
        identity: identity.clone(),
    }
}

// Middleware in front of every /api route. On Allow the resolved identity
// rides along in request extensions and the response gains the quota
// headers; on any rejection the downstream handler never runs.
pub async fn admission(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match evaluate(&state, api_key.as_deref(), request.method(), Instant::now()) {
        GateOutcome::Allow {
            identity,
            remaining,
        } => {
            tracing::debug!(key = %fingerprint(&identity.key), remaining, "request admitted");
            request.extensions_mut().insert(identity);

            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Remaining", remaining.into());
            headers.insert("X-RateLimit-Limit", state.limiter.limit().into());
            response
        }
        GateOutcome::Unauthorized => {
            REQUESTS_UNAUTHORIZED.inc();
            Problem::unauthorized().into_response()
        }
        GateOutcome::RateLimited {
            retry_after_secs,
            remaining,
        } => {
            REQUESTS_RATE_LIMITED.inc();
            tracing::warn!(key = ?api_key.as_deref().map(fingerprint), "rate limit exceeded");
            Problem::rate_limited(retry_after_secs, remaining).into_response()
        }
        GateOutcome::Forbidden => {
            REQUESTS_FORBIDDEN.inc();
            Problem::forbidden().into_response()
        }
    }
}
