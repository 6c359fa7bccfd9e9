use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{REQUEST_LATENCY, REQUESTS_TOTAL};

// Outermost middleware: one log line per request, rejections included,
// plus the request counter and latency histogram
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    REQUESTS_TOTAL.inc();
    let response = next.run(request).await;
    let elapsed = start.elapsed();
    REQUEST_LATENCY.observe(elapsed.as_secs_f64());

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request completed"
    );

    response
}
