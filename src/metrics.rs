use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};

lazy_static! {
    pub static ref REQUESTS_TOTAL: Counter =
        register_counter!("testtrack_requests_total", "Total number of requests").unwrap();
    pub static ref REQUESTS_UNAUTHORIZED: Counter = register_counter!(
        "testtrack_requests_unauthorized_total",
        "Requests rejected for a missing or unknown API key"
    )
    .unwrap();
    pub static ref REQUESTS_RATE_LIMITED: Counter = register_counter!(
        "testtrack_requests_rate_limited_total",
        "Requests rejected for exceeding the per-key rate limit"
    )
    .unwrap();
    pub static ref REQUESTS_FORBIDDEN: Counter = register_counter!(
        "testtrack_requests_forbidden_total",
        "Modifying requests rejected for read-only keys"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "testtrack_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
}
