use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("like_api_requests_total", "Total number of /like requests").unwrap();
    pub static ref RATE_LIMITED: Counter = register_counter!(
        "like_api_rate_limited_total",
        "Requests rejected by the daily limiter"
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "like_api_upstream_latency_seconds",
        "Upstream profile lookup latency in seconds"
    )
    .unwrap();
}
