//! Prometheus metrics for the storefront (default registry).

use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

pub static STORAGE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "batik_storage_operations_total",
        "Blob store operations by bucket and operation",
        &["bucket", "op"]
    )
    .expect("register storage_operations_total")
});

pub static MEDIA_SYNC_INSERTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "batik_media_sync_inserted_total",
        "Media library rows inserted by bucket sync",
        &["bucket"]
    )
    .expect("register media_sync_inserted_total")
});

pub static HTTP_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "batik_http_errors_total",
        "Error responses returned by the API, by status code",
        &["status"]
    )
    .expect("register http_errors_total")
});

pub fn record_storage_op(bucket: &str, op: &str) {
    STORAGE_OPERATIONS_TOTAL.with_label_values(&[bucket, op]).inc();
}

pub fn record_sync_inserted(bucket: &str, count: u64) {
    MEDIA_SYNC_INSERTED_TOTAL.with_label_values(&[bucket]).inc_by(count);
}

pub fn record_http_error(status: u16) {
    HTTP_ERRORS_TOTAL.with_label_values(&[&status.to_string()]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
