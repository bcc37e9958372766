//! Shared building blocks for the storefront crates: logging setup, runtime
//! directory checks, the metrics registry and a handful of small types.

pub mod types;
pub mod utils;
pub mod env;
pub mod metrics;
pub mod slug;
