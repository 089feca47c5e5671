//! # HTTP Middleware
//!
//! Request-path middleware: in-process metrics counters and per-user rate
//! limiting. Both read their shared state from request extensions so they
//! compose with any router.

pub mod metrics;
pub mod rate_limit;

pub use metrics::{metrics_middleware, ApiMetrics};
pub use rate_limit::{rate_limit_middleware, RateLimitConfig, RateLimiter};
