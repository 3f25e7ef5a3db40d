//! Client Module
//!
//! HTTP transport and rate limiting.

pub mod http;
pub mod rate_limiter;

pub use http::{HttpBackend, HttpClient, ReqwestBackend};
pub use rate_limiter::RateLimiter;
